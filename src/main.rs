mod app;
mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod i18n;
mod logic;
mod models;
mod ui;

use anyhow::{bail, Context};
use app::{App, Screen};
use chrono::{Local, NaiveDate};
use clap::Parser;
use cli::{Cli, Commands, CropArgs, CropsCommand, RuleArgs, RulesCommand, TipsCommand};
use config::Config;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use db::Database;
use i18n::{Catalog, Language};
use logic::{crops, AlertEvaluator, DataSyncService};
use models::{AlertRule, Crop, CropLifecycle, FarmingTip, IndianState, Season, TipCategory};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, IsTerminal};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::{AlertRulesScreen, CropsScreen, DashboardScreen, TipsScreen};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(Commands::Init) = cli.command {
        let (_, path) = Config::setup_interactive(cli.config.as_ref())?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let language = resolve_language(cli.language.as_deref(), &config);
    let catalog = Catalog::load(config.display.translations.as_deref())
        .context("Failed to load translations")?;

    let db = Database::open(cli.data_dir.as_ref()).context("Failed to open content store")?;
    if !matches!(cli.command, Some(Commands::Seed { .. })) && db.seed_if_empty()? {
        tracing::info!("Empty content store seeded with sample content");
    }

    match cli.command {
        None => run_tui(config, db, catalog, language).await,
        Some(Commands::Init) => Ok(()),
        Some(Commands::Check) => run_check(config, db).await,
        Some(Commands::Seed { force }) => run_seed(&db, force),
        Some(Commands::Alert { location, json }) => {
            run_alert(config, db, &catalog, language, location, json).await
        }
        Some(Commands::Rules(cmd)) => run_rules(&db, cmd),
        Some(Commands::Tips(cmd)) => run_tips(&db, cmd),
        Some(Commands::Crops(cmd)) => run_crops(&db, &config, &catalog, language, cmd),
        Some(Commands::Stats) => run_stats(&db),
    }
}

/// RUST_LOG wins; otherwise -v/-vv raise the default `warn` level
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let interactive = cli.command.is_none() && io::stdin().is_terminal();
    if interactive && !Config::exists(cli.config.as_ref()) {
        println!("No configuration found.");
        let (config, path) = Config::setup_interactive(cli.config.as_ref())?;
        println!("Config written to {}", path.display());
        return Ok(config);
    }

    Config::load(cli.config.as_ref()).context("Configuration error")
}

fn resolve_language(flag: Option<&str>, config: &Config) -> Language {
    let code = flag.unwrap_or(config.display.language.as_str());
    Language::from_code(code).unwrap_or_else(|| {
        tracing::warn!(language = %code, "Unsupported language, using English");
        Language::English
    })
}

async fn run_check(config: Config, db: Database) -> anyhow::Result<()> {
    println!("Config: OK (location: {})", config.location.query);
    println!("Content store: {}", db.path().display());

    let data_sync = DataSyncService::new(config, db);
    if !data_sync.has_weather_source() {
        bail!("WeatherAPI is not configured. Run `farmcast init` to add an API key.");
    }

    if data_sync.check_connection().await {
        println!("WeatherAPI: OK");
        Ok(())
    } else {
        bail!("WeatherAPI: connection failed")
    }
}

fn run_seed(db: &Database, force: bool) -> anyhow::Result<()> {
    if force {
        db.apply_seed(&db::SeedData::bundled()?)?;
        println!("Sample content loaded.");
    } else if db.seed_if_empty()? {
        println!("Sample content loaded.");
    } else {
        println!("Content store already has content. Use --force to reload the samples.");
    }
    Ok(())
}

async fn run_alert(
    config: Config,
    db: Database,
    catalog: &Catalog,
    language: Language,
    location: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let query = location.unwrap_or_else(|| config.location.query.clone());
    let data_sync = DataSyncService::new(config, db);
    let (forecast, alert) = data_sync
        .outlook_for(&query)
        .await
        .with_context(|| format!("Failed to get forecast for {}", query))?;

    if json {
        let doc = serde_json::json!({
            "location": forecast.location.display_name(),
            "alert": alert,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("{}", forecast.location.display_name());
    println!(
        "{} {}",
        alert.icon().symbol(),
        catalog.get(alert.title_key(), language)
    );
    match alert.rule() {
        Some(rule) => {
            println!("  {}", rule.message);
            if !rule.recommended_actions.is_empty() {
                println!(
                    "  {}: {}",
                    catalog.get("recommended_actions", language),
                    rule.recommended_actions
                );
            }
        }
        None => println!("  {}", catalog.get("alert_normal_message", language)),
    }

    if let (Some(min), Some(max)) = (forecast.min_temp(), forecast.max_temp()) {
        println!();
        println!(
            "{}: {:.0}-{:.0}°C, {} {:.1} mm",
            catalog.get("forecast_7day", language),
            min,
            max,
            catalog.get("rain", language),
            forecast.total_precip_mm()
        );
    }
    Ok(())
}

fn run_rules(db: &Database, cmd: RulesCommand) -> anyhow::Result<()> {
    match cmd {
        RulesCommand::List => {
            let rules = db.list_alert_rules()?;
            for rule in &rules {
                let state = if rule.is_enabled { "on " } else { "off" };
                println!(
                    "[{}] {:<20} {:<9} {:<35} {}",
                    state,
                    rule.id,
                    logic::alerts::priority::classify(rule).as_str(),
                    rule.condition_summary(),
                    rule.message
                );
            }
            println!();
            for (id, name) in AlertEvaluator::new().list_builtins() {
                println!("[built-in] {:<20} {}", id, name);
            }
        }
        RulesCommand::Add(args) => {
            let rule = rule_from_args(args);
            if !rule.has_thresholds() {
                tracing::warn!(id = %rule.id, "Rule has no thresholds and will never fire");
            }
            db.upsert_alert_rule(&rule)?;
            println!("Saved rule {}", rule.id);
        }
        RulesCommand::Remove { id } => {
            db.delete_alert_rule(&id)?;
            println!("Deleted rule {}", id);
        }
        RulesCommand::Enable { id } => {
            db.set_alert_rule_enabled(&id, true)?;
            println!("Enabled rule {}", id);
        }
        RulesCommand::Disable { id } => {
            db.set_alert_rule_enabled(&id, false)?;
            println!("Disabled rule {}", id);
        }
        RulesCommand::Import { file } => {
            let count = db
                .import_alert_rules(&file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            println!("Imported {} rules", count);
        }
    }
    Ok(())
}

fn rule_from_args(args: RuleArgs) -> AlertRule {
    let id = args
        .id
        .unwrap_or_else(|| format!("rule-{}", uuid::Uuid::new_v4()));
    let mut rule = AlertRule::new(id, args.message, args.actions);
    if let Some(mm) = args.rain {
        rule = rule.with_rain(mm);
    }
    if let Some(c) = args.temp_min {
        rule = rule.with_temp_min(c);
    }
    if let Some(c) = args.temp_max {
        rule = rule.with_temp_max(c);
    }
    if let Some(kph) = args.wind {
        rule = rule.with_wind(kph);
    }
    if let Some(pct) = args.humidity {
        rule = rule.with_humidity(pct);
    }
    if args.frost {
        rule = rule.with_frost_risk();
    }
    if args.disabled {
        rule = rule.disabled();
    }
    rule
}

fn run_tips(db: &Database, cmd: TipsCommand) -> anyhow::Result<()> {
    match cmd {
        TipsCommand::List => {
            for tip in db.list_tips()? {
                let scheduled = tip
                    .scheduled_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<16} {:<9} {:<3} {:<10} {} {}",
                    tip.id,
                    tip.category.as_str(),
                    tip.language,
                    scheduled,
                    if tip.is_enabled { "" } else { "(disabled)" },
                    tip.tip_text
                );
            }
        }
        TipsCommand::Add {
            text,
            category,
            tip_language,
            date,
        } => {
            let id = format!("tip-{}", uuid::Uuid::new_v4());
            let mut tip = FarmingTip::new(id, text, parse_tip_category(&category)?)
                .in_language(parse_tip_language(&tip_language)?.code());
            if let Some(date) = date {
                tip = tip.scheduled_for(parse_date(&date)?);
            }
            db.upsert_tip(&tip)?;
            println!("Saved tip {}", tip.id);
        }
        TipsCommand::Edit {
            id,
            text,
            category,
            tip_language,
            date,
            clear_date,
        } => {
            let Some(mut tip) = db.get_tip(&id)? else {
                bail!("No tip with id {}", id);
            };
            if let Some(text) = text {
                tip.tip_text = text;
            }
            if let Some(category) = category {
                tip.category = parse_tip_category(&category)?;
            }
            if let Some(language) = tip_language {
                tip.language = parse_tip_language(&language)?.code().to_string();
            }
            if let Some(date) = date {
                tip.scheduled_date = Some(parse_date(&date)?);
            } else if clear_date {
                tip.scheduled_date = None;
            }
            db.upsert_tip(&tip)?;
            println!("Updated tip {}", tip.id);
        }
        TipsCommand::Remove { id } => {
            db.delete_tip(&id)?;
            println!("Deleted tip {}", id);
        }
    }
    Ok(())
}

fn parse_tip_category(category: &str) -> anyhow::Result<TipCategory> {
    match TipCategory::from_str(category) {
        Some(category) => Ok(category),
        None => {
            let known: Vec<&str> = TipCategory::all().iter().map(|c| c.as_str()).collect();
            bail!(
                "Unknown tip category: {} (expected one of {})",
                category,
                known.join(", ")
            )
        }
    }
}

/// Accepts a code or a language name; tips are stored under the code
fn parse_tip_language(language: &str) -> anyhow::Result<Language> {
    Language::from_code(language)
        .with_context(|| format!("Unsupported tip language: {}", language))
}

fn parse_date(date: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").with_context(|| format!("Invalid date: {}", date))
}

fn run_crops(
    db: &Database,
    config: &Config,
    catalog: &Catalog,
    language: Language,
    cmd: CropsCommand,
) -> anyhow::Result<()> {
    let lang = language.code();
    match cmd {
        CropsCommand::List { all: true } => {
            for crop in db.list_crops()? {
                let state = if crop.is_visible { "visible" } else { "hidden" };
                println!(
                    "{:<14} {:<24} {}",
                    crop.id,
                    crop.display_name(lang),
                    catalog.get(state, language)
                );
            }
        }
        CropsCommand::List { all: false } => {
            let today = Local::now().date_naive();
            let all_crops = db.list_crops()?;
            let picks = crops::recommend(&all_crops, config.location.state_id.as_deref(), today);

            println!(
                "{} ({})",
                catalog.get("crop_recommendations", language),
                crops::current_season_names(today).join(", ")
            );
            if picks.is_empty() {
                println!("  {}", catalog.get("no_crops_in_season", language));
            }
            for crop in picks {
                println!(
                    "  {:<14} {:<24} {} | {}",
                    crop.id,
                    crop.display_name(lang),
                    crop.ideal_temperature,
                    crop.ideal_rainfall
                );
            }
        }
        CropsCommand::Show { id } => {
            let Some(crop) = db.get_crop(&id)? else {
                bail!("No crop with id {}", id);
            };
            println!("{}", crop.display_name(lang));
            let facts = [
                ("season", crop.suitable_season_ids.join(", ")),
                ("soil", crop.soil_types.join(", ")),
                ("ideal_temperature", crop.ideal_temperature.clone()),
                ("ideal_rainfall", crop.ideal_rainfall.clone()),
                ("expected_yield", format!("{:.1} q/acre", crop.expected_yield)),
                ("market_price", format!("₹{:.0}/q", crop.approximate_market_price)),
            ];
            for (key, value) in facts {
                println!("  {}: {}", catalog.get(key, language), value);
            }

            println!();
            println!("{}", catalog.get("crop_guide", language));
            match db.get_lifecycle(&crop.id)? {
                Some(lifecycle) => {
                    for (key, value) in lifecycle.stages() {
                        println!("  {}: {}", catalog.get(key, language), value);
                    }
                }
                None => println!("  {}", catalog.get("crop_guide_unavailable", language)),
            }
        }
        CropsCommand::Add { id, fields } => {
            let Some(name) = fields.name.clone() else {
                bail!("A new crop needs --name");
            };
            let id = match id {
                Some(id) => id,
                None => crop_id_from_name(&name),
            };
            if db.get_crop(&id)?.is_some() {
                bail!("Crop {} already exists; use `crops edit {}`", id, id);
            }
            save_crop(db, Crop::new(&id, name), fields)?;
            println!("Saved crop {}", id);
        }
        CropsCommand::Edit { id, fields } => {
            let Some(crop) = db.get_crop(&id)? else {
                bail!("No crop with id {}", id);
            };
            save_crop(db, crop, fields)?;
            println!("Updated crop {}", id);
        }
        CropsCommand::Import { file } => {
            let imported = db
                .import_crops(&file)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            println!(
                "Imported {} crops and {} lifecycle guides",
                imported.crops, imported.lifecycles
            );
        }
        CropsCommand::Remove { id } => {
            db.delete_crop(&id)?;
            println!("Deleted crop {}", id);
        }
    }
    Ok(())
}

/// Lowercase ASCII words of the English name joined by '-', or a generated id
fn crop_id_from_name(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        format!("crop-{}", uuid::Uuid::new_v4())
    } else {
        slug
    }
}

/// Apply the given fields to `crop` and store it. The lifecycle guide is
/// created or updated only when a lifecycle field is given.
fn save_crop(db: &Database, mut crop: Crop, fields: CropArgs) -> anyhow::Result<()> {
    let has_lifecycle = fields.has_lifecycle_fields();
    let CropArgs {
        name,
        local_name,
        states,
        seasons,
        soils,
        temperature,
        rainfall,
        expected_yield,
        price,
        image_url,
        hide,
        show,
        sowing,
        seed_rate,
        basal_dose,
        top_dressing,
        disease_guide,
        irrigation,
        harvest_window,
        readiness,
    } = fields;

    if let Some(name) = name {
        crop.name_english = name;
    }
    if let Some(local_name) = local_name {
        crop.name_local = local_name;
    }
    if let Some(states) = states {
        for state in states.iter().filter(|s| IndianState::find(s).is_none()) {
            tracing::warn!(state = %state, "Unknown state id");
        }
        crop.supported_state_ids = states;
    }
    if let Some(seasons) = seasons {
        for season in seasons.iter().filter(|s| Season::find(s).is_none()) {
            tracing::warn!(season = %season, "Unknown season id");
        }
        crop.suitable_season_ids = seasons;
    }
    if let Some(soils) = soils {
        crop.soil_types = soils;
    }
    if let Some(temperature) = temperature {
        crop.ideal_temperature = temperature;
    }
    if let Some(rainfall) = rainfall {
        crop.ideal_rainfall = rainfall;
    }
    if let Some(expected_yield) = expected_yield {
        crop.expected_yield = expected_yield;
    }
    if let Some(price) = price {
        crop.approximate_market_price = price;
    }
    if let Some(image_url) = image_url {
        crop.image_url = image_url;
    }
    if hide {
        crop.is_visible = false;
    } else if show {
        crop.is_visible = true;
    }
    if crop.name_english.trim().is_empty() {
        bail!("Crop {} needs an English name", crop.id);
    }
    db.upsert_crop(&crop)?;

    if has_lifecycle {
        let mut lifecycle = db
            .get_lifecycle(&crop.id)?
            .unwrap_or_else(|| CropLifecycle::for_crop(&crop.id));
        let stages = [
            (sowing, &mut lifecycle.sowing_date_range),
            (seed_rate, &mut lifecycle.seed_rate),
            (basal_dose, &mut lifecycle.fertilizer_basal_dose),
            (top_dressing, &mut lifecycle.fertilizer_top_dressing),
            (disease_guide, &mut lifecycle.disease_pesticide_guide),
            (irrigation, &mut lifecycle.irrigation_schedule),
            (harvest_window, &mut lifecycle.harvesting_window),
            (readiness, &mut lifecycle.harvesting_readiness_signs),
        ];
        for (value, field) in stages {
            if let Some(value) = value {
                *field = value;
            }
        }
        db.upsert_lifecycle(&lifecycle)?;
    }
    Ok(())
}

fn run_stats(db: &Database) -> anyhow::Result<()> {
    let counts = db.content_counts()?;
    println!("Crops:       {}", counts.crops);
    println!("Alert rules: {}", counts.alert_rules);
    println!("Tips:        {}", counts.tips);
    println!("Store:       {}", db.path().display());
    Ok(())
}

async fn run_tui(
    config: Config,
    db: Database,
    catalog: Catalog,
    language: Language,
) -> anyhow::Result<()> {
    let data_sync = DataSyncService::new(config.clone(), db.clone());
    let mut app = App::new(config, db, catalog, language)?;

    // Initial fetch; failures are shown on the dashboard
    let outlook = data_sync.refresh().await?;
    app.update_outlook(outlook);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, &data_sync).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    data_sync: &DataSyncService,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        // Handle input with timeout for async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => app.quit(),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.quit();
                    }
                    KeyCode::Esc => {
                        if app.crops_state.show_details {
                            app.crops_state.show_details = false;
                        } else {
                            app.switch_screen(Screen::Dashboard);
                        }
                    }
                    KeyCode::Char('r') => app.request_refresh(),
                    KeyCode::Char('l') => app.cycle_language(),
                    KeyCode::Char(c) if Screen::from_key(c).is_some() => {
                        if let Some(screen) = Screen::from_key(c) {
                            app.clear_status();
                            app.switch_screen(screen);
                        }
                    }
                    code => {
                        if let Err(e) = handle_screen_input(app, code) {
                            tracing::warn!("Action failed: {}", e);
                            let msg = format!("Action failed: {}", e);
                            app.set_status(&msg);
                        }
                    }
                }
            }
        }

        if app.needs_refresh {
            app.needs_refresh = false;
            app.set_status("Refreshing forecast...");
            terminal.draw(|f| draw(f, app))?;

            match data_sync.refresh().await {
                Ok(outlook) => {
                    let failed = outlook.last_error.is_some();
                    app.update_outlook(outlook);
                    app.reload_content()?;
                    if failed {
                        app.clear_status();
                    } else {
                        app.set_status("Forecast refreshed");
                    }
                }
                Err(e) => {
                    let msg = format!("Refresh failed: {}", e);
                    app.set_status(&msg);
                }
            }
        }

        if app.needs_reevaluate {
            app.needs_reevaluate = false;
            app.outlook.alert = data_sync.reevaluate().await?;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let status = app.status_message.as_deref();

    match app.screen {
        Screen::Dashboard => {
            let recommended = app.recommended_crops();
            let seasons = crops::current_season_names(app.today());
            let screen = DashboardScreen::new(
                &app.config.location.query,
                &app.outlook,
                &app.catalog,
                app.language,
            )
            .with_tip(app.tip_of_the_day())
            .with_crops(&recommended, &seasons)
            .with_status(status);
            f.render_widget(screen, area);
        }
        Screen::AlertRules => {
            let screen = AlertRulesScreen::new(&app.alert_rules, &app.catalog, app.language)
                .with_selection(app.rules_state.selected_index)
                .with_status(status);
            f.render_widget(screen, area);
        }
        Screen::Tips => {
            let screen = TipsScreen::new(&app.tips, &app.catalog, app.language)
                .with_selection(app.tips_state.selected_index)
                .with_status(status);
            f.render_widget(screen, area);
        }
        Screen::Crops => {
            let mut screen = CropsScreen::new(&app.crops, &app.catalog, app.language)
                .with_selection(app.crops_state.list.selected_index)
                .with_status(status);
            if app.crops_state.show_details {
                screen = screen.with_details(app.crops_state.lifecycle.as_ref());
            }
            f.render_widget(screen, area);
        }
    }
}

fn handle_screen_input(app: &mut App, code: KeyCode) -> error::Result<()> {
    match app.screen {
        Screen::Dashboard => Ok(()),
        Screen::AlertRules => handle_rules_input(app, code),
        Screen::Tips => handle_tips_input(app, code),
        Screen::Crops => handle_crops_input(app, code),
    }
}

fn handle_rules_input(app: &mut App, code: KeyCode) -> error::Result<()> {
    let count = app.alert_rules.len();
    match code {
        KeyCode::Up => app.rules_state.prev(),
        KeyCode::Down => app.rules_state.next(count),
        KeyCode::Char('t') => app.toggle_selected_rule()?,
        KeyCode::Char('d') => app.delete_selected_rule()?,
        _ => {}
    }
    Ok(())
}

fn handle_tips_input(app: &mut App, code: KeyCode) -> error::Result<()> {
    let count = app.tips.len();
    match code {
        KeyCode::Up => app.tips_state.prev(),
        KeyCode::Down => app.tips_state.next(count),
        KeyCode::Char('t') => app.toggle_selected_tip()?,
        KeyCode::Char('d') => app.delete_selected_tip()?,
        _ => {}
    }
    Ok(())
}

fn handle_crops_input(app: &mut App, code: KeyCode) -> error::Result<()> {
    let count = app.crops.len();
    match code {
        KeyCode::Up => {
            app.crops_state.list.prev();
            app.crops_state.show_details = false;
        }
        KeyCode::Down => {
            app.crops_state.list.next(count);
            app.crops_state.show_details = false;
        }
        KeyCode::Char('t') => app.toggle_selected_crop()?,
        KeyCode::Enter => app.toggle_crop_details()?,
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crops_cmd(db: &Database, cmd: CropsCommand) -> anyhow::Result<()> {
        let catalog = Catalog::bundled().unwrap();
        run_crops(db, &Config::default(), &catalog, Language::English, cmd)
    }

    #[test]
    fn tip_language_name_is_stored_as_code() {
        let db = Database::open_in_memory().unwrap();
        run_tips(
            &db,
            TipsCommand::Add {
                text: "बुवाई से पहले बीज उपचार करें।".into(),
                category: "general".into(),
                tip_language: "Hindi".into(),
                date: None,
            },
        )
        .unwrap();

        let tips = db.list_tips().unwrap();
        assert_eq!(tips[0].language, "hi");
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let shown = logic::tips::tip_of_the_day(&tips, None, date, Language::Hindi.code());
        assert_eq!(shown.map(|t| t.id.as_str()), Some(tips[0].id.as_str()));
    }

    #[test]
    fn unknown_tip_language_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let result = run_tips(
            &db,
            TipsCommand::Add {
                text: "Text".into(),
                category: "general".into(),
                tip_language: "Klingon".into(),
                date: None,
            },
        );
        assert!(result.is_err());
        assert!(db.list_tips().unwrap().is_empty());
    }

    #[test]
    fn tip_edit_changes_only_given_fields() {
        let db = Database::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 10, 2).unwrap();
        db.upsert_tip(
            &FarmingTip::new("t1", "Prepare seed beds.", TipCategory::Cold).scheduled_for(date),
        )
        .unwrap();

        run_tips(
            &db,
            TipsCommand::Edit {
                id: "t1".into(),
                text: None,
                category: None,
                tip_language: Some("Marathi".into()),
                date: None,
                clear_date: true,
            },
        )
        .unwrap();

        let tip = db.get_tip("t1").unwrap().unwrap();
        assert_eq!(tip.language, "mr");
        assert_eq!(tip.scheduled_date, None);
        assert_eq!(tip.tip_text, "Prepare seed beds.");
        assert_eq!(tip.category, TipCategory::Cold);

        let missing = TipsCommand::Edit {
            id: "t2".into(),
            text: Some("New".into()),
            category: None,
            tip_language: None,
            date: None,
            clear_date: false,
        };
        assert!(run_tips(&db, missing).is_err());
    }

    #[test]
    fn crop_add_derives_id_and_stores_lifecycle() {
        let db = Database::open_in_memory().unwrap();
        let fields = CropArgs {
            name: Some("Finger Millet".into()),
            seasons: Some(vec!["kharif".into()]),
            states: Some(vec!["karnataka".into()]),
            expected_yield: Some(8.5),
            seed_rate: Some("4-5 kg/acre".into()),
            ..CropArgs::default()
        };
        crops_cmd(&db, CropsCommand::Add { id: None, fields }).unwrap();

        let crop = db.get_crop("finger-millet").unwrap().unwrap();
        assert_eq!(crop.name_english, "Finger Millet");
        assert_eq!(crop.suitable_season_ids, vec!["kharif"]);
        assert!(crop.is_visible);
        let lifecycle = db.get_lifecycle("finger-millet").unwrap().unwrap();
        assert_eq!(lifecycle.id, "lc-finger-millet");
        assert_eq!(lifecycle.seed_rate, "4-5 kg/acre");

        // A second add with the same id is refused
        let again = CropArgs {
            name: Some("Finger Millet".into()),
            ..CropArgs::default()
        };
        assert!(crops_cmd(&db, CropsCommand::Add { id: None, fields: again }).is_err());
        assert!(crops_cmd(&db, CropsCommand::Add { id: None, fields: CropArgs::default() }).is_err());
    }

    #[test]
    fn crop_edit_keeps_unset_fields_and_existing_guide() {
        let db = Database::open_in_memory().unwrap();
        db.seed_if_empty().unwrap();
        let before = db.get_crop("wheat-haryana-rabi").unwrap().unwrap();
        let guide_before = db.get_lifecycle("wheat-haryana-rabi").unwrap().unwrap();

        let fields = CropArgs {
            price: Some(2275.0),
            hide: true,
            irrigation: Some("Crown root initiation, then every 20 days".into()),
            ..CropArgs::default()
        };
        crops_cmd(
            &db,
            CropsCommand::Edit {
                id: "wheat-haryana-rabi".into(),
                fields,
            },
        )
        .unwrap();

        let after = db.get_crop("wheat-haryana-rabi").unwrap().unwrap();
        assert_eq!(after.approximate_market_price, 2275.0);
        assert!(!after.is_visible);
        assert_eq!(after.name_local, before.name_local);
        assert_eq!(after.supported_state_ids, before.supported_state_ids);

        let guide = db.get_lifecycle("wheat-haryana-rabi").unwrap().unwrap();
        assert_eq!(guide.id, guide_before.id);
        assert_eq!(guide.irrigation_schedule, "Crown root initiation, then every 20 days");
        assert_eq!(guide.seed_rate, guide_before.seed_rate);

        let missing = CropsCommand::Edit {
            id: "no-such-crop".into(),
            fields: CropArgs::default(),
        };
        assert!(crops_cmd(&db, missing).is_err());
    }

    #[test]
    fn crop_ids_come_from_ascii_words() {
        assert_eq!(crop_id_from_name("Pearl Millet (Bajra)"), "pearl-millet-bajra");
        assert!(crop_id_from_name("बाजरा").starts_with("crop-"));
    }
}
