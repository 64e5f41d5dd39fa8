use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::i18n::{Catalog, Language};
use crate::logic::{crops, tips, Outlook};
use crate::models::{AlertRule, Crop, CropLifecycle, FarmingTip};
use chrono::{Local, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    AlertRules,
    Tips,
    Crops,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Dashboard),
            '2' => Some(Screen::AlertRules),
            '3' => Some(Screen::Tips),
            '4' => Some(Screen::Crops),
            _ => None,
        }
    }
}

/// Cursor over a list screen
#[derive(Debug, Default)]
pub struct ListState {
    pub selected_index: usize,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Keep the cursor on a row after the list shrinks
    pub fn clamp(&mut self, len: usize) {
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }
}

pub struct CropsState {
    pub list: ListState,
    pub show_details: bool,
    pub lifecycle: Option<CropLifecycle>,
}

impl CropsState {
    pub fn new() -> Self {
        Self {
            list: ListState::new(),
            show_details: false,
            lifecycle: None,
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub config: Config,
    pub db: Database,
    pub catalog: Catalog,
    pub language: Language,

    // Data
    pub outlook: Outlook,
    pub alert_rules: Vec<AlertRule>,
    pub tips: Vec<FarmingTip>,
    pub crops: Vec<Crop>,

    // Screen states
    pub rules_state: ListState,
    pub tips_state: ListState,
    pub crops_state: CropsState,

    // UI state
    pub status_message: Option<String>,
    pub needs_refresh: bool,
    pub needs_reevaluate: bool,
}

impl App {
    pub fn new(config: Config, db: Database, catalog: Catalog, language: Language) -> Result<Self> {
        let mut app = Self {
            screen: Screen::Dashboard,
            should_quit: false,
            config,
            db,
            catalog,
            language,
            outlook: Outlook::default(),
            alert_rules: Vec::new(),
            tips: Vec::new(),
            crops: Vec::new(),
            rules_state: ListState::new(),
            tips_state: ListState::new(),
            crops_state: CropsState::new(),
            status_message: None,
            needs_refresh: false,
            needs_reevaluate: false,
        };
        app.reload_content()?;
        Ok(app)
    }

    /// Reload admin content from the store
    pub fn reload_content(&mut self) -> Result<()> {
        self.alert_rules = self.db.list_alert_rules()?;
        self.tips = self.db.list_tips()?;
        self.crops = self.db.list_crops()?;

        self.rules_state.clamp(self.alert_rules.len());
        self.tips_state.clamp(self.tips.len());
        self.crops_state.list.clamp(self.crops.len());
        Ok(())
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.crops_state.show_details = false;
    }

    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn request_refresh(&mut self) {
        self.needs_refresh = true;
    }

    pub fn update_outlook(&mut self, outlook: Outlook) {
        self.outlook = outlook;
    }

    pub fn cycle_language(&mut self) {
        self.language = self.language.next();
        let msg = format!(
            "{}: {}",
            self.t("language_label"),
            self.language.native_name()
        );
        self.set_status(&msg);
    }

    /// Translated label in the current language
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.catalog.get(key, self.language)
    }

    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn tip_of_the_day(&self) -> Option<&FarmingTip> {
        let today = self.outlook.forecast.as_ref().and_then(|f| f.today());
        tips::tip_of_the_day(&self.tips, today, self.today(), self.language.code())
    }

    pub fn recommended_crops(&self) -> Vec<&Crop> {
        crops::recommend(
            &self.crops,
            self.config.location.state_id.as_deref(),
            self.today(),
        )
    }

    // Alert rule actions

    pub fn selected_rule(&self) -> Option<&AlertRule> {
        self.alert_rules.get(self.rules_state.selected_index)
    }

    pub fn toggle_selected_rule(&mut self) -> Result<()> {
        let Some(rule) = self.selected_rule() else {
            return Ok(());
        };
        let (id, enabled) = (rule.id.clone(), !rule.is_enabled);
        self.db.set_alert_rule_enabled(&id, enabled)?;
        self.reload_content()?;
        self.needs_reevaluate = true;
        let state = if enabled { "enabled" } else { "disabled" };
        let msg = format!("{}: {}", self.t(state), id);
        self.set_status(&msg);
        Ok(())
    }

    pub fn delete_selected_rule(&mut self) -> Result<()> {
        let Some(id) = self.selected_rule().map(|r| r.id.clone()) else {
            return Ok(());
        };
        self.db.delete_alert_rule(&id)?;
        self.reload_content()?;
        self.needs_reevaluate = true;
        self.set_status(&format!("Deleted rule {}", id));
        Ok(())
    }

    // Tip actions

    pub fn selected_tip(&self) -> Option<&FarmingTip> {
        self.tips.get(self.tips_state.selected_index)
    }

    pub fn toggle_selected_tip(&mut self) -> Result<()> {
        let Some(tip) = self.selected_tip() else {
            return Ok(());
        };
        let (id, enabled) = (tip.id.clone(), !tip.is_enabled);
        self.db.set_tip_enabled(&id, enabled)?;
        self.reload_content()?;
        let state = if enabled { "enabled" } else { "disabled" };
        let msg = format!("{}: {}", self.t(state), id);
        self.set_status(&msg);
        Ok(())
    }

    pub fn delete_selected_tip(&mut self) -> Result<()> {
        let Some(id) = self.selected_tip().map(|t| t.id.clone()) else {
            return Ok(());
        };
        self.db.delete_tip(&id)?;
        self.reload_content()?;
        self.set_status(&format!("Deleted tip {}", id));
        Ok(())
    }

    // Crop actions

    pub fn selected_crop(&self) -> Option<&Crop> {
        self.crops.get(self.crops_state.list.selected_index)
    }

    pub fn toggle_selected_crop(&mut self) -> Result<()> {
        let Some(crop) = self.selected_crop() else {
            return Ok(());
        };
        let (id, visible) = (crop.id.clone(), !crop.is_visible);
        self.db.set_crop_visible(&id, visible)?;
        self.reload_content()?;
        let state = if visible { "visible" } else { "hidden" };
        let msg = format!("{}: {}", self.t(state), id);
        self.set_status(&msg);
        Ok(())
    }

    /// Open or close the details pane for the selected crop
    pub fn toggle_crop_details(&mut self) -> Result<()> {
        if self.crops_state.show_details {
            self.crops_state.show_details = false;
            return Ok(());
        }
        let Some(id) = self.selected_crop().map(|c| c.id.clone()) else {
            return Ok(());
        };
        self.crops_state.lifecycle = self.db.get_lifecycle(&id)?;
        self.crops_state.show_details = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let db = Database::open_in_memory().unwrap();
        db.seed_if_empty().unwrap();
        App::new(
            Config::default(),
            db,
            Catalog::bundled().unwrap(),
            Language::English,
        )
        .unwrap()
    }

    #[test]
    fn screen_keys() {
        assert_eq!(Screen::from_key('2'), Some(Screen::AlertRules));
        assert_eq!(Screen::from_key('4'), Some(Screen::Crops));
        assert_eq!(Screen::from_key('9'), None);
    }

    #[test]
    fn list_state_stays_in_bounds() {
        let mut state = ListState::new();
        state.prev();
        assert_eq!(state.selected_index, 0);
        state.next(2);
        state.next(2);
        assert_eq!(state.selected_index, 1);
        state.clamp(1);
        assert_eq!(state.selected_index, 0);
        state.clamp(0);
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn toggling_a_rule_persists_and_requests_reevaluation() {
        let mut app = app();
        let id = app.selected_rule().unwrap().id.clone();
        assert!(app.selected_rule().unwrap().is_enabled);

        app.toggle_selected_rule().unwrap();
        assert!(!app.db.get_alert_rule(&id).unwrap().unwrap().is_enabled);
        assert!(!app.selected_rule().unwrap().is_enabled);
        assert!(app.needs_reevaluate);
    }

    #[test]
    fn deleting_last_rule_moves_cursor() {
        let mut app = app();
        let count = app.alert_rules.len();
        app.rules_state.selected_index = count - 1;
        app.delete_selected_rule().unwrap();
        assert_eq!(app.alert_rules.len(), count - 1);
        assert_eq!(app.rules_state.selected_index, count - 2);
    }

    #[test]
    fn crop_details_load_lifecycle() {
        let mut app = app();
        app.switch_screen(Screen::Crops);
        app.toggle_crop_details().unwrap();
        assert!(app.crops_state.show_details);
        let lifecycle = app.crops_state.lifecycle.as_ref().unwrap();
        assert_eq!(Some(lifecycle.crop_id.as_str()), app.selected_crop().map(|c| c.id.as_str()));

        app.toggle_crop_details().unwrap();
        assert!(!app.crops_state.show_details);
    }

    #[test]
    fn language_cycles_labels() {
        let mut app = app();
        assert_eq!(app.t("nav_crops"), "Crops");
        app.cycle_language();
        assert_eq!(app.language, Language::Hindi);
        assert_eq!(app.t("nav_crops"), "फसलें");
    }

    #[test]
    fn always_has_a_tip_from_seed() {
        let app = app();
        assert!(app.tip_of_the_day().is_some());
    }
}
