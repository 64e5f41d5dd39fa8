use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "farmcast",
    version,
    about = "Farming assistant: weather alerts, crop recommendations and daily tips"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Display language (en, hi, mr, ta, te, bn)
    #[arg(short, long, global = true)]
    pub language: Option<String>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run interactive setup
    Init,
    /// Validate config and test the weather API
    Check,
    /// Load the bundled sample crops, rules and tips
    Seed {
        /// Seed even when the store already has content
        #[arg(long)]
        force: bool,
    },
    /// Fetch the forecast and print the active weather alert
    Alert {
        /// Location to use instead of the configured one
        #[arg(long)]
        location: Option<String>,
        /// Print the alert as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage weather alert rules
    #[command(subcommand)]
    Rules(RulesCommand),
    /// Manage farming tips
    #[command(subcommand)]
    Tips(TipsCommand),
    /// Browse and manage crops
    #[command(subcommand)]
    Crops(CropsCommand),
    /// Show content counts
    Stats,
}

#[derive(Subcommand)]
pub enum RulesCommand {
    /// List alert rules in evaluation order
    List,
    /// Add or replace an alert rule
    Add(RuleArgs),
    /// Delete an alert rule
    Remove { id: String },
    /// Enable an alert rule
    Enable { id: String },
    /// Disable an alert rule
    Disable { id: String },
    /// Import rules from a JSON array file
    Import { file: PathBuf },
}

#[derive(Args)]
pub struct RuleArgs {
    /// Rule id (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,
    /// Alert message shown to farmers
    #[arg(long)]
    pub message: String,
    /// Recommended actions
    #[arg(long, default_value = "")]
    pub actions: String,
    /// Fires when daily precipitation exceeds this many mm
    #[arg(long)]
    pub rain: Option<f64>,
    /// Fires when the daily minimum drops below this °C
    #[arg(long)]
    pub temp_min: Option<f64>,
    /// Fires when the daily maximum exceeds this °C
    #[arg(long)]
    pub temp_max: Option<f64>,
    /// Fires when max wind exceeds this km/h
    #[arg(long)]
    pub wind: Option<f64>,
    /// Fires when average humidity exceeds this %
    #[arg(long)]
    pub humidity: Option<f64>,
    /// Fires when the daily minimum is at or below 4 °C
    #[arg(long)]
    pub frost: bool,
    /// Store the rule disabled
    #[arg(long)]
    pub disabled: bool,
}

#[derive(Subcommand)]
pub enum TipsCommand {
    /// List farming tips
    List,
    /// Add a farming tip
    Add {
        /// Tip text
        text: String,
        /// general, hot, cold, rainy, windy or humidity
        #[arg(long, default_value = "general")]
        category: String,
        /// Language code of the tip text
        #[arg(long = "tip-language", default_value = "en")]
        tip_language: String,
        /// Show on this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Change fields of an existing tip
    Edit {
        id: String,
        /// New tip text
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long = "tip-language")]
        tip_language: Option<String>,
        /// Show on this date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_date")]
        date: Option<String>,
        /// Stop showing the tip on a fixed date
        #[arg(long)]
        clear_date: bool,
    },
    /// Delete a farming tip
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum CropsCommand {
    /// Crops recommended for today's season
    List {
        /// Show every crop, including hidden ones
        #[arg(long)]
        all: bool,
    },
    /// Crop details and lifecycle guide
    Show { id: String },
    /// Add a crop, optionally with its lifecycle guide
    Add {
        /// Crop id (derived from the English name when omitted)
        #[arg(long)]
        id: Option<String>,
        #[command(flatten)]
        fields: CropArgs,
    },
    /// Change fields of a crop or its lifecycle guide
    Edit {
        id: String,
        #[command(flatten)]
        fields: CropArgs,
    },
    /// Import crops and lifecycles from a YAML or JSON content file
    Import { file: PathBuf },
    /// Delete a crop and its lifecycle guide
    Remove { id: String },
}

/// Crop and lifecycle fields; only the given ones are written
#[derive(Args, Default)]
pub struct CropArgs {
    /// English name
    #[arg(long)]
    pub name: Option<String>,
    /// Name in the local script
    #[arg(long)]
    pub local_name: Option<String>,
    /// Comma-separated state ids
    #[arg(long, value_delimiter = ',')]
    pub states: Option<Vec<String>>,
    /// Comma-separated season ids (kharif, rabi, zaid)
    #[arg(long, value_delimiter = ',')]
    pub seasons: Option<Vec<String>>,
    /// Comma-separated soil types
    #[arg(long, value_delimiter = ',')]
    pub soils: Option<Vec<String>>,
    /// Ideal temperature, e.g. "20-30°C"
    #[arg(long)]
    pub temperature: Option<String>,
    /// Ideal rainfall, e.g. "50-75 cm"
    #[arg(long)]
    pub rainfall: Option<String>,
    #[arg(long = "yield")]
    pub expected_yield: Option<f64>,
    /// Approximate market price in INR per quintal
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub image_url: Option<String>,
    /// Hide the crop from recommendations
    #[arg(long, conflicts_with = "show")]
    pub hide: bool,
    /// Show the crop in recommendations again
    #[arg(long)]
    pub show: bool,

    #[arg(long, help_heading = "Lifecycle guide")]
    pub sowing: Option<String>,
    #[arg(long, help_heading = "Lifecycle guide")]
    pub seed_rate: Option<String>,
    #[arg(long, help_heading = "Lifecycle guide")]
    pub basal_dose: Option<String>,
    #[arg(long, help_heading = "Lifecycle guide")]
    pub top_dressing: Option<String>,
    #[arg(long, help_heading = "Lifecycle guide")]
    pub disease_guide: Option<String>,
    #[arg(long, help_heading = "Lifecycle guide")]
    pub irrigation: Option<String>,
    #[arg(long, help_heading = "Lifecycle guide")]
    pub harvest_window: Option<String>,
    #[arg(long, help_heading = "Lifecycle guide")]
    pub readiness: Option<String>,
}

impl CropArgs {
    pub fn has_lifecycle_fields(&self) -> bool {
        [
            &self.sowing,
            &self.seed_rate,
            &self.basal_dose,
            &self.top_dressing,
            &self.disease_guide,
            &self.irrigation,
            &self.harvest_window,
            &self.readiness,
        ]
        .iter()
        .any(|field| field.is_some())
    }
}
