use serde::{Deserialize, Serialize};

/// Id of the synthetic alert raised when the whole window is rain-free
pub const DRY_SPELL_RULE_ID: &str = "builtin-dry-spell";

/// An administrator-configured weather alert.
///
/// Every threshold is optional. A rule fires on a day only when all of the
/// thresholds it sets hold on that day; a rule with none set never fires.
/// Legacy document keys (`alertMessage`, `thresholdRain`, ...) are accepted
/// on input so exported rule sets can be imported as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRule {
    pub id: String,
    #[serde(alias = "alertMessage")]
    pub message: String,
    #[serde(default)]
    pub recommended_actions: String,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    #[serde(default, alias = "thresholdRain", skip_serializing_if = "Option::is_none")]
    pub threshold_rain_mm: Option<f64>,
    #[serde(
        default,
        alias = "thresholdTemperatureMin",
        skip_serializing_if = "Option::is_none"
    )]
    pub threshold_temp_min_c: Option<f64>,
    #[serde(
        default,
        alias = "thresholdTemperatureMax",
        skip_serializing_if = "Option::is_none"
    )]
    pub threshold_temp_max_c: Option<f64>,
    #[serde(default, alias = "thresholdWind", skip_serializing_if = "Option::is_none")]
    pub threshold_wind_kph: Option<f64>,
    #[serde(
        default,
        alias = "thresholdHumidity",
        skip_serializing_if = "Option::is_none"
    )]
    pub threshold_humidity_pct: Option<f64>,
    #[serde(default)]
    pub frost_risk: bool,
}

fn default_enabled() -> bool {
    true
}

impl AlertRule {
    pub fn new(
        id: impl Into<String>,
        message: impl Into<String>,
        recommended_actions: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            recommended_actions: recommended_actions.into(),
            is_enabled: true,
            threshold_rain_mm: None,
            threshold_temp_min_c: None,
            threshold_temp_max_c: None,
            threshold_wind_kph: None,
            threshold_humidity_pct: None,
            frost_risk: false,
        }
    }

    pub fn with_rain(mut self, mm: f64) -> Self {
        self.threshold_rain_mm = Some(mm);
        self
    }

    pub fn with_temp_min(mut self, celsius: f64) -> Self {
        self.threshold_temp_min_c = Some(celsius);
        self
    }

    pub fn with_temp_max(mut self, celsius: f64) -> Self {
        self.threshold_temp_max_c = Some(celsius);
        self
    }

    pub fn with_wind(mut self, kph: f64) -> Self {
        self.threshold_wind_kph = Some(kph);
        self
    }

    pub fn with_humidity(mut self, pct: f64) -> Self {
        self.threshold_humidity_pct = Some(pct);
        self
    }

    pub fn with_frost_risk(mut self) -> Self {
        self.frost_risk = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.is_enabled = false;
        self
    }

    pub fn has_thresholds(&self) -> bool {
        self.frost_risk
            || self.threshold_rain_mm.is_some()
            || self.threshold_temp_min_c.is_some()
            || self.threshold_temp_max_c.is_some()
            || self.threshold_wind_kph.is_some()
            || self.threshold_humidity_pct.is_some()
    }

    /// Human-readable list of the conditions this rule sets, for admin listings
    pub fn condition_summary(&self) -> String {
        let mut conditions = Vec::new();
        if self.frost_risk {
            conditions.push("Frost Risk".to_string());
        }
        if let Some(t) = self.threshold_temp_max_c {
            conditions.push(format!("Temp > {}°C", t));
        }
        if let Some(t) = self.threshold_temp_min_c {
            conditions.push(format!("Temp < {}°C", t));
        }
        if let Some(r) = self.threshold_rain_mm {
            conditions.push(format!("Rain > {}mm", r));
        }
        if let Some(w) = self.threshold_wind_kph {
            conditions.push(format!("Wind > {}km/h", w));
        }
        if let Some(h) = self.threshold_humidity_pct {
            conditions.push(format!("Humidity > {}%", h));
        }

        if conditions.is_empty() {
            "No condition set".to_string()
        } else {
            conditions.join(" and ")
        }
    }
}

/// Derived severity tier of a triggered rule. Ordering follows urgency:
/// `Critical` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityClass {
    Critical,
    High,
    Medium,
    Low,
}

impl PriorityClass {
    /// 1 (Critical) through 4 (Low)
    pub fn rank(&self) -> u8 {
        match self {
            PriorityClass::Critical => 1,
            PriorityClass::High => 2,
            PriorityClass::Medium => 3,
            PriorityClass::Low => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityClass::Critical => "Critical",
            PriorityClass::High => "High",
            PriorityClass::Medium => "Medium",
            PriorityClass::Low => "Low",
        }
    }

    pub fn variant(&self) -> AlertVariant {
        match self {
            PriorityClass::Critical => AlertVariant::Destructive,
            PriorityClass::High | PriorityClass::Medium => AlertVariant::Warning,
            PriorityClass::Low => AlertVariant::Default,
        }
    }

    /// Translation key for the banner title
    pub fn title_key(&self) -> &'static str {
        match self {
            PriorityClass::Critical => "alert_title_critical",
            PriorityClass::High => "alert_title_high",
            PriorityClass::Medium => "alert_title_medium",
            PriorityClass::Low => "alert_title_low",
        }
    }
}

impl std::fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Banner styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertVariant {
    Default,
    Warning,
    Destructive,
}

impl AlertVariant {
    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            AlertVariant::Default => Color::Gray,
            AlertVariant::Warning => Color::Yellow,
            AlertVariant::Destructive => Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertIcon {
    Thermometer,
    Wind,
    Rain,
    Sun,
    Info,
}

impl AlertIcon {
    pub fn symbol(&self) -> &'static str {
        match self {
            AlertIcon::Thermometer => "🌡",
            AlertIcon::Wind => "💨",
            AlertIcon::Rain => "🌧",
            AlertIcon::Sun => "☀",
            AlertIcon::Info => "ℹ",
        }
    }
}

/// Outcome of one alert evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ActiveAlert {
    Normal,
    Triggered {
        rule: AlertRule,
        priority_class: PriorityClass,
    },
}

impl ActiveAlert {
    pub fn is_normal(&self) -> bool {
        matches!(self, ActiveAlert::Normal)
    }

    pub fn rule(&self) -> Option<&AlertRule> {
        match self {
            ActiveAlert::Normal => None,
            ActiveAlert::Triggered { rule, .. } => Some(rule),
        }
    }

    pub fn priority_class(&self) -> Option<PriorityClass> {
        match self {
            ActiveAlert::Normal => None,
            ActiveAlert::Triggered { priority_class, .. } => Some(*priority_class),
        }
    }

    pub fn variant(&self) -> AlertVariant {
        self.priority_class()
            .map(|p| p.variant())
            .unwrap_or(AlertVariant::Default)
    }

    pub fn icon(&self) -> AlertIcon {
        match self {
            ActiveAlert::Normal => AlertIcon::Sun,
            ActiveAlert::Triggered { rule, .. } if rule.id == DRY_SPELL_RULE_ID => AlertIcon::Sun,
            ActiveAlert::Triggered { priority_class, .. } => match priority_class {
                PriorityClass::Critical => AlertIcon::Thermometer,
                PriorityClass::High => AlertIcon::Wind,
                PriorityClass::Medium => AlertIcon::Rain,
                PriorityClass::Low => AlertIcon::Info,
            },
        }
    }

    pub fn title_key(&self) -> &'static str {
        match self {
            ActiveAlert::Normal => "alert_title_normal",
            ActiveAlert::Triggered { priority_class, .. } => priority_class.title_key(),
        }
    }
}
