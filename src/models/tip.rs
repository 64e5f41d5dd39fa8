use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipCategory {
    General,
    Hot,
    Cold,
    Rainy,
    Windy,
    Humidity,
}

impl TipCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipCategory::General => "general",
            TipCategory::Hot => "hot",
            TipCategory::Cold => "cold",
            TipCategory::Rainy => "rainy",
            TipCategory::Windy => "windy",
            TipCategory::Humidity => "humidity",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "general" => Some(TipCategory::General),
            "hot" | "heat" => Some(TipCategory::Hot),
            "cold" => Some(TipCategory::Cold),
            "rainy" | "rain" => Some(TipCategory::Rainy),
            "windy" | "wind" => Some(TipCategory::Windy),
            "humidity" | "humid" => Some(TipCategory::Humidity),
            _ => None,
        }
    }

    pub fn all() -> &'static [TipCategory] {
        &[
            TipCategory::General,
            TipCategory::Hot,
            TipCategory::Cold,
            TipCategory::Rainy,
            TipCategory::Windy,
            TipCategory::Humidity,
        ]
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            TipCategory::General => Color::Gray,
            TipCategory::Hot => Color::Red,
            TipCategory::Cold => Color::LightBlue,
            TipCategory::Rainy => Color::Blue,
            TipCategory::Windy => Color::Cyan,
            TipCategory::Humidity => Color::Magenta,
        }
    }
}

impl std::fmt::Display for TipCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmingTip {
    pub id: String,
    pub tip_text: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_category")]
    pub category: TipCategory,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_category() -> TipCategory {
    TipCategory::General
}

fn default_enabled() -> bool {
    true
}

impl FarmingTip {
    pub fn new(id: impl Into<String>, tip_text: impl Into<String>, category: TipCategory) -> Self {
        Self {
            id: id.into(),
            tip_text: tip_text.into(),
            language: default_language(),
            category,
            is_enabled: true,
            scheduled_date: None,
        }
    }

    pub fn in_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn scheduled_for(mut self, date: NaiveDate) -> Self {
        self.scheduled_date = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tip_category_from_str_valid() {
        assert_eq!(TipCategory::from_str("hot"), Some(TipCategory::Hot));
        assert_eq!(TipCategory::from_str("Rainy"), Some(TipCategory::Rainy));
        assert_eq!(TipCategory::from_str(" wind "), Some(TipCategory::Windy));
        assert_eq!(TipCategory::from_str("HUMIDITY"), Some(TipCategory::Humidity));
    }

    #[test]
    fn tip_category_from_str_invalid() {
        assert_eq!(TipCategory::from_str("stormy"), None);
        assert_eq!(TipCategory::from_str(""), None);
    }

    #[test]
    fn tip_category_round_trip() {
        for category in TipCategory::all() {
            assert_eq!(
                TipCategory::from_str(category.as_str()),
                Some(*category),
                "Round-trip failed for {:?}",
                category
            );
        }
    }

    #[test]
    fn tip_deserializes_with_defaults() {
        let tip: FarmingTip =
            serde_json::from_str(r#"{"id": "t1", "tipText": "Mulch the beds."}"#).unwrap();
        assert_eq!(tip.language, "en");
        assert_eq!(tip.category, TipCategory::General);
        assert!(tip.is_enabled);
        assert!(tip.scheduled_date.is_none());
    }
}
