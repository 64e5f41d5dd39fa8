use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub id: String,
    pub name_english: String,
    pub name_local: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub supported_state_ids: Vec<String>,
    #[serde(default)]
    pub suitable_season_ids: Vec<String>,
    #[serde(default)]
    pub soil_types: Vec<String>,
    #[serde(default)]
    pub ideal_temperature: String,
    #[serde(default)]
    pub ideal_rainfall: String,
    /// kg per acre
    #[serde(default)]
    pub expected_yield: f64,
    /// INR per quintal
    #[serde(default)]
    pub approximate_market_price: f64,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Crop {
    pub fn new(id: impl Into<String>, name_english: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name_english: name_english.into(),
            name_local: String::new(),
            image_url: String::new(),
            supported_state_ids: Vec::new(),
            suitable_season_ids: Vec::new(),
            soil_types: Vec::new(),
            ideal_temperature: String::new(),
            ideal_rainfall: String::new(),
            expected_yield: 0.0,
            approximate_market_price: 0.0,
            is_visible: true,
        }
    }

    /// Name in the local script for non-English languages, English otherwise
    pub fn display_name(&self, language: &str) -> &str {
        if language != "en" && !self.name_local.is_empty() {
            &self.name_local
        } else {
            &self.name_english
        }
    }

    pub fn grows_in_state(&self, state_id: &str) -> bool {
        self.supported_state_ids.iter().any(|s| s == state_id)
    }

    pub fn suits_season(&self, season_id: &str) -> bool {
        self.suitable_season_ids.iter().any(|s| s == season_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropLifecycle {
    pub id: String,
    pub crop_id: String,
    #[serde(default)]
    pub sowing_date_range: String,
    #[serde(default)]
    pub seed_rate: String,
    #[serde(default)]
    pub fertilizer_basal_dose: String,
    #[serde(default)]
    pub fertilizer_top_dressing: String,
    #[serde(default)]
    pub disease_pesticide_guide: String,
    #[serde(default)]
    pub irrigation_schedule: String,
    #[serde(default)]
    pub harvesting_window: String,
    #[serde(default)]
    pub harvesting_readiness_signs: String,
}

impl CropLifecycle {
    /// Empty guide for `crop_id`, keyed `lc-<crop id>`
    pub fn for_crop(crop_id: &str) -> Self {
        Self {
            id: format!("lc-{}", crop_id),
            crop_id: crop_id.to_string(),
            sowing_date_range: String::new(),
            seed_rate: String::new(),
            fertilizer_basal_dose: String::new(),
            fertilizer_top_dressing: String::new(),
            disease_pesticide_guide: String::new(),
            irrigation_schedule: String::new(),
            harvesting_window: String::new(),
            harvesting_readiness_signs: String::new(),
        }
    }

    /// (translation key, value) pairs in display order
    pub fn stages(&self) -> [(&'static str, &str); 8] {
        [
            ("lifecycle_sowing", &self.sowing_date_range),
            ("lifecycle_seed_rate", &self.seed_rate),
            ("lifecycle_basal_dose", &self.fertilizer_basal_dose),
            ("lifecycle_top_dressing", &self.fertilizer_top_dressing),
            ("lifecycle_disease_guide", &self.disease_pesticide_guide),
            ("lifecycle_irrigation", &self.irrigation_schedule),
            ("lifecycle_harvest_window", &self.harvesting_window),
            ("lifecycle_readiness", &self.harvesting_readiness_signs),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndianState {
    pub id: &'static str,
    pub name: &'static str,
    pub climate_zone: &'static str,
}

const STATES: &[IndianState] = &[
    IndianState { id: "haryana", name: "Haryana", climate_zone: "Subtropical" },
    IndianState { id: "punjab", name: "Punjab", climate_zone: "Subtropical" },
    IndianState { id: "uttar-pradesh", name: "Uttar Pradesh", climate_zone: "Subtropical" },
    IndianState { id: "west-bengal", name: "West Bengal", climate_zone: "Tropical" },
    IndianState { id: "andhra-pradesh", name: "Andhra Pradesh", climate_zone: "Tropical" },
    IndianState { id: "karnataka", name: "Karnataka", climate_zone: "Tropical" },
    IndianState { id: "maharashtra", name: "Maharashtra", climate_zone: "Tropical" },
    IndianState { id: "rajasthan", name: "Rajasthan", climate_zone: "Arid" },
    IndianState { id: "gujarat", name: "Gujarat", climate_zone: "Arid" },
    IndianState { id: "telangana", name: "Telangana", climate_zone: "Tropical" },
    IndianState { id: "madhya-pradesh", name: "Madhya Pradesh", climate_zone: "Subtropical" },
    IndianState { id: "tamil-nadu", name: "Tamil Nadu", climate_zone: "Tropical" },
    IndianState { id: "kerala", name: "Kerala", climate_zone: "Tropical" },
    IndianState { id: "bihar", name: "Bihar", climate_zone: "Subtropical" },
    IndianState { id: "odisha", name: "Odisha", climate_zone: "Tropical" },
    IndianState { id: "assam", name: "Assam", climate_zone: "Tropical" },
    IndianState { id: "himachal-pradesh", name: "Himachal Pradesh", climate_zone: "Temperate" },
    IndianState { id: "jammu-kashmir", name: "Jammu and Kashmir", climate_zone: "Temperate" },
];

impl IndianState {
    pub fn all() -> &'static [IndianState] {
        STATES
    }

    /// Lookup by id ("uttar-pradesh") or display name ("Uttar Pradesh")
    pub fn find(key: &str) -> Option<&'static IndianState> {
        let key = key.trim();
        STATES
            .iter()
            .find(|s| s.id.eq_ignore_ascii_case(key) || s.name.eq_ignore_ascii_case(key))
    }
}

/// Cropping season as a month/day window. Windows may wrap the new year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Season {
    pub id: &'static str,
    pub name: &'static str,
    pub start: (u32, u32),
    pub end: (u32, u32),
}

const SEASONS: &[Season] = &[
    Season { id: "kharif", name: "Kharif", start: (6, 1), end: (10, 31) },
    Season { id: "rabi", name: "Rabi", start: (11, 1), end: (3, 31) },
    Season { id: "zaid", name: "Zaid", start: (4, 1), end: (5, 31) },
];

impl Season {
    pub fn find(id: &str) -> Option<&'static Season> {
        SEASONS.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let md = (date.month(), date.day());
        if self.start <= self.end {
            self.start <= md && md <= self.end
        } else {
            md >= self.start || md <= self.end
        }
    }

    pub fn active_on(date: NaiveDate) -> Vec<&'static Season> {
        SEASONS.iter().filter(|s| s.contains(date)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn seasons_cover_the_year_once() {
        let mut day = date(2024, 1, 1);
        while day.year() == 2024 {
            assert_eq!(
                Season::active_on(day).len(),
                1,
                "Expected exactly one season on {}",
                day
            );
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn rabi_wraps_the_new_year() {
        let rabi = Season::find("rabi").unwrap();
        assert!(rabi.contains(date(2024, 11, 1)));
        assert!(rabi.contains(date(2024, 12, 31)));
        assert!(rabi.contains(date(2025, 1, 15)));
        assert!(rabi.contains(date(2025, 3, 31)));
        assert!(!rabi.contains(date(2025, 4, 1)));
        assert!(!rabi.contains(date(2024, 10, 31)));
    }

    #[test]
    fn kharif_boundaries() {
        let kharif = Season::find("kharif").unwrap();
        assert!(!kharif.contains(date(2024, 5, 31)));
        assert!(kharif.contains(date(2024, 6, 1)));
        assert!(kharif.contains(date(2024, 10, 31)));
        assert!(!kharif.contains(date(2024, 11, 1)));
    }

    #[test]
    fn state_lookup_by_id_or_name() {
        assert_eq!(IndianState::find("maharashtra").map(|s| s.name), Some("Maharashtra"));
        assert_eq!(IndianState::find("Uttar Pradesh").map(|s| s.id), Some("uttar-pradesh"));
        assert!(IndianState::find("atlantis").is_none());
    }

    #[test]
    fn crop_display_name_by_language() {
        let crop: Crop = serde_json::from_str(
            r#"{"id": "wheat", "nameEnglish": "Wheat", "nameLocal": "गेहूं"}"#,
        )
        .unwrap();
        assert_eq!(crop.display_name("en"), "Wheat");
        assert_eq!(crop.display_name("hi"), "गेहूं");
        assert!(crop.is_visible);
    }
}
