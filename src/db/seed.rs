use crate::db::Database;
use crate::error::{FarmCastError, Result};
use crate::models::{AlertRule, Crop, CropLifecycle, FarmingTip};
use serde::Deserialize;
use std::path::Path;

const BUNDLED_SEED: &str = include_str!("../../assets/seed.yaml");

/// Sample content document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub crops: Vec<Crop>,
    #[serde(default)]
    pub crop_lifecycles: Vec<CropLifecycle>,
    #[serde(default)]
    pub alert_rules: Vec<AlertRule>,
    #[serde(default)]
    pub farming_tips: Vec<FarmingTip>,
}

impl SeedData {
    pub fn bundled() -> Result<Self> {
        Ok(serde_yaml::from_str(BUNDLED_SEED)?)
    }
}

impl Database {
    /// Upsert every row of `seed`. Rows with the same id are replaced.
    pub fn apply_seed(&self, seed: &SeedData) -> Result<()> {
        for crop in &seed.crops {
            self.upsert_crop(crop)?;
        }
        for lifecycle in &seed.crop_lifecycles {
            if self.get_crop(&lifecycle.crop_id)?.is_none() {
                tracing::warn!(
                    lifecycle = %lifecycle.id,
                    crop = %lifecycle.crop_id,
                    "Skipping lifecycle for unknown crop"
                );
                continue;
            }
            self.upsert_lifecycle(lifecycle)?;
        }
        for rule in &seed.alert_rules {
            self.upsert_alert_rule(rule)?;
        }
        for tip in &seed.farming_tips {
            self.upsert_tip(tip)?;
        }

        tracing::info!(
            crops = seed.crops.len(),
            lifecycles = seed.crop_lifecycles.len(),
            alert_rules = seed.alert_rules.len(),
            tips = seed.farming_tips.len(),
            "Seeded content store"
        );
        Ok(())
    }

    /// Load the bundled sample content when the store has nothing in it.
    /// Returns whether seeding happened.
    pub fn seed_if_empty(&self) -> Result<bool> {
        if !self.content_counts()?.is_empty() {
            return Ok(false);
        }
        self.apply_seed(&SeedData::bundled()?)?;
        Ok(true)
    }

    /// Upsert alert rules from a JSON array file. Legacy document keys are accepted.
    pub fn import_alert_rules(&self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)?;
        let rules = parse_alert_rules(&content)?;
        for rule in &rules {
            self.upsert_alert_rule(rule)?;
        }
        tracing::info!(path = %path.display(), count = rules.len(), "Imported alert rules");
        Ok(rules.len())
    }
}

/// Crops and lifecycles imported by [`Database::import_crops`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CropImport {
    pub crops: usize,
    pub lifecycles: usize,
}

impl Database {
    /// Upsert the `crops` and `cropLifecycles` of a YAML or JSON content document.
    /// Lifecycles for crops that are in neither the document nor the store are skipped.
    pub fn import_crops(&self, path: &Path) -> Result<CropImport> {
        let content = std::fs::read_to_string(path)?;
        let doc = parse_crop_document(&content)?;

        for crop in &doc.crops {
            self.upsert_crop(crop)?;
        }
        let mut lifecycles = 0;
        for lifecycle in &doc.crop_lifecycles {
            if self.get_crop(&lifecycle.crop_id)?.is_none() {
                tracing::warn!(
                    lifecycle = %lifecycle.id,
                    crop = %lifecycle.crop_id,
                    "Skipping lifecycle for unknown crop"
                );
                continue;
            }
            self.upsert_lifecycle(lifecycle)?;
            lifecycles += 1;
        }

        let imported = CropImport {
            crops: doc.crops.len(),
            lifecycles,
        };
        tracing::info!(
            path = %path.display(),
            crops = imported.crops,
            lifecycles = imported.lifecycles,
            "Imported crops"
        );
        Ok(imported)
    }
}

/// YAML is a superset of JSON, so one parser reads both formats
pub fn parse_crop_document(content: &str) -> Result<SeedData> {
    let doc: SeedData = serde_yaml::from_str(content)?;
    if let Some(crop) = doc
        .crops
        .iter()
        .find(|c| c.id.trim().is_empty() || c.name_english.trim().is_empty())
    {
        return Err(FarmCastError::InvalidData(format!(
            "Crop needs an id and an English name: {:?}",
            crop.id
        )));
    }
    if let Some(lc) = doc.crop_lifecycles.iter().find(|lc| lc.id.trim().is_empty()) {
        return Err(FarmCastError::InvalidData(format!(
            "Lifecycle without id for crop {}",
            lc.crop_id
        )));
    }
    Ok(doc)
}

pub fn parse_alert_rules(content: &str) -> Result<Vec<AlertRule>> {
    let rules: Vec<AlertRule> = serde_json::from_str(content)?;
    if let Some(rule) = rules.iter().find(|r| r.id.trim().is_empty()) {
        return Err(FarmCastError::InvalidData(format!(
            "Alert rule without id: {}",
            rule.message
        )));
    }
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_seed_parses() {
        let seed = SeedData::bundled().unwrap();
        assert_eq!(seed.crops.len(), 10);
        assert_eq!(seed.crop_lifecycles.len(), 10);
        assert!(seed.alert_rules.iter().any(|r| r.id == "temp-frost" && r.frost_risk));
        assert!(seed.farming_tips.iter().any(|t| t.language == "hi"));
        // Every lifecycle points at a seeded crop
        for lc in &seed.crop_lifecycles {
            assert!(seed.crops.iter().any(|c| c.id == lc.crop_id), "{}", lc.id);
        }
    }

    #[test]
    fn seed_if_empty_runs_once() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.seed_if_empty().unwrap());
        let counts = db.content_counts().unwrap();
        assert_eq!(counts.crops, 10);
        assert_eq!(counts.alert_rules, 13);

        assert!(!db.seed_if_empty().unwrap());
        // Re-seeding replaces by id rather than duplicating
        db.apply_seed(&SeedData::bundled().unwrap()).unwrap();
        assert_eq!(db.content_counts().unwrap(), counts);
    }

    #[test]
    fn seeded_rules_keep_document_order() {
        let db = Database::open_in_memory().unwrap();
        db.seed_if_empty().unwrap();
        let rules = db.list_alert_rules().unwrap();
        assert_eq!(rules.first().map(|r| r.id.as_str()), Some("rain-light"));
        assert_eq!(rules.last().map(|r| r.id.as_str()), Some("humidity-low-hot"));
    }

    #[test]
    fn parses_legacy_rule_documents() {
        let json = r#"[
            {"id": "wind-hot-dry", "alertMessage": "Hot, dry winds.", "recommendedActions": "Irrigate more often.",
             "isEnabled": true, "thresholdTemperatureMax": 35, "thresholdWind": 20},
            {"id": "rain-light", "message": "Light rain expected.", "thresholdRainMm": 5}
        ]"#;
        let rules = parse_alert_rules(json).unwrap();
        assert_eq!(rules[0].threshold_temp_max_c, Some(35.0));
        assert_eq!(rules[0].threshold_wind_kph, Some(20.0));
        assert_eq!(rules[1].threshold_rain_mm, Some(5.0));
        assert!(rules[1].is_enabled);
    }

    #[test]
    fn imports_crops_and_lifecycles_from_json() {
        let db = Database::open_in_memory().unwrap();
        let path = std::env::temp_dir().join(format!("farmcast-crops-{}.json", uuid::Uuid::new_v4()));
        let json = r#"{
            "crops": [{"id": "ragi", "nameEnglish": "Finger Millet", "nameLocal": "नाचनी",
                       "suitableSeasonIds": ["kharif"], "expectedYield": 8.5}],
            "cropLifecycles": [
                {"id": "lc-ragi", "cropId": "ragi", "seedRate": "4-5 kg/acre"},
                {"id": "lc-ghost", "cropId": "ghost"}
            ]
        }"#;
        std::fs::write(&path, json).unwrap();

        let imported = db.import_crops(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(imported, CropImport { crops: 1, lifecycles: 1 });
        let crop = db.get_crop("ragi").unwrap().unwrap();
        assert_eq!(crop.name_local, "नाचनी");
        assert!(crop.is_visible);
        assert_eq!(db.get_lifecycle("ragi").unwrap().unwrap().seed_rate, "4-5 kg/acre");
        assert!(db.get_lifecycle("ghost").unwrap().is_none());
    }

    #[test]
    fn crop_import_reads_yaml_and_replaces_by_id() {
        let db = Database::open_in_memory().unwrap();
        db.seed_if_empty().unwrap();
        let path = std::env::temp_dir().join(format!("farmcast-crops-{}.yaml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "crops:\n  - id: wheat-haryana-rabi\n    nameEnglish: Wheat\n    nameLocal: गेहूं\n    expectedYield: 22\n",
        )
        .unwrap();

        let imported = db.import_crops(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(imported.crops, 1);
        assert_eq!(db.content_counts().unwrap().crops, 10);
        assert_eq!(db.get_crop("wheat-haryana-rabi").unwrap().unwrap().expected_yield, 22.0);
        // The existing guide is left alone
        assert!(db.get_lifecycle("wheat-haryana-rabi").unwrap().is_some());
    }

    #[test]
    fn crop_document_needs_names() {
        let doc = r#"{"crops": [{"id": "x", "nameEnglish": " ", "nameLocal": ""}]}"#;
        assert!(matches!(
            parse_crop_document(doc),
            Err(FarmCastError::InvalidData(_))
        ));
    }

    #[test]
    fn rejects_rules_without_id() {
        let json = r#"[{"id": "", "message": "Nameless"}]"#;
        assert!(matches!(
            parse_alert_rules(json),
            Err(FarmCastError::InvalidData(_))
        ));
    }
}
