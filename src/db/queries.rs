use crate::db::Database;
use crate::error::{FarmCastError, Result};
use crate::models::{AlertRule, Crop, CropLifecycle, FarmingTip, TipCategory};
use chrono::NaiveDate;
use rusqlite::{params, Row};
use tracing::warn;

// Alert Rule Queries

impl Database {
    /// All rules in the order they were first added
    pub fn list_alert_rules(&self) -> Result<Vec<AlertRule>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM alert_rules ORDER BY position, id")?;
            let rules = stmt
                .query_map([], row_to_alert_rule)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rules)
        })
    }

    pub fn get_alert_rule(&self, id: &str) -> Result<Option<AlertRule>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM alert_rules WHERE id = ?1",
                [id],
                row_to_alert_rule,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    /// Insert a new rule at the end of the list, or replace an existing one in place
    pub fn upsert_alert_rule(&self, rule: &AlertRule) -> Result<()> {
        if rule.id.trim().is_empty() {
            return Err(FarmCastError::InvalidData("Alert rule has no id".into()));
        }

        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO alert_rules
                    (id, position, message, recommended_actions, is_enabled,
                     threshold_rain_mm, threshold_temp_min_c, threshold_temp_max_c,
                     threshold_wind_kph, threshold_humidity_pct, frost_risk, updated_at)
                VALUES (?1, (SELECT COALESCE(MAX(position), 0) + 1 FROM alert_rules),
                        ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, datetime('now'))
                ON CONFLICT(id) DO UPDATE SET
                    message = excluded.message,
                    recommended_actions = excluded.recommended_actions,
                    is_enabled = excluded.is_enabled,
                    threshold_rain_mm = excluded.threshold_rain_mm,
                    threshold_temp_min_c = excluded.threshold_temp_min_c,
                    threshold_temp_max_c = excluded.threshold_temp_max_c,
                    threshold_wind_kph = excluded.threshold_wind_kph,
                    threshold_humidity_pct = excluded.threshold_humidity_pct,
                    frost_risk = excluded.frost_risk,
                    updated_at = excluded.updated_at
                "#,
                params![
                    rule.id,
                    rule.message,
                    rule.recommended_actions,
                    rule.is_enabled,
                    rule.threshold_rain_mm,
                    rule.threshold_temp_min_c,
                    rule.threshold_temp_max_c,
                    rule.threshold_wind_kph,
                    rule.threshold_humidity_pct,
                    rule.frost_risk,
                ],
            )?;
            Ok(())
        })
    }

    pub fn delete_alert_rule(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM alert_rules WHERE id = ?1", [id])?;
            expect_one("alert rule", id, changed)
        })
    }

    pub fn set_alert_rule_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE alert_rules SET is_enabled = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![enabled, id],
            )?;
            expect_one("alert rule", id, changed)
        })
    }
}

fn row_to_alert_rule(row: &Row) -> rusqlite::Result<AlertRule> {
    Ok(AlertRule {
        id: row.get("id")?,
        message: row.get("message")?,
        recommended_actions: row.get("recommended_actions")?,
        is_enabled: row.get("is_enabled")?,
        threshold_rain_mm: row.get("threshold_rain_mm")?,
        threshold_temp_min_c: row.get("threshold_temp_min_c")?,
        threshold_temp_max_c: row.get("threshold_temp_max_c")?,
        threshold_wind_kph: row.get("threshold_wind_kph")?,
        threshold_humidity_pct: row.get("threshold_humidity_pct")?,
        frost_risk: row.get("frost_risk")?,
    })
}

// Farming Tip Queries

impl Database {
    pub fn list_tips(&self) -> Result<Vec<FarmingTip>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM farming_tips ORDER BY category, language, id")?;
            let tips = stmt
                .query_map([], row_to_tip)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tips)
        })
    }

    pub fn get_tip(&self, id: &str) -> Result<Option<FarmingTip>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM farming_tips WHERE id = ?1", [id], row_to_tip)
                .optional()
                .map_err(Into::into)
        })
    }

    pub fn upsert_tip(&self, tip: &FarmingTip) -> Result<()> {
        if tip.tip_text.trim().is_empty() {
            return Err(FarmCastError::InvalidData("Tip text must not be empty".into()));
        }

        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT OR REPLACE INTO farming_tips
                    (id, tip_text, language, category, is_enabled, scheduled_date, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, datetime('now'))
                "#,
                params![
                    tip.id,
                    tip.tip_text,
                    tip.language,
                    tip.category.as_str(),
                    tip.is_enabled,
                    tip.scheduled_date.map(|d| d.format("%Y-%m-%d").to_string()),
                ],
            )?;
            Ok(())
        })
    }

    pub fn delete_tip(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM farming_tips WHERE id = ?1", [id])?;
            expect_one("tip", id, changed)
        })
    }

    pub fn set_tip_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE farming_tips SET is_enabled = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![enabled, id],
            )?;
            expect_one("tip", id, changed)
        })
    }
}

fn row_to_tip(row: &Row) -> rusqlite::Result<FarmingTip> {
    let category_str: String = row.get("category")?;
    let scheduled_str: Option<String> = row.get("scheduled_date")?;

    let category = TipCategory::from_str(&category_str).unwrap_or_else(|| {
        warn!(
            category = %category_str,
            "Unknown tip category in database, defaulting to general"
        );
        TipCategory::General
    });
    let scheduled_date = scheduled_str.as_ref().and_then(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().or_else(|| {
            warn!(scheduled_date = %s, "Unparseable tip schedule in database, ignoring");
            None
        })
    });

    Ok(FarmingTip {
        id: row.get("id")?,
        tip_text: row.get("tip_text")?,
        language: row.get("language")?,
        category,
        is_enabled: row.get("is_enabled")?,
        scheduled_date,
    })
}

// Crop Queries

impl Database {
    pub fn list_crops(&self) -> Result<Vec<Crop>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM crops ORDER BY name_english, id")?;
            let crops = stmt
                .query_map([], row_to_crop)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(crops)
        })
    }

    pub fn get_crop(&self, id: &str) -> Result<Option<Crop>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM crops WHERE id = ?1", [id], row_to_crop)
                .optional()
                .map_err(Into::into)
        })
    }

    pub fn upsert_crop(&self, crop: &Crop) -> Result<()> {
        let states = serde_json::to_string(&crop.supported_state_ids)?;
        let seasons = serde_json::to_string(&crop.suitable_season_ids)?;
        let soils = serde_json::to_string(&crop.soil_types)?;

        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO crops
                    (id, name_english, name_local, image_url, supported_state_ids,
                     suitable_season_ids, soil_types, ideal_temperature, ideal_rainfall,
                     expected_yield, approximate_market_price, is_visible, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, datetime('now'))
                ON CONFLICT(id) DO UPDATE SET
                    name_english = excluded.name_english,
                    name_local = excluded.name_local,
                    image_url = excluded.image_url,
                    supported_state_ids = excluded.supported_state_ids,
                    suitable_season_ids = excluded.suitable_season_ids,
                    soil_types = excluded.soil_types,
                    ideal_temperature = excluded.ideal_temperature,
                    ideal_rainfall = excluded.ideal_rainfall,
                    expected_yield = excluded.expected_yield,
                    approximate_market_price = excluded.approximate_market_price,
                    is_visible = excluded.is_visible,
                    updated_at = excluded.updated_at
                "#,
                params![
                    crop.id,
                    crop.name_english,
                    crop.name_local,
                    crop.image_url,
                    states,
                    seasons,
                    soils,
                    crop.ideal_temperature,
                    crop.ideal_rainfall,
                    crop.expected_yield,
                    crop.approximate_market_price,
                    crop.is_visible,
                ],
            )?;
            Ok(())
        })
    }

    /// Removes the crop and its lifecycle
    pub fn delete_crop(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM crops WHERE id = ?1", [id])?;
            expect_one("crop", id, changed)
        })
    }

    pub fn set_crop_visible(&self, id: &str, visible: bool) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE crops SET is_visible = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![visible, id],
            )?;
            expect_one("crop", id, changed)
        })
    }

    pub fn get_lifecycle(&self, crop_id: &str) -> Result<Option<CropLifecycle>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM crop_lifecycles WHERE crop_id = ?1",
                [crop_id],
                row_to_lifecycle,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    pub fn upsert_lifecycle(&self, lifecycle: &CropLifecycle) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT OR REPLACE INTO crop_lifecycles
                    (id, crop_id, sowing_date_range, seed_rate, fertilizer_basal_dose,
                     fertilizer_top_dressing, disease_pesticide_guide, irrigation_schedule,
                     harvesting_window, harvesting_readiness_signs)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
                params![
                    lifecycle.id,
                    lifecycle.crop_id,
                    lifecycle.sowing_date_range,
                    lifecycle.seed_rate,
                    lifecycle.fertilizer_basal_dose,
                    lifecycle.fertilizer_top_dressing,
                    lifecycle.disease_pesticide_guide,
                    lifecycle.irrigation_schedule,
                    lifecycle.harvesting_window,
                    lifecycle.harvesting_readiness_signs,
                ],
            )?;
            Ok(())
        })
    }
}

fn row_to_crop(row: &Row) -> rusqlite::Result<Crop> {
    let id: String = row.get("id")?;

    Ok(Crop {
        supported_state_ids: json_list(row, &id, "supported_state_ids")?,
        suitable_season_ids: json_list(row, &id, "suitable_season_ids")?,
        soil_types: json_list(row, &id, "soil_types")?,
        id,
        name_english: row.get("name_english")?,
        name_local: row.get("name_local")?,
        image_url: row.get("image_url")?,
        ideal_temperature: row.get("ideal_temperature")?,
        ideal_rainfall: row.get("ideal_rainfall")?,
        expected_yield: row.get("expected_yield")?,
        approximate_market_price: row.get("approximate_market_price")?,
        is_visible: row.get("is_visible")?,
    })
}

fn json_list(row: &Row, id: &str, column: &str) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(column)?;
    Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(crop = %id, column, error = %e, "Malformed list in database, treating as empty");
        Vec::new()
    }))
}

fn row_to_lifecycle(row: &Row) -> rusqlite::Result<CropLifecycle> {
    Ok(CropLifecycle {
        id: row.get("id")?,
        crop_id: row.get("crop_id")?,
        sowing_date_range: row.get("sowing_date_range")?,
        seed_rate: row.get("seed_rate")?,
        fertilizer_basal_dose: row.get("fertilizer_basal_dose")?,
        fertilizer_top_dressing: row.get("fertilizer_top_dressing")?,
        disease_pesticide_guide: row.get("disease_pesticide_guide")?,
        irrigation_schedule: row.get("irrigation_schedule")?,
        harvesting_window: row.get("harvesting_window")?,
        harvesting_readiness_signs: row.get("harvesting_readiness_signs")?,
    })
}

// Dashboard Counts

/// Row counts shown on the admin overview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentCounts {
    pub crops: usize,
    pub alert_rules: usize,
    pub tips: usize,
}

impl ContentCounts {
    pub fn is_empty(&self) -> bool {
        self.crops == 0 && self.alert_rules == 0 && self.tips == 0
    }
}

impl Database {
    pub fn content_counts(&self) -> Result<ContentCounts> {
        self.with_conn(|conn| {
            let count = |table: &str| -> rusqlite::Result<usize> {
                conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get::<_, i64>(0)
                })
                .map(|n| n as usize)
            };
            Ok(ContentCounts {
                crops: count("crops")?,
                alert_rules: count("alert_rules")?,
                tips: count("farming_tips")?,
            })
        })
    }
}

fn expect_one(kind: &str, id: &str, changed: usize) -> Result<()> {
    if changed == 0 {
        return Err(FarmCastError::NotFound(format!("{} '{}'", kind, id)));
    }
    Ok(())
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
