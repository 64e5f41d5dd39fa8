use crate::db::Database;
use crate::error::Result;

const MIGRATIONS: &[&str] = &[
    // Migration 1: Admin content
    r#"
    CREATE TABLE IF NOT EXISTS alert_rules (
        id TEXT PRIMARY KEY,
        position INTEGER NOT NULL,
        message TEXT NOT NULL,
        recommended_actions TEXT NOT NULL DEFAULT '',
        is_enabled INTEGER NOT NULL DEFAULT 1,
        threshold_rain_mm REAL,
        threshold_temp_min_c REAL,
        threshold_temp_max_c REAL,
        threshold_wind_kph REAL,
        threshold_humidity_pct REAL,
        frost_risk INTEGER NOT NULL DEFAULT 0,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS farming_tips (
        id TEXT PRIMARY KEY,
        tip_text TEXT NOT NULL,
        language TEXT NOT NULL DEFAULT 'en',
        category TEXT NOT NULL DEFAULT 'general',
        is_enabled INTEGER NOT NULL DEFAULT 1,
        scheduled_date TEXT,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS crops (
        id TEXT PRIMARY KEY,
        name_english TEXT NOT NULL,
        name_local TEXT NOT NULL DEFAULT '',
        image_url TEXT NOT NULL DEFAULT '',
        supported_state_ids TEXT NOT NULL DEFAULT '[]',
        suitable_season_ids TEXT NOT NULL DEFAULT '[]',
        soil_types TEXT NOT NULL DEFAULT '[]',
        ideal_temperature TEXT NOT NULL DEFAULT '',
        ideal_rainfall TEXT NOT NULL DEFAULT '',
        expected_yield REAL NOT NULL DEFAULT 0,
        approximate_market_price REAL NOT NULL DEFAULT 0,
        is_visible INTEGER NOT NULL DEFAULT 1,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS crop_lifecycles (
        id TEXT PRIMARY KEY,
        crop_id TEXT NOT NULL UNIQUE REFERENCES crops(id) ON DELETE CASCADE,
        sowing_date_range TEXT NOT NULL DEFAULT '',
        seed_rate TEXT NOT NULL DEFAULT '',
        fertilizer_basal_dose TEXT NOT NULL DEFAULT '',
        fertilizer_top_dressing TEXT NOT NULL DEFAULT '',
        disease_pesticide_guide TEXT NOT NULL DEFAULT '',
        irrigation_schedule TEXT NOT NULL DEFAULT '',
        harvesting_window TEXT NOT NULL DEFAULT '',
        harvesting_readiness_signs TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS schema_migrations (
        version INTEGER PRIMARY KEY,
        applied_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    // Migration 2: Add indexes
    r#"
    CREATE INDEX IF NOT EXISTS idx_alert_rules_position
        ON alert_rules(position);
    CREATE INDEX IF NOT EXISTS idx_farming_tips_category_language
        ON farming_tips(category, language);
    "#,
];

pub fn run(db: &Database) -> Result<()> {
    db.with_conn_mut(|conn| {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;

        let current_version: i32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current_version {
                tracing::info!("Applying migration {}", version);
                let tx = conn.transaction()?;
                tx.execute_batch(migration)?;
                tx.execute(
                    "INSERT INTO schema_migrations (version) VALUES (?1)",
                    [version],
                )?;
                tx.commit()?;
            }
        }

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    #[test]
    fn migrations_are_recorded_once() {
        let db = Database::open_in_memory().unwrap();
        // Running again is a no-op
        super::run(&db).unwrap();
        let versions: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                    row.get(0)
                })?)
            })
            .unwrap();
        assert_eq!(versions, super::MIGRATIONS.len() as i64);
    }
}
