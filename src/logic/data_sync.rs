use crate::config::Config;
use crate::datasources::WeatherApiClient;
use crate::db::Database;
use crate::error::{FarmCastError, Result};
use crate::logic::alerts::AlertEvaluator;
use crate::models::{ActiveAlert, WeatherForecast};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Latest forecast and the alert chosen for it
#[derive(Debug, Clone)]
pub struct Outlook {
    pub forecast: Option<WeatherForecast>,
    pub alert: ActiveAlert,
    pub last_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl Default for Outlook {
    fn default() -> Self {
        Self {
            forecast: None,
            alert: ActiveAlert::Normal,
            last_error: None,
            last_updated: None,
        }
    }
}

pub struct DataSyncService {
    config: Config,
    db: Database,
    weather_client: Option<WeatherApiClient>,
    evaluator: AlertEvaluator,
    current: Arc<RwLock<Outlook>>,
}

impl DataSyncService {
    pub fn new(config: Config, db: Database) -> Self {
        let weather_client = config.active_weatherapi().map(|c| {
            tracing::info!("WeatherAPI client configured for forecast data");
            WeatherApiClient::new(c.clone())
        });

        if weather_client.is_none() {
            tracing::warn!("WeatherAPI not configured - forecast and alerts will be unavailable");
        }

        Self {
            config,
            db,
            weather_client,
            evaluator: AlertEvaluator::new(),
            current: Arc::new(RwLock::new(Outlook::default())),
        }
    }

    pub fn has_weather_source(&self) -> bool {
        self.weather_client.is_some()
    }

    /// Fetch the configured location's forecast and re-evaluate alert rules.
    /// Fetch failures are kept on the outlook rather than returned.
    pub async fn refresh(&self) -> Result<Outlook> {
        let query = self.config.location.query.clone();
        let mut outlook = self.current.read().await.clone();

        match self.fetch_forecast(&query).await {
            Ok(forecast) => {
                outlook.forecast = Some(forecast);
                outlook.last_error = None;
            }
            Err(e) => {
                tracing::warn!("Failed to fetch weather forecast: {}", e);
                outlook.last_error = Some(e.to_string());
            }
        }

        outlook.alert = match outlook.forecast {
            Some(ref forecast) => self.evaluate(forecast)?,
            None => ActiveAlert::Normal,
        };
        outlook.last_updated = Some(Utc::now());

        let mut current = self.current.write().await;
        *current = outlook.clone();

        Ok(outlook)
    }

    /// One-off forecast and alert for any location. Errors are returned.
    pub async fn outlook_for(&self, query: &str) -> Result<(WeatherForecast, ActiveAlert)> {
        let forecast = self.fetch_forecast(query).await?;
        let alert = self.evaluate(&forecast)?;
        Ok((forecast, alert))
    }

    /// Re-run the evaluator against stored rules without refetching
    pub async fn reevaluate(&self) -> Result<ActiveAlert> {
        let mut current = self.current.write().await;
        current.alert = match current.forecast {
            Some(ref forecast) => self.evaluate(forecast)?,
            None => ActiveAlert::Normal,
        };
        Ok(current.alert.clone())
    }

    pub async fn check_connection(&self) -> bool {
        match self.weather_client {
            Some(ref client) => client
                .test_connection(&self.config.location.query)
                .await
                .unwrap_or(false),
            None => false,
        }
    }

    async fn fetch_forecast(&self, query: &str) -> Result<WeatherForecast> {
        let client = self.weather_client.as_ref().ok_or_else(|| {
            FarmCastError::DataSourceUnavailable("WeatherAPI is not configured".into())
        })?;
        client.fetch_forecast(query).await
    }

    fn evaluate(&self, forecast: &WeatherForecast) -> Result<ActiveAlert> {
        let rules = self.db.list_alert_rules()?;
        Ok(self.evaluator.evaluate(&forecast.days, &rules))
    }
}
