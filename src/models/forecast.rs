use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 7-day weather forecast from weatherapi.com
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub fetched_at: DateTime<Utc>,
    pub location: ForecastLocation,
    pub current: Option<CurrentConditions>,
    pub days: Vec<ForecastDay>, // chronological, first = today
}

impl WeatherForecast {
    pub fn today(&self) -> Option<&ForecastDay> {
        self.days.first()
    }

    /// Highest daily maximum across the window
    pub fn max_temp(&self) -> Option<f64> {
        self.days
            .iter()
            .map(|d| d.max_temp_c)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Lowest daily minimum across the window
    pub fn min_temp(&self) -> Option<f64> {
        self.days
            .iter()
            .map(|d| d.min_temp_c)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    pub fn total_precip_mm(&self) -> f64 {
        self.days.iter().map(|d| d.total_precip_mm).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastLocation {
    pub name: String,
    pub region: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ForecastLocation {
    pub fn display_name(&self) -> String {
        [&self.name, &self.region, &self.country]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Conditions right now at the forecast location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub wind_kph: f64,
    pub humidity_pct: f64,
    pub condition: String,
}

/// Daily summary used by alert evaluation.
/// Units: temperature °C, precipitation mm, wind km/h, humidity %.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub total_precip_mm: f64,
    pub max_wind_kph: f64,
    pub avg_humidity_pct: f64,
}

impl ForecastDay {
    pub fn is_dry(&self) -> bool {
        self.total_precip_mm == 0.0
    }
}
