use crate::config::WeatherApiConfig;
use crate::error::{FarmCastError, Result};
use crate::models::forecast::{CurrentConditions, ForecastDay, ForecastLocation, WeatherForecast};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

const API_BASE_URL: &str = "https://api.weatherapi.com/v1";
const FORECAST_DAYS: u32 = 7;

pub struct WeatherApiClient {
    client: reqwest::Client,
    config: WeatherApiConfig,
}

// weatherapi.com response structures
#[derive(Debug, Deserialize)]
struct WapiForecastResponse {
    location: WapiLocation,
    #[serde(default)]
    current: Option<WapiCurrent>,
    forecast: WapiForecast,
}

#[derive(Debug, Deserialize)]
struct WapiLocation {
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct WapiCurrent {
    temp_c: f64,
    feelslike_c: f64,
    wind_kph: f64,
    humidity: f64,
    condition: WapiCondition,
}

#[derive(Debug, Deserialize)]
struct WapiCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WapiForecast {
    forecastday: Vec<WapiForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WapiForecastDay {
    date: NaiveDate,
    day: WapiDay,
}

#[derive(Debug, Deserialize)]
struct WapiDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    #[serde(default)]
    totalprecip_mm: f64,
    maxwind_kph: f64,
    avghumidity: f64,
}

#[derive(Debug, Deserialize)]
struct WapiErrorResponse {
    error: WapiError,
}

#[derive(Debug, Deserialize)]
struct WapiError {
    message: String,
}

impl WeatherApiClient {
    pub fn new(config: WeatherApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch the 7-day forecast for a location query ("Pune" or "18.52,73.85")
    pub async fn fetch_forecast(&self, query: &str) -> Result<WeatherForecast> {
        let days = FORECAST_DAYS.to_string();
        let url = self.endpoint(
            "forecast.json",
            &[("q", query), ("days", days.as_str()), ("aqi", "no"), ("alerts", "no")],
        )?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FarmCastError::DataSourceUnavailable(format!("WeatherAPI: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FarmCastError::DataSourceUnavailable(error_message(
                status.as_u16(),
                &body,
            )));
        }

        let wapi_response: WapiForecastResponse = response.json().await.map_err(|e| {
            FarmCastError::DataSourceUnavailable(format!(
                "Failed to parse WeatherAPI response: {}",
                e
            ))
        })?;

        tracing::debug!(
            query,
            days = wapi_response.forecast.forecastday.len(),
            "Fetched weather forecast"
        );

        Ok(convert_response(wapi_response))
    }

    /// Test connection to weatherapi.com using the current-conditions endpoint
    pub async fn test_connection(&self, query: &str) -> Result<bool> {
        let url = self.endpoint("current.json", &[("q", query)])?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FarmCastError::DataSourceUnavailable(format!("WeatherAPI: {}", e)))?;

        Ok(response.status().is_success())
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<reqwest::Url> {
        let mut pairs = vec![("key", self.config.api_key.as_str())];
        pairs.extend_from_slice(params);
        reqwest::Url::parse_with_params(&format!("{}/{}", API_BASE_URL, path), &pairs)
            .map_err(|e| FarmCastError::Config(format!("Invalid WeatherAPI URL: {}", e)))
    }
}

/// Prefer the provider's own error text over the raw body
fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<WapiErrorResponse>(body) {
        Ok(parsed) => format!("WeatherAPI returned {}: {}", status, parsed.error.message),
        Err(_) => format!("WeatherAPI returned {}: failed to fetch weather data", status),
    }
}

fn convert_response(response: WapiForecastResponse) -> WeatherForecast {
    let location = ForecastLocation {
        name: response.location.name,
        region: response.location.region,
        country: response.location.country,
        latitude: response.location.lat,
        longitude: response.location.lon,
    };

    let current = response.current.map(|c| CurrentConditions {
        temp_c: c.temp_c,
        feels_like_c: c.feelslike_c,
        wind_kph: c.wind_kph,
        humidity_pct: c.humidity,
        condition: c.condition.text,
    });

    let mut days: Vec<ForecastDay> = response
        .forecast
        .forecastday
        .into_iter()
        .map(|fd| ForecastDay {
            date: fd.date,
            min_temp_c: fd.day.mintemp_c,
            max_temp_c: fd.day.maxtemp_c,
            total_precip_mm: fd.day.totalprecip_mm,
            max_wind_kph: fd.day.maxwind_kph,
            avg_humidity_pct: fd.day.avghumidity,
        })
        .collect();

    days.sort_by_key(|d| d.date);

    WeatherForecast {
        fetched_at: Utc::now(),
        location,
        current,
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "location": {"name": "Pune", "region": "Maharashtra", "country": "India", "lat": 18.53, "lon": 73.87},
        "current": {"temp_c": 29.5, "feelslike_c": 31.2, "wind_kph": 14.4, "humidity": 62, "condition": {"text": "Partly cloudy", "code": 1003}},
        "forecast": {"forecastday": [
            {"date": "2024-07-02", "day": {"maxtemp_c": 30.1, "mintemp_c": 22.8, "totalprecip_mm": 12.4, "maxwind_kph": 27.0, "avghumidity": 84}},
            {"date": "2024-07-01", "day": {"maxtemp_c": 31.0, "mintemp_c": 23.0, "totalprecip_mm": 0.0, "maxwind_kph": 18.7, "avghumidity": 70, "uv": 6.0}}
        ]}
    }"#;

    #[test]
    fn converts_fixture() {
        let parsed: WapiForecastResponse = serde_json::from_str(FIXTURE).unwrap();
        let forecast = convert_response(parsed);

        assert_eq!(forecast.location.display_name(), "Pune, Maharashtra, India");
        let current = forecast.current.as_ref().unwrap();
        assert_eq!(current.condition, "Partly cloudy");
        assert!((current.humidity_pct - 62.0).abs() < f64::EPSILON);

        assert_eq!(forecast.days.len(), 2);
        // Days come back in date order
        assert_eq!(forecast.days[0].date, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert!((forecast.days[1].total_precip_mm - 12.4).abs() < f64::EPSILON);
        assert!((forecast.days[1].max_wind_kph - 27.0).abs() < f64::EPSILON);
        assert!((forecast.days[1].avg_humidity_pct - 84.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_current_is_tolerated() {
        let json = r#"{
            "location": {"name": "Nashik", "lat": 20.0, "lon": 73.78},
            "forecast": {"forecastday": []}
        }"#;
        let parsed: WapiForecastResponse = serde_json::from_str(json).unwrap();
        let forecast = convert_response(parsed);
        assert!(forecast.current.is_none());
        assert!(forecast.days.is_empty());
        assert_eq!(forecast.location.display_name(), "Nashik");
    }

    #[test]
    fn endpoint_encodes_location_query() {
        let client = WeatherApiClient::new(WeatherApiConfig {
            api_key: "test_key".to_string(),
            enabled: true,
        });
        let url = client
            .endpoint("forecast.json", &[("q", "Pune, Maharashtra"), ("days", "7")])
            .unwrap();
        assert_eq!(url.path(), "/v1/forecast.json");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("key".to_string(), "test_key".to_string()));
        assert_eq!(pairs[1], ("q".to_string(), "Pune, Maharashtra".to_string()));
    }

    #[test]
    fn error_message_uses_provider_text() {
        let body = r#"{"error": {"code": 1006, "message": "No matching location found."}}"#;
        assert_eq!(
            error_message(400, body),
            "WeatherAPI returned 400: No matching location found."
        );
        assert_eq!(
            error_message(502, "<html>bad gateway</html>"),
            "WeatherAPI returned 502: failed to fetch weather data"
        );
    }
}
