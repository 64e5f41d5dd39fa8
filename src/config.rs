use crate::error::{FarmCastError, Result};
use crate::models::IndianState;
use dialoguer::{Input, Password, Select};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub location: LocationConfig,
    #[serde(default)]
    pub weatherapi: Option<WeatherApiConfig>,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationConfig {
    /// City name, "City, State" or "lat,lon"
    pub query: String,
    /// Limits crop recommendations to one state
    #[serde(default)]
    pub state_id: Option<String>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct WeatherApiConfig {
    pub api_key: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for WeatherApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiConfig")
            .field("api_key", &"[REDACTED]")
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    #[serde(default = "default_language")]
    pub language: String,
    /// Extra translation catalog merged over the bundled one
    #[serde(default)]
    pub translations: Option<PathBuf>,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            translations: None,
        }
    }
}

impl Config {
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p.clone(),
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(FarmCastError::Config(format!(
                "Config file not found at {:?}. Run `farmcast init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| FarmCastError::Config(format!("Failed to read config: {}", e)))?;

        tracing::debug!(path = %config_path.display(), "Loading config");
        Self::from_yaml(&config_str)
    }

    /// Parse config text after substituting `${VAR}` placeholders
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| FarmCastError::Config(format!("Failed to parse config: {}", e)))?;

        if config.location.query.trim().is_empty() {
            return Err(FarmCastError::Config("location.query must not be empty".into()));
        }

        Ok(config)
    }

    /// Weather client settings, only when enabled and a key is present
    pub fn active_weatherapi(&self) -> Option<&WeatherApiConfig> {
        self.weatherapi
            .as_ref()
            .filter(|c| c.enabled && !c.api_key.is_empty())
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("farmcast").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/farmcast/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FarmCastError::Config("Cannot determine config directory".into()))?
            .join("farmcast");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive(config_override: Option<&PathBuf>) -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up FarmCast!");
        println!();

        println!("Farm location");
        let query: String = Input::new()
            .with_prompt("  City or lat,lon")
            .default("Pune, Maharashtra".into())
            .interact_text()
            .map_err(input_error)?;

        let states = IndianState::all();
        let mut state_labels: Vec<&str> = vec!["(any state)"];
        state_labels.extend(states.iter().map(|s| s.name));
        let state_choice = Select::new()
            .with_prompt("  State (filters crop recommendations)")
            .items(&state_labels)
            .default(0)
            .interact()
            .map_err(input_error)?;
        let state_id = match state_choice {
            0 => None,
            n => states.get(n - 1).map(|s| s.id.to_string()),
        };

        println!();

        println!("WeatherAPI.com (leave API key blank to skip)");
        let api_key: String = Password::new()
            .with_prompt("  API key")
            .allow_empty_password(true)
            .interact()
            .map_err(input_error)?;

        let weatherapi = if api_key.is_empty() {
            None
        } else {
            Some(WeatherApiConfig {
                api_key,
                enabled: true,
            })
        };

        println!();

        let language: String = Input::new()
            .with_prompt("Display language (en, hi, mr, ta, te, bn)")
            .default("en".into())
            .interact_text()
            .map_err(input_error)?;

        println!();

        let config = Config {
            location: LocationConfig { query, state_id },
            weatherapi,
            display: DisplayConfig {
                language,
                translations: None,
            },
        };

        let config_path = match config_override {
            Some(p) => p.clone(),
            None => Self::default_config_path()?,
        };
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| FarmCastError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# FarmCast Configuration\n# Generated by `farmcast init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| FarmCastError::Config(format!("Invalid placeholder pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            match std::env::var(var_name) {
                Ok(value) => result = result.replace(placeholder, &value),
                Err(_) => tracing::warn!("Config references unset variable {}", var_name),
            }
        }

        Ok(result)
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("FARMCAST_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| FarmCastError::Config("Cannot determine data directory".into()))?
            .join("farmcast");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("farmcast.db"))
    }
}

fn input_error(e: dialoguer::Error) -> FarmCastError {
    FarmCastError::Config(format!("Input error: {}", e))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            location: LocationConfig {
                query: "Pune, Maharashtra".into(),
                state_id: Some("maharashtra".into()),
            },
            weatherapi: None,
            display: DisplayConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let yaml = r#"
location:
  query: "Nashik, Maharashtra"
  state_id: maharashtra
weatherapi:
  api_key: abc123
display:
  language: mr
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.location.query, "Nashik, Maharashtra");
        assert_eq!(config.location.state_id.as_deref(), Some("maharashtra"));
        assert_eq!(config.display.language, "mr");
        let weather = config.active_weatherapi().unwrap();
        assert!(weather.enabled);
        assert_eq!(weather.api_key, "abc123");
    }

    #[test]
    fn optional_sections_default() {
        let config = Config::from_yaml("location:\n  query: Pune\n").unwrap();
        assert!(config.weatherapi.is_none());
        assert!(config.location.state_id.is_none());
        assert_eq!(config.display.language, "en");
        assert!(config.active_weatherapi().is_none());
    }

    #[test]
    fn disabled_or_keyless_weatherapi_is_inactive() {
        let config =
            Config::from_yaml("location:\n  query: Pune\nweatherapi:\n  api_key: k\n  enabled: false\n")
                .unwrap();
        assert!(config.active_weatherapi().is_none());

        let config = Config::from_yaml("location:\n  query: Pune\nweatherapi:\n  api_key: \"\"\n")
            .unwrap();
        assert!(config.active_weatherapi().is_none());
    }

    #[test]
    fn empty_location_is_rejected() {
        let err = Config::from_yaml("location:\n  query: \"  \"\n").unwrap_err();
        assert!(matches!(err, FarmCastError::Config(_)));
    }

    #[test]
    fn substitutes_env_vars() {
        std::env::set_var("FARMCAST_TEST_API_KEY", "from-env");
        let out = Config::substitute_env_vars("api_key: ${FARMCAST_TEST_API_KEY}").unwrap();
        assert_eq!(out, "api_key: from-env");

        // Unset variables are left in place
        let out = Config::substitute_env_vars("api_key: ${FARMCAST_TEST_UNSET_VAR}").unwrap();
        assert_eq!(out, "api_key: ${FARMCAST_TEST_UNSET_VAR}");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = WeatherApiConfig {
            api_key: "super-secret".into(),
            enabled: true,
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("[REDACTED]"));
    }
}
