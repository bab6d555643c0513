use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::validators::{Language, Units};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// OpenWeatherMap API key
    pub openweathermap_api_key: String,

    /// OpenWeatherMap base URL (geocoding and weather endpoints hang off it)
    #[serde(default = "default_openweathermap_url")]
    pub openweathermap_url: String,

    /// ip-api compatible JSON endpoint, queried as `{url}/{ip}`
    #[serde(default = "default_ip_geolocation_url")]
    pub ip_geolocation_url: String,

    /// Units used when the request has none: metric, imperial, or standard
    #[serde(default)]
    pub units: Units,

    /// Language used when the request has none
    #[serde(default)]
    pub language: Language,

    /// Longest daily forecast a client may request; also the default length
    #[serde(default = "default_max_forecast_days")]
    pub max_forecast_days: u8,

    /// API key for weather endpoints (optional - if not set, no auth required)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Upper bound for a whole request, including upstream calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_openweathermap_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_ip_geolocation_url() -> String {
    "http://ip-api.com/json".to_string()
}

/// OpenWeatherMap's daily forecast horizon
fn default_max_forecast_days() -> u8 {
    16
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Start with default values
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("units", "metric")?
            .set_default("language", "en")?
            // Load from config file if present
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // Override with environment variables (prefixed with GEOWEATHER_)
            // Convert SCREAMING_SNAKE_CASE env vars to snake_case config keys
            .add_source(
                Environment::with_prefix("GEOWEATHER")
                    .prefix_separator("_")
                    .separator("__")
                    .convert_case(Case::Snake)
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        if config.max_forecast_days == 0 {
            return Err(ConfigError::Message(
                "max_forecast_days must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }
}
