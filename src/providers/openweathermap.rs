use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{
    CurrentWeatherProvider, DailyWeatherProvider, ForwardGeocoder, GeocodedPlace, ProviderError,
    ReverseGeocoder, WeatherOptions,
};
use crate::location::Coordinates;

const DIRECT_GEOCODING_PATH: &str = "/geo/1.0/direct";
const REVERSE_GEOCODING_PATH: &str = "/geo/1.0/reverse";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";
const DAILY_FORECAST_PATH: &str = "/data/2.5/forecast/daily";

// ============================================================================
// Geocoding API Response
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GeocodingEntry {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl GeocodingEntry {
    /// "name, state, country", skipping blanks and repeated parts
    pub fn address(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3);
        let candidates = [
            Some(self.name.as_str()),
            self.state.as_deref(),
            self.country.as_deref(),
        ];

        for part in candidates.into_iter().flatten().map(str::trim) {
            if !part.is_empty() && !parts.contains(&part) {
                parts.push(part);
            }
        }

        parts.join(", ")
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

// ============================================================================
// Weather API Responses (Internal)
// These structs deserialize the raw API response; not all fields are used
// ============================================================================

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherCondition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Current Weather API 2.5 payload
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct CurrentWeatherPayload {
    pub coord: Coord,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub main: MainInfo,
    pub visibility: Option<u32>,
    pub wind: WindInfo,
    pub clouds: CloudInfo,
    pub dt: i64,
    pub sys: SysInfo,
    #[serde(default)]
    pub timezone: i32,
    #[serde(default)]
    pub name: String,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct MainInfo {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u32,
}

#[derive(Debug, Deserialize)]
pub struct WindInfo {
    pub speed: f64,
    #[serde(default)]
    pub deg: u32,
    pub gust: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CloudInfo {
    pub all: u32,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct SysInfo {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// Daily Forecast 16 days API payload
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct DailyForecastPayload {
    pub city: ForecastCity,
    #[serde(default)]
    pub cnt: u32,
    #[serde(default)]
    pub list: Vec<DailyEntry>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct ForecastCity {
    #[serde(default)]
    pub name: String,
    pub coord: Coord,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub timezone: i32,
}

#[derive(Debug, Deserialize)]
pub struct DailyEntry {
    pub dt: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub temp: DailyTemperature,
    pub feels_like: DailyFeelsLike,
    pub pressure: u32,
    pub humidity: u32,
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub speed: f64,
    #[serde(default)]
    pub deg: u32,
    pub gust: Option<f64>,
    #[serde(default)]
    pub clouds: u32,
    #[serde(default)]
    pub pop: f64, // Probability of precipitation
    pub rain: Option<f64>,
    pub snow: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct DailyTemperature {
    pub day: f64,
    pub min: f64,
    pub max: f64,
    pub night: f64,
    pub eve: f64,
    pub morn: f64,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct DailyFeelsLike {
    pub day: f64,
    pub night: f64,
    pub eve: f64,
    pub morn: f64,
}

// ============================================================================
// Client
// ============================================================================

pub struct OpenWeatherMapClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherMapClient {
    pub fn new(client: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);

        // Use query builder for proper URL encoding - handles spaces and special chars
        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(path = %path, status = %status, "Received OpenWeatherMap response");

        if !status.is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        Ok(response.json().await?)
    }

    fn coordinate_query(coordinates: Coordinates) -> [(&'static str, String); 2] {
        [
            ("lat", coordinates.latitude.to_string()),
            ("lon", coordinates.longitude.to_string()),
        ]
    }
}

#[async_trait]
impl ForwardGeocoder for OpenWeatherMapClient {
    async fn forward_geocode(&self, city: &str) -> Result<Option<GeocodedPlace>, ProviderError> {
        tracing::debug!(city = %city, "Geocoding city");

        let entries: Vec<GeocodingEntry> = self
            .get_json(
                DIRECT_GEOCODING_PATH,
                &[("q", city.to_string()), ("limit", "1".to_string())],
            )
            .await?;

        Ok(entries.into_iter().next().map(|entry| GeocodedPlace {
            coordinates: entry.coordinates(),
            address: entry.address(),
        }))
    }
}

#[async_trait]
impl ReverseGeocoder for OpenWeatherMapClient {
    async fn reverse_geocode(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<String>, ProviderError> {
        tracing::debug!(
            lat = %coordinates.latitude,
            lon = %coordinates.longitude,
            "Reverse geocoding coordinates"
        );

        let [lat, lon] = Self::coordinate_query(coordinates);
        let entries: Vec<GeocodingEntry> = self
            .get_json(REVERSE_GEOCODING_PATH, &[lat, lon, ("limit", "1".to_string())])
            .await?;

        Ok(entries
            .first()
            .map(GeocodingEntry::address)
            .filter(|address| !address.is_empty()))
    }
}

#[async_trait]
impl CurrentWeatherProvider for OpenWeatherMapClient {
    async fn current_weather(
        &self,
        coordinates: Coordinates,
        options: &WeatherOptions,
    ) -> Result<CurrentWeatherPayload, ProviderError> {
        tracing::debug!(
            lat = %coordinates.latitude,
            lon = %coordinates.longitude,
            units = %options.units,
            lang = %options.language,
            "Fetching current weather"
        );

        let [lat, lon] = Self::coordinate_query(coordinates);
        self.get_json(
            CURRENT_WEATHER_PATH,
            &[
                lat,
                lon,
                ("units", options.units.as_str().to_string()),
                ("lang", options.language.as_str().to_string()),
            ],
        )
        .await
    }
}

#[async_trait]
impl DailyWeatherProvider for OpenWeatherMapClient {
    async fn daily_weather(
        &self,
        coordinates: Coordinates,
        options: &WeatherOptions,
        days: u8,
    ) -> Result<DailyForecastPayload, ProviderError> {
        tracing::debug!(
            lat = %coordinates.latitude,
            lon = %coordinates.longitude,
            units = %options.units,
            lang = %options.language,
            days,
            "Fetching daily forecast"
        );

        let [lat, lon] = Self::coordinate_query(coordinates);
        self.get_json(
            DAILY_FORECAST_PATH,
            &[
                lat,
                lon,
                ("cnt", days.to_string()),
                ("units", options.units.as_str().to_string()),
                ("lang", options.language.as_str().to_string()),
            ],
        )
        .await
    }
}
