//! Shared fixtures and in-memory provider doubles for unit tests.

use std::net::IpAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::config::AppConfig;
use crate::location::Coordinates;
use crate::providers::{
    CurrentWeatherPayload, CurrentWeatherProvider, DailyForecastPayload, DailyWeatherProvider,
    ForwardGeocoder, GeocodedPlace, IpLocator, ProviderError, ReverseGeocoder, WeatherOptions,
};
use crate::validators::{Language, Units};
use crate::weather::{Providers, WeatherService};
use crate::AppState;

pub fn current_payload() -> CurrentWeatherPayload {
    serde_json::from_value(json!({
        "coord": {"lon": 2.35, "lat": 48.85},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 21.3, "feels_like": 20.9, "temp_min": 19.8, "temp_max": 22.6, "pressure": 1018, "humidity": 52},
        "visibility": 10000,
        "wind": {"speed": 3.6, "deg": 250, "gust": 6.1},
        "clouds": {"all": 0},
        "dt": 1700000000,
        "sys": {"country": "FR", "sunrise": 1699987000, "sunset": 1700021000},
        "timezone": 3600,
        "name": "Paris"
    }))
    .expect("valid current weather fixture")
}

/// Daily payload with `days` consecutive entries starting 2023-11-15
pub fn daily_payload(days: usize) -> DailyForecastPayload {
    let list: Vec<_> = (0..days)
        .map(|i| {
            json!({
                "dt": 1700049600 + (i as i64) * 86400,
                "sunrise": 1700031000 + (i as i64) * 86400,
                "sunset": 1700064000 + (i as i64) * 86400,
                "temp": {"day": 12.1, "min": 8.2, "max": 13.4, "night": 9.0, "eve": 11.2, "morn": 8.5},
                "feels_like": {"day": 11.3, "night": 7.9, "eve": 10.4, "morn": 6.8},
                "pressure": 1009,
                "humidity": 81,
                "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
                "speed": 5.2,
                "deg": 220,
                "gust": 11.4,
                "clouds": 90,
                "pop": 0.76,
                "rain": 2.1
            })
        })
        .collect();

    serde_json::from_value(json!({
        "city": {"name": "Paris", "coord": {"lon": 2.35, "lat": 48.85}, "country": "FR", "timezone": 3600},
        "cnt": days,
        "list": list
    }))
    .expect("valid daily forecast fixture")
}

/// A collaborator call observed by [`FakeProviders`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Forward(String),
    Reverse(Coordinates),
    Locate(IpAddr),
    Current(Coordinates),
    Daily(Coordinates, u8),
}

/// Implements every provider trait and records the calls it receives
pub struct FakeProviders {
    pub place: Option<GeocodedPlace>,
    pub reverse_address: Option<String>,
    pub ip_location: Coordinates,
    pub weather_error: Option<String>,
    pub forward_error: Option<String>,
    pub reverse_error: Option<String>,
    pub locate_error: Option<String>,
    /// Return this many daily entries instead of the requested count
    pub daily_days_override: Option<usize>,
    calls: Mutex<Vec<Call>>,
}

impl FakeProviders {
    /// Forward geocoding answers Paris, reverse geocoding answers "Reverse Town"
    pub fn paris() -> Self {
        Self {
            place: Some(GeocodedPlace {
                coordinates: Coordinates::new(48.85, 2.35),
                address: "Paris, France".to_string(),
            }),
            reverse_address: Some("Reverse Town".to_string()),
            ip_location: Coordinates::new(37.751, -97.822),
            weather_error: None,
            forward_error: None,
            reverse_error: None,
            locate_error: None,
            daily_days_override: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn result<T>(error: &Option<String>, value: impl FnOnce() -> T) -> Result<T, ProviderError> {
        match error {
            Some(message) => Err(ProviderError::Api(message.clone())),
            None => Ok(value()),
        }
    }

    pub fn providers(self: &Arc<Self>) -> Providers {
        Providers {
            forward_geocoder: self.clone(),
            reverse_geocoder: self.clone(),
            ip_locator: self.clone(),
            current_weather: self.clone(),
            daily_weather: self.clone(),
        }
    }
}

#[async_trait]
impl ForwardGeocoder for FakeProviders {
    async fn forward_geocode(&self, city: &str) -> Result<Option<GeocodedPlace>, ProviderError> {
        self.record(Call::Forward(city.to_string()));
        Self::result(&self.forward_error, || self.place.clone())
    }
}

#[async_trait]
impl ReverseGeocoder for FakeProviders {
    async fn reverse_geocode(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<String>, ProviderError> {
        self.record(Call::Reverse(coordinates));
        Self::result(&self.reverse_error, || self.reverse_address.clone())
    }
}

#[async_trait]
impl IpLocator for FakeProviders {
    async fn locate(&self, ip: IpAddr) -> Result<Coordinates, ProviderError> {
        self.record(Call::Locate(ip));
        Self::result(&self.locate_error, || self.ip_location)
    }
}

#[async_trait]
impl CurrentWeatherProvider for FakeProviders {
    async fn current_weather(
        &self,
        coordinates: Coordinates,
        _options: &WeatherOptions,
    ) -> Result<CurrentWeatherPayload, ProviderError> {
        self.record(Call::Current(coordinates));
        Self::result(&self.weather_error, current_payload)
    }
}

#[async_trait]
impl DailyWeatherProvider for FakeProviders {
    async fn daily_weather(
        &self,
        coordinates: Coordinates,
        _options: &WeatherOptions,
        days: u8,
    ) -> Result<DailyForecastPayload, ProviderError> {
        self.record(Call::Daily(coordinates, days));
        let count = self.daily_days_override.unwrap_or(usize::from(days));
        Self::result(&self.weather_error, || daily_payload(count))
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        openweathermap_api_key: "test_api_key".to_string(),
        openweathermap_url: "http://localhost:1".to_string(),
        ip_geolocation_url: "http://localhost:1".to_string(),
        units: Units::Metric,
        language: Language::default(),
        max_forecast_days: 16,
        api_key: None,
        request_timeout_secs: 5,
    }
}

pub fn test_state(fake: &Arc<FakeProviders>, config: AppConfig) -> AppState {
    AppState {
        weather_service: Arc::new(WeatherService::new(fake.providers())),
        config: Arc::new(config),
        metrics: None,
    }
}
