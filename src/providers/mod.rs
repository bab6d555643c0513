//! Upstream collaborators, one capability per trait so handlers can be
//! exercised against in-memory doubles.

mod ip_api;
pub mod openweathermap;

pub use ip_api::IpApiClient;
pub use openweathermap::{CurrentWeatherPayload, DailyForecastPayload, OpenWeatherMapClient};

use std::net::IpAddr;

use async_trait::async_trait;
use thiserror::Error;

use crate::location::Coordinates;
use crate::validators::{Language, Units};

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to reach provider: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider error: {0}")]
    Api(String),
}

impl ProviderError {
    /// Build a `Status` error from a non-success response, keeping its body
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Self::Status { status, body }
    }
}

/// Options shared by every weather call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherOptions {
    pub language: Language,
    pub units: Units,
}

/// Result of forward geocoding a place name
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedPlace {
    pub coordinates: Coordinates,
    pub address: String,
}

#[async_trait]
pub trait ForwardGeocoder: Send + Sync {
    /// Resolve a place name. `Ok(None)` means the provider knows no such place.
    async fn forward_geocode(&self, city: &str) -> Result<Option<GeocodedPlace>, ProviderError>;
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Format an address for the coordinates. `Ok(None)` means no place was found.
    async fn reverse_geocode(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<String>, ProviderError>;
}

#[async_trait]
pub trait IpLocator: Send + Sync {
    async fn locate(&self, ip: IpAddr) -> Result<Coordinates, ProviderError>;
}

#[async_trait]
pub trait CurrentWeatherProvider: Send + Sync {
    async fn current_weather(
        &self,
        coordinates: Coordinates,
        options: &WeatherOptions,
    ) -> Result<CurrentWeatherPayload, ProviderError>;
}

#[async_trait]
pub trait DailyWeatherProvider: Send + Sync {
    async fn daily_weather(
        &self,
        coordinates: Coordinates,
        options: &WeatherOptions,
        days: u8,
    ) -> Result<DailyForecastPayload, ProviderError>;
}
