use std::future::Future;
use std::sync::Arc;

use axum::http::StatusCode;
use thiserror::Error;

use super::models::{CurrentWeatherResponse, DailyWeatherResponse};
use super::normalize::{normalize_current, normalize_daily};
use crate::error::HttpError;
use crate::impl_into_response;
use crate::location::{Coordinates, LocationQuery, LocationResult};
use crate::providers::{
    CurrentWeatherProvider, DailyWeatherProvider, ForwardGeocoder, IpLocator, ProviderError,
    ReverseGeocoder, WeatherOptions,
};
use crate::telemetry;
use crate::validators::ValidationError;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid parameters.")]
    NoActionableLocation,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Upstream provider failed: {0}")]
    Upstream(#[from] ProviderError),

    #[error("Response failed schema validation: {}", .0.join("; "))]
    Schema(Vec<String>),
}

impl WeatherError {
    fn outcome(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::NoActionableLocation | Self::CityNotFound(_) => {
                "bad_request"
            }
            Self::Upstream(_) => "upstream_error",
            Self::Schema(_) => "schema_error",
        }
    }
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::NoActionableLocation | Self::CityNotFound(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Upstream(_) | Self::Schema(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Validation(e) => Some(e.code),
            Self::NoActionableLocation => Some("invalid_parameters"),
            Self::CityNotFound(_) => Some("city_not_found"),
            Self::Upstream(_) | Self::Schema(_) => None,
        }
    }
}

impl_into_response!(WeatherError);

/// Upstream collaborators used to resolve locations and fetch weather
#[derive(Clone)]
pub struct Providers {
    pub forward_geocoder: Arc<dyn ForwardGeocoder>,
    pub reverse_geocoder: Arc<dyn ReverseGeocoder>,
    pub ip_locator: Arc<dyn IpLocator>,
    pub current_weather: Arc<dyn CurrentWeatherProvider>,
    pub daily_weather: Arc<dyn DailyWeatherProvider>,
}

pub struct WeatherService {
    providers: Providers,
}

impl WeatherService {
    pub fn new(providers: Providers) -> Self {
        Self { providers }
    }

    /// Current conditions for the selected location
    pub async fn current_weather(
        &self,
        query: LocationQuery,
        options: &WeatherOptions,
    ) -> Result<CurrentWeatherResponse, WeatherError> {
        let branch = query.branch();
        let result = async {
            let (payload, location) = self
                .resolve_and_fetch(query, |coordinates| async move {
                    self.providers
                        .current_weather
                        .current_weather(coordinates, options)
                        .await
                        .inspect_err(|_| telemetry::record_provider_error("current_weather"))
                })
                .await?;

            let response = normalize_current(payload, location);
            response.validate().map_err(WeatherError::Schema)?;
            Ok::<_, WeatherError>(response)
        }
        .await;

        Self::record("current", branch, &result);
        result
    }

    /// Daily forecast of `days` entries for the selected location
    pub async fn daily_weather(
        &self,
        query: LocationQuery,
        options: &WeatherOptions,
        days: u8,
    ) -> Result<DailyWeatherResponse, WeatherError> {
        let branch = query.branch();
        let result = async {
            let (payload, location) = self
                .resolve_and_fetch(query, |coordinates| async move {
                    self.providers
                        .daily_weather
                        .daily_weather(coordinates, options, days)
                        .await
                        .inspect_err(|_| telemetry::record_provider_error("daily_weather"))
                })
                .await?;

            let response = normalize_daily(payload, location);
            response.validate(days).map_err(WeatherError::Schema)?;
            Ok::<_, WeatherError>(response)
        }
        .await;

        Self::record("daily", branch, &result);
        result
    }

    /// Resolve the location for `query` and run `fetch` against its coordinates.
    ///
    /// The city branch takes its address from forward geocoding. The coordinate
    /// and ip branches fetch weather first, then reverse geocode the same
    /// coordinates.
    async fn resolve_and_fetch<T, F, Fut>(
        &self,
        query: LocationQuery,
        fetch: F,
    ) -> Result<(T, LocationResult), WeatherError>
    where
        F: FnOnce(Coordinates) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        match query {
            LocationQuery::City(city) => {
                let place = self
                    .providers
                    .forward_geocoder
                    .forward_geocode(&city)
                    .await
                    .inspect_err(|_| telemetry::record_provider_error("forward_geocoder"))?
                    .ok_or_else(|| WeatherError::CityNotFound(city.clone()))?;

                tracing::debug!(
                    city = %city,
                    address = %place.address,
                    lat = %place.coordinates.latitude,
                    lon = %place.coordinates.longitude,
                    "City geocoded"
                );

                let payload = fetch(place.coordinates).await?;
                Ok((payload, LocationResult::new(place.coordinates, place.address)))
            }
            LocationQuery::Coordinates(coordinates) => {
                let payload = fetch(coordinates).await?;
                let address = self.address_for(coordinates).await?;
                Ok((payload, LocationResult::new(coordinates, address)))
            }
            LocationQuery::Ip(ip) => {
                let coordinates = self
                    .providers
                    .ip_locator
                    .locate(ip)
                    .await
                    .inspect_err(|_| telemetry::record_provider_error("ip_locator"))?;

                let payload = fetch(coordinates).await?;
                let address = self.address_for(coordinates).await?;
                Ok((payload, LocationResult::new(coordinates, address)))
            }
        }
    }

    async fn address_for(&self, coordinates: Coordinates) -> Result<String, ProviderError> {
        let address = self
            .providers
            .reverse_geocoder
            .reverse_geocode(coordinates)
            .await
            .inspect_err(|_| telemetry::record_provider_error("reverse_geocoder"))?;

        Ok(address.unwrap_or_else(|| {
            tracing::debug!(
                lat = %coordinates.latitude,
                lon = %coordinates.longitude,
                "No reverse geocoding result, using coordinates as address"
            );
            coordinates.fallback_address()
        }))
    }

    fn record<T>(endpoint: &'static str, branch: &'static str, result: &Result<T, WeatherError>) {
        let outcome = match result {
            Ok(_) => {
                tracing::info!(endpoint, branch, "Weather request served");
                "ok"
            }
            Err(e) => e.outcome(),
        };
        telemetry::record_request(endpoint, branch, outcome);
    }
}
