use axum::{extract::State, Json};
use serde::Serialize;

use super::models::{
    CurrentWeatherQuery, CurrentWeatherResponse, DailyWeatherQuery, DailyWeatherResponse,
};
use super::service::WeatherError;
use crate::config::AppConfig;
use crate::error::ErrorResponse;
use crate::extractors::QueryParams;
use crate::location::LocationQuery;
use crate::providers::WeatherOptions;
use crate::telemetry;
use crate::validators::{
    coordinates_validator, days_validator, ip_validator, lang_validator, units_validator, Axis,
};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Location and option parameters shared by both endpoints
struct LocationParams<'a> {
    city: Option<&'a str>,
    lat: Option<&'a str>,
    lon: Option<&'a str>,
    ip: Option<&'a str>,
    lang: Option<&'a str>,
    units: Option<&'a str>,
}

impl CurrentWeatherQuery {
    fn params(&self) -> LocationParams<'_> {
        LocationParams {
            city: self.city.as_deref(),
            lat: self.lat.as_deref(),
            lon: self.lon.as_deref(),
            ip: self.ip.as_deref(),
            lang: self.lang.as_deref(),
            units: self.units.as_deref(),
        }
    }
}

impl DailyWeatherQuery {
    fn params(&self) -> LocationParams<'_> {
        LocationParams {
            city: self.city.as_deref(),
            lat: self.lat.as_deref(),
            lon: self.lon.as_deref(),
            ip: self.ip.as_deref(),
            lang: self.lang.as_deref(),
            units: self.units.as_deref(),
        }
    }
}

/// Validate every recognized parameter, then pick the location branch
fn validate_request(
    params: &LocationParams<'_>,
    config: &AppConfig,
) -> Result<(LocationQuery, WeatherOptions), WeatherError> {
    let latitude = coordinates_validator(params.lat, Axis::Latitude)?;
    let longitude = coordinates_validator(params.lon, Axis::Longitude)?;
    let ip = ip_validator(params.ip)?;
    let language = lang_validator(params.lang)?.unwrap_or_else(|| config.language.clone());
    let units = units_validator(params.units)?.unwrap_or(config.units);

    let location = LocationQuery::select(params.city, latitude, longitude, ip)
        .ok_or(WeatherError::NoActionableLocation)?;

    Ok((location, WeatherOptions { language, units }))
}

/// Current weather for a city, a coordinate pair, or an IP address
///
/// GET /api/v1/weather/current?city=London&units=metric
#[utoipa::path(
    get,
    path = "/api/v1/weather/current",
    params(CurrentWeatherQuery),
    responses(
        (status = 200, description = "Current weather at the resolved location", body = CurrentWeatherResponse),
        (status = 400, description = "Malformed, invalid or missing location parameters", body = ErrorResponse),
        (status = 500, description = "Upstream provider failure", body = ErrorResponse)
    ),
    tag = "weather"
)]
pub async fn get_current_weather(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<CurrentWeatherQuery>,
) -> Result<Json<CurrentWeatherResponse>, WeatherError> {
    let (location, options) = validate_request(&query.params(), &state.config)
        .inspect_err(|_| telemetry::record_request("current", "none", "bad_request"))?;

    let response = state
        .weather_service
        .current_weather(location, &options)
        .await?;
    Ok(Json(response))
}

/// Daily forecast for a city, a coordinate pair, or an IP address
///
/// GET /api/v1/weather/daily?lat=48.85&lon=2.35&days=7
#[utoipa::path(
    get,
    path = "/api/v1/weather/daily",
    params(DailyWeatherQuery),
    responses(
        (status = 200, description = "Daily forecast at the resolved location", body = DailyWeatherResponse),
        (status = 400, description = "Malformed, invalid or missing location parameters", body = ErrorResponse),
        (status = 500, description = "Upstream provider failure", body = ErrorResponse)
    ),
    tag = "weather"
)]
pub async fn get_daily_weather(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DailyWeatherQuery>,
) -> Result<Json<DailyWeatherResponse>, WeatherError> {
    let max_days = state.config.max_forecast_days;
    let validated = days_validator(query.days.as_deref(), max_days)
        .map_err(WeatherError::from)
        .and_then(|days| {
            let (location, options) = validate_request(&query.params(), &state.config)?;
            Ok((location, options, days.unwrap_or(max_days)))
        });
    let (location, options, days) = validated
        .inspect_err(|_| telemetry::record_request("daily", "none", "bad_request"))?;

    let response = state
        .weather_service
        .daily_weather(location, &options, days)
        .await?;
    Ok(Json(response))
}
