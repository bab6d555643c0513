use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::location::LocationResult;
use crate::validators::{LATITUDE_LIMIT, LONGITUDE_LIMIT};

// ============================================================================
// Query parameters
// ============================================================================

/// Raw query parameters for the current weather endpoint.
/// Values stay strings so validation can report its own error codes.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CurrentWeatherQuery {
    /// City name, takes priority over every other location parameter
    pub city: Option<String>,
    /// Latitude in decimal degrees, used together with `lon`
    pub lat: Option<String>,
    /// Longitude in decimal degrees, used together with `lat`
    pub lon: Option<String>,
    /// IPv4 or IPv6 address to geolocate
    pub ip: Option<String>,
    /// Language code for condition descriptions (e.g. en, fr, pt_br)
    pub lang: Option<String>,
    /// Units: metric, imperial, or standard
    pub units: Option<String>,
}

/// Raw query parameters for the daily forecast endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DailyWeatherQuery {
    /// City name, takes priority over every other location parameter
    pub city: Option<String>,
    /// Latitude in decimal degrees, used together with `lon`
    pub lat: Option<String>,
    /// Longitude in decimal degrees, used together with `lat`
    pub lon: Option<String>,
    /// IPv4 or IPv6 address to geolocate
    pub ip: Option<String>,
    /// Language code for condition descriptions (e.g. en, fr, pt_br)
    pub lang: Option<String>,
    /// Units: metric, imperial, or standard
    pub units: Option<String>,
    /// Number of forecast days
    pub days: Option<String>,
}

// ============================================================================
// API Response Models (External - what we return to clients)
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentWeatherResponse {
    pub location: LocationResult,
    pub weather: CurrentWeather,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyWeatherResponse {
    pub location: LocationResult,
    pub weather: DailyWeather,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentWeather {
    pub observed_at: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u32,
    pub pressure: u32,
    pub wind_speed: f64,
    pub wind_direction: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_gust: Option<f64>,
    pub clouds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<u32>,
    pub condition_id: u32,
    pub condition: String,
    pub description: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunset: Option<i64>,
    /// Shift in seconds from UTC
    pub timezone_offset: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyWeather {
    /// Shift in seconds from UTC
    pub timezone_offset: i32,
    pub days: Vec<DailyForecast>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyForecast {
    /// UTC calendar date, YYYY-MM-DD
    pub date: String,
    pub timestamp: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub temp_day: f64,
    pub temp_night: f64,
    pub temp_morning: f64,
    pub temp_evening: f64,
    pub feels_like_day: f64,
    pub feels_like_night: f64,
    pub humidity: u32,
    pub pressure: u32,
    pub wind_speed: f64,
    pub wind_direction: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_gust: Option<f64>,
    pub clouds: u32,
    pub precipitation_probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rain_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow_volume: Option<f64>,
    pub condition_id: u32,
    pub condition: String,
    pub description: String,
    pub icon: String,
}

// ============================================================================
// Schema validation
// ============================================================================

/// Collects field errors found while checking a composed response
#[derive(Debug, Default)]
struct SchemaErrors(Vec<String>);

impl SchemaErrors {
    fn require(&mut self, ok: bool, field: impl AsRef<str>, problem: &str) {
        if !ok {
            self.0.push(format!("{}: {}", field.as_ref(), problem));
        }
    }

    fn into_result(self) -> Result<(), Vec<String>> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self.0)
        }
    }
}

fn check_location(errors: &mut SchemaErrors, location: &LocationResult) {
    errors.require(
        location.latitude.is_finite() && location.latitude.abs() <= LATITUDE_LIMIT,
        "location.latitude",
        "out of range",
    );
    errors.require(
        location.longitude.is_finite() && location.longitude.abs() <= LONGITUDE_LIMIT,
        "location.longitude",
        "out of range",
    );
    errors.require(
        !location.address.trim().is_empty(),
        "location.address",
        "may not be blank",
    );
}

impl CurrentWeatherResponse {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = SchemaErrors::default();
        check_location(&mut errors, &self.location);

        let weather = &self.weather;
        errors.require(
            weather.temperature.is_finite() && weather.feels_like.is_finite(),
            "weather.temperature",
            "must be a finite number",
        );
        errors.require(
            weather.temp_min <= weather.temp_max,
            "weather.temp_min",
            "greater than temp_max",
        );
        errors.require(weather.humidity <= 100, "weather.humidity", "above 100");
        errors.require(
            !weather.description.trim().is_empty(),
            "weather.description",
            "may not be blank",
        );

        errors.into_result()
    }
}

impl DailyWeatherResponse {
    pub fn validate(&self, requested_days: u8) -> Result<(), Vec<String>> {
        let mut errors = SchemaErrors::default();
        check_location(&mut errors, &self.location);

        let days = &self.weather.days;
        errors.require(!days.is_empty(), "weather.days", "may not be empty");
        errors.require(
            days.len() <= usize::from(requested_days),
            "weather.days",
            "more entries than requested",
        );

        for (index, day) in days.iter().enumerate() {
            let field = |name: &str| format!("weather.days[{}].{}", index, name);
            errors.require(!day.date.is_empty(), field("date"), "may not be blank");
            errors.require(
                day.temp_min <= day.temp_max,
                field("temp_min"),
                "greater than temp_max",
            );
            errors.require(day.humidity <= 100, field("humidity"), "above 100");
            errors.require(
                (0.0..=1.0).contains(&day.precipitation_probability),
                field("precipitation_probability"),
                "outside 0..1",
            );
            errors.require(
                !day.description.trim().is_empty(),
                field("description"),
                "may not be blank",
            );
        }

        errors.into_result()
    }
}
