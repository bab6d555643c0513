//! Query parameter validators.
//!
//! Every validator takes the raw query value and returns `Ok(None)` when the
//! value is absent or blank, so an absent parameter only disqualifies the
//! location branch that needs it.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LATITUDE_LIMIT: f64 = 90.0;
pub const LONGITUDE_LIMIT: f64 = 180.0;

/// Language codes accepted by the OpenWeatherMap `lang` parameter
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "af", "al", "ar", "az", "bg", "ca", "cz", "da", "de", "el", "en", "eu", "fa", "fi", "fr",
    "gl", "he", "hi", "hr", "hu", "id", "it", "ja", "kr", "la", "lt", "mk", "no", "nl", "pl",
    "pt", "pt_br", "ro", "ru", "sv", "se", "sk", "sl", "sp", "es", "sr", "th", "tr", "ua", "uk",
    "vi", "zh_cn", "zh_tw", "zu",
];

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub code: &'static str,
}

impl ValidationError {
    pub fn new(message: impl Into<String>, code: &'static str) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn limit(self) -> f64 {
        match self {
            Axis::Latitude => LATITUDE_LIMIT,
            Axis::Longitude => LONGITUDE_LIMIT,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Axis::Latitude => "Latitude",
            Axis::Longitude => "Longitude",
        }
    }

    fn code(self) -> &'static str {
        match self {
            Axis::Latitude => "invalid_latitude",
            Axis::Longitude => "invalid_longitude",
        }
    }
}

/// Unit systems understood by the weather provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lower-cased language code from [`SUPPORTED_LANGUAGES`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Language(String);

impl Language {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Language {
    fn default() -> Self {
        Language("en".to_string())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Language {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let code = value.trim().to_lowercase();
        if SUPPORTED_LANGUAGES.contains(&code.as_str()) {
            Ok(Language(code))
        } else {
            Err(ValidationError::new(
                format!("Unsupported language: '{}'.", value.trim()),
                "invalid_lang",
            ))
        }
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

/// Parse a latitude or longitude in decimal degrees
pub fn coordinates_validator(
    raw: Option<&str>,
    axis: Axis,
) -> Result<Option<f64>, ValidationError> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };

    let parsed: f64 = value.parse().map_err(|_| {
        ValidationError::new(
            format!("{} must be a number, got '{}'.", axis.name(), value),
            axis.code(),
        )
    })?;

    let limit = axis.limit();
    if !parsed.is_finite() || !(-limit..=limit).contains(&parsed) {
        return Err(ValidationError::new(
            format!(
                "{} must be between -{} and {}.",
                axis.name(),
                limit,
                limit
            ),
            axis.code(),
        ));
    }

    Ok(Some(parsed))
}

pub fn ip_validator(raw: Option<&str>) -> Result<Option<IpAddr>, ValidationError> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };

    value.parse::<IpAddr>().map(Some).map_err(|_| {
        ValidationError::new(
            format!("'{}' is not a valid IPv4 or IPv6 address.", value),
            "invalid_ip",
        )
    })
}

pub fn lang_validator(raw: Option<&str>) -> Result<Option<Language>, ValidationError> {
    present(raw)
        .map(|value| Language::try_from(value.to_string()))
        .transpose()
}

pub fn units_validator(raw: Option<&str>) -> Result<Option<Units>, ValidationError> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };

    match value.to_lowercase().as_str() {
        "metric" => Ok(Some(Units::Metric)),
        "imperial" => Ok(Some(Units::Imperial)),
        "standard" => Ok(Some(Units::Standard)),
        _ => Err(ValidationError::new(
            format!(
                "Unsupported units: '{}'. Use metric, imperial or standard.",
                value
            ),
            "invalid_units",
        )),
    }
}

/// Parse a forecast length in days, bounded by the provider horizon `max_days`
pub fn days_validator(raw: Option<&str>, max_days: u8) -> Result<Option<u8>, ValidationError> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };

    let out_of_range = || {
        ValidationError::new(
            format!("Days must be an integer between 1 and {}.", max_days),
            "invalid_days",
        )
    };

    let days: u32 = value.parse().map_err(|_| out_of_range())?;
    if days == 0 || days > u32::from(max_days) {
        return Err(out_of_range());
    }

    u8::try_from(days).map(Some).map_err(|_| out_of_range())
}
