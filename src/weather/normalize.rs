//! Reshape OpenWeatherMap payloads into the response schema.

use chrono::DateTime;

use super::models::{
    CurrentWeather, CurrentWeatherResponse, DailyForecast, DailyWeather, DailyWeatherResponse,
};
use crate::location::LocationResult;
use crate::providers::openweathermap::{DailyEntry, WeatherCondition};
use crate::providers::{CurrentWeatherPayload, DailyForecastPayload};

/// Primary condition fields; blank when the provider sent no condition so the
/// schema check rejects the response.
fn condition_fields(conditions: &[WeatherCondition]) -> (u32, String, String, String) {
    match conditions.first() {
        Some(c) => (c.id, c.main.clone(), c.description.clone(), c.icon.clone()),
        None => (0, String::new(), String::new(), String::new()),
    }
}

/// Unix timestamp to a UTC `YYYY-MM-DD`, empty if out of range
fn utc_date(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn normalize_current(
    payload: CurrentWeatherPayload,
    location: LocationResult,
) -> CurrentWeatherResponse {
    let (condition_id, condition, description, icon) = condition_fields(&payload.weather);

    CurrentWeatherResponse {
        location,
        weather: CurrentWeather {
            observed_at: payload.dt,
            temperature: payload.main.temp,
            feels_like: payload.main.feels_like,
            temp_min: payload.main.temp_min,
            temp_max: payload.main.temp_max,
            humidity: payload.main.humidity,
            pressure: payload.main.pressure,
            wind_speed: payload.wind.speed,
            wind_direction: payload.wind.deg,
            wind_gust: payload.wind.gust,
            clouds: payload.clouds.all,
            visibility: payload.visibility,
            condition_id,
            condition,
            description,
            icon,
            sunrise: payload.sys.sunrise,
            sunset: payload.sys.sunset,
            timezone_offset: payload.timezone,
        },
    }
}

fn normalize_day(entry: DailyEntry) -> DailyForecast {
    let (condition_id, condition, description, icon) = condition_fields(&entry.weather);

    DailyForecast {
        date: utc_date(entry.dt),
        timestamp: entry.dt,
        sunrise: entry.sunrise,
        sunset: entry.sunset,
        temp_min: entry.temp.min,
        temp_max: entry.temp.max,
        temp_day: entry.temp.day,
        temp_night: entry.temp.night,
        temp_morning: entry.temp.morn,
        temp_evening: entry.temp.eve,
        feels_like_day: entry.feels_like.day,
        feels_like_night: entry.feels_like.night,
        humidity: entry.humidity,
        pressure: entry.pressure,
        wind_speed: entry.speed,
        wind_direction: entry.deg,
        wind_gust: entry.gust,
        clouds: entry.clouds,
        precipitation_probability: entry.pop,
        rain_volume: entry.rain,
        snow_volume: entry.snow,
        condition_id,
        condition,
        description,
        icon,
    }
}

pub fn normalize_daily(
    payload: DailyForecastPayload,
    location: LocationResult,
) -> DailyWeatherResponse {
    DailyWeatherResponse {
        location,
        weather: DailyWeather {
            timezone_offset: payload.city.timezone,
            days: payload.list.into_iter().map(normalize_day).collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Coordinates;
    use crate::testing::{current_payload, daily_payload};

    fn paris() -> LocationResult {
        LocationResult::new(Coordinates::new(48.85, 2.35), "Paris, FR")
    }

    #[test]
    fn test_normalize_current() {
        let response = normalize_current(current_payload(), paris());

        assert_eq!(response.location.address, "Paris, FR");
        assert_eq!(response.weather.temperature, 21.3);
        assert_eq!(response.weather.humidity, 52);
        assert_eq!(response.weather.condition, "Clear");
        assert_eq!(response.weather.description, "clear sky");
        assert_eq!(response.weather.icon, "01d");
        assert_eq!(response.weather.timezone_offset, 3600);
        assert!(response.validate().is_ok());
    }

    #[test]
    fn test_current_without_conditions_fails_schema() {
        let mut payload = current_payload();
        payload.weather.clear();

        let response = normalize_current(payload, paris());
        let errors = response.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.starts_with("weather.description")));
    }

    #[test]
    fn test_blank_address_fails_schema() {
        let location = LocationResult::new(Coordinates::new(48.85, 2.35), " ");
        let errors = normalize_current(current_payload(), location)
            .validate()
            .unwrap_err();
        assert_eq!(errors, vec!["location.address: may not be blank".to_string()]);
    }

    #[test]
    fn test_normalize_daily() {
        let response = normalize_daily(daily_payload(3), paris());

        assert_eq!(response.weather.days.len(), 3);
        let first = &response.weather.days[0];
        assert_eq!(first.date, "2023-11-15");
        assert_eq!(first.temp_min, 8.2);
        assert_eq!(first.temp_max, 13.4);
        assert_eq!(first.rain_volume, Some(2.1));
        assert_eq!(first.description, "light rain");
        assert_eq!(response.weather.days[1].date, "2023-11-16");
        assert!(response.validate(3).is_ok());
    }

    #[test]
    fn test_daily_schema_rejects_extra_or_missing_days() {
        let response = normalize_daily(daily_payload(3), paris());
        assert!(response.validate(2).is_err());

        let empty = normalize_daily(daily_payload(0), paris());
        let errors = empty.validate(5).unwrap_err();
        assert!(errors.contains(&"weather.days: may not be empty".to_string()));
    }

    #[test]
    fn test_daily_schema_rejects_bad_probability() {
        let mut payload = daily_payload(1);
        payload.list[0].pop = 1.5;

        let errors = normalize_daily(payload, paris()).validate(1).unwrap_err();
        assert!(errors[0].contains("precipitation_probability"));
    }

    #[test]
    fn test_utc_date() {
        assert_eq!(utc_date(0), "1970-01-01");
        assert_eq!(utc_date(1700049600), "2023-11-15");
        assert_eq!(utc_date(i64::MAX), "");
    }
}
