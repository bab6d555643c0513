use std::net::IpAddr;

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Address used when reverse geocoding finds no place
    pub fn fallback_address(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// How the client identified the location, in priority order
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
    Ip(IpAddr),
}

impl LocationQuery {
    /// Pick the first actionable branch: city, then a full coordinate pair, then ip
    pub fn select(
        city: Option<&str>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        ip: Option<IpAddr>,
    ) -> Option<Self> {
        if let Some(city) = city.map(str::trim).filter(|c| !c.is_empty()) {
            return Some(Self::City(city.to_string()));
        }

        if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
            return Some(Self::Coordinates(Coordinates::new(latitude, longitude)));
        }

        ip.map(Self::Ip)
    }

    /// Branch label for logs and metrics
    pub fn branch(&self) -> &'static str {
        match self {
            Self::City(_) => "city",
            Self::Coordinates(_) => "coordinates",
            Self::Ip(_) => "ip",
        }
    }
}

/// Resolved location returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LocationResult {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

impl LocationResult {
    pub fn new(coordinates: Coordinates, address: impl Into<String>) -> Self {
        Self {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            address: address.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip() -> IpAddr {
        "203.0.113.7".parse().unwrap()
    }

    #[test]
    fn test_city_wins_over_everything() {
        let query = LocationQuery::select(Some("Paris"), Some(1.0), Some(2.0), Some(ip()));
        assert_eq!(query, Some(LocationQuery::City("Paris".to_string())));
    }

    #[test]
    fn test_blank_city_falls_through_to_coordinates() {
        let query = LocationQuery::select(Some("  "), Some(1.0), Some(2.0), Some(ip()));
        assert_eq!(
            query,
            Some(LocationQuery::Coordinates(Coordinates::new(1.0, 2.0)))
        );
    }

    #[test]
    fn test_zero_coordinates_are_actionable() {
        let query = LocationQuery::select(None, Some(0.0), Some(0.0), None);
        assert_eq!(
            query,
            Some(LocationQuery::Coordinates(Coordinates::new(0.0, 0.0)))
        );
    }

    #[test]
    fn test_half_coordinate_pair_falls_through_to_ip() {
        let query = LocationQuery::select(None, Some(1.0), None, Some(ip()));
        assert_eq!(query, Some(LocationQuery::Ip(ip())));
    }

    #[test]
    fn test_nothing_actionable() {
        assert_eq!(LocationQuery::select(None, None, Some(2.0), None), None);
        assert_eq!(LocationQuery::select(Some(""), None, None, None), None);
    }

    #[test]
    fn test_fallback_address() {
        assert_eq!(
            Coordinates::new(48.85661, 2.35222).fallback_address(),
            "48.8566, 2.3522"
        );
    }
}
