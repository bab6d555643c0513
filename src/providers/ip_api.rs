use std::net::IpAddr;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{IpLocator, ProviderError};
use crate::location::Coordinates;

const RESPONSE_FIELDS: &str = "status,message,lat,lon";

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpApiResponse {
    fn into_coordinates(self, ip: IpAddr) -> Result<Coordinates, ProviderError> {
        if self.status != "success" {
            return Err(ProviderError::Api(format!(
                "IP lookup for {} failed: {}",
                ip,
                self.message.as_deref().unwrap_or("unknown reason")
            )));
        }

        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(ProviderError::Api(format!(
                "IP lookup for {} returned no coordinates",
                ip
            ))),
        }
    }
}

/// IP geolocation against an ip-api.com compatible endpoint
pub struct IpApiClient {
    client: Client,
    base_url: String,
}

impl IpApiClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl IpLocator for IpApiClient {
    async fn locate(&self, ip: IpAddr) -> Result<Coordinates, ProviderError> {
        tracing::debug!(ip = %ip, "Geolocating IP address");

        let response = self
            .client
            .get(format!("{}/{}", self.base_url, ip))
            .query(&[("fields", RESPONSE_FIELDS)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::from_response(response).await);
        }

        let body: IpApiResponse = response.json().await?;
        let coordinates = body.into_coordinates(ip)?;

        tracing::debug!(
            ip = %ip,
            lat = %coordinates.latitude,
            lon = %coordinates.longitude,
            "IP geolocation successful"
        );

        Ok(coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip() -> IpAddr {
        "8.8.8.8".parse().unwrap()
    }

    #[test]
    fn test_success_response() {
        let body: IpApiResponse =
            serde_json::from_str(r#"{"status":"success","lat":37.751,"lon":-97.822}"#).unwrap();
        assert_eq!(
            body.into_coordinates(ip()).unwrap(),
            Coordinates::new(37.751, -97.822)
        );
    }

    #[test]
    fn test_failed_lookup_keeps_reason() {
        let body: IpApiResponse =
            serde_json::from_str(r#"{"status":"fail","message":"private range"}"#).unwrap();
        let err = body.into_coordinates("10.0.0.1".parse().unwrap()).unwrap_err();
        assert!(err.to_string().contains("private range"));
    }

    #[test]
    fn test_success_without_coordinates_is_an_error() {
        let body: IpApiResponse = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(matches!(
            body.into_coordinates(ip()),
            Err(ProviderError::Api(_))
        ));
    }
}
