//! Client side of the location gateway.

use reqwest::Client;
use std::time::Duration;

use crate::types::{LocationResponse, WeatherError};

#[derive(Debug, Clone)]
pub struct LocationClient {
    client: Client,
    gateway_url: String,
    default_city: String,
}

impl LocationClient {
    pub fn new(
        gateway_url: &str,
        default_city: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            default_city: default_city.to_string(),
        })
    }

    /// Ask the gateway for the caller's city.
    pub async fn fetch(&self) -> Result<LocationResponse, WeatherError> {
        let url = format!("{}/api/location", self.gateway_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?;
        let location: LocationResponse = response.json().await?;

        if location.city.trim().is_empty() {
            return Err(WeatherError::Parse("gateway returned an empty city".into()));
        }
        Ok(location)
    }

    /// Like [`fetch`](Self::fetch), but any failure yields the default city.
    pub async fn resolve(&self) -> LocationResponse {
        match self.fetch().await {
            Ok(location) => {
                tracing::info!("Gateway resolved city {:?} ({:?})", location.city, location.source);
                location
            }
            Err(e) => {
                tracing::warn!("Location gateway failed, using {:?}: {}", self.default_city, e);
                LocationResponse::fallback(self.default_city.clone())
            }
        }
    }
}
