//! IP geolocation: turn a caller's address into a city name.
//! Talks to an ipinfo.io-compatible `/{ip}/json` endpoint.

use reqwest::Client;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use weatherbuddy_core::GatewayConfig;
use weatherbuddy_weather::LocationResponse;

const USER_AGENT: &str = concat!("WeatherBuddy-Gateway/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    city: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IpGeolocator {
    client: Client,
    base_url: String,
}

impl IpGeolocator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// City for `ip`, or `None` on any failure.
    pub async fn lookup_city(&self, ip: IpAddr) -> Option<String> {
        let url = format!("{}/{}/json", self.base_url, ip);

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("Geolocation request for {} failed: {}", ip, e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Geolocation for {} returned status {}", ip, response.status());
            return None;
        }

        let body: IpInfoResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Geolocation parse error for {}: {}", ip, e);
                return None;
            }
        };

        body.city
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
    }
}

/// Loopback in any spelling, including IPv4-mapped IPv6.
pub fn is_loopback(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_loopback(),
        IpAddr::V6(v6) => {
            v6.is_loopback() || v6.to_ipv4_mapped().is_some_and(|v4| v4.is_loopback())
        }
    }
}

/// Answers `/api/location`. Never fails; the worst case is the default city.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    geolocator: IpGeolocator,
    default_city: String,
}

impl LocationResolver {
    pub fn new(geolocator: IpGeolocator, default_city: impl Into<String>) -> Self {
        Self {
            geolocator,
            default_city: default_city.into(),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let geolocator = IpGeolocator::new(
            &config.geolocation_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::new(geolocator, config.default_city.clone()))
    }

    /// `None` means the caller's address could not be determined.
    pub async fn resolve(&self, client_ip: Option<IpAddr>) -> LocationResponse {
        let Some(ip) = client_ip else {
            tracing::debug!("No usable client address, using fallback city");
            return LocationResponse::fallback(self.default_city.clone());
        };

        if is_loopback(&ip) {
            return LocationResponse::dev(self.default_city.clone());
        }

        match self.geolocator.lookup_city(ip).await {
            Some(city) => {
                tracing::info!("Resolved {} to {}", ip, city);
                LocationResponse::ip(city)
            }
            None => {
                tracing::warn!("Geolocation failed for {}, using fallback city", ip);
                LocationResponse::fallback(self.default_city.clone())
            }
        }
    }
}
