//! weatherapi.com client: current conditions, forecast, and city search.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use weatherbuddy_core::WeatherConfig;

use crate::types::{
    ApiErrorEnvelope, CitySuggestion, CurrentReport, ForecastResponse, WeatherError,
    API_KEY_ERRORS, NO_MATCHING_LOCATION,
};

const USER_AGENT: &str = concat!("WeatherBuddy/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl WeatherProvider {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Self::new(
            &config.base_url,
            &config.api_key,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Current conditions with air quality for `city`.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current(&self, city: &str) -> Result<CurrentReport, WeatherError> {
        let url = format!(
            "{}/v1/current.json?key={}&q={}&aqi=yes",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(city),
        );
        self.get_json(&url, city).await
    }

    /// Daily average temperatures (°C) for the next `days` days.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(&self, city: &str, days: u8) -> Result<Vec<f64>, WeatherError> {
        let url = format!(
            "{}/v1/forecast.json?key={}&q={}&days={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(city),
            days,
        );
        let response: ForecastResponse = self.get_json(&url, city).await?;

        Ok(response
            .forecast
            .map(|f| f.forecastday.into_iter().map(|d| d.day.avgtemp_c).collect())
            .unwrap_or_default())
    }

    /// City candidates for free-text `query`, in provider order.
    #[instrument(skip(self), level = "debug")]
    pub async fn search_cities(&self, query: &str) -> Result<Vec<CitySuggestion>, WeatherError> {
        let url = format!(
            "{}/v1/search.json?key={}&q={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(query),
        );
        self.get_json(&url, query).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &str,
    ) -> Result<T, WeatherError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // The API reports lookup and key problems in an error envelope, usually with a 400.
        if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(&body) {
            let err = envelope.error;
            tracing::debug!("Weather API error {} for {:?}: {}", err.code, query, err.message);
            return Err(match err.code {
                NO_MATCHING_LOCATION => WeatherError::LocationNotFound(query.to_string()),
                code if API_KEY_ERRORS.contains(&code) => WeatherError::InvalidApiKey,
                code => WeatherError::Api {
                    code,
                    message: err.message,
                },
            });
        }

        if !status.is_success() {
            return Err(WeatherError::Api {
                code: i64::from(status.as_u16()),
                message: format!("HTTP {}", status),
            });
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))
    }
}
