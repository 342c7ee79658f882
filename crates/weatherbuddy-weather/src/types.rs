use serde::{Deserialize, Serialize};

use crate::aqi::PollutantReading;

/// How the gateway arrived at a city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    /// Loopback caller; the configured default city
    Dev,
    /// Resolved from the caller's IP address
    Ip,
    /// Lookup failed; the configured default city
    Fallback,
}

/// Body of `GET /api/location`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationResponse {
    pub city: String,
    pub source: LocationSource,
}

impl LocationResponse {
    pub fn dev(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            source: LocationSource::Dev,
        }
    }

    pub fn ip(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            source: LocationSource::Ip,
        }
    }

    pub fn fallback(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            source: LocationSource::Fallback,
        }
    }
}

/// `current.json` response (the fields WeatherBuddy reads)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentReport {
    pub location: ReportLocation,
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportLocation {
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Local time at the location, e.g. `2025-12-26 10:00`
    #[serde(default)]
    pub localtime: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    #[serde(default)]
    pub feelslike_c: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
    pub condition: ConditionText,
    #[serde(default)]
    pub air_quality: Option<AirQuality>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionText {
    pub text: String,
}

/// `air_quality` sub-object; every field may be absent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AirQuality {
    #[serde(default)]
    pub pm2_5: Option<f64>,
    #[serde(default)]
    pub pm10: Option<f64>,
    #[serde(default, rename = "us-epa-index")]
    pub us_epa_index: Option<i64>,
}

impl AirQuality {
    pub fn reading(&self) -> PollutantReading {
        PollutantReading {
            pm2_5: self.pm2_5,
            pm10: self.pm10,
        }
    }
}

/// `forecast.json` response
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ForecastResponse {
    #[serde(default)]
    pub forecast: Option<ForecastBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ForecastBody {
    #[serde(default)]
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ForecastDay {
    pub day: DaySummary,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DaySummary {
    pub avgtemp_c: f64,
}

/// Error envelope the weather API returns with 4xx responses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Weather API error code for "No matching location found."
pub const NO_MATCHING_LOCATION: i64 = 1006;

/// Error codes meaning the key is missing, invalid or disabled
pub const API_KEY_ERRORS: [i64; 3] = [1002, 2006, 2008];

/// Entry of `search.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    pub country: String,
}

impl CitySuggestion {
    /// Query text used when a suggestion is picked (`"Pune India"`).
    pub fn query_text(&self) -> String {
        format!("{} {}", self.name, self.country)
    }
}

/// Temperature band shown in the city table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureStatus {
    Hot,
    Warm,
    Mild,
    Cold,
}

impl TemperatureStatus {
    pub fn from_celsius(temp: f64) -> Self {
        if temp >= 35.0 {
            Self::Hot
        } else if temp >= 25.0 {
            Self::Warm
        } else if temp >= 15.0 {
            Self::Mild
        } else {
            Self::Cold
        }
    }
}

/// Row of the daily multi-city temperature table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityTemperature {
    pub city: String,
    pub temperature: f64,
    pub status: TemperatureStatus,
    pub condition: String,
}

impl CityTemperature {
    pub fn from_report(report: &CurrentReport) -> Self {
        Self {
            city: report.location.name.clone(),
            temperature: report.current.temp_c,
            status: TemperatureStatus::from_celsius(report.current.temp_c),
            condition: report.current.condition.text.clone(),
        }
    }
}

/// Persisted-state errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("No matching location found: {0}")]
    LocationNotFound(String),
    #[error("Invalid weather API key")]
    InvalidApiKey,
    #[error("Weather API error {code}: {message}")]
    Api { code: i64, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl WeatherError {
    /// Distinguishes "no such place" from upstream trouble.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::LocationNotFound(_))
    }
}
