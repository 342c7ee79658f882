//! Weather and air-quality data for WeatherBuddy
//!
//! Holds the AQI engine and severity tables, the weatherapi.com client, the
//! location-gateway client, persisted client state, and the session that ties
//! them together.

pub mod aqi;
pub mod cache;
pub mod city_table;
pub mod error_mapping;
pub mod location;
pub mod provider;
pub mod report;
pub mod session;
pub mod severity;
pub mod store;
pub mod types;

pub use aqi::{compute_aqi, AqiValue, PollutantReading};
pub use cache::WeatherCache;
pub use location::LocationClient;
pub use provider::WeatherProvider;
pub use report::AirQualityReport;
pub use session::{WeatherSession, WeatherView};
pub use severity::{classify_severity, EpaCategory, SeverityLevel, SeverityTier};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use types::*;
