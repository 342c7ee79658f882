//! Client data flow: pick a city, fetch its weather, derive what to show.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use weatherbuddy_core::{AppError, Config};

use crate::cache::WeatherCache;
use crate::city_table::fetch_city_table;
use crate::location::LocationClient;
use crate::provider::WeatherProvider;
use crate::report::AirQualityReport;
use crate::store::KeyValueStore;
use crate::types::{CitySuggestion, CityTemperature, CurrentReport, WeatherError};

/// Forecast shown when the forecast call fails or returns nothing.
pub const FALLBACK_FORECAST: [f64; 3] = [20.5, 21.0, 21.6];

/// Suggestions are only requested past this many characters.
const MIN_SUGGESTION_CHARS: usize = 2;

/// What the main weather card should display.
#[derive(Debug, Clone)]
pub enum WeatherView {
    Ready {
        report: Box<CurrentReport>,
        air_quality: AirQualityReport,
    },
    /// The weather API knows no such place.
    LocationNotFound { query: String },
    /// Upstream trouble; `message` is safe to show as is.
    Unavailable { message: &'static str },
}

impl WeatherView {
    fn from_result(query: &str, result: Result<CurrentReport, WeatherError>) -> Self {
        match result {
            Ok(report) => Self::Ready {
                air_quality: AirQualityReport::from_report(&report),
                report: Box::new(report),
            },
            Err(e) if e.is_not_found() => Self::LocationNotFound {
                query: query.to_string(),
            },
            Err(e) => {
                tracing::warn!("Weather fetch for {:?} failed: {}", query, e);
                Self::Unavailable {
                    message: AppError::from(e).user_message(),
                }
            }
        }
    }

    /// Resolved city name when the view is ready.
    pub fn city(&self) -> Option<&str> {
        match self {
            Self::Ready { report, .. } => Some(&report.location.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherSession {
    provider: WeatherProvider,
    location: LocationClient,
    cache: WeatherCache,
    forecast_days: u8,
    table_cities: Vec<String>,
}

impl WeatherSession {
    pub fn new(
        provider: WeatherProvider,
        location: LocationClient,
        cache: WeatherCache,
        forecast_days: u8,
        table_cities: Vec<String>,
    ) -> Self {
        Self {
            provider,
            location,
            cache,
            forecast_days,
            table_cities,
        }
    }

    pub fn from_config(
        config: &Config,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, WeatherError> {
        let timeout = Duration::from_secs(config.weather.request_timeout_secs);
        Ok(Self::new(
            WeatherProvider::from_config(&config.weather)?,
            LocationClient::new(
                &config.weather.gateway_url,
                &config.gateway.default_city,
                timeout,
            )?,
            WeatherCache::new(store),
            config.weather.forecast_days,
            config.weather.table_cities.clone(),
        ))
    }

    /// The stored last city, or else the gateway's answer (which is then stored).
    pub async fn initial_city(&self) -> String {
        if let Some(city) = self.cache.last_city() {
            tracing::debug!("Using last city {:?}", city);
            return city;
        }

        let location = self.location.resolve().await;
        if let Err(e) = self.cache.set_last_city(&location.city) {
            tracing::warn!("Failed to remember city {:?}: {}", location.city, e);
        }
        location.city
    }

    /// First screen: weather for [`initial_city`](Self::initial_city).
    pub async fn startup(&self) -> WeatherView {
        let city = self.initial_city().await;
        self.show(&city).await
    }

    /// Look up a searched city. Blank queries are ignored.
    pub async fn search(&self, query: &str) -> Option<WeatherView> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(self.show(query).await)
    }

    async fn show(&self, query: &str) -> WeatherView {
        let view = WeatherView::from_result(query, self.provider.fetch_current(query).await);

        if let Some(city) = view.city() {
            if let Err(e) = self.cache.set_last_city(city) {
                tracing::warn!("Failed to remember city {:?}: {}", city, e);
            }
        }
        view
    }

    /// Autocomplete candidates; empty for short input or on any failure.
    pub async fn suggestions(&self, query: &str) -> Vec<CitySuggestion> {
        let query = query.trim();
        if query.chars().count() <= MIN_SUGGESTION_CHARS {
            return Vec::new();
        }

        match self.provider.search_cities(query).await {
            Ok(list) => list,
            Err(e) => {
                tracing::debug!("City search for {:?} failed: {}", query, e);
                Vec::new()
            }
        }
    }

    /// Daily average temperatures, or [`FALLBACK_FORECAST`].
    pub async fn forecast(&self, city: &str) -> Vec<f64> {
        match self.provider.fetch_forecast(city, self.forecast_days).await {
            Ok(days) if !days.is_empty() => days,
            Ok(_) => {
                tracing::warn!("Empty forecast for {:?}, using fallback", city);
                FALLBACK_FORECAST.to_vec()
            }
            Err(e) => {
                tracing::warn!("Forecast for {:?} failed, using fallback: {}", city, e);
                FALLBACK_FORECAST.to_vec()
            }
        }
    }

    /// The multi-city table, refetched at most once per calendar day.
    ///
    /// A failed refresh returns the previously cached rows (possibly none).
    pub async fn city_table(&self, today: NaiveDate) -> Vec<CityTemperature> {
        if let Some(rows) = self.cache.fresh_city_table(today) {
            return rows;
        }

        match fetch_city_table(&self.provider, &self.table_cities).await {
            Ok(rows) => {
                if let Err(e) = self.cache.store_city_table(&rows, today) {
                    tracing::warn!("Failed to cache city table: {}", e);
                }
                rows
            }
            Err(e) => {
                tracing::warn!("City table refresh failed: {}", e);
                self.cache.city_table().unwrap_or_default()
            }
        }
    }
}
