//! Persisted client state: the last city and the daily city-table cache.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::store::KeyValueStore;
use crate::types::{CityTemperature, StoreError};

pub const LAST_CITY_KEY: &str = "lastCity";
pub const CITY_TABLE_KEY: &str = "weatherData";
pub const CITY_TABLE_DATE_KEY: &str = "lastFetch";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone)]
pub struct WeatherCache {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for WeatherCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherCache").finish_non_exhaustive()
    }
}

impl WeatherCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Last successfully shown city, if any. Read failures count as "none".
    pub fn last_city(&self) -> Option<String> {
        match self.store.get(LAST_CITY_KEY) {
            Ok(city) => city.filter(|c| !c.trim().is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read last city: {}", e);
                None
            }
        }
    }

    pub fn set_last_city(&self, city: &str) -> Result<(), StoreError> {
        self.store.set(LAST_CITY_KEY, city)
    }

    /// Cached table rows from any day.
    pub fn city_table(&self) -> Option<Vec<CityTemperature>> {
        let raw = match self.store.get(CITY_TABLE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Failed to read city table cache: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(rows) => Some(rows),
            Err(e) => {
                tracing::warn!("Ignoring unreadable city table cache: {}", e);
                None
            }
        }
    }

    /// Whether the cached table was fetched on `today`.
    pub fn is_table_fresh(&self, today: NaiveDate) -> bool {
        let fetched_on = match self.store.get(CITY_TABLE_DATE_KEY) {
            Ok(Some(date)) => date,
            _ => return false,
        };

        NaiveDate::parse_from_str(&fetched_on, DATE_FORMAT)
            .map(|date| date == today)
            .unwrap_or(false)
    }

    /// Cached rows, only if they were fetched on `today`.
    pub fn fresh_city_table(&self, today: NaiveDate) -> Option<Vec<CityTemperature>> {
        if !self.is_table_fresh(today) {
            return None;
        }
        self.city_table()
    }

    pub fn store_city_table(
        &self,
        rows: &[CityTemperature],
        today: NaiveDate,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_string(rows)?;
        self.store.set(CITY_TABLE_KEY, &json)?;
        self.store
            .set(CITY_TABLE_DATE_KEY, &today.format(DATE_FORMAT).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::TemperatureStatus;

    fn cache() -> WeatherCache {
        WeatherCache::new(Arc::new(MemoryStore::new()))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, d).unwrap()
    }

    fn rows() -> Vec<CityTemperature> {
        vec![CityTemperature {
            city: "Mumbai".into(),
            temperature: 31.0,
            status: TemperatureStatus::Warm,
            condition: "Haze".into(),
        }]
    }

    #[test]
    fn test_last_city_roundtrip() {
        let cache = cache();
        assert_eq!(cache.last_city(), None);
        cache.set_last_city("Lucknow").unwrap();
        assert_eq!(cache.last_city().as_deref(), Some("Lucknow"));
    }

    #[test]
    fn test_blank_last_city_is_none() {
        let cache = cache();
        cache.set_last_city("   ").unwrap();
        assert_eq!(cache.last_city(), None);
    }

    #[test]
    fn test_table_fresh_only_on_same_day() {
        let cache = cache();
        assert!(!cache.is_table_fresh(day(26)));

        cache.store_city_table(&rows(), day(26)).unwrap();
        assert!(cache.is_table_fresh(day(26)));
        assert!(!cache.is_table_fresh(day(27)));

        assert_eq!(cache.fresh_city_table(day(26)), Some(rows()));
        assert_eq!(cache.fresh_city_table(day(27)), None);
        // Stale rows stay readable for display while a refresh runs.
        assert_eq!(cache.city_table(), Some(rows()));
    }

    #[test]
    fn test_corrupt_table_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set(CITY_TABLE_KEY, "[{oops").unwrap();
        let cache = WeatherCache::new(store);
        assert_eq!(cache.city_table(), None);
    }
}
