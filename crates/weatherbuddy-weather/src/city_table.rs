//! Multi-city temperature table.

use tokio::task::JoinSet;

use crate::provider::WeatherProvider;
use crate::types::{CityTemperature, WeatherError};

/// Fetch current conditions for every city concurrently.
///
/// Rows come back in the order of `cities`. The first failure fails the whole
/// table; callers keep whatever they had before.
pub async fn fetch_city_table(
    provider: &WeatherProvider,
    cities: &[String],
) -> Result<Vec<CityTemperature>, WeatherError> {
    let mut tasks = JoinSet::new();
    for (position, city) in cities.iter().enumerate() {
        let provider = provider.clone();
        let city = city.clone();
        tasks.spawn(async move {
            let report = provider.fetch_current(&city).await?;
            Ok::<_, WeatherError>((position, CityTemperature::from_report(&report)))
        });
    }

    let mut rows: Vec<Option<CityTemperature>> = vec![None; cities.len()];
    while let Some(joined) = tasks.join_next().await {
        let (position, row) = joined
            .map_err(|e| WeatherError::Parse(format!("city table task failed: {}", e)))??;
        rows[position] = Some(row);
    }

    tracing::info!("Fetched city table for {} cities", cities.len());
    Ok(rows.into_iter().flatten().collect())
}
