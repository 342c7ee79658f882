use weatherbuddy_core::{AppError, ConnectivityError, LookupError, StorageError};

use crate::types::{StoreError, WeatherError};

impl From<WeatherError> for AppError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::Network(e) => AppError::Connectivity(e.into()),
            WeatherError::LocationNotFound(q) => AppError::Lookup(LookupError::CityNotFound(q)),
            WeatherError::InvalidApiKey => AppError::Lookup(LookupError::KeyRejected),
            WeatherError::Api { code, message } => {
                AppError::Lookup(LookupError::Provider { code, message })
            }
            WeatherError::Parse(s) => AppError::Connectivity(ConnectivityError::Malformed(s)),
            WeatherError::Store(e) => e.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Io(e) => AppError::Storage(StorageError::Unwritable(e.to_string())),
            StoreError::Serialization(e) => {
                AppError::Storage(StorageError::Unreadable(e.to_string()))
            }
        }
    }
}
