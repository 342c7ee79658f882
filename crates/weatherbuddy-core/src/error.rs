//! Display-side error hierarchy.
//!
//! Crate-local errors (provider, store) fold into [`AppError`] when a failure
//! has to be shown to someone. `user_message()` gives the text for that.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Connectivity error: {0}")]
    Connectivity(#[from] ConnectivityError),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AppError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Connectivity(e) => e.user_message(),
            AppError::Lookup(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
        }
    }
}

/// Transport-level failures talking to the weather provider or the gateway.
#[derive(Debug, Error)]
pub enum ConnectivityError {
    #[error("Host unreachable: {0}")]
    Unreachable(String),

    #[error("Request timed out")]
    TimedOut,

    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Malformed response body: {0}")]
    Malformed(String),
}

impl ConnectivityError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConnectivityError::Unreachable(_) => {
                "Weather service is unreachable. Check your internet connection."
            }
            ConnectivityError::TimedOut => "Weather service took too long to answer. Try again.",
            ConnectivityError::Upstream { status, .. } if *status >= 500 => {
                "Weather service is having trouble. Try again later."
            }
            ConnectivityError::Upstream { .. } => "Weather request was refused. Try again.",
            ConnectivityError::Malformed(_) => "Weather service sent data we could not read.",
        }
    }
}

impl From<reqwest::Error> for ConnectivityError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ConnectivityError::TimedOut
        } else if e.is_decode() {
            ConnectivityError::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            ConnectivityError::Upstream {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            ConnectivityError::Unreachable(e.to_string())
        }
    }
}

/// The provider answered, but not with weather.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("No matching location found: {0}")]
    CityNotFound(String),

    #[error("API key rejected")]
    KeyRejected,

    #[error("Provider error {code}: {message}")]
    Provider { code: i64, message: String },
}

impl LookupError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupError::CityNotFound(_) => {
                "No matching location found. Check the spelling and try again."
            }
            LookupError::KeyRejected => "Weather API key was rejected. Check settings.",
            LookupError::Provider { .. } => "Weather service could not answer. Try again.",
        }
    }
}

/// Persisted client state (last city, daily table).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Could not write saved state: {0}")]
    Unwritable(String),

    #[error("Saved state is unreadable: {0}")]
    Unreadable(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::Unwritable(_) => "Your last search could not be saved.",
            StorageError::Unreadable(_) => "Saved data was reset because it was unreadable.",
        }
    }
}
