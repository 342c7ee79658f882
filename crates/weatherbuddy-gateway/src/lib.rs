//! Location gateway for WeatherBuddy
//!
//! Resolves a visitor's city from their IP address and optionally serves the
//! built web client.

pub mod client_ip;
pub mod geolocate;
pub mod routes;

pub use geolocate::{IpGeolocator, LocationResolver};
pub use routes::{router, AppState};
