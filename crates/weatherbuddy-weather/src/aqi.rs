//! PM2.5 to US-EPA Air Quality Index conversion.
//!
//! The index is a piecewise-linear function of the concentration over six
//! fixed breakpoint bands. Concentrations that are missing, zero, or outside
//! every band produce [`AqiValue::NoData`] rather than an error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One concentration band and the index range it maps onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AqiBreakpoint {
    pub concentration_low: f64,
    pub concentration_high: f64,
    pub index_low: f64,
    pub index_high: f64,
}

impl AqiBreakpoint {
    const fn new(
        concentration_low: f64,
        concentration_high: f64,
        index_low: f64,
        index_high: f64,
    ) -> Self {
        Self {
            concentration_low,
            concentration_high,
            index_low,
            index_high,
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, concentration: f64) -> bool {
        concentration >= self.concentration_low && concentration <= self.concentration_high
    }

    fn interpolate(&self, concentration: f64) -> f64 {
        let slope = (self.index_high - self.index_low)
            / (self.concentration_high - self.concentration_low);
        slope * (concentration - self.concentration_low) + self.index_low
    }
}

/// PM2.5 breakpoints (µg/m³ → AQI). Ordered and non-overlapping.
pub const PM25_BREAKPOINTS: [AqiBreakpoint; 6] = [
    AqiBreakpoint::new(0.0, 12.0, 0.0, 50.0),
    AqiBreakpoint::new(12.1, 35.4, 51.0, 100.0),
    AqiBreakpoint::new(35.5, 55.4, 101.0, 150.0),
    AqiBreakpoint::new(55.5, 150.4, 151.0, 200.0),
    AqiBreakpoint::new(150.5, 250.4, 201.0, 300.0),
    AqiBreakpoint::new(250.5, 500.4, 301.0, 500.0),
];

/// Result of an AQI computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqiValue {
    Index(u16),
    /// Missing sensor data or a concentration outside every band.
    NoData,
}

impl AqiValue {
    pub fn index(&self) -> Option<u16> {
        match self {
            Self::Index(i) => Some(*i),
            Self::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

impl fmt::Display for AqiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{}", i),
            Self::NoData => f.write_str("-"),
        }
    }
}

/// Convert a PM2.5 concentration into an AQI value.
pub fn compute_aqi(concentration: Option<f64>) -> AqiValue {
    let c = match concentration {
        Some(c) if c.is_finite() && c > 0.0 => c,
        _ => return AqiValue::NoData,
    };

    let Some(band) = PM25_BREAKPOINTS.iter().find(|b| b.contains(c)) else {
        tracing::debug!("PM2.5 concentration {} outside all AQI bands", c);
        return AqiValue::NoData;
    };

    // Bands top out at 500, so the rounded value always fits.
    AqiValue::Index(band.interpolate(c).round() as u16)
}

/// Particulate readings from the weather API's `air_quality` object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PollutantReading {
    #[serde(default)]
    pub pm2_5: Option<f64>,
    #[serde(default)]
    pub pm10: Option<f64>,
}

impl PollutantReading {
    /// The headline index shown to users; PM2.5 only.
    pub fn headline_aqi(&self) -> AqiValue {
        compute_aqi(self.pm2_5)
    }
}

/// Floor a concentration for display; `-` when missing or zero.
pub fn format_concentration(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => format!("{}", v.floor() as i64),
        _ => "-".to_string(),
    }
}
