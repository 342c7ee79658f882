//! Air-quality severity lookups.
//!
//! Three tables live here and are deliberately kept apart:
//! - [`SEVERITY_TIERS`]: the coarse banner classification of a computed AQI.
//! - [`EpaCategory`]: the six-level category keyed by the API's `us-epa-index`.
//! - [`AQI_REFERENCE_TABLE`]: the explanatory table shown alongside the banner.
//!
//! Their boundaries do not line up (the banner's Poor tier spans 101..=200
//! while the reference table splits that range in two). Keep both as is.

use serde::{Deserialize, Serialize};

use crate::aqi::AqiValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    Good,
    Moderate,
    Poor,
    VeryPoor,
}

impl SeverityLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}

/// A banner tier. `ceiling` is the highest AQI the tier covers; the catch-all has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityTier {
    pub level: SeverityLevel,
    pub color: &'static str,
    pub description: &'static str,
    pub health_advice: &'static str,
    pub ceiling: Option<u16>,
}

/// Tiers in ascending ceiling order.
pub static SEVERITY_TIERS: [SeverityTier; 3] = [
    SeverityTier {
        level: SeverityLevel::Good,
        color: "#4caf50",
        description: "Air quality is satisfactory and poses little or no risk.",
        health_advice: "Ideal conditions for outdoor activities.",
        ceiling: Some(50),
    },
    SeverityTier {
        level: SeverityLevel::Moderate,
        color: "#ffeb3b",
        description: "Air quality is acceptable; sensitive individuals may experience discomfort.",
        health_advice: "Sensitive groups should reduce prolonged outdoor exertion.",
        ceiling: Some(100),
    },
    SeverityTier {
        level: SeverityLevel::Poor,
        color: "#ff9800",
        description: "Air quality may affect health for the general population.",
        health_advice: "Limit outdoor exposure and wear masks if needed.",
        ceiling: Some(200),
    },
];

/// Everything above the last ceiling, and missing data.
pub static VERY_POOR_TIER: SeverityTier = SeverityTier {
    level: SeverityLevel::VeryPoor,
    color: "#f44336",
    description: "Health warnings of emergency conditions.",
    health_advice: "Avoid outdoor activities and use protective masks.",
    ceiling: None,
};

/// Pick the banner tier for a computed AQI.
///
/// `NoData` compares above every ceiling and lands on [`VERY_POOR_TIER`].
pub fn classify_severity(aqi: AqiValue) -> &'static SeverityTier {
    let AqiValue::Index(value) = aqi else {
        return &VERY_POOR_TIER;
    };

    SEVERITY_TIERS
        .iter()
        .find(|tier| tier.ceiling.is_some_and(|ceiling| ceiling >= value))
        .unwrap_or(&VERY_POOR_TIER)
}

/// Six-level category reported directly by the weather API (`us-epa-index`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpaCategory {
    Good,
    Moderate,
    Sensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
    Unknown,
}

impl EpaCategory {
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => Self::Good,
            2 => Self::Moderate,
            3 => Self::Sensitive,
            4 => Self::Unhealthy,
            5 => Self::VeryUnhealthy,
            6 => Self::Hazardous,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Sensitive => "Sensitive",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
            Self::Unknown => "Unknown",
        }
    }

    /// Translucent card background for the category.
    pub fn tint(&self) -> &'static str {
        match self {
            Self::Good => "rgba(46, 204, 113, 0.3)",
            Self::Moderate => "rgba(241, 196, 15, 0.3)",
            Self::Sensitive => "rgba(230, 126, 34, 0.3)",
            Self::Unhealthy => "rgba(231, 76, 60, 0.3)",
            Self::VeryUnhealthy => "rgba(142, 68, 173, 0.3)",
            Self::Hazardous => "rgba(127, 0, 0, 0.3)",
            Self::Unknown => "rgba(128,128,128,0.3)",
        }
    }
}

/// A row of the explanatory AQI table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AqiReferenceRow {
    pub range: &'static str,
    pub category: &'static str,
    pub health_impact: &'static str,
}

pub const AQI_REFERENCE_TABLE: [AqiReferenceRow; 5] = [
    AqiReferenceRow {
        range: "0–50",
        category: "Good",
        health_impact: "Air quality is satisfactory",
    },
    AqiReferenceRow {
        range: "51–100",
        category: "Moderate",
        health_impact: "Sensitive individuals may experience discomfort",
    },
    AqiReferenceRow {
        range: "101–150",
        category: "Unhealthy for Sensitive Groups",
        health_impact: "People with respiratory issues may be affected",
    },
    AqiReferenceRow {
        range: "151–200",
        category: "Unhealthy",
        health_impact: "Everyone may experience health effects",
    },
    AqiReferenceRow {
        range: "201+",
        category: "Very Unhealthy",
        health_impact: "Serious health effects for all groups",
    },
];
