//! Air-quality view of a current-conditions report.

use crate::aqi::{format_concentration, AqiValue};
use crate::severity::{classify_severity, EpaCategory, SeverityTier};
use crate::types::CurrentReport;

/// Everything the air-quality card and banner need, derived from one report.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityReport {
    pub city: String,
    /// Headline index from PM2.5
    pub aqi: AqiValue,
    /// Banner tier for `aqi`
    pub tier: &'static SeverityTier,
    /// Category from the API's own `us-epa-index`
    pub epa_category: EpaCategory,
    pub pm2_5: String,
    pub pm10: String,
}

impl AirQualityReport {
    pub fn from_report(report: &CurrentReport) -> Self {
        let air_quality = report.current.air_quality.unwrap_or_default();
        let reading = air_quality.reading();
        let aqi = reading.headline_aqi();

        Self {
            city: report.location.name.clone(),
            aqi,
            tier: classify_severity(aqi),
            epa_category: EpaCategory::from_index(air_quality.us_epa_index.unwrap_or(0)),
            pm2_5: format_concentration(reading.pm2_5),
            pm10: format_concentration(reading.pm10),
        }
    }
}
