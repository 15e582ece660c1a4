use serde::{Deserialize, Serialize};

use crate::error::RiskError;

/// Configuration for the risk engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Zones that score the full zone weight on an exact
    /// (case-insensitive) match.
    pub high_risk_zones: Vec<String>,
    /// Substring marking an isolated zone.
    pub isolated_marker: String,
    /// Substring marking a low-visibility zone.
    pub low_visibility_marker: String,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            high_risk_zones: vec!["zone_red_1".into(), "zone_red_2".into()],
            isolated_marker: "isolated".into(),
            low_visibility_marker: "low_visibility".into(),
        }
    }
}

impl RiskConfig {
    /// Reject blank zone names and markers. A blank marker would match every
    /// zone.
    pub fn validate(&self) -> Result<(), RiskError> {
        if self.high_risk_zones.iter().any(|z| z.trim().is_empty()) {
            return Err(RiskError::Config("high_risk_zones contains a blank entry".into()));
        }
        if self.isolated_marker.trim().is_empty() {
            return Err(RiskError::Config("isolated_marker must not be blank".into()));
        }
        if self.low_visibility_marker.trim().is_empty() {
            return Err(RiskError::Config("low_visibility_marker must not be blank".into()));
        }
        Ok(())
    }
}
