use std::collections::HashSet;

use crate::config::RiskConfig;
use crate::factor::{RiskFactor, RiskInput};

/// Risk from where the work happens.
///
/// Matching is case-insensitive and checked in this order:
/// absent or blank zone → 5, exact member of the high-risk set → 25,
/// contains the isolated marker → 20, contains the low-visibility
/// marker → 15, anything else → 0.
pub struct ZoneFactor {
    high_risk: HashSet<String>,
    isolated_marker: String,
    low_visibility_marker: String,
}

impl ZoneFactor {
    pub fn from_config(config: &RiskConfig) -> Self {
        Self {
            high_risk: config
                .high_risk_zones
                .iter()
                .map(|z| z.trim().to_lowercase())
                .collect(),
            isolated_marker: config.isolated_marker.to_lowercase(),
            low_visibility_marker: config.low_visibility_marker.to_lowercase(),
        }
    }
}

impl Default for ZoneFactor {
    fn default() -> Self {
        Self::from_config(&RiskConfig::default())
    }
}

impl RiskFactor for ZoneFactor {
    fn name(&self) -> &str {
        "zone"
    }

    fn max_points(&self) -> u8 {
        25
    }

    fn score(&self, input: &RiskInput<'_>) -> u8 {
        let zone = match input.zone.map(str::trim) {
            Some(z) if !z.is_empty() => z.to_lowercase(),
            _ => return 5,
        };

        if self.high_risk.contains(&zone) {
            25
        } else if zone.contains(&self.isolated_marker) {
            20
        } else if zone.contains(&self.low_visibility_marker) {
            15
        } else {
            0
        }
    }
}
