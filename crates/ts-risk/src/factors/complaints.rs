use crate::factor::{RiskFactor, RiskInput};

/// Ten points per complaint on record, saturating at three.
pub struct ComplaintFactor;

impl RiskFactor for ComplaintFactor {
    fn name(&self) -> &str {
        "complaints"
    }

    fn max_points(&self) -> u8 {
        30
    }

    fn score(&self, input: &RiskInput<'_>) -> u8 {
        match input.complaint_count {
            0 => 0,
            1 => 10,
            2 => 20,
            _ => 30,
        }
    }
}
