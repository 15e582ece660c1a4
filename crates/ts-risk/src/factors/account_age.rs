use crate::factor::{RiskFactor, RiskInput};

/// Newer accounts are slightly riskier.
///
/// Unknown creation time → 10; younger than 7 days → 15; younger than 30
/// days → 10; younger than 90 days → 5; older → 0. Age is measured against
/// the evaluation time in the input, so a creation time after it counts as
/// brand new.
pub struct AccountAgeFactor;

impl RiskFactor for AccountAgeFactor {
    fn name(&self) -> &str {
        "account_age"
    }

    fn max_points(&self) -> u8 {
        15
    }

    fn score(&self, input: &RiskInput<'_>) -> u8 {
        let Some(created) = input.account_created else {
            return 10;
        };
        let age_days = (input.at - created).num_days();
        if age_days < 7 {
            15
        } else if age_days < 30 {
            10
        } else if age_days < 90 {
            5
        } else {
            0
        }
    }
}
