use chrono::Timelike;

use crate::factor::{RiskFactor, RiskInput};

/// Late-night and evening work carries more risk.
///
/// `[22:00, 05:00)` scores 30 (the window wraps midnight), `[18:00, 22:00)`
/// scores 15, daytime scores 0. Only the wall-clock hour of `at` is read;
/// no timezone conversion is applied.
pub struct TimeOfDayFactor;

impl TimeOfDayFactor {
    const LATE_NIGHT: (u32, u32) = (22, 5);
    const EVENING: (u32, u32) = (18, 22);

    fn in_window(hour: u32, (start, end): (u32, u32)) -> bool {
        if start > end {
            hour >= start || hour < end
        } else {
            (start..end).contains(&hour)
        }
    }
}

impl RiskFactor for TimeOfDayFactor {
    fn name(&self) -> &str {
        "time_of_day"
    }

    fn max_points(&self) -> u8 {
        30
    }

    fn score(&self, input: &RiskInput<'_>) -> u8 {
        let hour = input.at.hour();
        if Self::in_window(hour, Self::LATE_NIGHT) {
            30
        } else if Self::in_window(hour, Self::EVENING) {
            15
        } else {
            0
        }
    }
}
