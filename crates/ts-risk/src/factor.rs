use chrono::{DateTime, Utc};

/// Everything the risk factors may look at.
#[derive(Clone, Debug)]
pub struct RiskInput<'a> {
    /// Evaluation time. Only the wall-clock hour is used for time of day.
    pub at: DateTime<Utc>,
    /// Zone identifier of the workplace binding, if known.
    pub zone: Option<&'a str>,
    /// Complaints on record against the worker.
    pub complaint_count: u32,
    /// When the worker's account was created, if known.
    pub account_created: Option<DateTime<Utc>>,
}

impl<'a> RiskInput<'a> {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            at,
            zone: None,
            complaint_count: 0,
            account_created: None,
        }
    }

    pub fn zone(mut self, zone: &'a str) -> Self {
        self.zone = Some(zone);
        self
    }

    pub fn complaints(mut self, count: u32) -> Self {
        self.complaint_count = count;
        self
    }

    pub fn account_created(mut self, created: DateTime<Utc>) -> Self {
        self.account_created = Some(created);
        self
    }
}

/// Points contributed by one factor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactorScore {
    pub factor: String,
    pub points: u8,
}

/// One additive term of the risk score.
///
/// Factors are independent: none may depend on another's output. The trait
/// is object-safe so the engine can hold a `Vec<Box<dyn RiskFactor>>`.
pub trait RiskFactor: Send + Sync {
    /// Short name used in score breakdowns ("time_of_day", "zone", ...).
    fn name(&self) -> &str;

    /// Upper bound on what [`Self::score`] returns.
    fn max_points(&self) -> u8;

    fn score(&self, input: &RiskInput<'_>) -> u8;
}
