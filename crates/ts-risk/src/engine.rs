use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_types::{RiskTier, User};

use crate::config::RiskConfig;
use crate::factor::{FactorScore, RiskFactor, RiskInput};
use crate::factors::{AccountAgeFactor, ComplaintFactor, TimeOfDayFactor, ZoneFactor};

/// Scores at or below this are green.
const GREEN_MAX: u8 = 30;
/// Scores at or below this (and above green) are yellow.
const YELLOW_MAX: u8 = 60;
const SCORE_CAP: u8 = 100;

// ---------------------------------------------------------------------------
// RiskAssessment
// ---------------------------------------------------------------------------

/// Result of running every factor over one input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RiskAssessment {
    /// Sum of factor points, capped at 100.
    pub score: u8,
    pub tier: RiskTier,
    /// Per-factor points in evaluation order.
    pub breakdown: Vec<FactorScore>,
}

/// Display form of a score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDetails {
    pub score: u8,
    pub tier: RiskTier,
    pub message: String,
}

// ---------------------------------------------------------------------------
// RiskEngine
// ---------------------------------------------------------------------------

/// Additive risk scorer.
///
/// Pure: output depends only on the input and the configured factors.
/// Holds no mutable state, so one engine is shared across threads freely.
pub struct RiskEngine {
    factors: Vec<Box<dyn RiskFactor>>,
}

impl RiskEngine {
    /// Engine with the four standard factors:
    /// time of day -> zone -> complaints -> account age.
    pub fn new(config: RiskConfig) -> Self {
        let mut engine = Self::empty();
        engine.add_factor(Box::new(TimeOfDayFactor));
        engine.add_factor(Box::new(ZoneFactor::from_config(&config)));
        engine.add_factor(Box::new(ComplaintFactor));
        engine.add_factor(Box::new(AccountAgeFactor));
        engine
    }

    /// Engine with no factors. Every input scores 0.
    pub fn empty() -> Self {
        Self {
            factors: Vec::new(),
        }
    }

    pub fn add_factor(&mut self, factor: Box<dyn RiskFactor>) {
        self.factors.push(factor);
    }

    pub fn factor_count(&self) -> usize {
        self.factors.len()
    }

    pub fn assess(&self, input: &RiskInput<'_>) -> RiskAssessment {
        let mut total: u16 = 0;
        let mut breakdown = Vec::with_capacity(self.factors.len());

        for factor in &self.factors {
            let points = factor.score(input).min(factor.max_points());
            total += u16::from(points);
            breakdown.push(FactorScore {
                factor: factor.name().to_string(),
                points,
            });
        }

        let score = total.min(u16::from(SCORE_CAP)) as u8;
        let assessment = RiskAssessment {
            score,
            tier: tier(score),
            breakdown,
        };
        tracing::debug!(score, tier = %assessment.tier, "risk assessed");
        assessment
    }

    /// Score a worker at a given time and zone.
    pub fn score(
        &self,
        worker: &User,
        at: DateTime<Utc>,
        zone: Option<&str>,
        complaint_count: u32,
    ) -> u8 {
        self.assess(&Self::worker_input(worker, at, zone, complaint_count))
            .score
    }

    /// Like [`Self::score`] but returns the full assessment.
    pub fn assess_worker(
        &self,
        worker: &User,
        at: DateTime<Utc>,
        zone: Option<&str>,
        complaint_count: u32,
    ) -> RiskAssessment {
        self.assess(&Self::worker_input(worker, at, zone, complaint_count))
    }

    fn worker_input<'a>(
        worker: &User,
        at: DateTime<Utc>,
        zone: Option<&'a str>,
        complaint_count: u32,
    ) -> RiskInput<'a> {
        RiskInput {
            at,
            zone,
            complaint_count,
            account_created: Some(worker.created_at),
        }
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}

/// Map a score to its tier. Boundaries belong to the lower tier:
/// 0–30 green, 31–60 yellow, 61+ red.
pub fn tier(score: u8) -> RiskTier {
    if score <= GREEN_MAX {
        RiskTier::Green
    } else if score <= YELLOW_MAX {
        RiskTier::Yellow
    } else {
        RiskTier::Red
    }
}

pub fn risk_details(score: u8) -> RiskDetails {
    let score = score.min(SCORE_CAP);
    let tier = tier(score);
    let message = match tier {
        RiskTier::Green => "Low risk - All allocations permitted",
        RiskTier::Yellow => "Medium risk - Some restrictions apply",
        RiskTier::Red => "High risk - Significant restrictions apply",
    };
    RiskDetails {
        score,
        tier,
        message: message.to_string(),
    }
}
