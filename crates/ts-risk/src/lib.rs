//! Risk engine for TrustShift.
//!
//! A shift's risk tier is computed once, when the shift starts, from four
//! independent factors that each contribute a bounded number of points:
//!
//! | factor        | points |
//! |---------------|--------|
//! | time of day   | 0–30   |
//! | zone          | 0–25   |
//! | complaints    | 0–30   |
//! | account age   | 0–15   |
//!
//! The sum is capped at 100 and mapped to a [`RiskTier`]. The engine never
//! reads a clock: the caller passes the evaluation time in [`RiskInput`].
//!
//! # Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use ts_risk::{RiskConfig, RiskEngine, RiskInput};
//! use ts_types::RiskTier;
//!
//! let engine = RiskEngine::new(RiskConfig::default());
//! let at = Utc.with_ymd_and_hms(2024, 6, 1, 23, 0, 0).unwrap();
//! let input = RiskInput::new(at)
//!     .zone("isolated_area")
//!     .account_created(at - chrono::Duration::days(2));
//! let assessment = engine.assess(&input);
//! assert_eq!(assessment.score, 65);
//! assert_eq!(assessment.tier, RiskTier::Red);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod factor;
pub mod factors;
pub mod policy;

pub use config::RiskConfig;
pub use engine::{risk_details, tier, RiskAssessment, RiskDetails, RiskEngine};
pub use error::RiskError;
pub use factor::{FactorScore, RiskFactor, RiskInput};
pub use factors::{AccountAgeFactor, ComplaintFactor, TimeOfDayFactor, ZoneFactor};
pub use policy::{restricted, TaskType};
pub use ts_types::RiskTier;
