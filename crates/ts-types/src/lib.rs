//! Foundation types for TrustShift.
//!
//! This crate provides the identity, role, and record types shared by every
//! other TrustShift crate. Records are plain typed structs: the services own
//! the rules, the store owns persistence.
//!
//! # Key Types
//!
//! - [`UserId`] / [`ShiftId`]: UUID-backed identifiers
//! - [`Role`]: closed set of user roles that gate every operation
//! - [`RiskTier`]: green/yellow/red classification fixed at shift start
//! - [`User`], [`WorkplaceBinding`], [`Shift`], [`Verification`]: entity records
//! - [`Clock`]: injectable source of "now"
//! - [`ErrorKind`]: shared classification of business-rule failures

pub mod error;
pub mod identity;
pub mod records;
pub mod temporal;
pub mod tier;

pub use error::{ErrorKind, TypeError};
pub use identity::{Role, ShiftId, UserId};
pub use records::{Shift, User, Verification, WorkplaceBinding};
pub use temporal::{elapsed_hours, Clock, ManualClock, SystemClock};
pub use tier::RiskTier;
