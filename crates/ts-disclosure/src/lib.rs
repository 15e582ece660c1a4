//! Disclosure of shift identity for TrustShift.
//!
//! A scanned trust token resolves to a shift, and the requester's role picks
//! the projection:
//!
//! | requester | view                                   | audit record |
//! |-----------|----------------------------------------|--------------|
//! | customer  | name, face digest, employer, tier      | yes          |
//! | officer   | identity, workplace, shift, supervisor | no           |
//!
//! A token that fails to decode and a token with no matching shift both
//! come back as `verified: false` with a message, never as an error: scanning
//! a foreign code is expected. Requester problems (unknown user, wrong role)
//! and store failures are errors.

pub mod error;
pub mod service;
pub mod views;

pub use error::{DisclosureError, DisclosureResult};
pub use service::{
    DisclosureService, DEFAULT_EVENT_LIMIT, DEFAULT_HISTORY_LIMIT, STATS_RECENT_LIMIT,
};
pub use views::{
    ActiveWorker, CustomerHistory, IdentityBlock, OfficerScanResult, ShiftBlock,
    VerificationEvent, VerificationResult, WorkerStats, WorkplaceBlock,
};
