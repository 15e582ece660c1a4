//! Shift lifecycle for TrustShift.
//!
//! Each worker moves through `NoActiveShift -> Active -> Ended`. Starting a
//! shift scores risk once, mints a trust token, and records the shift;
//! ending it is the only mutation a shift ever sees. Ended shifts are kept
//! for history and a new start always creates a fresh shift.
//!
//! Start is serialized per worker, and the store rejects a second active
//! shift independently, so at most one active shift per worker holds even
//! across processes sharing a store.

pub mod error;
pub mod manager;

pub use error::{ShiftError, ShiftResult};
pub use manager::{ActiveShift, ShiftManager, ShiftStatus, StartedShift};
