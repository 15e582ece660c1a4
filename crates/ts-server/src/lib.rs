//! HTTP server for TrustShift.
//!
//! Exposes registration, workplace binding, the shift lifecycle, and scan
//! verification as JSON endpoints under `/api`. Failures render as
//! `{"error": kind, "detail": message}` with a status code chosen from the
//! error kind alone.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::{ServerConfig, StoreConfig};
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::TrustShiftServer;
pub use state::AppState;
