//! Trust token codec for TrustShift.
//!
//! A trust token is the scannable proof that a worker is on an active shift.
//! It carries the shift claims as JSON, encoded with URL-safe base64 so it
//! fits in a QR code or a URL path segment:
//!
//! ```text
//! base64url(json(claims))                      unkeyed
//! base64url(json(claims)) "." base64url(tag)   keyed, tag = BLAKE3-keyed(payload)
//! ```
//!
//! Claim field names (`shift_id`, `worker_uuid`, `workplace`, `start_time`,
//! `issued_at`) are a public format: tokens minted by one release must
//! decode in the next.
//!
//! Decoding never touches storage. Whether a decoded token refers to a live
//! shift is for the caller to find out.

pub mod claims;
pub mod codec;
pub mod config;
pub mod error;

pub use claims::TokenClaims;
pub use codec::{TokenCodec, MAX_TOKEN_LEN};
pub use config::{parse_key, TokenConfig};
pub use error::{TokenError, TokenResult};
