//! Record storage for TrustShift.
//!
//! Every service talks to persistence through the [`RecordStore`] trait and
//! never learns which backend is behind it. Two backends ship here:
//!
//! - [`InMemoryRecordStore`]: `RwLock`-guarded maps, for tests and
//!   single-process deployments.
//! - [`JsonFileRecordStore`]: the same record set, snapshotted to a JSON
//!   file after every mutation.
//!
//! Backend selection is always explicit. A backend that cannot serve a
//! request reports [`StoreError::Unavailable`]; it never answers with
//! stale or empty data.

pub mod error;
pub mod file;
pub mod memory;
pub mod records;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileRecordStore;
pub use memory::InMemoryRecordStore;
pub use records::RecordSet;
pub use traits::{RecordSetAccess, RecordStore};
