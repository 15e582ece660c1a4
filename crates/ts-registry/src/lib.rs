//! Identity and workplace registry for TrustShift.
//!
//! Everything the shift core treats as pre-existing lives here: users are
//! registered with one-way digests of their biometric captures, and
//! supervisors bind workers to a single employer and zone before any shift
//! can start.

pub mod digest;
pub mod error;
pub mod profile;
pub mod registry;

pub use digest::BiometricDigest;
pub use error::{RegistryError, RegistryResult};
pub use profile::{Profile, RoleDetails};
pub use registry::{
    BindRequest, BindingEntry, BindingView, RegisterRequest, Registry, SupervisorBindings,
    MIN_CONTACT_LEN, MIN_NAME_LEN,
};
