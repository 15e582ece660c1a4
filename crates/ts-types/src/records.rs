//! Typed entity records.
//!
//! Constructors fill in the fields every record must have; optional data is
//! explicit in the types rather than absent keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{Role, ShiftId, UserId};
use crate::tier::RiskTier;

/// A registered identity. Read-only to the shift core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub role: Role,
    pub name: String,
    /// Contact handle (phone number). Unique across all users.
    pub contact: String,
    /// One-way digest of the face capture. Never the raw image.
    pub face_hash: String,
    /// One-way digest of the identity document capture.
    pub id_hash: String,
    #[serde(default)]
    pub platform_links: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        role: Role,
        name: impl Into<String>,
        contact: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            role,
            name: name.into(),
            contact: contact.into(),
            face_hash: String::new(),
            id_hash: String::new(),
            platform_links: Vec::new(),
            created_at,
        }
    }

    pub fn with_hashes(mut self, face_hash: impl Into<String>, id_hash: impl Into<String>) -> Self {
        self.face_hash = face_hash.into();
        self.id_hash = id_hash.into();
        self
    }

    pub fn with_platform_link(mut self, link: impl Into<String>) -> Self {
        self.platform_links.push(link.into());
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

/// Authorization for a worker to work for one employer at one location,
/// under one supervisor. At most one active binding per worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkplaceBinding {
    pub worker_id: UserId,
    pub employer: String,
    /// Location or zone identifier fed to risk scoring.
    pub zone: String,
    pub supervisor_id: UserId,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl WorkplaceBinding {
    pub fn new(
        worker_id: UserId,
        employer: impl Into<String>,
        zone: impl Into<String>,
        supervisor_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            worker_id,
            employer: employer.into(),
            zone: zone.into(),
            supervisor_id,
            active: true,
            created_at,
        }
    }
}

/// A worker's shift. `end == None` means the shift is active.
///
/// The id, token, and tier are fixed at creation. The end timestamp is the
/// only field ever written after insert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub worker_id: UserId,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub token: String,
    pub risk_tier: RiskTier,
    pub employer: String,
    pub supervisor_id: UserId,
}

impl Shift {
    pub fn is_active(&self) -> bool {
        self.end.is_none()
    }
}

/// Immutable audit entry for a customer-initiated disclosure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub worker_id: UserId,
    pub requester_id: UserId,
    pub time: DateTime<Utc>,
    pub location: Option<String>,
}

impl Verification {
    pub fn new(worker_id: UserId, requester_id: UserId, time: DateTime<Utc>) -> Self {
        Self {
            worker_id,
            requester_id,
            time,
            location: None,
        }
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }
}
