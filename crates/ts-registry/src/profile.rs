use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_types::{Role, Shift, User, UserId, Verification, WorkplaceBinding};

/// Shifts listed on a worker profile.
pub const PROFILE_SHIFT_LIMIT: usize = 10;
/// Verifications listed on a customer profile.
pub const PROFILE_VERIFICATION_LIMIT: usize = 20;

/// Public view of a user. Biometric digests are left out.
#[derive(Clone, Debug, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub role: Role,
    pub name: String,
    pub contact: String,
    pub platform_links: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub details: RoleDetails,
}

/// Role-specific part of a profile.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleDetails {
    Worker {
        binding: Option<WorkplaceBinding>,
        active_shift: Option<Shift>,
        recent_shifts: Vec<Shift>,
        total_shifts: usize,
        verification_count: usize,
    },
    Customer {
        recent_verifications: Vec<Verification>,
        total_verifications: usize,
    },
    Supervisor {
        managed_workers: usize,
        active_shifts: usize,
    },
    Officer {
        access_level: String,
    },
}

impl Profile {
    pub(crate) fn new(user: User, details: RoleDetails) -> Self {
        Self {
            id: user.id,
            role: user.role,
            name: user.name,
            contact: user.contact,
            platform_links: user.platform_links,
            created_at: user.created_at,
            details,
        }
    }
}
