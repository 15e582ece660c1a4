use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use ts_store::RecordStore;
use ts_types::{Clock, Role, User, UserId, WorkplaceBinding};

use crate::digest::BiometricDigest;
use crate::error::{RegistryError, RegistryResult};
use crate::profile::{Profile, RoleDetails, PROFILE_SHIFT_LIMIT, PROFILE_VERIFICATION_LIMIT};

/// Shortest accepted contact handle.
pub const MIN_CONTACT_LEN: usize = 10;
/// Shortest accepted display name, after trimming.
pub const MIN_NAME_LEN: usize = 2;

/// Input for [`Registry::register`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub role: Role,
    pub name: String,
    #[serde(alias = "phone")]
    pub contact: String,
    /// Raw face capture. Only its digest is kept.
    #[serde(default)]
    pub face_image: Option<String>,
    /// Raw identity document capture. Only its digest is kept.
    #[serde(default)]
    pub id_image: Option<String>,
    #[serde(default)]
    pub platform_link: Option<String>,
}

/// Input for [`Registry::bind_worker`].
#[derive(Clone, Debug)]
pub struct BindRequest {
    pub worker_id: UserId,
    pub employer: String,
    pub zone: String,
    pub supervisor_id: UserId,
}

/// A new binding with both parties' display names.
#[derive(Clone, Debug, Serialize)]
pub struct BindingView {
    pub binding: WorkplaceBinding,
    pub worker_name: String,
    pub supervisor_name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct BindingEntry {
    #[serde(flatten)]
    pub binding: WorkplaceBinding,
    pub worker_name: String,
}

/// Workers bound under one supervisor.
#[derive(Clone, Debug, Serialize)]
pub struct SupervisorBindings {
    pub supervisor_id: UserId,
    pub supervisor_name: String,
    pub bindings: Vec<BindingEntry>,
}

/// Registration, binding, and profile reads.
pub struct Registry {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl Registry {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Register a user. Contact handles are unique; biometric captures are
    /// reduced to digests before anything is stored.
    pub fn register(&self, request: RegisterRequest) -> RegistryResult<User> {
        let contact = request.contact.trim();
        if contact.chars().count() < MIN_CONTACT_LEN {
            return Err(RegistryError::InvalidInput(
                "valid contact handle is required".into(),
            ));
        }
        let name = request.name.trim();
        if name.chars().count() < MIN_NAME_LEN {
            return Err(RegistryError::InvalidInput("valid name is required".into()));
        }
        if self.store.find_user_by_contact(contact)?.is_some() {
            return Err(RegistryError::Conflict("contact already registered".into()));
        }

        let mut user = User::new(request.role, name, contact, self.clock.now()).with_hashes(
            BiometricDigest::FACE.digest(request.face_image.as_deref()),
            BiometricDigest::ID_DOCUMENT.digest(request.id_image.as_deref()),
        );
        if let Some(link) = request.platform_link.filter(|l| !l.trim().is_empty()) {
            user = user.with_platform_link(link.trim());
        }

        self.store.insert_user(&user)?;
        info!(user = %user.id, role = %user.role, "registered user");
        Ok(user)
    }

    /// The user holding `contact`, if any.
    pub fn contact_registered(&self, contact: &str) -> RegistryResult<Option<User>> {
        Ok(self.store.find_user_by_contact(contact.trim())?)
    }

    pub fn user(&self, id: &UserId) -> RegistryResult<User> {
        self.store
            .find_user_by_id(id)?
            .ok_or_else(|| RegistryError::NotFound("user".into()))
    }

    /// A user's public profile with role-specific details.
    pub fn profile(&self, id: &UserId) -> RegistryResult<Profile> {
        let user = self.user(id)?;
        let details = match user.role {
            Role::Worker => {
                let history = self.store.shifts_by_worker(id, usize::MAX)?;
                RoleDetails::Worker {
                    binding: self.store.find_active_binding(id)?,
                    active_shift: self.store.find_active_shift(id)?,
                    total_shifts: history.len(),
                    recent_shifts: history.into_iter().take(PROFILE_SHIFT_LIMIT).collect(),
                    verification_count: self.store.verifications_by_worker(id)?.len(),
                }
            }
            Role::Customer => {
                let all = self.store.verifications_by_requester(id, usize::MAX)?;
                RoleDetails::Customer {
                    total_verifications: all.len(),
                    recent_verifications: all
                        .into_iter()
                        .take(PROFILE_VERIFICATION_LIMIT)
                        .collect(),
                }
            }
            Role::Supervisor => RoleDetails::Supervisor {
                managed_workers: self.store.bindings_by_supervisor(id)?.len(),
                active_shifts: self
                    .store
                    .all_active_shifts()?
                    .iter()
                    .filter(|s| s.supervisor_id == *id)
                    .count(),
            },
            Role::Officer => RoleDetails::Officer {
                access_level: "standard".into(),
            },
        };
        Ok(Profile::new(user, details))
    }

    /// Bind a worker to an employer and zone under a supervisor.
    pub fn bind_worker(&self, request: BindRequest) -> RegistryResult<BindingView> {
        let employer = request.employer.trim();
        let zone = request.zone.trim();
        if employer.is_empty() || zone.is_empty() {
            return Err(RegistryError::InvalidInput(
                "employer and zone are required".into(),
            ));
        }

        let worker = self.user_with_role(&request.worker_id, Role::Worker, "worker")?;
        let supervisor =
            self.user_with_role(&request.supervisor_id, Role::Supervisor, "supervisor")?;

        if let Some(existing) = self.store.find_active_binding(&worker.id)? {
            return Err(RegistryError::Conflict(format!(
                "worker already bound to workplace: {}",
                existing.employer
            )));
        }

        let binding =
            WorkplaceBinding::new(worker.id, employer, zone, supervisor.id, self.clock.now());
        self.store.insert_binding(&binding)?;
        info!(
            worker = %worker.id,
            supervisor = %supervisor.id,
            employer = %binding.employer,
            "bound worker to workplace"
        );
        Ok(BindingView {
            binding,
            worker_name: worker.name,
            supervisor_name: supervisor.name,
        })
    }

    pub fn bindings_for_supervisor(&self, supervisor_id: &UserId) -> RegistryResult<SupervisorBindings> {
        let supervisor = self
            .store
            .find_user_by_id(supervisor_id)?
            .ok_or_else(|| RegistryError::NotFound("supervisor".into()))?;
        let bindings = self
            .store
            .bindings_by_supervisor(supervisor_id)?
            .into_iter()
            .map(|binding| {
                let worker_name = self
                    .store
                    .find_user_by_id(&binding.worker_id)?
                    .map_or_else(|| "Unknown".to_string(), |w| w.name);
                Ok(BindingEntry {
                    binding,
                    worker_name,
                })
            })
            .collect::<RegistryResult<Vec<_>>>()?;
        Ok(SupervisorBindings {
            supervisor_id: supervisor.id,
            supervisor_name: supervisor.name,
            bindings,
        })
    }

    pub fn binding_for_worker(&self, worker_id: &UserId) -> RegistryResult<Option<WorkplaceBinding>> {
        Ok(self.store.find_active_binding(worker_id)?)
    }

    fn user_with_role(&self, id: &UserId, role: Role, label: &str) -> RegistryResult<User> {
        let user = self
            .store
            .find_user_by_id(id)?
            .ok_or_else(|| RegistryError::NotFound(label.into()))?;
        if !user.has_role(role) {
            return Err(RegistryError::Forbidden(format!("user is not a {label}")));
        }
        Ok(user)
    }
}
