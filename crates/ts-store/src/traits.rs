use chrono::{DateTime, Utc};
use ts_types::{Shift, ShiftId, User, UserId, Verification, WorkplaceBinding};

use crate::error::StoreResult;
use crate::records::RecordSet;

/// Per-entity persistence used by every TrustShift service.
///
/// All implementations must satisfy these invariants:
/// - Contact handles are unique across users.
/// - A worker has at most one active binding and at most one shift with
///   `end == None`. Inserts that would break either fail with `Conflict`,
///   so the rule holds even if a caller skips its own check.
/// - Shift ids and tokens are unique. The end timestamp is the only field
///   ever updated, and only once.
/// - Verification records are append-only.
/// - Lookups return `Ok(None)` for absent records and `Err` only when the
///   backend itself failed.
pub trait RecordStore: Send + Sync {
    /// Short backend name for health reporting.
    fn backend(&self) -> &'static str;

    // Users

    fn find_user_by_id(&self, id: &UserId) -> StoreResult<Option<User>>;

    fn find_user_by_contact(&self, contact: &str) -> StoreResult<Option<User>>;

    fn insert_user(&self, user: &User) -> StoreResult<()>;

    fn all_users(&self) -> StoreResult<Vec<User>>;

    // Bindings

    fn insert_binding(&self, binding: &WorkplaceBinding) -> StoreResult<()>;

    fn find_active_binding(&self, worker_id: &UserId) -> StoreResult<Option<WorkplaceBinding>>;

    /// Active bindings managed by a supervisor, newest first.
    fn bindings_by_supervisor(&self, supervisor_id: &UserId) -> StoreResult<Vec<WorkplaceBinding>>;

    // Shifts

    fn find_shift_by_token(&self, token: &str) -> StoreResult<Option<Shift>>;

    fn find_shift_by_id(&self, id: &ShiftId) -> StoreResult<Option<Shift>>;

    fn find_active_shift(&self, worker_id: &UserId) -> StoreResult<Option<Shift>>;

    fn insert_shift(&self, shift: &Shift) -> StoreResult<()>;

    /// Set the end timestamp of an active shift and return the updated
    /// record. `NotFound` for an unknown id, `Conflict` if already ended.
    fn update_shift_end(&self, id: &ShiftId, end: DateTime<Utc>) -> StoreResult<Shift>;

    /// A worker's shifts, most recent start first.
    fn shifts_by_worker(&self, worker_id: &UserId, limit: usize) -> StoreResult<Vec<Shift>>;

    fn all_active_shifts(&self) -> StoreResult<Vec<Shift>>;

    // Verifications

    fn insert_verification(&self, verification: &Verification) -> StoreResult<()>;

    /// Most recent verifications across all workers, newest first.
    fn recent_verifications(&self, limit: usize) -> StoreResult<Vec<Verification>>;

    /// Every verification of one worker, newest first.
    fn verifications_by_worker(&self, worker_id: &UserId) -> StoreResult<Vec<Verification>>;

    /// Verifications requested by one user, newest first.
    fn verifications_by_requester(
        &self,
        requester_id: &UserId,
        limit: usize,
    ) -> StoreResult<Vec<Verification>>;
}

/// Backends that hold a whole [`RecordSet`] and differ only in how a
/// mutation is committed. [`RecordStore`] is implemented once on top.
pub trait RecordSetAccess: Send + Sync {
    const BACKEND: &'static str;

    fn with_set<T>(&self, f: impl FnOnce(&RecordSet) -> T) -> StoreResult<T>;

    /// Apply `f` and commit. If `f` or the commit fails, the set is left
    /// as it was.
    fn mutate<T>(&self, f: impl FnOnce(&mut RecordSet) -> StoreResult<T>) -> StoreResult<T>;
}

impl<B: RecordSetAccess> RecordStore for B {
    fn backend(&self) -> &'static str {
        B::BACKEND
    }

    fn find_user_by_id(&self, id: &UserId) -> StoreResult<Option<User>> {
        self.with_set(|set| set.user(id).cloned())
    }

    fn find_user_by_contact(&self, contact: &str) -> StoreResult<Option<User>> {
        self.with_set(|set| set.user_by_contact(contact).cloned())
    }

    fn insert_user(&self, user: &User) -> StoreResult<()> {
        self.mutate(|set| set.insert_user(user.clone()))
    }

    fn all_users(&self) -> StoreResult<Vec<User>> {
        self.with_set(RecordSet::users)
    }

    fn insert_binding(&self, binding: &WorkplaceBinding) -> StoreResult<()> {
        self.mutate(|set| set.insert_binding(binding.clone()))
    }

    fn find_active_binding(&self, worker_id: &UserId) -> StoreResult<Option<WorkplaceBinding>> {
        self.with_set(|set| set.active_binding(worker_id).cloned())
    }

    fn bindings_by_supervisor(&self, supervisor_id: &UserId) -> StoreResult<Vec<WorkplaceBinding>> {
        self.with_set(|set| set.bindings_by_supervisor(supervisor_id))
    }

    fn find_shift_by_token(&self, token: &str) -> StoreResult<Option<Shift>> {
        self.with_set(|set| set.shift_by_token(token).cloned())
    }

    fn find_shift_by_id(&self, id: &ShiftId) -> StoreResult<Option<Shift>> {
        self.with_set(|set| set.shift(id).cloned())
    }

    fn find_active_shift(&self, worker_id: &UserId) -> StoreResult<Option<Shift>> {
        self.with_set(|set| set.active_shift(worker_id).cloned())
    }

    fn insert_shift(&self, shift: &Shift) -> StoreResult<()> {
        self.mutate(|set| set.insert_shift(shift.clone()))
    }

    fn update_shift_end(&self, id: &ShiftId, end: DateTime<Utc>) -> StoreResult<Shift> {
        self.mutate(|set| set.end_shift(id, end))
    }

    fn shifts_by_worker(&self, worker_id: &UserId, limit: usize) -> StoreResult<Vec<Shift>> {
        self.with_set(|set| set.shifts_by_worker(worker_id, limit))
    }

    fn all_active_shifts(&self) -> StoreResult<Vec<Shift>> {
        self.with_set(RecordSet::active_shifts)
    }

    fn insert_verification(&self, verification: &Verification) -> StoreResult<()> {
        self.mutate(|set| {
            set.insert_verification(verification.clone());
            Ok(())
        })
    }

    fn recent_verifications(&self, limit: usize) -> StoreResult<Vec<Verification>> {
        self.with_set(|set| set.recent_verifications(limit))
    }

    fn verifications_by_worker(&self, worker_id: &UserId) -> StoreResult<Vec<Verification>> {
        self.with_set(|set| set.verifications_by_worker(worker_id))
    }

    fn verifications_by_requester(
        &self,
        requester_id: &UserId,
        limit: usize,
    ) -> StoreResult<Vec<Verification>> {
        self.with_set(|set| set.verifications_by_requester(requester_id, limit))
    }
}
