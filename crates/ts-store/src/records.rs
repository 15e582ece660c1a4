//! The record set shared by every backend.
//!
//! Uniqueness rules live here, so both backends enforce them identically.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_types::{Shift, ShiftId, User, UserId, Verification, WorkplaceBinding};

use crate::error::{StoreError, StoreResult};

/// All TrustShift records plus lookup indexes.
///
/// Only the records are serialized; indexes are rebuilt by
/// [`RecordSet::reindex`] after loading.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecordSet {
    users: HashMap<UserId, User>,
    bindings: Vec<WorkplaceBinding>,
    shifts: HashMap<ShiftId, Shift>,
    verifications: Vec<Verification>,

    #[serde(skip)]
    contacts: HashMap<String, UserId>,
    #[serde(skip)]
    tokens: HashMap<String, ShiftId>,
    #[serde(skip)]
    active_shifts: HashMap<UserId, ShiftId>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild lookup indexes from the records, checking the uniqueness
    /// rules along the way.
    pub fn reindex(&mut self) -> StoreResult<()> {
        self.contacts.clear();
        self.tokens.clear();
        self.active_shifts.clear();
        for user in self.users.values() {
            if self.contacts.insert(user.contact.clone(), user.id).is_some() {
                return Err(StoreError::Conflict(format!("duplicate contact {}", user.contact)));
            }
        }
        for shift in self.shifts.values() {
            if self.tokens.insert(shift.token.clone(), shift.id).is_some() {
                return Err(StoreError::Conflict(format!("duplicate token on shift {}", shift.id)));
            }
            if shift.is_active() && self.active_shifts.insert(shift.worker_id, shift.id).is_some() {
                return Err(StoreError::Conflict(format!(
                    "worker {} has more than one active shift",
                    shift.worker_id
                )));
            }
        }
        Ok(())
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn shift_count(&self) -> usize {
        self.shifts.len()
    }

    // Users

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    pub fn user_by_contact(&self, contact: &str) -> Option<&User> {
        self.contacts.get(contact).and_then(|id| self.users.get(id))
    }

    pub fn insert_user(&mut self, user: User) -> StoreResult<()> {
        if self.contacts.contains_key(&user.contact) {
            return Err(StoreError::Conflict(format!("contact {} already registered", user.contact)));
        }
        if self.users.contains_key(&user.id) {
            return Err(StoreError::Conflict(format!("user {} already exists", user.id)));
        }
        self.contacts.insert(user.contact.clone(), user.id);
        self.users.insert(user.id, user);
        Ok(())
    }

    pub fn users(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        users
    }

    // Bindings

    pub fn active_binding(&self, worker_id: &UserId) -> Option<&WorkplaceBinding> {
        self.bindings
            .iter()
            .find(|b| b.active && b.worker_id == *worker_id)
    }

    pub fn insert_binding(&mut self, binding: WorkplaceBinding) -> StoreResult<()> {
        if binding.active && self.active_binding(&binding.worker_id).is_some() {
            return Err(StoreError::Conflict(format!(
                "worker {} already has an active binding",
                binding.worker_id
            )));
        }
        self.bindings.push(binding);
        Ok(())
    }

    pub fn bindings_by_supervisor(&self, supervisor_id: &UserId) -> Vec<WorkplaceBinding> {
        self.bindings
            .iter()
            .rev()
            .filter(|b| b.active && b.supervisor_id == *supervisor_id)
            .cloned()
            .collect()
    }

    // Shifts

    pub fn shift(&self, id: &ShiftId) -> Option<&Shift> {
        self.shifts.get(id)
    }

    pub fn shift_by_token(&self, token: &str) -> Option<&Shift> {
        self.tokens.get(token).and_then(|id| self.shifts.get(id))
    }

    pub fn active_shift(&self, worker_id: &UserId) -> Option<&Shift> {
        self.active_shifts
            .get(worker_id)
            .and_then(|id| self.shifts.get(id))
    }

    pub fn insert_shift(&mut self, shift: Shift) -> StoreResult<()> {
        if self.shifts.contains_key(&shift.id) {
            return Err(StoreError::Conflict(format!("shift {} already exists", shift.id)));
        }
        if self.tokens.contains_key(&shift.token) {
            return Err(StoreError::Conflict("token already issued".into()));
        }
        if shift.is_active() && self.active_shifts.contains_key(&shift.worker_id) {
            return Err(StoreError::Conflict(format!(
                "worker {} already has an active shift",
                shift.worker_id
            )));
        }
        self.tokens.insert(shift.token.clone(), shift.id);
        if shift.is_active() {
            self.active_shifts.insert(shift.worker_id, shift.id);
        }
        self.shifts.insert(shift.id, shift);
        Ok(())
    }

    pub fn end_shift(&mut self, id: &ShiftId, end: DateTime<Utc>) -> StoreResult<Shift> {
        let shift = self
            .shifts
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("shift {id}")))?;
        if shift.end.is_some() {
            return Err(StoreError::Conflict(format!("shift {id} already ended")));
        }
        shift.end = Some(end);
        let ended = shift.clone();
        self.active_shifts.remove(&ended.worker_id);
        Ok(ended)
    }

    pub fn shifts_by_worker(&self, worker_id: &UserId, limit: usize) -> Vec<Shift> {
        let mut shifts: Vec<Shift> = self
            .shifts
            .values()
            .filter(|s| s.worker_id == *worker_id)
            .cloned()
            .collect();
        shifts.sort_by(|a, b| b.start.cmp(&a.start));
        shifts.truncate(limit);
        shifts
    }

    pub fn active_shifts(&self) -> Vec<Shift> {
        let mut shifts: Vec<Shift> = self
            .active_shifts
            .values()
            .filter_map(|id| self.shifts.get(id))
            .cloned()
            .collect();
        shifts.sort_by(|a, b| b.start.cmp(&a.start));
        shifts
    }

    // Verifications

    pub fn insert_verification(&mut self, verification: Verification) {
        self.verifications.push(verification);
    }

    /// Newest first; entries with equal timestamps keep reverse insertion
    /// order.
    fn verifications_where(
        &self,
        limit: usize,
        keep: impl Fn(&Verification) -> bool,
    ) -> Vec<Verification> {
        let mut out: Vec<Verification> = self
            .verifications
            .iter()
            .rev()
            .filter(|v| keep(v))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.time.cmp(&a.time));
        out.truncate(limit);
        out
    }

    pub fn recent_verifications(&self, limit: usize) -> Vec<Verification> {
        self.verifications_where(limit, |_| true)
    }

    pub fn verifications_by_worker(&self, worker_id: &UserId) -> Vec<Verification> {
        self.verifications_where(usize::MAX, |v| v.worker_id == *worker_id)
    }

    pub fn verifications_by_requester(&self, requester_id: &UserId, limit: usize) -> Vec<Verification> {
        self.verifications_where(limit, |v| v.requester_id == *requester_id)
    }
}
