use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use ts_risk::RiskEngine;
use ts_store::{RecordStore, StoreError};
use ts_token::TokenCodec;
use ts_types::{Clock, RiskTier, Role, Shift, ShiftId, User, UserId};

use crate::error::{ShiftError, ShiftResult};

/// Complaint tracking does not exist yet; every start scores with zero.
const COMPLAINT_COUNT: u32 = 0;

/// Result of a successful [`ShiftManager::start_shift`].
#[derive(Clone, Debug, Serialize)]
pub struct StartedShift {
    pub shift_id: ShiftId,
    pub worker_id: UserId,
    pub worker_name: String,
    pub employer: String,
    pub supervisor_id: UserId,
    pub start: DateTime<Utc>,
    pub token: String,
    pub risk_tier: RiskTier,
    pub risk_score: u8,
}

/// The parts of an active shift a worker's client polls for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActiveShift {
    pub shift_id: ShiftId,
    pub token: String,
    pub risk_tier: RiskTier,
    pub start: DateTime<Utc>,
    pub employer: String,
}

/// Answer to [`ShiftManager::status`]. No active shift is a normal answer,
/// not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShiftStatus {
    Inactive,
    Active(ActiveShift),
}

impl ShiftStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    pub fn active(&self) -> Option<&ActiveShift> {
        match self {
            Self::Active(shift) => Some(shift),
            Self::Inactive => None,
        }
    }
}

impl From<Shift> for ActiveShift {
    fn from(shift: Shift) -> Self {
        Self {
            shift_id: shift.id,
            token: shift.token,
            risk_tier: shift.risk_tier,
            start: shift.start,
            employer: shift.employer,
        }
    }
}

/// Starts, ends, and reports shifts.
pub struct ShiftManager {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    risk: RiskEngine,
    codec: TokenCodec,
    worker_locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl ShiftManager {
    pub fn new(
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        risk: RiskEngine,
        codec: TokenCodec,
    ) -> Self {
        Self {
            store,
            clock,
            risk,
            codec,
            worker_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    fn worker_lock(&self, worker_id: &UserId) -> Arc<Mutex<()>> {
        let mut locks = self
            .worker_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(*worker_id).or_default())
    }

    /// Drop the worker's entry once no other caller holds or waits on it.
    /// Clones are only handed out under the map lock, so the count is exact.
    fn release_worker_lock(&self, worker_id: &UserId, lock: Arc<Mutex<()>>) {
        let mut locks = self
            .worker_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // One reference in the map, one here.
        if Arc::strong_count(&lock) == 2 {
            locks.remove(worker_id);
        }
    }

    /// Start a shift for a worker at an employer.
    ///
    /// Preconditions are checked in order and the first failure wins:
    /// worker exists with role worker, supervisor exists with role
    /// supervisor, the worker's active binding names this employer, and the
    /// worker has no active shift.
    pub fn start_shift(
        &self,
        worker_id: &UserId,
        supervisor_id: &UserId,
        employer: &str,
    ) -> ShiftResult<StartedShift> {
        let lock = self.worker_lock(worker_id);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.start_locked(worker_id, supervisor_id, employer)
        };
        self.release_worker_lock(worker_id, lock);
        result
    }

    fn start_locked(
        &self,
        worker_id: &UserId,
        supervisor_id: &UserId,
        employer: &str,
    ) -> ShiftResult<StartedShift> {
        let worker = self.user_with_role(worker_id, Role::Worker, "Worker")?;
        self.user_with_role(supervisor_id, Role::Supervisor, "Supervisor")?;

        let binding = self.store.find_active_binding(worker_id)?.ok_or_else(|| {
            ShiftError::NotFound("Worker is not bound to any workplace. Bind worker first.".into())
        })?;
        if binding.employer != employer {
            return Err(ShiftError::InvalidInput(format!(
                "Worker is bound to {}, not {employer}",
                binding.employer
            )));
        }

        if self.store.find_active_shift(worker_id)?.is_some() {
            return Err(ShiftError::Conflict("Worker already has an active shift".into()));
        }

        let now = self.clock.now();
        let assessment =
            self.risk
                .assess_worker(&worker, now, Some(binding.zone.as_str()), COMPLAINT_COUNT);
        let shift_id = ShiftId::new();
        let token = self
            .codec
            .encode_shift(shift_id, worker.id, employer, now, now)?;

        let shift = Shift {
            id: shift_id,
            worker_id: worker.id,
            start: now,
            end: None,
            token,
            risk_tier: assessment.tier,
            employer: employer.to_string(),
            supervisor_id: *supervisor_id,
        };
        self.store.insert_shift(&shift).map_err(|e| match e {
            StoreError::Conflict(_) => {
                ShiftError::Conflict("Worker already has an active shift".into())
            }
            other => ShiftError::Store(other),
        })?;

        info!(
            shift = %shift.id,
            worker = %worker.id,
            employer = %shift.employer,
            tier = %shift.risk_tier,
            score = assessment.score,
            "shift started"
        );
        Ok(StartedShift {
            shift_id: shift.id,
            worker_id: worker.id,
            worker_name: worker.name,
            employer: shift.employer,
            supervisor_id: shift.supervisor_id,
            start: shift.start,
            token: shift.token,
            risk_tier: shift.risk_tier,
            risk_score: assessment.score,
        })
    }

    /// End a shift. Only the supervisor who started it may end it, and only
    /// once.
    pub fn end_shift(&self, shift_id: &ShiftId, supervisor_id: &UserId) -> ShiftResult<Shift> {
        let shift = self
            .store
            .find_shift_by_id(shift_id)?
            .ok_or_else(|| ShiftError::NotFound("Shift not found".into()))?;
        if !shift.is_active() {
            return Err(ShiftError::Conflict("Shift has already ended".into()));
        }
        if shift.supervisor_id != *supervisor_id {
            warn!(shift = %shift_id, requester = %supervisor_id, "end refused: not the shift's supervisor");
            return Err(ShiftError::Forbidden(
                "Only the supervising supervisor can end this shift".into(),
            ));
        }

        let ended = self
            .store
            .update_shift_end(shift_id, self.clock.now())
            .map_err(|e| match e {
                StoreError::Conflict(_) => ShiftError::Conflict("Shift has already ended".into()),
                other => ShiftError::Store(other),
            })?;
        info!(shift = %shift_id, worker = %ended.worker_id, "shift ended");
        Ok(ended)
    }

    /// Current shift status for a worker. Read-only.
    pub fn status(&self, worker_id: &UserId) -> ShiftResult<ShiftStatus> {
        Ok(match self.store.find_active_shift(worker_id)? {
            Some(shift) => ShiftStatus::Active(shift.into()),
            None => ShiftStatus::Inactive,
        })
    }

    /// A worker's shifts, most recent first.
    pub fn shift_history(&self, worker_id: &UserId, limit: usize) -> ShiftResult<Vec<Shift>> {
        Ok(self.store.shifts_by_worker(worker_id, limit)?)
    }

    fn user_with_role(&self, id: &UserId, role: Role, label: &str) -> ShiftResult<User> {
        let user = self
            .store
            .find_user_by_id(id)?
            .ok_or_else(|| ShiftError::NotFound(format!("{label} not found")))?;
        if !user.has_role(role) {
            return Err(ShiftError::Forbidden(format!(
                "User is not a {}",
                label.to_lowercase()
            )));
        }
        Ok(user)
    }
}
