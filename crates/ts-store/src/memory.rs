use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::records::RecordSet;
use crate::traits::RecordSetAccess;

/// In-memory record store.
///
/// Holds the whole record set behind one `RwLock`. Every rule in
/// [`RecordSet`] checks before it writes, so a rejected mutation leaves the
/// set untouched.
pub struct InMemoryRecordStore {
    records: RwLock<RecordSet>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(RecordSet::new()),
        }
    }

    /// Start from an existing record set. Indexes are rebuilt.
    pub fn from_records(mut records: RecordSet) -> StoreResult<Self> {
        records.reindex()?;
        Ok(Self {
            records: RwLock::new(records),
        })
    }

    /// Copy of the current record set.
    pub fn snapshot(&self) -> StoreResult<RecordSet> {
        self.with_set(RecordSet::clone)
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSetAccess for InMemoryRecordStore {
    const BACKEND: &'static str = "memory";

    fn with_set<T>(&self, f: impl FnOnce(&RecordSet) -> T) -> StoreResult<T> {
        let set = self.records.read().map_err(|_| StoreError::poisoned())?;
        Ok(f(&set))
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut RecordSet) -> StoreResult<T>) -> StoreResult<T> {
        let mut set = self.records.write().map_err(|_| StoreError::poisoned())?;
        f(&mut set)
    }
}

impl std::fmt::Debug for InMemoryRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (users, shifts) = self
            .with_set(|s| (s.user_count(), s.shift_count()))
            .unwrap_or_default();
        f.debug_struct("InMemoryRecordStore")
            .field("users", &users)
            .field("shifts", &shifts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::RecordStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Arc;
    use ts_types::{RiskTier, Role, Shift, ShiftId, User, UserId, Verification, WorkplaceBinding};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn shift(worker: UserId, token: &str) -> Shift {
        Shift {
            id: ShiftId::new(),
            worker_id: worker,
            start: t0(),
            end: None,
            token: token.into(),
            risk_tier: RiskTier::Yellow,
            employer: "CafeX".into(),
            supervisor_id: UserId::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Users and bindings
    // -----------------------------------------------------------------------

    #[test]
    fn user_lookup_by_id_and_contact() {
        let store = InMemoryRecordStore::new();
        let user = User::new(Role::Customer, "Ben", "5550002222", t0());
        store.insert_user(&user).unwrap();

        assert_eq!(store.find_user_by_id(&user.id).unwrap(), Some(user.clone()));
        assert_eq!(store.find_user_by_contact("5550002222").unwrap(), Some(user));
        assert_eq!(store.find_user_by_contact("nope").unwrap(), None);
        assert_eq!(store.find_user_by_id(&UserId::new()).unwrap(), None);
        assert_eq!(store.all_users().unwrap().len(), 1);
    }

    #[test]
    fn binding_lookup() {
        let store = InMemoryRecordStore::new();
        let worker = UserId::new();
        let sup = UserId::new();
        store
            .insert_binding(&WorkplaceBinding::new(worker, "CafeX", "zone_a", sup, t0()))
            .unwrap();
        assert_eq!(store.find_active_binding(&worker).unwrap().unwrap().zone, "zone_a");
        assert!(store.find_active_binding(&sup).unwrap().is_none());
        assert_eq!(store.bindings_by_supervisor(&sup).unwrap().len(), 1);
    }

    // -----------------------------------------------------------------------
    // Shifts
    // -----------------------------------------------------------------------

    #[test]
    fn shift_lifecycle() {
        let store = InMemoryRecordStore::new();
        let worker = UserId::new();
        let s = shift(worker, "tok");
        store.insert_shift(&s).unwrap();

        assert_eq!(store.find_shift_by_token("tok").unwrap().unwrap().id, s.id);
        assert_eq!(store.find_active_shift(&worker).unwrap().unwrap().id, s.id);
        assert_eq!(store.all_active_shifts().unwrap().len(), 1);

        let ended = store.update_shift_end(&s.id, t0() + Duration::hours(3)).unwrap();
        assert!(!ended.is_active());
        assert!(store.find_active_shift(&worker).unwrap().is_none());
        assert!(store.all_active_shifts().unwrap().is_empty());
        // ended shifts stay resolvable by token
        assert!(store.find_shift_by_token("tok").unwrap().is_some());
        assert_eq!(store.shifts_by_worker(&worker, 20).unwrap().len(), 1);
    }

    #[test]
    fn concurrent_inserts_leave_one_active_shift() {
        let store = Arc::new(InMemoryRecordStore::new());
        let worker = UserId::new();
        let ok = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|i| {
                    let store = Arc::clone(&store);
                    scope.spawn(move || store.insert_shift(&shift(worker, &format!("tok-{i}"))).is_ok())
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|ok| *ok)
                .count()
        });
        assert_eq!(ok, 1);
        assert_eq!(store.all_active_shifts().unwrap().len(), 1);
    }

    // -----------------------------------------------------------------------
    // Verifications
    // -----------------------------------------------------------------------

    #[test]
    fn verification_queries() {
        let store = InMemoryRecordStore::new();
        let worker = UserId::new();
        let customer = UserId::new();
        for i in 0..5 {
            store
                .insert_verification(
                    &Verification::new(worker, customer, t0() + Duration::minutes(i))
                        .with_location(Some("gate 2".into())),
                )
                .unwrap();
        }
        assert_eq!(store.recent_verifications(3).unwrap().len(), 3);
        assert_eq!(store.verifications_by_worker(&worker).unwrap().len(), 5);
        let mine = store.verifications_by_requester(&customer, 2).unwrap();
        assert_eq!(mine[0].time, t0() + Duration::minutes(4));
        assert_eq!(mine[0].location.as_deref(), Some("gate 2"));
    }

    #[test]
    fn poisoned_lock_reports_unavailable() {
        let store = Arc::new(InMemoryRecordStore::new());
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.records.write().unwrap();
            panic!("poison");
        })
        .join();

        let err = store.find_user_by_contact("x").unwrap_err();
        assert_eq!(err.kind(), ts_types::ErrorKind::StoreUnavailable);
    }

    #[test]
    fn usable_as_trait_object() {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
        assert_eq!(store.backend(), "memory");
    }
}
