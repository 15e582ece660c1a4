use std::sync::Arc;

use tracing::{debug, info, warn};
use ts_store::RecordStore;
use ts_token::TokenCodec;
use ts_types::{elapsed_hours, Clock, Role, User, UserId, Verification};

use crate::error::{DisclosureError, DisclosureResult};
use crate::views::{
    ActiveWorker, CustomerHistory, IdentityBlock, OfficerScanResult, ShiftBlock,
    VerificationEvent, VerificationResult, WorkerStats, WorkplaceBlock,
};

/// Events returned by [`DisclosureService::recent_events`] when no limit is
/// given.
pub const DEFAULT_EVENT_LIMIT: usize = 50;
/// Verifications returned by [`DisclosureService::verification_history`]
/// when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;
/// Verifications listed in [`WorkerStats`].
pub const STATS_RECENT_LIMIT: usize = 10;

const UNKNOWN: &str = "Unknown";

const MSG_NOT_FOUND: &str = "QR code not found or invalid";
const MSG_SHIFT_ENDED: &str = "Worker's shift has ended";
const MSG_WORKER_MISSING: &str = "Worker not found";
const MSG_VERIFIED: &str = "Worker verified successfully";
const MSG_OFFICER_VERIFIED: &str = "Worker verified - All details validated";
const MSG_NOT_OFFICER: &str = "Access denied: User is not authorized law enforcement";

/// Resolves trust tokens to role-appropriate views.
pub struct DisclosureService {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    codec: TokenCodec,
}

impl DisclosureService {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>, codec: TokenCodec) -> Self {
        Self { store, clock, codec }
    }

    /// Customer scan of a worker's token.
    ///
    /// Once the token resolves to a shift a verification record is written,
    /// whether or not the shift is still active. A failed write is logged
    /// and does not affect the answer.
    pub fn verify(
        &self,
        token: &str,
        customer_id: &UserId,
        location: Option<String>,
    ) -> DisclosureResult<VerificationResult> {
        self.requester(customer_id, Role::Customer, "Customer", "User is not a customer")?;

        if let Err(e) = self.codec.decode(token) {
            debug!(requester = %customer_id, error = %e, "customer scanned undecodable token");
            return Ok(VerificationResult::denied(format!("Invalid QR code: {e}")));
        }
        let Some(shift) = self.store.find_shift_by_token(token.trim())? else {
            return Ok(VerificationResult::denied(MSG_NOT_FOUND));
        };

        let record =
            Verification::new(shift.worker_id, *customer_id, self.clock.now()).with_location(location);
        if let Err(e) = self.store.insert_verification(&record) {
            warn!(worker = %shift.worker_id, requester = %customer_id, error = %e, "failed to record verification");
        }

        if !shift.is_active() {
            return Ok(VerificationResult::denied(MSG_SHIFT_ENDED));
        }
        let Some(worker) = self.store.find_user_by_id(&shift.worker_id)? else {
            return Ok(VerificationResult::denied(MSG_WORKER_MISSING));
        };

        info!(worker = %worker.id, requester = %customer_id, "worker verified by customer");
        Ok(VerificationResult {
            verified: true,
            worker_name: Some(worker.name),
            worker_photo: Some(worker.face_hash),
            employer: Some(shift.employer),
            shift_active: true,
            risk_tier: Some(shift.risk_tier),
            message: MSG_VERIFIED.into(),
        })
    }

    /// Officer scan of a worker's token. Reports ended shifts too, and
    /// writes no verification record.
    pub fn officer_scan(&self, token: &str, officer_id: &UserId) -> DisclosureResult<OfficerScanResult> {
        self.requester(officer_id, Role::Officer, "Officer", MSG_NOT_OFFICER)?;

        if let Err(e) = self.codec.decode(token) {
            debug!(requester = %officer_id, error = %e, "officer scanned undecodable token");
            return Ok(OfficerScanResult::denied(format!("Invalid QR code: {e}")));
        }
        let Some(shift) = self.store.find_shift_by_token(token.trim())? else {
            return Ok(OfficerScanResult::denied(MSG_NOT_FOUND));
        };
        let Some(worker) = self.store.find_user_by_id(&shift.worker_id)? else {
            return Ok(OfficerScanResult::denied(MSG_WORKER_MISSING));
        };

        let binding = self.store.find_active_binding(&worker.id)?;
        let supervisor_name = self.name_or_unknown(&shift.supervisor_id)?;
        let active = shift.is_active();
        let now = self.clock.now();

        info!(worker = %worker.id, requester = %officer_id, active, "worker scanned by officer");
        Ok(OfficerScanResult {
            verified: true,
            identity: Some(IdentityBlock {
                id: worker.id,
                name: worker.name,
                contact: worker.contact,
                role: worker.role,
                registered_at: worker.created_at,
                platform_links: worker.platform_links,
            }),
            workplace: Some(WorkplaceBlock {
                employer: shift.employer,
                zone: binding.as_ref().map(|b| b.zone.clone()),
                bound_at: binding.as_ref().map(|b| b.created_at),
                binding_active: binding.as_ref().is_some_and(|b| b.active),
            }),
            shift: Some(ShiftBlock {
                active,
                shift_id: shift.id,
                start: shift.start,
                end: shift.end,
                duration_hours: active.then(|| elapsed_hours(shift.start, now)),
            }),
            risk_tier: Some(shift.risk_tier),
            supervisor_name: Some(supervisor_name),
            message: MSG_OFFICER_VERIFIED.into(),
        })
    }

    /// Most recent verification records across all workers, newest first.
    pub fn recent_events(&self, limit: usize) -> DisclosureResult<Vec<VerificationEvent>> {
        self.store
            .recent_verifications(limit)?
            .into_iter()
            .map(|v| self.event(v))
            .collect()
    }

    /// Every active shift whose worker resolves, with elapsed hours.
    pub fn active_workers(&self) -> DisclosureResult<Vec<ActiveWorker>> {
        let now = self.clock.now();
        let mut out = Vec::new();
        for shift in self.store.all_active_shifts()? {
            let Some(worker) = self.store.find_user_by_id(&shift.worker_id)? else {
                continue;
            };
            out.push(ActiveWorker {
                worker_id: worker.id,
                worker_name: worker.name,
                worker_contact: worker.contact,
                employer: shift.employer,
                shift_start: shift.start,
                risk_tier: shift.risk_tier,
                shift_duration_hours: elapsed_hours(shift.start, now),
            });
        }
        Ok(out)
    }

    /// Verifications a customer has made, newest first.
    pub fn verification_history(
        &self,
        customer_id: &UserId,
        limit: usize,
    ) -> DisclosureResult<CustomerHistory> {
        let customer = self
            .store
            .find_user_by_id(customer_id)?
            .ok_or_else(|| DisclosureError::NotFound("Customer not found".into()))?;
        let verifications = self
            .store
            .verifications_by_requester(&customer.id, limit)?
            .into_iter()
            .map(|v| self.event(v))
            .collect::<DisclosureResult<Vec<_>>>()?;
        Ok(CustomerHistory {
            customer_id: customer.id,
            verifications,
        })
    }

    /// How often a worker has been verified, with the latest records.
    pub fn worker_verification_stats(&self, worker_id: &UserId) -> DisclosureResult<WorkerStats> {
        let worker = self
            .store
            .find_user_by_id(worker_id)?
            .ok_or_else(|| DisclosureError::NotFound(MSG_WORKER_MISSING.into()))?;
        let mut all = self.store.verifications_by_worker(&worker.id)?;
        let total = all.len();
        all.truncate(STATS_RECENT_LIMIT);
        Ok(WorkerStats {
            worker_id: worker.id,
            worker_name: worker.name,
            total_verifications: total,
            recent_verifications: all,
        })
    }

    fn requester(&self, id: &UserId, role: Role, label: &str, denial: &str) -> DisclosureResult<User> {
        let user = self
            .store
            .find_user_by_id(id)?
            .ok_or_else(|| DisclosureError::NotFound(format!("{label} not found")))?;
        if !user.has_role(role) {
            warn!(requester = %id, role = %user.role, wanted = %role, "disclosure refused");
            return Err(DisclosureError::Forbidden(denial.into()));
        }
        Ok(user)
    }

    fn name_or_unknown(&self, id: &UserId) -> DisclosureResult<String> {
        Ok(self
            .store
            .find_user_by_id(id)?
            .map_or_else(|| UNKNOWN.to_string(), |u| u.name))
    }

    fn event(&self, verification: Verification) -> DisclosureResult<VerificationEvent> {
        let name = self.name_or_unknown(&verification.worker_id)?;
        Ok(VerificationEvent::new(verification, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use ts_store::{InMemoryRecordStore, StoreError, StoreResult};
    use ts_types::{ErrorKind, ManualClock, RiskTier, Shift, ShiftId, WorkplaceBinding};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 3, 23, 0, 0).unwrap()
    }

    struct World {
        store: Arc<dyn RecordStore>,
        clock: Arc<ManualClock>,
        service: DisclosureService,
        worker: User,
        supervisor: User,
        customer: User,
        officer: User,
        shift: Shift,
    }

    fn world_with(store: Arc<dyn RecordStore>) -> World {
        let clock = Arc::new(ManualClock::new(t0()));
        let codec = TokenCodec::unkeyed();
        let worker = User::new(Role::Worker, "Asha", "5550001111", t0() - Duration::days(2))
            .with_hashes("facedigest", "iddigest")
            .with_platform_link("https://rides.example/asha");
        let supervisor = User::new(Role::Supervisor, "Sam", "5550002222", t0());
        let customer = User::new(Role::Customer, "Ben", "5550003333", t0());
        let officer = User::new(Role::Officer, "Kay", "5550004444", t0());
        for u in [&worker, &supervisor, &customer, &officer] {
            store.insert_user(u).unwrap();
        }
        store
            .insert_binding(&WorkplaceBinding::new(
                worker.id,
                "CafeX",
                "isolated_area",
                supervisor.id,
                t0() - Duration::days(1),
            ))
            .unwrap();
        let shift_id = ShiftId::new();
        let shift = Shift {
            id: shift_id,
            worker_id: worker.id,
            start: t0(),
            end: None,
            token: codec.encode_shift(shift_id, worker.id, "CafeX", t0(), t0()).unwrap(),
            risk_tier: RiskTier::Red,
            employer: "CafeX".into(),
            supervisor_id: supervisor.id,
        };
        store.insert_shift(&shift).unwrap();
        let service = DisclosureService::new(store.clone(), clock.clone(), codec);
        World {
            store,
            clock,
            service,
            worker,
            supervisor,
            customer,
            officer,
            shift,
        }
    }

    fn world() -> World {
        world_with(Arc::new(InMemoryRecordStore::new()))
    }

    // -----------------------------------------------------------------------
    // Customer verification
    // -----------------------------------------------------------------------

    #[test]
    fn verify_active_shift() {
        let w = world();
        let result = w
            .service
            .verify(&w.shift.token, &w.customer.id, Some("front door".into()))
            .unwrap();
        assert!(result.verified);
        assert!(result.shift_active);
        assert_eq!(result.worker_name.as_deref(), Some("Asha"));
        assert_eq!(result.worker_photo.as_deref(), Some("facedigest"));
        assert_eq!(result.employer.as_deref(), Some("CafeX"));
        assert_eq!(result.risk_tier, Some(RiskTier::Red));
        assert_eq!(result.message, MSG_VERIFIED);

        let log = w.store.recent_verifications(10).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].worker_id, w.worker.id);
        assert_eq!(log[0].requester_id, w.customer.id);
        assert_eq!(log[0].location.as_deref(), Some("front door"));
    }

    #[test]
    fn verify_ended_shift_denies_but_records() {
        let w = world();
        w.store.update_shift_end(&w.shift.id, t0() + Duration::hours(2)).unwrap();

        let result = w.service.verify(&w.shift.token, &w.customer.id, None).unwrap();
        assert!(!result.verified);
        assert!(!result.shift_active);
        assert_eq!(result.message, MSG_SHIFT_ENDED);
        assert!(result.worker_name.is_none());
        assert_eq!(w.store.verifications_by_worker(&w.worker.id).unwrap().len(), 1);
    }

    #[test]
    fn undecodable_and_unknown_tokens_are_denials() {
        let w = world();
        let bad = w.service.verify("%%%not-a-token", &w.customer.id, None).unwrap();
        assert!(!bad.verified);
        assert!(bad.message.starts_with("Invalid QR code: "));

        let foreign = TokenCodec::unkeyed()
            .encode_shift(ShiftId::new(), w.worker.id, "CafeX", t0(), t0())
            .unwrap();
        let missing = w.service.verify(&foreign, &w.customer.id, None).unwrap();
        assert!(!missing.verified);
        assert_eq!(missing.message, MSG_NOT_FOUND);

        assert!(w.store.recent_verifications(10).unwrap().is_empty());
    }

    #[test]
    fn verify_requires_a_customer() {
        let w = world();
        let err = w.service.verify(&w.shift.token, &w.officer.id, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = w.service.verify(&w.shift.token, &UserId::new(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(w.store.recent_verifications(10).unwrap().is_empty());
    }

    #[test]
    fn audit_failure_does_not_block_verification() {
        let w = world_with(Arc::new(AuditFailingStore::default()));
        let result = w.service.verify(&w.shift.token, &w.customer.id, None).unwrap();
        assert!(result.verified);
    }

    // -----------------------------------------------------------------------
    // Officer scan
    // -----------------------------------------------------------------------

    #[test]
    fn officer_scan_full_view() {
        let w = world();
        w.clock.advance(Duration::minutes(90));
        let scan = w.service.officer_scan(&w.shift.token, &w.officer.id).unwrap();
        assert!(scan.verified);
        assert_eq!(scan.message, MSG_OFFICER_VERIFIED);

        let identity = scan.identity.unwrap();
        assert_eq!(identity.id, w.worker.id);
        assert_eq!(identity.contact, "5550001111");
        assert_eq!(identity.platform_links, vec!["https://rides.example/asha"]);

        let workplace = scan.workplace.unwrap();
        assert_eq!(workplace.employer, "CafeX");
        assert_eq!(workplace.zone.as_deref(), Some("isolated_area"));
        assert!(workplace.binding_active);

        let shift = scan.shift.unwrap();
        assert!(shift.active);
        assert_eq!(shift.duration_hours, Some(1.5));
        assert_eq!(scan.supervisor_name.as_deref(), Some("Sam"));
        assert_eq!(scan.risk_tier, Some(RiskTier::Red));

        // officer scans leave no audit trail
        assert!(w.store.recent_verifications(10).unwrap().is_empty());
    }

    #[test]
    fn officer_sees_ended_shift() {
        let w = world();
        let end = t0() + Duration::hours(3);
        w.store.update_shift_end(&w.shift.id, end).unwrap();
        let scan = w.service.officer_scan(&w.shift.token, &w.officer.id).unwrap();
        assert!(scan.verified);
        let shift = scan.shift.unwrap();
        assert!(!shift.active);
        assert_eq!(shift.end, Some(end));
        assert_eq!(shift.duration_hours, None);
    }

    #[test]
    fn officer_scan_unknown_supervisor() {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
        let w = world_with(store.clone());
        let orphan_id = ShiftId::new();
        let other = User::new(Role::Worker, "Lee", "5550005555", t0());
        store.insert_user(&other).unwrap();
        let token = TokenCodec::unkeyed()
            .encode_shift(orphan_id, other.id, "Kiosk", t0(), t0())
            .unwrap();
        store
            .insert_shift(&Shift {
                id: orphan_id,
                worker_id: other.id,
                start: t0(),
                end: None,
                token: token.clone(),
                risk_tier: RiskTier::Green,
                employer: "Kiosk".into(),
                supervisor_id: UserId::new(),
            })
            .unwrap();

        let scan = w.service.officer_scan(&token, &w.officer.id).unwrap();
        assert_eq!(scan.supervisor_name.as_deref(), Some(UNKNOWN));
        let workplace = scan.workplace.unwrap();
        assert_eq!(workplace.zone, None);
        assert!(!workplace.binding_active);
    }

    #[test]
    fn officer_scan_requires_officer() {
        let w = world();
        let err = w.service.officer_scan(&w.shift.token, &w.customer.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.to_string(), MSG_NOT_OFFICER);
        let bad = w.service.officer_scan("", &w.officer.id).unwrap();
        assert!(!bad.verified);
    }

    // -----------------------------------------------------------------------
    // Situational reads
    // -----------------------------------------------------------------------

    #[test]
    fn events_and_active_workers() {
        let w = world();
        for minutes in 0..3 {
            w.clock.set(t0() + Duration::minutes(minutes));
            w.service.verify(&w.shift.token, &w.customer.id, None).unwrap();
        }
        w.store
            .insert_verification(&Verification::new(UserId::new(), w.customer.id, t0()))
            .unwrap();

        let events = w.service.recent_events(DEFAULT_EVENT_LIMIT).unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0].time, t0() + Duration::minutes(2));
        assert_eq!(events[0].worker_name, "Asha");
        assert!(events.iter().any(|e| e.worker_name == UNKNOWN));
        assert_eq!(w.service.recent_events(2).unwrap().len(), 2);

        w.clock.set(t0() + Duration::minutes(80));
        let active = w.service.active_workers().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].worker_name, "Asha");
        assert_eq!(active[0].shift_duration_hours, 1.33);
    }

    #[test]
    fn active_workers_skips_unresolved() {
        let w = world();
        w.store
            .insert_shift(&Shift {
                id: ShiftId::new(),
                worker_id: UserId::new(),
                start: t0(),
                end: None,
                token: "ghost".into(),
                risk_tier: RiskTier::Green,
                employer: "Nowhere".into(),
                supervisor_id: w.supervisor.id,
            })
            .unwrap();
        assert_eq!(w.service.active_workers().unwrap().len(), 1);
    }

    #[test]
    fn history_and_stats() {
        let w = world();
        for minutes in 0..12 {
            w.clock.set(t0() + Duration::minutes(minutes));
            w.service.verify(&w.shift.token, &w.customer.id, None).unwrap();
        }

        let history = w.service.verification_history(&w.customer.id, 5).unwrap();
        assert_eq!(history.verifications.len(), 5);
        assert_eq!(history.verifications[0].worker_name, "Asha");
        assert_eq!(
            w.service.verification_history(&UserId::new(), 5).unwrap_err().kind(),
            ErrorKind::NotFound
        );

        let stats = w.service.worker_verification_stats(&w.worker.id).unwrap();
        assert_eq!(stats.total_verifications, 12);
        assert_eq!(stats.recent_verifications.len(), STATS_RECENT_LIMIT);
        assert_eq!(stats.recent_verifications[0].time, t0() + Duration::minutes(11));
    }

    // -----------------------------------------------------------------------
    // Store that refuses audit writes
    // -----------------------------------------------------------------------

    #[derive(Default)]
    struct AuditFailingStore {
        inner: InMemoryRecordStore,
    }

    impl RecordStore for AuditFailingStore {
        fn backend(&self) -> &'static str {
            "audit-failing"
        }
        fn find_user_by_id(&self, id: &UserId) -> StoreResult<Option<User>> {
            self.inner.find_user_by_id(id)
        }
        fn find_user_by_contact(&self, contact: &str) -> StoreResult<Option<User>> {
            self.inner.find_user_by_contact(contact)
        }
        fn insert_user(&self, user: &User) -> StoreResult<()> {
            self.inner.insert_user(user)
        }
        fn all_users(&self) -> StoreResult<Vec<User>> {
            self.inner.all_users()
        }
        fn insert_binding(&self, binding: &WorkplaceBinding) -> StoreResult<()> {
            self.inner.insert_binding(binding)
        }
        fn find_active_binding(&self, worker_id: &UserId) -> StoreResult<Option<WorkplaceBinding>> {
            self.inner.find_active_binding(worker_id)
        }
        fn bindings_by_supervisor(&self, supervisor_id: &UserId) -> StoreResult<Vec<WorkplaceBinding>> {
            self.inner.bindings_by_supervisor(supervisor_id)
        }
        fn find_shift_by_token(&self, token: &str) -> StoreResult<Option<Shift>> {
            self.inner.find_shift_by_token(token)
        }
        fn find_shift_by_id(&self, id: &ShiftId) -> StoreResult<Option<Shift>> {
            self.inner.find_shift_by_id(id)
        }
        fn find_active_shift(&self, worker_id: &UserId) -> StoreResult<Option<Shift>> {
            self.inner.find_active_shift(worker_id)
        }
        fn insert_shift(&self, shift: &Shift) -> StoreResult<()> {
            self.inner.insert_shift(shift)
        }
        fn update_shift_end(&self, id: &ShiftId, end: DateTime<Utc>) -> StoreResult<Shift> {
            self.inner.update_shift_end(id, end)
        }
        fn shifts_by_worker(&self, worker_id: &UserId, limit: usize) -> StoreResult<Vec<Shift>> {
            self.inner.shifts_by_worker(worker_id, limit)
        }
        fn all_active_shifts(&self) -> StoreResult<Vec<Shift>> {
            self.inner.all_active_shifts()
        }
        fn insert_verification(&self, _: &Verification) -> StoreResult<()> {
            Err(StoreError::Unavailable("audit log offline".into()))
        }
        fn recent_verifications(&self, limit: usize) -> StoreResult<Vec<Verification>> {
            self.inner.recent_verifications(limit)
        }
        fn verifications_by_worker(&self, worker_id: &UserId) -> StoreResult<Vec<Verification>> {
            self.inner.verifications_by_worker(worker_id)
        }
        fn verifications_by_requester(
            &self,
            requester_id: &UserId,
            limit: usize,
        ) -> StoreResult<Vec<Verification>> {
            self.inner.verifications_by_requester(requester_id, limit)
        }
    }
}
