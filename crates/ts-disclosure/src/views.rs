//! Projections returned by the disclosure service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_types::{RiskTier, Role, ShiftId, UserId, Verification};

/// What a customer learns from a scan.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VerificationResult {
    pub verified: bool,
    pub worker_name: Option<String>,
    /// Face digest reference. Never an image.
    pub worker_photo: Option<String>,
    pub employer: Option<String>,
    pub shift_active: bool,
    pub risk_tier: Option<RiskTier>,
    pub message: String,
}

impl VerificationResult {
    pub(crate) fn denied(message: impl Into<String>) -> Self {
        Self {
            verified: false,
            worker_name: None,
            worker_photo: None,
            employer: None,
            shift_active: false,
            risk_tier: None,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IdentityBlock {
    pub id: UserId,
    pub name: String,
    pub contact: String,
    pub role: Role,
    pub registered_at: DateTime<Utc>,
    pub platform_links: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorkplaceBlock {
    pub employer: String,
    pub zone: Option<String>,
    pub bound_at: Option<DateTime<Utc>>,
    pub binding_active: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShiftBlock {
    pub active: bool,
    pub shift_id: ShiftId,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    /// Hours since start, only while the shift is active.
    pub duration_hours: Option<f64>,
}

/// What an officer learns from a scan.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OfficerScanResult {
    pub verified: bool,
    pub identity: Option<IdentityBlock>,
    pub workplace: Option<WorkplaceBlock>,
    pub shift: Option<ShiftBlock>,
    pub risk_tier: Option<RiskTier>,
    pub supervisor_name: Option<String>,
    pub message: String,
}

impl OfficerScanResult {
    pub(crate) fn denied(message: impl Into<String>) -> Self {
        Self {
            verified: false,
            identity: None,
            workplace: None,
            shift: None,
            risk_tier: None,
            supervisor_name: None,
            message: message.into(),
        }
    }
}

/// A verification record with the worker's display name.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VerificationEvent {
    pub time: DateTime<Utc>,
    pub worker_id: UserId,
    pub worker_name: String,
    pub requester_id: UserId,
    pub location: Option<String>,
}

impl VerificationEvent {
    pub(crate) fn new(verification: Verification, worker_name: String) -> Self {
        Self {
            time: verification.time,
            worker_id: verification.worker_id,
            worker_name,
            requester_id: verification.requester_id,
            location: verification.location,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActiveWorker {
    pub worker_id: UserId,
    pub worker_name: String,
    pub worker_contact: String,
    pub employer: String,
    pub shift_start: DateTime<Utc>,
    pub risk_tier: RiskTier,
    pub shift_duration_hours: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CustomerHistory {
    pub customer_id: UserId,
    pub verifications: Vec<VerificationEvent>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorkerStats {
    pub worker_id: UserId,
    pub worker_name: String,
    pub total_verifications: usize,
    pub recent_verifications: Vec<Verification>,
}
