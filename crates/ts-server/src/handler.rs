use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use ts_disclosure::{
    OfficerScanResult, VerificationResult, WorkerStats, DEFAULT_EVENT_LIMIT, DEFAULT_HISTORY_LIMIT,
};
use ts_registry::{BindRequest, RegisterRequest};
use ts_shift::{ActiveShift, StartedShift};
use ts_types::{ShiftId, UserId};

use crate::error::ServerResult;
use crate::state::AppState;

/// Shifts listed by `GET /api/profile/:id/shifts` without a limit.
const DEFAULT_SHIFT_LIMIT: usize = 20;

type JsonBody<T> = Result<Json<T>, JsonRejection>;

fn user_id(raw: &str) -> ServerResult<UserId> {
    Ok(raw.parse()?)
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Service info
// ---------------------------------------------------------------------------

pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "name": "trustshift",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "store": state.store_backend,
    }))
}

// ---------------------------------------------------------------------------
// Registration and profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub uuid: UserId,
    pub role: String,
    pub verification_status: &'static str,
    pub message: String,
}

pub async fn register_handler(
    State(state): State<AppState>,
    body: JsonBody<RegisterRequest>,
) -> ServerResult<Json<RegisterResponse>> {
    let Json(request) = body?;
    let user = state.run(move |s| s.registry.register(request)).await?;
    Ok(Json(RegisterResponse {
        uuid: user.id,
        role: user.role.to_string(),
        verification_status: "pending",
        message: format!("Registration successful as {}", user.role),
    }))
}

pub async fn check_contact_handler(
    State(state): State<AppState>,
    Path(contact): Path<String>,
) -> ServerResult<Json<Value>> {
    let user = state
        .run(move |s| s.registry.contact_registered(&contact))
        .await?;
    Ok(Json(json!({
        "registered": user.is_some(),
        "role": user.as_ref().map(|u| u.role),
        "uuid": user.as_ref().map(|u| u.id),
    })))
}

pub async fn profile_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<ts_registry::Profile>> {
    let id = user_id(&id)?;
    let profile = state.run(move |s| s.registry.profile(&id)).await?;
    Ok(Json(profile))
}

pub async fn profile_shifts_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ServerResult<Json<Value>> {
    let id = user_id(&id)?;
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_SHIFT_LIMIT);
    let shifts = state.run(move |s| s.shifts.shift_history(&id, limit)).await?;
    Ok(Json(json!({
        "uuid": id,
        "count": shifts.len(),
        "shifts": shifts,
    })))
}

// ---------------------------------------------------------------------------
// Workplace bindings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct BindBody {
    #[serde(alias = "worker_uuid")]
    pub worker_id: UserId,
    #[serde(alias = "workplace")]
    pub employer: String,
    #[serde(alias = "location")]
    pub zone: String,
    pub supervisor_id: UserId,
}

pub async fn bind_handler(
    State(state): State<AppState>,
    body: JsonBody<BindBody>,
) -> ServerResult<Json<Value>> {
    let Json(body) = body?;
    let request = BindRequest {
        worker_id: body.worker_id,
        employer: body.employer,
        zone: body.zone,
        supervisor_id: body.supervisor_id,
    };
    let view = state.run(move |s| s.registry.bind_worker(request)).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Worker {} bound to {}", view.worker_name, view.binding.employer),
        "binding": view,
    })))
}

pub async fn supervisor_bindings_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    let id = user_id(&id)?;
    let listing = state
        .run(move |s| s.registry.bindings_for_supervisor(&id))
        .await?;
    Ok(Json(json!({
        "supervisor_id": listing.supervisor_id,
        "supervisor_name": listing.supervisor_name,
        "count": listing.bindings.len(),
        "bindings": listing.bindings,
    })))
}

pub async fn worker_binding_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    let id = user_id(&id)?;
    let binding = state.run(move |s| s.registry.binding_for_worker(&id)).await?;
    Ok(Json(json!({
        "worker_uuid": id,
        "has_binding": binding.is_some(),
        "binding": binding,
    })))
}

// ---------------------------------------------------------------------------
// Shifts
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct StartBody {
    #[serde(alias = "worker_uuid")]
    pub worker_id: UserId,
    pub supervisor_id: UserId,
    #[serde(alias = "workplace")]
    pub employer: String,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub success: bool,
    pub message: String,
    pub shift: StartedShift,
}

pub async fn start_shift_handler(
    State(state): State<AppState>,
    body: JsonBody<StartBody>,
) -> ServerResult<Json<StartResponse>> {
    let Json(body) = body?;
    let shift = state
        .run(move |s| {
            s.shifts
                .start_shift(&body.worker_id, &body.supervisor_id, &body.employer)
        })
        .await?;
    Ok(Json(StartResponse {
        success: true,
        message: format!("Shift started for {}", shift.worker_name),
        shift,
    }))
}

#[derive(Debug, Deserialize)]
pub struct EndBody {
    pub shift_id: ShiftId,
    pub supervisor_id: UserId,
}

pub async fn end_shift_handler(
    State(state): State<AppState>,
    body: JsonBody<EndBody>,
) -> ServerResult<Json<Value>> {
    let Json(body) = body?;
    let shift = state
        .run(move |s| s.shifts.end_shift(&body.shift_id, &body.supervisor_id))
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Shift ended successfully",
        "shift_id": shift.id,
        "end_time": shift.end,
    })))
}

/// Polled by worker clients; `active: false` carries no other fields.
#[derive(Debug, Serialize)]
pub struct ShiftStatusResponse {
    pub active: bool,
    #[serde(flatten)]
    pub shift: Option<ActiveShift>,
}

pub async fn shift_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<ShiftStatusResponse>> {
    let id = user_id(&id)?;
    let status = state.run(move |s| s.shifts.status(&id)).await?;
    Ok(Json(ShiftStatusResponse {
        active: status.is_active(),
        shift: status.active().cloned(),
    }))
}

// ---------------------------------------------------------------------------
// Customer verification
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VerifyBody {
    #[serde(alias = "stt")]
    pub token: String,
    #[serde(alias = "customer_uuid")]
    pub customer_id: UserId,
    #[serde(default)]
    pub location: Option<String>,
}

pub async fn verify_handler(
    State(state): State<AppState>,
    body: JsonBody<VerifyBody>,
) -> ServerResult<Json<VerificationResult>> {
    let Json(body) = body?;
    let result = state
        .run(move |s| s.disclosure.verify(&body.token, &body.customer_id, body.location))
        .await?;
    Ok(Json(result))
}

pub async fn verify_history_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ServerResult<Json<Value>> {
    let id = user_id(&id)?;
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let history = state
        .run(move |s| s.disclosure.verification_history(&id, limit))
        .await?;
    Ok(Json(json!({
        "customer_uuid": history.customer_id,
        "count": history.verifications.len(),
        "verifications": history.verifications,
    })))
}

pub async fn verify_stats_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<WorkerStats>> {
    let id = user_id(&id)?;
    let stats = state
        .run(move |s| s.disclosure.worker_verification_stats(&id))
        .await?;
    Ok(Json(stats))
}

// ---------------------------------------------------------------------------
// Officer views
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ScanBody {
    #[serde(alias = "stt")]
    pub token: String,
    #[serde(alias = "officer_uuid")]
    pub officer_id: UserId,
}

pub async fn police_scan_handler(
    State(state): State<AppState>,
    body: JsonBody<ScanBody>,
) -> ServerResult<Json<OfficerScanResult>> {
    let Json(body) = body?;
    let result = state
        .run(move |s| s.disclosure.officer_scan(&body.token, &body.officer_id))
        .await?;
    Ok(Json(result))
}

pub async fn police_events_handler(
    State(state): State<AppState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ServerResult<Json<Value>> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_EVENT_LIMIT);
    let events = state.run(move |s| s.disclosure.recent_events(limit)).await?;
    Ok(Json(json!({
        "count": events.len(),
        "events": events,
    })))
}

pub async fn active_workers_handler(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    let workers = state.run(|s| s.disclosure.active_workers()).await?;
    Ok(Json(json!({
        "count": workers.len(),
        "active_workers": workers,
    })))
}
