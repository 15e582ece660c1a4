use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all TrustShift endpoints.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/register", post(handler::register_handler))
        .route("/register/check/:contact", get(handler::check_contact_handler))
        .route("/profile/:id", get(handler::profile_handler))
        .route("/profile/:id/shifts", get(handler::profile_shifts_handler))
        .route("/workplace/bind", post(handler::bind_handler))
        .route("/workplace/supervisor/:id", get(handler::supervisor_bindings_handler))
        .route("/workplace/worker/:id", get(handler::worker_binding_handler))
        // Paths used by earlier clients.
        .route("/workplace/bindings/:id", get(handler::supervisor_bindings_handler))
        .route("/workplace/binding/:id", get(handler::worker_binding_handler))
        .route("/shift/start", post(handler::start_shift_handler))
        .route("/shift/end", post(handler::end_shift_handler))
        .route("/shift/status/:id", get(handler::shift_status_handler))
        .route("/verify/worker", post(handler::verify_handler))
        .route("/verify/history/:id", get(handler::verify_history_handler))
        .route("/verify/stats/:id", get(handler::verify_stats_handler))
        .route("/police/scan", post(handler::police_scan_handler))
        .route("/police/events", get(handler::police_events_handler))
        .route("/police/active-workers", get(handler::active_workers_handler));

    Router::new()
        .route("/", get(handler::root_handler))
        .route("/health", get(handler::health_handler))
        .nest("/api", api)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
