use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use folio_core::error::{panic_response, route_not_found};
use folio_core::health::{health, healthz};
use folio_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::submission::{
    create_submission, delete_submission, get_submission, list_submissions, submission_stats,
    update_submission_status,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health))
        .route("/healthz", get(healthz))
        // Submissions
        .route("/submissions", post(create_submission))
        .route("/submissions", get(list_submissions))
        .route("/submissions/stats", get(submission_stats))
        .route("/submissions/{id}", get(get_submission))
        .route("/submissions/{id}", patch(update_submission_status))
        .route("/submissions/{id}", delete(delete_submission))
        // Legacy contact form endpoint
        .route("/send-email", post(create_submission))
        .fallback(route_not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
}
