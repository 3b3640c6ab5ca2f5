use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::state::AppointmentCellState;

/// Mounted under `/appointments`. Every route requires a bearer token.
pub fn appointment_routes(state: AppointmentCellState) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::request_appointment))
        .route("/mine", get(handlers::list_my_appointments))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/status", patch(handlers::update_appointment_status))
        .route("/{appointment_id}/video-token", post(handlers::issue_video_token))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
