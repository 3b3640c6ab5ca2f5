use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::state::DoctorCellState;

/// Mounted under `/doctors`.
pub fn doctor_routes(state: DoctorCellState) -> Router {
    let public_routes = Router::new()
        .route("/{profile_id}", get(handlers::get_profile_public));

    let protected_routes = Router::new()
        .route("/profile", put(handlers::submit_profile))
        .route("/profile/me", get(handlers::get_my_profile))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

/// Mounted under `/availability`.
pub fn availability_routes(state: DoctorCellState) -> Router {
    let public_routes = Router::new()
        .route("/{doctor_id}", get(handlers::get_availability_public));

    let protected_routes = Router::new()
        .route("/", post(handlers::submit_availability))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
