use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::extractor::require_role;

use crate::models::{
    AccountId, AvailabilityQuery, DoctorProfileId, SubmitAvailabilityRequest, SubmitProfileRequest,
};
use crate::state::DoctorCellState;

// ==============================================================================
// DOCTOR PROFILE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn submit_profile(
    State(state): State<DoctorCellState>,
    Extension(user): Extension<User>,
    WithRejection(Json(request), _): WithRejection<Json<SubmitProfileRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let profile = state
        .doctor_service()
        .submit_profile(&AccountId(user.id.clone()), request)
        .await?;

    Ok(Json(json!(profile)))
}

#[axum::debug_handler]
pub async fn get_my_profile(
    State(state): State<DoctorCellState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let profile = state
        .doctor_service()
        .get_my_profile(&AccountId(user.id.clone()))
        .await?;

    Ok(Json(json!(profile)))
}

#[axum::debug_handler]
pub async fn get_profile_public(
    State(state): State<DoctorCellState>,
    WithRejection(Path(profile_id), _): WithRejection<Path<Uuid>, AppError>,
) -> Result<Json<Value>, AppError> {
    let profile = state
        .doctor_service()
        .get_profile(DoctorProfileId(profile_id))
        .await?;

    Ok(Json(json!(profile)))
}

// ==============================================================================
// AVAILABILITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn submit_availability(
    State(state): State<DoctorCellState>,
    Extension(user): Extension<User>,
    WithRejection(Json(request), _): WithRejection<Json<SubmitAvailabilityRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let day = state
        .availability_service()
        .submit_day(&AccountId(user.id.clone()), request)
        .await?;

    Ok(Json(json!(day)))
}

#[axum::debug_handler]
pub async fn get_availability_public(
    State(state): State<DoctorCellState>,
    WithRejection(Path(doctor_id), _): WithRejection<Path<Uuid>, AppError>,
    WithRejection(Query(query), _): WithRejection<Query<AvailabilityQuery>, AppError>,
) -> Result<Json<Value>, AppError> {
    let days = state
        .availability_service()
        .get_availability(DoctorProfileId(doctor_id), query.date.as_deref())
        .await?;

    Ok(Json(json!(days)))
}
