use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use doctor_cell::models::AccountId;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::extractor::require_role;

use crate::models::{AppointmentId, RequestAppointmentRequest, UpdateStatusRequest};
use crate::state::AppointmentCellState;

const ANY_ROLE: &[Role] = &[Role::Patient, Role::Doctor, Role::Hospital, Role::Admin];

#[axum::debug_handler]
pub async fn request_appointment(
    State(state): State<AppointmentCellState>,
    Extension(user): Extension<User>,
    WithRejection(Json(request), _): WithRejection<Json<RequestAppointmentRequest>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    require_role(&user, &[Role::Patient])?;

    let appointment = state
        .reservation_service()
        .request_appointment(&AccountId(user.id.clone()), request)
        .await?;

    Ok((StatusCode::CREATED, Json(json!(appointment))))
}

#[axum::debug_handler]
pub async fn list_my_appointments(
    State(state): State<AppointmentCellState>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let role = require_role(&user, ANY_ROLE)?;

    let appointments = state
        .query_service()
        .list_mine(&AccountId(user.id.clone()), role)
        .await?;

    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppointmentCellState>,
    WithRejection(Path(appointment_id), _): WithRejection<Path<Uuid>, AppError>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let role = require_role(&user, ANY_ROLE)?;

    let appointment = state
        .query_service()
        .get_appointment(&AccountId(user.id.clone()), role, AppointmentId(appointment_id))
        .await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<AppointmentCellState>,
    WithRejection(Path(appointment_id), _): WithRejection<Path<Uuid>, AppError>,
    Extension(user): Extension<User>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateStatusRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Doctor])?;

    let appointment = state
        .lifecycle_service()
        .set_status(&AccountId(user.id.clone()), AppointmentId(appointment_id), request.status)
        .await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn issue_video_token(
    State(state): State<AppointmentCellState>,
    WithRejection(Path(appointment_id), _): WithRejection<Path<Uuid>, AppError>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let role = require_role(&user, &[Role::Patient, Role::Doctor])?;

    let credential = state
        .video_access_service()
        .issue_access(&AccountId(user.id.clone()), role, AppointmentId(appointment_id), Utc::now())
        .await?;

    Ok(Json(json!(credential)))
}
