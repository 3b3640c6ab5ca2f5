use axum::http::StatusCode;

use shared_models::error::AppError;

use crate::models::AppointmentError;

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        let message = err.to_string();
        match err {
            AppointmentError::InvalidTimeRange => {
                AppError::rejected(StatusCode::BAD_REQUEST, "invalid_time_range", message)
            }
            AppointmentError::NoAvailabilityForDate(_) => {
                AppError::rejected(StatusCode::CONFLICT, "no_availability_for_date", message)
            }
            AppointmentError::SlotNotAvailable => {
                AppError::rejected(StatusCode::CONFLICT, "slot_not_available", message)
            }
            AppointmentError::AppointmentNotFound => {
                AppError::rejected(StatusCode::NOT_FOUND, "appointment_not_found", message)
            }
            AppointmentError::Forbidden(msg) => AppError::Forbidden(msg),
            AppointmentError::InvalidTransition { .. } => {
                AppError::rejected(StatusCode::CONFLICT, "invalid_transition", message)
            }
            AppointmentError::NotReadyForVideo => {
                AppError::rejected(StatusCode::BAD_REQUEST, "not_ready_for_video", message)
            }
            AppointmentError::OutsideJoinWindow { .. } => {
                AppError::rejected(StatusCode::BAD_REQUEST, "outside_join_window", message)
            }
            AppointmentError::ConcurrentModification => {
                AppError::rejected(StatusCode::CONFLICT, "concurrent_modification", message)
            }
            AppointmentError::Video(e) => AppError::ExternalService(e.to_string()),
            AppointmentError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
