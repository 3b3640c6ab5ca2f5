use axum::http::StatusCode;

use shared_models::error::AppError;

use crate::models::{AvailabilityError, DoctorError};

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        let message = err.to_string();
        match err {
            AvailabilityError::ProfileNotFound => {
                AppError::rejected(StatusCode::NOT_FOUND, "profile_not_found", message)
            }
            AvailabilityError::InvalidDate(_) => {
                AppError::rejected(StatusCode::BAD_REQUEST, "invalid_date", message)
            }
            AvailabilityError::EmptySlots => {
                AppError::rejected(StatusCode::BAD_REQUEST, "empty_slots", message)
            }
            AvailabilityError::InvalidSlotTimes { .. } => {
                AppError::rejected(StatusCode::BAD_REQUEST, "invalid_slot_times", message)
            }
            AvailabilityError::SlotOutsideDate { .. } => {
                AppError::rejected(StatusCode::BAD_REQUEST, "slot_outside_date", message)
            }
            AvailabilityError::BookedStatusNotAllowed { .. } => {
                AppError::rejected(StatusCode::BAD_REQUEST, "booked_status_not_allowed", message)
            }
            AvailabilityError::OverlappingSlots { .. } => {
                AppError::rejected(StatusCode::BAD_REQUEST, "overlapping_slots", message)
            }
            AvailabilityError::BookedSlotConflict { .. } => {
                AppError::rejected(StatusCode::CONFLICT, "booked_slot_conflict", message)
            }
            AvailabilityError::ConcurrentModification => {
                AppError::rejected(StatusCode::CONFLICT, "concurrent_modification", message)
            }
            AvailabilityError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound("Doctor profile not found".to_string()),
            DoctorError::ValidationError(msg) => AppError::ValidationError(msg),
            DoctorError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
