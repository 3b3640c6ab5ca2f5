use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use doctor_cell::models::{AccountId, DoctorProfileId};
use shared_database::StoreError;
use video_conferencing_cell::{VideoConferencingError, VideoRoom};

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(pub Uuid);

impl AppointmentId {
    pub fn new() -> Self {
        AppointmentId(Uuid::new_v4())
    }
}

impl Default for AppointmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Video,
    InPerson,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Requested,
    Accepted,
    Rejected,
    Completed,
    Canceled,
}

impl AppointmentStatus {
    /// Statuses reachable from `self` in one step.
    pub fn next_statuses(self) -> &'static [AppointmentStatus] {
        match self {
            AppointmentStatus::Requested => &[AppointmentStatus::Accepted, AppointmentStatus::Rejected],
            AppointmentStatus::Accepted => &[AppointmentStatus::Completed, AppointmentStatus::Canceled],
            AppointmentStatus::Rejected | AppointmentStatus::Completed | AppointmentStatus::Canceled => &[],
        }
    }

    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        self.next_statuses().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.next_statuses().is_empty()
    }

    /// Entering this status gives the booked slot back to the doctor's day.
    pub fn releases_slot(self) -> bool {
        matches!(self, AppointmentStatus::Rejected | AppointmentStatus::Canceled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Requested => write!(f, "requested"),
            AppointmentStatus::Accepted => write!(f, "accepted"),
            AppointmentStatus::Rejected => write!(f, "rejected"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Canceled => write!(f, "canceled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_account_id: AccountId,
    pub doctor_id: DoctorProfileId,
    pub hospital_id: Option<Uuid>,
    pub modality: Modality,
    #[serde(rename = "start_time")]
    pub start: DateTime<Utc>,
    #[serde(rename = "end_time")]
    pub end: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    /// Set when a video appointment is accepted.
    pub video_room: Option<VideoRoom>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn requested(
        patient_account_id: AccountId,
        request: &RequestAppointmentRequest,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AppointmentId::new(),
            patient_account_id,
            doctor_id: request.doctor_id,
            hospital_id: request.hospital_id,
            modality: request.modality,
            start: request.start,
            end: request.end,
            status: AppointmentStatus::Requested,
            notes: request.notes.clone(),
            video_room: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_ready_for_video(&self) -> bool {
        self.status == AppointmentStatus::Accepted
            && self.modality == Modality::Video
            && self.video_room.is_some()
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestAppointmentRequest {
    pub doctor_id: DoctorProfileId,
    #[serde(default)]
    pub hospital_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub modality: Modality,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("End time must be after start time")]
    InvalidTimeRange,

    #[error("Doctor has no availability on {0}")]
    NoAvailabilityForDate(chrono::NaiveDate),

    #[error("No open slot covers the requested time")]
    SlotNotAvailable,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error("Cannot move appointment from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Appointment is not an accepted video appointment with a room")]
    NotReadyForVideo,

    #[error("Video room opens at {opens_at} and closes at {closes_at}")]
    OutsideJoinWindow {
        opens_at: DateTime<Utc>,
        closes_at: DateTime<Utc>,
    },

    #[error("Appointment or availability was modified concurrently; reload and retry")]
    ConcurrentModification,

    #[error("Video provider error: {0}")]
    Video(#[from] VideoConferencingError),

    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for AppointmentError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict => AppointmentError::ConcurrentModification,
            other => AppointmentError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transition_table() {
        use AppointmentStatus::*;

        assert!(Requested.can_transition_to(Accepted));
        assert!(Requested.can_transition_to(Rejected));
        assert!(Accepted.can_transition_to(Completed));
        assert!(Accepted.can_transition_to(Canceled));

        assert!(!Requested.can_transition_to(Completed));
        assert!(!Requested.can_transition_to(Canceled));
        assert!(!Accepted.can_transition_to(Rejected));
        assert!(!Accepted.can_transition_to(Accepted));
        assert!(!Accepted.can_transition_to(Requested));
        assert!(!Requested.can_transition_to(Requested));

        for terminal in [Rejected, Completed, Canceled] {
            assert!(terminal.is_terminal());
            for next in [Requested, Accepted, Rejected, Completed, Canceled] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_request_payload_uses_camel_case_and_type() {
        let doctor_id = Uuid::new_v4();
        let request: RequestAppointmentRequest = serde_json::from_value(json!({
            "doctorId": doctor_id,
            "type": "in_person",
            "start": "2030-05-01T10:00:00Z",
            "end": "2030-05-01T10:30:00Z"
        }))
        .unwrap();

        assert_eq!(request.doctor_id, DoctorProfileId(doctor_id));
        assert_eq!(request.modality, Modality::InPerson);
        assert!(request.hospital_id.is_none());
        assert!(request.notes.is_none());
    }

    #[test]
    fn test_appointment_row_shape() {
        let request = RequestAppointmentRequest {
            doctor_id: DoctorProfileId::new(),
            hospital_id: None,
            modality: Modality::Video,
            start: "2030-05-01T10:00:00Z".parse().unwrap(),
            end: "2030-05-01T10:30:00Z".parse().unwrap(),
            notes: Some("follow-up".to_string()),
        };
        let appointment = Appointment::requested(AccountId::from("patient-1"), &request);
        let row = serde_json::to_value(&appointment).unwrap();

        assert_eq!(row["status"], "requested");
        assert_eq!(row["modality"], "video");
        assert_eq!(row["start_time"], "2030-05-01T10:00:00Z");
        assert_eq!(row["patient_account_id"], "patient-1");
        assert!(!appointment.is_ready_for_video());
    }
}
