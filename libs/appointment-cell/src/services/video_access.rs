use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;

use doctor_cell::models::AccountId;
use doctor_cell::services::IdentityResolver;
use shared_models::auth::Role;
use video_conferencing_cell::{AccessPrincipal, VideoAccessCredential, VideoRoomProvider};

use crate::models::{AppointmentError, AppointmentId};
use crate::store::AppointmentStore;

pub struct VideoAccessService {
    identity: IdentityResolver,
    appointments: Arc<dyn AppointmentStore>,
    video: Arc<dyn VideoRoomProvider>,
    join_window: Duration,
}

impl VideoAccessService {
    pub fn new(
        identity: IdentityResolver,
        appointments: Arc<dyn AppointmentStore>,
        video: Arc<dyn VideoRoomProvider>,
        join_window_minutes: i64,
    ) -> Self {
        Self {
            identity,
            appointments,
            video,
            join_window: Duration::minutes(join_window_minutes),
        }
    }

    /// Mints a join credential for the appointment's patient or doctor.
    ///
    /// The room opens `join_window` before the start and closes at the end.
    pub async fn issue_access(
        &self,
        account: &AccountId,
        role: Role,
        appointment_id: AppointmentId,
        now: DateTime<Utc>,
    ) -> Result<VideoAccessCredential, AppointmentError> {
        let appointment = self
            .appointments
            .get(appointment_id)
            .await?
            .ok_or(AppointmentError::AppointmentNotFound)?;

        let is_patient = &appointment.patient_account_id == account;
        let is_doctor = !is_patient
            && role == Role::Doctor
            && self.identity.resolve_profile(account).await? == Some(appointment.doctor_id);

        if !is_patient && !is_doctor {
            return Err(AppointmentError::Forbidden(
                "Only the appointment's patient or doctor can join its room".to_string(),
            ));
        }

        let room = match (&appointment.video_room, appointment.is_ready_for_video()) {
            (Some(room), true) => room,
            _ => return Err(AppointmentError::NotReadyForVideo),
        };

        let opens_at = appointment.start - self.join_window;
        let closes_at = appointment.end;
        if now < opens_at || now > closes_at {
            return Err(AppointmentError::OutsideJoinWindow { opens_at, closes_at });
        }

        let principal = AccessPrincipal {
            account_id: account.to_string(),
            role,
        };
        let credential = self.video.mint_access(room, &principal).await?;

        info!(
            "Issued {} access to room {} for {} on appointment {}",
            credential.provider, credential.room_id, account, appointment_id
        );
        Ok(credential)
    }
}
