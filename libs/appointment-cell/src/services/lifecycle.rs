use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use doctor_cell::models::AccountId;
use doctor_cell::services::IdentityResolver;
use doctor_cell::store::AvailabilityStore;
use video_conferencing_cell::VideoRoomProvider;

use crate::models::{Appointment, AppointmentError, AppointmentId, AppointmentStatus, Modality};
use crate::services::slots::release_slot;
use crate::store::AppointmentStore;

/// Owns the appointment state machine. Only the appointment's doctor may move it.
pub struct LifecycleService {
    identity: IdentityResolver,
    appointments: Arc<dyn AppointmentStore>,
    availability: Arc<dyn AvailabilityStore>,
    video: Arc<dyn VideoRoomProvider>,
    max_attempts: u32,
}

impl LifecycleService {
    pub fn new(
        identity: IdentityResolver,
        appointments: Arc<dyn AppointmentStore>,
        availability: Arc<dyn AvailabilityStore>,
        video: Arc<dyn VideoRoomProvider>,
        max_attempts: u32,
    ) -> Self {
        Self {
            identity,
            appointments,
            availability,
            video,
            max_attempts,
        }
    }

    pub async fn set_status(
        &self,
        doctor_account: &AccountId,
        appointment_id: AppointmentId,
        next: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .appointments
            .get(appointment_id)
            .await?
            .ok_or(AppointmentError::AppointmentNotFound)?;

        let owner = self.identity.resolve_profile(doctor_account).await?;
        if owner != Some(appointment.doctor_id) {
            warn!(
                "Account {} tried to change appointment {} it does not own",
                doctor_account, appointment_id
            );
            return Err(AppointmentError::Forbidden(
                "Only the appointment's doctor can change its status".to_string(),
            ));
        }

        let previous = appointment.status;
        if !previous.can_transition_to(next) {
            return Err(AppointmentError::InvalidTransition { from: previous, to: next });
        }

        let mut updated = appointment;
        updated.status = next;
        updated.updated_at = Utc::now();

        if next == AppointmentStatus::Accepted
            && updated.modality == Modality::Video
            && updated.video_room.is_none()
        {
            let room = self.video.provision(appointment_id.0).await?;
            debug!("Attached {} room {} to appointment {}", room.provider, room.room_id, appointment_id);
            updated.video_room = Some(room);
        }

        let saved = self.appointments.update_if_status(updated, previous).await?;
        info!("Appointment {} moved from {} to {}", appointment_id, previous, next);

        if next.releases_slot() {
            // The status change already stands; a failed release only leaves the slot booked.
            if let Err(e) = release_slot(
                &self.availability,
                saved.doctor_id,
                saved.start,
                saved.end,
                self.max_attempts,
            )
            .await
            {
                warn!("Could not reopen slot for appointment {}: {}", appointment_id, e);
            }
        }

        Ok(saved)
    }
}
