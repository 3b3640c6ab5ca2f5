use std::sync::Arc;

use tracing::{error, info, warn};

use doctor_cell::models::AccountId;
use doctor_cell::store::AvailabilityStore;

use crate::models::{Appointment, AppointmentError, RequestAppointmentRequest};
use crate::services::slots::{release_slot, reserve_slot, ReserveOutcome};
use crate::store::AppointmentStore;

/// Books a slot and records the appointment as one logical operation.
pub struct ReservationService {
    availability: Arc<dyn AvailabilityStore>,
    appointments: Arc<dyn AppointmentStore>,
    max_attempts: u32,
}

impl ReservationService {
    pub fn new(
        availability: Arc<dyn AvailabilityStore>,
        appointments: Arc<dyn AppointmentStore>,
        max_attempts: u32,
    ) -> Self {
        Self { availability, appointments, max_attempts }
    }

    pub async fn request_appointment(
        &self,
        patient: &AccountId,
        request: RequestAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        if request.end <= request.start {
            return Err(AppointmentError::InvalidTimeRange);
        }

        let date = request.start.date_naive();
        match reserve_slot(
            &self.availability,
            request.doctor_id,
            request.start,
            request.end,
            self.max_attempts,
        )
        .await?
        {
            ReserveOutcome::Reserved(_) => {}
            ReserveOutcome::NoDay => return Err(AppointmentError::NoAvailabilityForDate(date)),
            ReserveOutcome::NoOpenSlot => return Err(AppointmentError::SlotNotAvailable),
        }

        let appointment = Appointment::requested(patient.clone(), &request);
        match self.appointments.insert(appointment).await {
            Ok(created) => {
                info!(
                    "Appointment {} requested by {} with doctor {} at {}",
                    created.id, patient, created.doctor_id, created.start
                );
                Ok(created)
            }
            Err(e) => {
                warn!("Appointment insert failed after booking, reopening slot: {}", e);
                if let Err(release_err) = release_slot(
                    &self.availability,
                    request.doctor_id,
                    request.start,
                    request.end,
                    self.max_attempts,
                )
                .await
                {
                    error!(
                        "Could not reopen slot for doctor {} at {}: {}",
                        request.doctor_id, request.start, release_err
                    );
                }
                Err(AppointmentError::from(e))
            }
        }
    }
}
