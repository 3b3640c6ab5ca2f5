use std::sync::Arc;

use tracing::debug;

use doctor_cell::models::AccountId;
use doctor_cell::services::IdentityResolver;
use shared_models::auth::Role;

use crate::models::{Appointment, AppointmentError, AppointmentId};
use crate::store::AppointmentStore;

/// Role-scoped appointment reads.
pub struct AppointmentQueryService {
    identity: IdentityResolver,
    appointments: Arc<dyn AppointmentStore>,
}

impl AppointmentQueryService {
    pub fn new(identity: IdentityResolver, appointments: Arc<dyn AppointmentStore>) -> Self {
        Self { identity, appointments }
    }

    pub async fn list_mine(&self, account: &AccountId, role: Role) -> Result<Vec<Appointment>, AppointmentError> {
        let appointments = match role {
            Role::Admin => self.appointments.list_all().await?,
            Role::Doctor => match self.identity.resolve_profile(account).await? {
                Some(doctor_id) => self.appointments.list_for_doctor(doctor_id).await?,
                None => Vec::new(),
            },
            Role::Patient | Role::Hospital => self.appointments.list_for_patient(account).await?,
        };

        debug!("Listed {} appointments for {} ({})", appointments.len(), account, role);
        Ok(appointments)
    }

    pub async fn get_appointment(
        &self,
        account: &AccountId,
        role: Role,
        appointment_id: AppointmentId,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .appointments
            .get(appointment_id)
            .await?
            .ok_or(AppointmentError::AppointmentNotFound)?;

        let visible = match role {
            Role::Admin => true,
            _ if &appointment.patient_account_id == account => true,
            Role::Doctor => {
                self.identity.resolve_profile(account).await? == Some(appointment.doctor_id)
            }
            _ => false,
        };

        if !visible {
            return Err(AppointmentError::Forbidden(
                "Appointment is visible only to its participants".to_string(),
            ));
        }

        Ok(appointment)
    }
}
