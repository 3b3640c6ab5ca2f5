use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use doctor_cell::models::{AccountId, DoctorProfileId};
use shared_database::StoreError;

use crate::models::{Appointment, AppointmentId, AppointmentStatus};
use crate::store::AppointmentStore;

#[derive(Default)]
pub struct InMemoryAppointmentStore {
    appointments: RwLock<HashMap<AppointmentId, Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn collect_sorted<F>(&self, keep: F) -> Vec<Appointment>
    where
        F: Fn(&Appointment) -> bool,
    {
        let appointments = self.appointments.read().await;
        let mut result: Vec<Appointment> = appointments.values().filter(|a| keep(*a)).cloned().collect();
        result.sort_by_key(|a| a.start);
        result
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn insert(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        let mut appointments = self.appointments.write().await;
        if appointments.contains_key(&appointment.id) {
            return Err(StoreError::VersionConflict);
        }
        appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn get(&self, id: AppointmentId) -> Result<Option<Appointment>, StoreError> {
        Ok(self.appointments.read().await.get(&id).cloned())
    }

    async fn update_if_status(
        &self,
        appointment: Appointment,
        expected: AppointmentStatus,
    ) -> Result<Appointment, StoreError> {
        let mut appointments = self.appointments.write().await;
        let stored = appointments.get_mut(&appointment.id).ok_or(StoreError::NotFound)?;

        if stored.status != expected {
            debug!(
                "Status guard failed for appointment {}: stored {}, expected {}",
                appointment.id, stored.status, expected
            );
            return Err(StoreError::VersionConflict);
        }

        stored.status = appointment.status;
        stored.video_room = appointment.video_room;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn list_for_patient(&self, patient: &AccountId) -> Result<Vec<Appointment>, StoreError> {
        Ok(self.collect_sorted(|a| &a.patient_account_id == patient).await)
    }

    async fn list_for_doctor(&self, doctor_id: DoctorProfileId) -> Result<Vec<Appointment>, StoreError> {
        Ok(self.collect_sorted(|a| a.doctor_id == doctor_id).await)
    }

    async fn list_all(&self) -> Result<Vec<Appointment>, StoreError> {
        Ok(self.collect_sorted(|_| true).await)
    }
}
