pub mod memory;
pub mod supabase;

use async_trait::async_trait;

use doctor_cell::models::{AccountId, DoctorProfileId};
use shared_database::StoreError;

use crate::models::{Appointment, AppointmentId, AppointmentStatus};

pub use memory::InMemoryAppointmentStore;
pub use supabase::SupabaseAppointmentStore;

/// Appointments are never deleted; only their status and room change after insert.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert(&self, appointment: Appointment) -> Result<Appointment, StoreError>;

    async fn get(&self, id: AppointmentId) -> Result<Option<Appointment>, StoreError>;

    /// Writes `appointment.status`, `video_room` and `updated_at` only while the stored
    /// status still equals `expected`. A lost race is `StoreError::VersionConflict`.
    async fn update_if_status(
        &self,
        appointment: Appointment,
        expected: AppointmentStatus,
    ) -> Result<Appointment, StoreError>;

    /// The list operations below return appointments ordered by start.
    async fn list_for_patient(&self, patient: &AccountId) -> Result<Vec<Appointment>, StoreError>;

    async fn list_for_doctor(&self, doctor_id: DoctorProfileId) -> Result<Vec<Appointment>, StoreError>;

    async fn list_all(&self) -> Result<Vec<Appointment>, StoreError>;
}
