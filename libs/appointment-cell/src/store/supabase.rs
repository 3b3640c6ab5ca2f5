use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};

use doctor_cell::models::{AccountId, DoctorProfileId};
use shared_config::AppConfig;
use shared_database::{supabase::SupabaseClient, StoreError};

use crate::models::{Appointment, AppointmentId, AppointmentStatus};
use crate::store::AppointmentStore;

const APPOINTMENTS_PATH: &str = "/rest/v1/appointments";

pub struct SupabaseAppointmentStore {
    supabase: SupabaseClient,
}

impl SupabaseAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn list(&self, filter: &str) -> Result<Vec<Appointment>, StoreError> {
        let path = format!("{}?{}order=start_time.asc", APPOINTMENTS_PATH, filter);
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect()
    }
}

fn first_row(rows: Vec<Value>) -> Result<Option<Appointment>, StoreError> {
    match rows.into_iter().next() {
        Some(row) => Ok(Some(serde_json::from_value(row)?)),
        None => Ok(None),
    }
}

#[async_trait]
impl AppointmentStore for SupabaseAppointmentStore {
    async fn insert(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        debug!("Inserting appointment {}", appointment.id);
        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                APPOINTMENTS_PATH,
                Some(serde_json::to_value(&appointment)?),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        first_row(rows)?.ok_or_else(|| StoreError::Backend("Insert returned no rows".to_string()))
    }

    async fn get(&self, id: AppointmentId) -> Result<Option<Appointment>, StoreError> {
        let path = format!("{}?id=eq.{}&limit=1", APPOINTMENTS_PATH, id);
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        first_row(rows)
    }

    async fn update_if_status(
        &self,
        appointment: Appointment,
        expected: AppointmentStatus,
    ) -> Result<Appointment, StoreError> {
        let path = format!("{}?id=eq.{}&status=eq.{}", APPOINTMENTS_PATH, appointment.id, expected);
        let patch = json!({
            "status": appointment.status,
            "video_room": appointment.video_room,
            "updated_at": Utc::now(),
        });

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(patch),
                Some(SupabaseClient::representation_headers()),
            )
            .await?;

        match first_row(rows)? {
            Some(saved) => Ok(saved),
            None => {
                warn!("Status guard failed for appointment {} (expected {})", appointment.id, expected);
                Err(StoreError::VersionConflict)
            }
        }
    }

    async fn list_for_patient(&self, patient: &AccountId) -> Result<Vec<Appointment>, StoreError> {
        self.list(&format!("patient_account_id=eq.{}&", urlencoding::encode(patient.as_str())))
            .await
    }

    async fn list_for_doctor(&self, doctor_id: DoctorProfileId) -> Result<Vec<Appointment>, StoreError> {
        self.list(&format!("doctor_id=eq.{}&", doctor_id)).await
    }

    async fn list_all(&self) -> Result<Vec<Appointment>, StoreError> {
        self.list("").await
    }
}
