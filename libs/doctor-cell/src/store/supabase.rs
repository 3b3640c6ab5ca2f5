use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Method,
};
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::{supabase::SupabaseClient, StoreError};

use crate::models::{AccountId, AvailabilityDay, DoctorProfile, DoctorProfileId};
use crate::store::{AvailabilityStore, DoctorProfileStore};

const PROFILES_PATH: &str = "/rest/v1/doctor_profiles";
const DAYS_PATH: &str = "/rest/v1/availability_days";

fn first_row<T: serde::de::DeserializeOwned>(rows: Vec<Value>) -> Result<Option<T>, StoreError> {
    match rows.into_iter().next() {
        Some(row) => Ok(Some(serde_json::from_value(row)?)),
        None => Ok(None),
    }
}

pub struct SupabaseDoctorProfileStore {
    supabase: SupabaseClient,
}

impl SupabaseDoctorProfileStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }
}

#[async_trait]
impl DoctorProfileStore for SupabaseDoctorProfileStore {
    async fn find_by_account(&self, account_id: &AccountId) -> Result<Option<DoctorProfile>, StoreError> {
        let path = format!(
            "{}?account_id=eq.{}&limit=1",
            PROFILES_PATH,
            urlencoding::encode(account_id.as_str())
        );
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        first_row(rows)
    }

    async fn find_by_id(&self, id: DoctorProfileId) -> Result<Option<DoctorProfile>, StoreError> {
        let path = format!("{}?id=eq.{}&limit=1", PROFILES_PATH, id);
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        first_row(rows)
    }

    async fn upsert(&self, profile: DoctorProfile) -> Result<DoctorProfile, StoreError> {
        let path = format!("{}?on_conflict=account_id", PROFILES_PATH);

        // id and created_at already match any existing row; a new row keeps the generated id.
        let body = serde_json::to_value(&profile)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "Prefer",
            HeaderValue::from_static("resolution=merge-duplicates,return=representation"),
        );

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(Method::POST, &path, Some(body), Some(headers))
            .await?;

        first_row(rows)?.ok_or_else(|| StoreError::Backend("Upsert returned no rows".to_string()))
    }
}

pub struct SupabaseAvailabilityStore {
    supabase: SupabaseClient,
}

impl SupabaseAvailabilityStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }
}

#[async_trait]
impl AvailabilityStore for SupabaseAvailabilityStore {
    async fn get_day(
        &self,
        doctor_id: DoctorProfileId,
        date: NaiveDate,
    ) -> Result<Option<AvailabilityDay>, StoreError> {
        let path = format!("{}?doctor_id=eq.{}&date=eq.{}&limit=1", DAYS_PATH, doctor_id, date);
        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        first_row(rows)
    }

    async fn list_days(
        &self,
        doctor_id: DoctorProfileId,
        date: Option<NaiveDate>,
    ) -> Result<Vec<AvailabilityDay>, StoreError> {
        let mut path = format!("{}?doctor_id=eq.{}&order=date.asc", DAYS_PATH, doctor_id);
        if let Some(date) = date {
            path.push_str(&format!("&date=eq.{}", date));
        }

        let rows: Vec<Value> = self.supabase.request(Method::GET, &path, None).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect()
    }

    async fn save_day(
        &self,
        mut day: AvailabilityDay,
        expected_version: Option<i64>,
    ) -> Result<AvailabilityDay, StoreError> {
        day.updated_at = Utc::now();

        let rows: Vec<Value> = match expected_version {
            None => {
                // The unique (doctor_id, date) constraint turns a lost insert race into a 409.
                day.version = 1;
                debug!("Inserting availability day {} for doctor {}", day.date, day.doctor_id);
                self.supabase
                    .request_with_headers(
                        Method::POST,
                        DAYS_PATH,
                        Some(serde_json::to_value(&day)?),
                        Some(SupabaseClient::representation_headers()),
                    )
                    .await?
            }
            Some(expected) => {
                let path = format!(
                    "{}?doctor_id=eq.{}&date=eq.{}&version=eq.{}",
                    DAYS_PATH, day.doctor_id, day.date, expected
                );
                let patch = json!({
                    "slots": day.slots,
                    "version": expected + 1,
                    "updated_at": day.updated_at,
                });
                debug!("Conditionally updating availability day {} at version {}", day.date, expected);
                self.supabase
                    .request_with_headers(
                        Method::PATCH,
                        &path,
                        Some(patch),
                        Some(SupabaseClient::representation_headers()),
                    )
                    .await?
            }
        };

        match first_row(rows)? {
            Some(saved) => Ok(saved),
            None => {
                warn!("Version guard failed for {} on {}", day.doctor_id, day.date);
                Err(StoreError::VersionConflict)
            }
        }
    }
}
