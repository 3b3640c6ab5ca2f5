use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use shared_database::StoreError;

use crate::models::{AccountId, AvailabilityDay, DoctorProfile, DoctorProfileId};
use crate::store::{AvailabilityStore, DoctorProfileStore};

#[derive(Default)]
pub struct InMemoryDoctorProfileStore {
    profiles: RwLock<HashMap<AccountId, DoctorProfile>>,
}

impl InMemoryDoctorProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DoctorProfileStore for InMemoryDoctorProfileStore {
    async fn find_by_account(&self, account_id: &AccountId) -> Result<Option<DoctorProfile>, StoreError> {
        Ok(self.profiles.read().await.get(account_id).cloned())
    }

    async fn find_by_id(&self, id: DoctorProfileId) -> Result<Option<DoctorProfile>, StoreError> {
        Ok(self
            .profiles
            .read()
            .await
            .values()
            .find(|profile| profile.id == id)
            .cloned())
    }

    async fn upsert(&self, profile: DoctorProfile) -> Result<DoctorProfile, StoreError> {
        let mut profiles = self.profiles.write().await;
        // The account keeps its original profile id.
        let stored = match profiles.get(&profile.account_id) {
            Some(existing) => DoctorProfile {
                id: existing.id,
                created_at: existing.created_at,
                ..profile
            },
            None => profile,
        };
        profiles.insert(stored.account_id.clone(), stored.clone());
        Ok(stored)
    }
}

/// Days keyed by (doctor, date). The write lock makes each compare-and-swap atomic.
#[derive(Default)]
pub struct InMemoryAvailabilityStore {
    days: RwLock<HashMap<(DoctorProfileId, NaiveDate), AvailabilityDay>>,
}

impl InMemoryAvailabilityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AvailabilityStore for InMemoryAvailabilityStore {
    async fn get_day(
        &self,
        doctor_id: DoctorProfileId,
        date: NaiveDate,
    ) -> Result<Option<AvailabilityDay>, StoreError> {
        Ok(self.days.read().await.get(&(doctor_id, date)).cloned())
    }

    async fn list_days(
        &self,
        doctor_id: DoctorProfileId,
        date: Option<NaiveDate>,
    ) -> Result<Vec<AvailabilityDay>, StoreError> {
        let days = self.days.read().await;
        let mut result: Vec<AvailabilityDay> = days
            .values()
            .filter(|day| day.doctor_id == doctor_id)
            .filter(|day| date.map_or(true, |wanted| day.date == wanted))
            .cloned()
            .collect();
        result.sort_by_key(|day| day.date);
        Ok(result)
    }

    async fn save_day(
        &self,
        mut day: AvailabilityDay,
        expected_version: Option<i64>,
    ) -> Result<AvailabilityDay, StoreError> {
        let mut days = self.days.write().await;
        let key = (day.doctor_id, day.date);

        match (days.get(&key), expected_version) {
            (None, None) => {
                day.version = 1;
            }
            (Some(current), Some(expected)) if current.version == expected => {
                day.id = current.id;
                day.created_at = current.created_at;
                day.version = expected + 1;
            }
            (current, expected) => {
                debug!(
                    "Version guard failed for {} on {}: stored {:?}, expected {:?}",
                    day.doctor_id,
                    day.date,
                    current.map(|d| d.version),
                    expected
                );
                return Err(StoreError::VersionConflict);
            }
        }

        day.updated_at = Utc::now();
        days.insert(key, day.clone());
        Ok(day)
    }
}
