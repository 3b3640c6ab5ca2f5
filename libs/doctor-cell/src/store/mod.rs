pub mod memory;
pub mod supabase;

use async_trait::async_trait;
use chrono::NaiveDate;

use shared_database::StoreError;

use crate::models::{AccountId, AvailabilityDay, DoctorProfile, DoctorProfileId};

pub use memory::{InMemoryAvailabilityStore, InMemoryDoctorProfileStore};
pub use supabase::{SupabaseAvailabilityStore, SupabaseDoctorProfileStore};

#[async_trait]
pub trait DoctorProfileStore: Send + Sync {
    async fn find_by_account(&self, account_id: &AccountId) -> Result<Option<DoctorProfile>, StoreError>;

    async fn find_by_id(&self, id: DoctorProfileId) -> Result<Option<DoctorProfile>, StoreError>;

    /// Inserts or replaces the profile owned by `profile.account_id`.
    async fn upsert(&self, profile: DoctorProfile) -> Result<DoctorProfile, StoreError>;
}

#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn get_day(
        &self,
        doctor_id: DoctorProfileId,
        date: NaiveDate,
    ) -> Result<Option<AvailabilityDay>, StoreError>;

    /// Days ordered by date, optionally restricted to one date.
    async fn list_days(
        &self,
        doctor_id: DoctorProfileId,
        date: Option<NaiveDate>,
    ) -> Result<Vec<AvailabilityDay>, StoreError>;

    /// Conditional write. With `expected_version == None` the day must not exist yet;
    /// otherwise the stored version must still equal it. Either way the returned day
    /// carries the new version. A failed guard is `StoreError::VersionConflict`.
    async fn save_day(
        &self,
        day: AvailabilityDay,
        expected_version: Option<i64>,
    ) -> Result<AvailabilityDay, StoreError>;
}
