use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use doctor_cell::models::{
    AccountId, AvailabilityDay, AvailabilityError, DoctorError, DoctorProfileId, SlotInput,
    SubmitAvailabilityRequest, SubmitProfileRequest, VerificationStatus,
};
use doctor_cell::services::{AvailabilityService, DoctorService, IdentityResolver};
use doctor_cell::store::{
    AvailabilityStore, DoctorProfileStore, InMemoryAvailabilityStore, InMemoryDoctorProfileStore,
};
use shared_database::StoreError;

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 5, 1, hour, minute, 0).unwrap()
}

fn day_request(slots: &[(DateTime<Utc>, DateTime<Utc>)]) -> SubmitAvailabilityRequest {
    SubmitAvailabilityRequest {
        date: "2030-05-01".to_string(),
        slots: slots
            .iter()
            .map(|(start, end)| SlotInput { start: *start, end: *end, status: None })
            .collect(),
    }
}

fn profile_request(specialties: &[&str], experience_years: i32) -> SubmitProfileRequest {
    SubmitProfileRequest {
        specialties: specialties.iter().map(|s| s.to_string()).collect(),
        experience_years,
        credentials: vec!["MD-42".to_string()],
    }
}

/// Lets another writer slip in between the read and the conditional write.
struct RacingAvailabilityStore {
    inner: InMemoryAvailabilityStore,
    race_armed: AtomicBool,
}

#[async_trait]
impl AvailabilityStore for RacingAvailabilityStore {
    async fn get_day(
        &self,
        doctor_id: DoctorProfileId,
        date: NaiveDate,
    ) -> Result<Option<AvailabilityDay>, StoreError> {
        let day = self.inner.get_day(doctor_id, date).await?;
        if let Some(current) = &day {
            if self.race_armed.swap(false, Ordering::SeqCst) {
                self.inner.save_day(current.clone(), Some(current.version)).await?;
            }
        }
        Ok(day)
    }

    async fn list_days(
        &self,
        doctor_id: DoctorProfileId,
        date: Option<NaiveDate>,
    ) -> Result<Vec<AvailabilityDay>, StoreError> {
        self.inner.list_days(doctor_id, date).await
    }

    async fn save_day(
        &self,
        day: AvailabilityDay,
        expected_version: Option<i64>,
    ) -> Result<AvailabilityDay, StoreError> {
        self.inner.save_day(day, expected_version).await
    }
}

async fn doctor_with_profile(profiles: &Arc<dyn DoctorProfileStore>) -> AccountId {
    let account = AccountId::from("doctor-1");
    DoctorService::new(profiles.clone())
        .submit_profile(&account, profile_request(&["cardiology"], 10))
        .await
        .unwrap();
    account
}

#[tokio::test]
async fn test_resubmission_bumps_version() {
    let profiles: Arc<dyn DoctorProfileStore> = Arc::new(InMemoryDoctorProfileStore::new());
    let account = doctor_with_profile(&profiles).await;
    let service = AvailabilityService::new(
        IdentityResolver::new(profiles.clone()),
        Arc::new(InMemoryAvailabilityStore::new()),
    );

    let first = service.submit_day(&account, day_request(&[(at(9, 0), at(10, 0))])).await.unwrap();
    assert_eq!(first.version, 1);

    let second = service
        .submit_day(&account, day_request(&[(at(9, 0), at(9, 30)), (at(13, 0), at(14, 0))]))
        .await
        .unwrap();
    assert_eq!(second.version, 2);
    assert_eq!(second.id, first.id);
    assert_eq!(second.slots.len(), 2);
}

#[tokio::test]
async fn test_lost_race_is_concurrent_modification() {
    let profiles: Arc<dyn DoctorProfileStore> = Arc::new(InMemoryDoctorProfileStore::new());
    let account = doctor_with_profile(&profiles).await;
    let store = Arc::new(RacingAvailabilityStore {
        inner: InMemoryAvailabilityStore::new(),
        race_armed: AtomicBool::new(false),
    });
    let service = AvailabilityService::new(IdentityResolver::new(profiles.clone()), store.clone());

    let first = service.submit_day(&account, day_request(&[(at(9, 0), at(10, 0))])).await.unwrap();

    store.race_armed.store(true, Ordering::SeqCst);
    let result = service.submit_day(&account, day_request(&[(at(11, 0), at(12, 0))])).await;
    assert_matches!(result, Err(AvailabilityError::ConcurrentModification));

    // Only the racing writer's bump landed; the rejected payload did not.
    let stored = store.inner.get_day(first.doctor_id, first.date).await.unwrap().unwrap();
    assert_eq!(stored.version, 2);
    assert_eq!(stored.slots, first.slots);
}

#[tokio::test]
async fn test_submission_without_profile() {
    let profiles: Arc<dyn DoctorProfileStore> = Arc::new(InMemoryDoctorProfileStore::new());
    let service = AvailabilityService::new(
        IdentityResolver::new(profiles),
        Arc::new(InMemoryAvailabilityStore::new()),
    );

    let result = service
        .submit_day(&AccountId::from("no-profile"), day_request(&[(at(9, 0), at(10, 0))]))
        .await;
    assert_matches!(result, Err(AvailabilityError::ProfileNotFound));
}

#[tokio::test]
async fn test_profile_update_keeps_identity_and_verification() {
    let profiles: Arc<dyn DoctorProfileStore> = Arc::new(InMemoryDoctorProfileStore::new());
    let service = DoctorService::new(profiles.clone());
    let account = AccountId::from("doctor-1");

    let created = service
        .submit_profile(&account, profile_request(&["Cardiology", " cardiology ", "", "Oncology"], 10))
        .await
        .unwrap();
    assert_eq!(created.specialties, vec!["Cardiology", "Oncology"]);
    assert_eq!(created.verification_status, VerificationStatus::Pending);

    // Verification is decided elsewhere; simulate an approval.
    let mut approved = created.clone();
    approved.verification_status = VerificationStatus::Approved;
    profiles.upsert(approved).await.unwrap();

    let updated = service
        .submit_profile(&account, profile_request(&["Pediatrics"], 11))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.experience_years, 11);
    assert_eq!(updated.verification_status, VerificationStatus::Approved);

    let resolved = IdentityResolver::new(profiles).resolve_profile(&account).await.unwrap();
    assert_eq!(resolved, Some(created.id));
}

#[tokio::test]
async fn test_negative_experience_rejected() {
    let service = DoctorService::new(Arc::new(InMemoryDoctorProfileStore::new()));
    let result = service
        .submit_profile(&AccountId::from("doctor-1"), profile_request(&[], -1))
        .await;
    assert_matches!(result, Err(DoctorError::ValidationError(_)));
}

#[tokio::test]
async fn test_unknown_profile_lookups() {
    let service = DoctorService::new(Arc::new(InMemoryDoctorProfileStore::new()));
    assert_matches!(service.get_profile(DoctorProfileId::new()).await, Err(DoctorError::NotFound));
    assert_matches!(
        service.get_my_profile(&AccountId::from("nobody")).await,
        Err(DoctorError::NotFound)
    );
}
