use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::models::{
    AccountId, DoctorError, DoctorProfile, DoctorProfileId, SubmitProfileRequest,
    VerificationStatus,
};
use crate::services::IdentityResolver;
use crate::store::DoctorProfileStore;

pub struct DoctorService {
    profiles: Arc<dyn DoctorProfileStore>,
    identity: IdentityResolver,
}

impl DoctorService {
    pub fn new(profiles: Arc<dyn DoctorProfileStore>) -> Self {
        Self {
            identity: IdentityResolver::new(profiles.clone()),
            profiles,
        }
    }

    /// Creates the caller's profile, or updates its attributes when one exists.
    /// Verification status is owned by the admin workflow and never changes here.
    pub async fn submit_profile(
        &self,
        account_id: &AccountId,
        request: SubmitProfileRequest,
    ) -> Result<DoctorProfile, DoctorError> {
        if request.experience_years < 0 {
            return Err(DoctorError::ValidationError(
                "experience_years cannot be negative".to_string(),
            ));
        }

        let mut specialties: Vec<String> = Vec::new();
        for specialty in request.specialties.iter().map(|s| s.trim()) {
            if !specialty.is_empty() && !specialties.iter().any(|s| s.eq_ignore_ascii_case(specialty)) {
                specialties.push(specialty.to_string());
            }
        }

        let now = Utc::now();
        let profile = match self.identity.resolve_doctor(account_id).await? {
            Some(existing) => DoctorProfile {
                specialties,
                experience_years: request.experience_years,
                credentials: request.credentials,
                updated_at: now,
                ..existing
            },
            None => {
                debug!("Creating doctor profile for account {}", account_id);
                DoctorProfile {
                    id: DoctorProfileId::new(),
                    account_id: account_id.clone(),
                    specialties,
                    experience_years: request.experience_years,
                    credentials: request.credentials,
                    verification_status: VerificationStatus::Pending,
                    created_at: now,
                    updated_at: now,
                }
            }
        };

        let saved = self.profiles.upsert(profile).await?;
        info!("Doctor profile {} saved for account {}", saved.id, account_id);
        Ok(saved)
    }

    pub async fn get_profile(&self, id: DoctorProfileId) -> Result<DoctorProfile, DoctorError> {
        self.profiles.find_by_id(id).await?.ok_or(DoctorError::NotFound)
    }

    pub async fn get_my_profile(&self, account_id: &AccountId) -> Result<DoctorProfile, DoctorError> {
        self.identity
            .resolve_doctor(account_id)
            .await?
            .ok_or(DoctorError::NotFound)
    }
}
