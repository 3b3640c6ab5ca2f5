use std::sync::Arc;

use tracing::debug;

use shared_database::StoreError;

use crate::models::{AccountId, DoctorProfile, DoctorProfileId};
use crate::store::DoctorProfileStore;

/// Maps an authenticated account to the doctor profile it owns.
///
/// Lookups always hit the store: a profile may be created between two requests,
/// so results are never cached.
#[derive(Clone)]
pub struct IdentityResolver {
    profiles: Arc<dyn DoctorProfileStore>,
}

impl IdentityResolver {
    pub fn new(profiles: Arc<dyn DoctorProfileStore>) -> Self {
        Self { profiles }
    }

    pub async fn resolve_profile(&self, account_id: &AccountId) -> Result<Option<DoctorProfileId>, StoreError> {
        Ok(self.resolve_doctor(account_id).await?.map(|profile| profile.id))
    }

    pub async fn resolve_doctor(&self, account_id: &AccountId) -> Result<Option<DoctorProfile>, StoreError> {
        let profile = self.profiles.find_by_account(account_id).await?;
        debug!(
            "Resolved account {} to doctor profile {:?}",
            account_id,
            profile.as_ref().map(|p| p.id)
        );
        Ok(profile)
    }
}
