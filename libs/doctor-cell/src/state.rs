use std::sync::Arc;

use shared_config::{AppConfig, StorageBackend};

use crate::services::{AvailabilityService, DoctorService, IdentityResolver};
use crate::store::{
    AvailabilityStore, DoctorProfileStore, InMemoryAvailabilityStore, InMemoryDoctorProfileStore,
    SupabaseAvailabilityStore, SupabaseDoctorProfileStore,
};

/// Shared handles for doctor and availability routes.
#[derive(Clone)]
pub struct DoctorCellState {
    pub config: Arc<AppConfig>,
    pub profiles: Arc<dyn DoctorProfileStore>,
    pub availability: Arc<dyn AvailabilityStore>,
}

impl DoctorCellState {
    pub fn new(
        config: Arc<AppConfig>,
        profiles: Arc<dyn DoctorProfileStore>,
        availability: Arc<dyn AvailabilityStore>,
    ) -> Self {
        Self { config, profiles, availability }
    }

    /// Builds the stores selected by `STORAGE_BACKEND`.
    pub fn from_config(config: Arc<AppConfig>) -> Self {
        let (profiles, availability): (Arc<dyn DoctorProfileStore>, Arc<dyn AvailabilityStore>) =
            match config.storage_backend {
                StorageBackend::Supabase => (
                    Arc::new(SupabaseDoctorProfileStore::new(&config)),
                    Arc::new(SupabaseAvailabilityStore::new(&config)),
                ),
                StorageBackend::Memory => (
                    Arc::new(InMemoryDoctorProfileStore::new()),
                    Arc::new(InMemoryAvailabilityStore::new()),
                ),
            };
        Self::new(config, profiles, availability)
    }

    pub fn identity(&self) -> IdentityResolver {
        IdentityResolver::new(self.profiles.clone())
    }

    pub fn doctor_service(&self) -> DoctorService {
        DoctorService::new(self.profiles.clone())
    }

    pub fn availability_service(&self) -> AvailabilityService {
        AvailabilityService::new(self.identity(), self.availability.clone())
    }
}
