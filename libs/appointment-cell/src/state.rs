use std::sync::Arc;

use doctor_cell::services::IdentityResolver;
use doctor_cell::store::{AvailabilityStore, DoctorProfileStore};
use doctor_cell::DoctorCellState;
use shared_config::{AppConfig, StorageBackend};
use video_conferencing_cell::VideoRoomProvider;

use crate::services::{
    AppointmentQueryService, LifecycleService, ReservationService, VideoAccessService,
};
use crate::store::{AppointmentStore, InMemoryAppointmentStore, SupabaseAppointmentStore};

#[derive(Clone)]
pub struct AppointmentCellState {
    pub config: Arc<AppConfig>,
    pub profiles: Arc<dyn DoctorProfileStore>,
    pub availability: Arc<dyn AvailabilityStore>,
    pub appointments: Arc<dyn AppointmentStore>,
    pub video: Arc<dyn VideoRoomProvider>,
}

impl AppointmentCellState {
    /// Shares the doctor cell's stores so reservations see the same availability days.
    pub fn new(
        doctors: &DoctorCellState,
        appointments: Arc<dyn AppointmentStore>,
        video: Arc<dyn VideoRoomProvider>,
    ) -> Self {
        Self {
            config: doctors.config.clone(),
            profiles: doctors.profiles.clone(),
            availability: doctors.availability.clone(),
            appointments,
            video,
        }
    }

    pub fn from_config(doctors: &DoctorCellState, video: Arc<dyn VideoRoomProvider>) -> Self {
        let appointments: Arc<dyn AppointmentStore> = match doctors.config.storage_backend {
            StorageBackend::Supabase => Arc::new(SupabaseAppointmentStore::new(&doctors.config)),
            StorageBackend::Memory => Arc::new(InMemoryAppointmentStore::new()),
        };
        Self::new(doctors, appointments, video)
    }

    fn identity(&self) -> IdentityResolver {
        IdentityResolver::new(self.profiles.clone())
    }

    pub fn reservation_service(&self) -> ReservationService {
        ReservationService::new(
            self.availability.clone(),
            self.appointments.clone(),
            self.config.reservation_max_attempts,
        )
    }

    pub fn lifecycle_service(&self) -> LifecycleService {
        LifecycleService::new(
            self.identity(),
            self.appointments.clone(),
            self.availability.clone(),
            self.video.clone(),
            self.config.reservation_max_attempts,
        )
    }

    pub fn video_access_service(&self) -> VideoAccessService {
        VideoAccessService::new(
            self.identity(),
            self.appointments.clone(),
            self.video.clone(),
            self.config.video_join_window_minutes,
        )
    }

    pub fn query_service(&self) -> AppointmentQueryService {
        AppointmentQueryService::new(self.identity(), self.appointments.clone())
    }
}
