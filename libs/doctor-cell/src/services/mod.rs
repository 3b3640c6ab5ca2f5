pub mod doctor;
pub mod availability;
pub mod identity;

pub use doctor::DoctorService;
pub use availability::AvailabilityService;
pub use identity::IdentityResolver;
