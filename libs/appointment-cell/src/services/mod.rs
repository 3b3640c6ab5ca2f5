pub mod lifecycle;
pub mod query;
pub mod reservation;
pub mod slots;
pub mod video_access;

pub use lifecycle::LifecycleService;
pub use query::AppointmentQueryService;
pub use reservation::ReservationService;
pub use video_access::VideoAccessService;
