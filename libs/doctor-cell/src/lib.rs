pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod state;
pub mod store;

pub use models::*;
pub use services::{AvailabilityService, DoctorService, IdentityResolver};
pub use state::DoctorCellState;
pub use store::{AvailabilityStore, DoctorProfileStore};
