//! Slot reservation, the appointment state machine and video room access.

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod state;
pub mod store;

pub use models::*;
pub use state::AppointmentCellState;
pub use store::AppointmentStore;
