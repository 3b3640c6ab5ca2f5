//! # Video Conferencing Cell
//!
//! Room provisioning for video appointments. The scheduling core treats the
//! provider as an opaque capability with two operations:
//!
//! - `provision(appointment_id)` creates a room when a video appointment is accepted
//! - `mint_access(room, principal)` issues a short-lived join credential
//!
//! Two providers are available, selected with `VIDEO_PROVIDER`:
//!
//! - `local` (default): room ids generated in-process
//! - `cloudflare`: one Cloudflare Realtime session per room, configured through
//!   `CLOUDFLARE_REALTIME_APP_ID`, `CLOUDFLARE_REALTIME_API_TOKEN` and
//!   `CLOUDFLARE_REALTIME_BASE_URL`
//!
//! Both sign access credentials with `VIDEO_TOKEN_SECRET`.

pub mod models;
pub mod services;

pub use models::{AccessPrincipal, VideoAccessCredential, VideoConferencingError, VideoRoom};
pub use services::{build_provider, AccessTokenSigner, VideoRoomProvider};
