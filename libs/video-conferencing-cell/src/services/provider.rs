use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use shared_config::{AppConfig, VideoProviderKind};

use crate::models::{AccessPrincipal, VideoAccessCredential, VideoConferencingError, VideoRoom};
use crate::services::{AccessTokenSigner, CloudflareRealtimeClient, LocalRoomProvider};

/// Room-provisioning capability consumed by the appointment lifecycle.
#[async_trait]
pub trait VideoRoomProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Creates a room for the appointment. Called once, on acceptance.
    async fn provision(&self, appointment_id: Uuid) -> Result<VideoRoom, VideoConferencingError>;

    /// Issues a time-boxed credential for `principal` to join `room`.
    async fn mint_access(
        &self,
        room: &VideoRoom,
        principal: &AccessPrincipal,
    ) -> Result<VideoAccessCredential, VideoConferencingError>;
}

pub fn build_provider(config: &AppConfig) -> Result<Arc<dyn VideoRoomProvider>, VideoConferencingError> {
    let signer = AccessTokenSigner::from_config(config)?;

    let provider: Arc<dyn VideoRoomProvider> = match config.video_provider {
        VideoProviderKind::Local => Arc::new(LocalRoomProvider::new(signer)),
        VideoProviderKind::Cloudflare => Arc::new(CloudflareRealtimeClient::new(config, signer)?),
    };

    info!("Video room provider: {}", provider.name());
    Ok(provider)
}
