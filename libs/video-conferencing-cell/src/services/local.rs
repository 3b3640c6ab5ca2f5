use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::models::{AccessPrincipal, VideoAccessCredential, VideoConferencingError, VideoRoom};
use crate::services::{AccessTokenSigner, VideoRoomProvider};

/// Self-hosted rooms: ids are derived locally and access is a signed token.
pub struct LocalRoomProvider {
    signer: AccessTokenSigner,
}

impl LocalRoomProvider {
    pub const NAME: &'static str = "local";

    pub fn new(signer: AccessTokenSigner) -> Self {
        Self { signer }
    }
}

#[async_trait]
impl VideoRoomProvider for LocalRoomProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn provision(&self, appointment_id: Uuid) -> Result<VideoRoom, VideoConferencingError> {
        let room_id = format!("room-{}", Uuid::new_v4().simple());
        info!("Provisioned local room {} for appointment {}", room_id, appointment_id);

        Ok(VideoRoom {
            provider: Self::NAME.to_string(),
            room_id,
            token_meta: json!({
                "appointment_id": appointment_id,
                "provisioned_at": Utc::now().to_rfc3339(),
            }),
        })
    }

    async fn mint_access(
        &self,
        room: &VideoRoom,
        principal: &AccessPrincipal,
    ) -> Result<VideoAccessCredential, VideoConferencingError> {
        self.signer.mint(room, principal)
    }
}
