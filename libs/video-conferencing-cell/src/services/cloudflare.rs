use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, info};
use uuid::Uuid;

use shared_config::AppConfig;

use crate::models::{
    AccessPrincipal, CloudflareSessionResponse, VideoAccessCredential, VideoConferencingError,
    VideoRoom,
};
use crate::services::{AccessTokenSigner, VideoRoomProvider};

/// Cloudflare Realtime API client. Each appointment room is one Realtime session.
/// Based on: https://developers.cloudflare.com/realtime/
pub struct CloudflareRealtimeClient {
    client: Client,
    app_id: String,
    api_token: String,
    base_url: String,
    signer: AccessTokenSigner,
}

impl CloudflareRealtimeClient {
    pub const NAME: &'static str = "cloudflare_realtime";

    pub fn new(config: &AppConfig, signer: AccessTokenSigner) -> Result<Self, VideoConferencingError> {
        if !config.is_video_conferencing_configured() {
            return Err(VideoConferencingError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            app_id: config.cloudflare_realtime_app_id.clone(),
            api_token: config.cloudflare_realtime_api_token.clone(),
            base_url: config.cloudflare_realtime_base_url.clone(),
            signer,
        })
    }

    /// POST /v1/apps/{appId}/sessions/new
    pub async fn create_session(&self) -> Result<CloudflareSessionResponse, VideoConferencingError> {
        let url = format!("{}/apps/{}/sessions/new", self.base_url, self.app_id);
        debug!("Sending session creation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .header("Content-Type", "application/json")
            .json(&json!({}))
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("Cloudflare session creation failed: {} - {}", status, response_text);
            return Err(VideoConferencingError::CloudflareApiError {
                message: format!("HTTP {}: {}", status, response_text),
            });
        }

        let session_response: CloudflareSessionResponse = serde_json::from_str(&response_text)
            .map_err(|e| VideoConferencingError::CloudflareApiError {
                message: format!("Failed to parse session response: {}", e),
            })?;

        if let Some(error_code) = &session_response.error_code {
            let message = session_response
                .error_description
                .as_deref()
                .unwrap_or("Unknown error");
            error!("Cloudflare session error: {} - {}", error_code, message);
            return Err(VideoConferencingError::CloudflareApiError {
                message: format!("{}: {}", error_code, message),
            });
        }

        Ok(session_response)
    }
}

#[async_trait]
impl VideoRoomProvider for CloudflareRealtimeClient {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn provision(&self, appointment_id: Uuid) -> Result<VideoRoom, VideoConferencingError> {
        let session = self.create_session().await?;
        info!(
            "Created Cloudflare session {} for appointment {}",
            session.session_id, appointment_id
        );

        Ok(VideoRoom {
            provider: Self::NAME.to_string(),
            room_id: session.session_id,
            token_meta: json!({
                "app_id": self.app_id,
                "appointment_id": appointment_id,
                "ice_servers": [{ "urls": ["stun:stun.cloudflare.com:3478"] }],
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
