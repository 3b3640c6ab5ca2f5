use chrono::{Duration, TimeZone, Utc};
use tracing::debug;

use shared_config::AppConfig;
use shared_utils::jwt::{decode_hs256, encode_hs256};

use crate::models::{
    AccessPrincipal, RoomAccessClaims, VideoAccessCredential, VideoConferencingError, VideoRoom,
};

/// Mints and verifies HS256 room access tokens.
#[derive(Clone)]
pub struct AccessTokenSigner {
    secret: String,
    ttl: Duration,
}

impl AccessTokenSigner {
    pub fn new(secret: impl Into<String>, ttl_minutes: i64) -> Result<Self, VideoConferencingError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(VideoConferencingError::NotConfigured);
        }
        Ok(Self {
            secret,
            ttl: Duration::minutes(ttl_minutes.max(1)),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, VideoConferencingError> {
        Self::new(config.video_token_secret.clone(), config.video_token_ttl_minutes)
    }

    pub fn mint(
        &self,
        room: &VideoRoom,
        principal: &AccessPrincipal,
    ) -> Result<VideoAccessCredential, VideoConferencingError> {
        let issued_at = Utc::now();
        let expires_at = issued_at + self.ttl;

        let claims = RoomAccessClaims {
            sub: principal.account_id.clone(),
            role: principal.role,
            room_id: room.room_id.clone(),
            provider: room.provider.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode_hs256(&claims, &self.secret)?;
        debug!("Minted {} access for {} in room {}", principal.role, principal.account_id, room.room_id);

        Ok(VideoAccessCredential {
            provider: room.provider.clone(),
            room_id: room.room_id.clone(),
            token,
            expires_at: Utc
                .timestamp_opt(claims.exp, 0)
                .single()
                .unwrap_or(expires_at),
        })
    }

    pub fn verify(&self, token: &str) -> Result<RoomAccessClaims, VideoConferencingError> {
        let claims: RoomAccessClaims = decode_hs256(token, &self.secret)?;
        if claims.exp < Utc::now().timestamp() {
            return Err(VideoConferencingError::TokenExpired);
        }
        Ok(claims)
    }
}
