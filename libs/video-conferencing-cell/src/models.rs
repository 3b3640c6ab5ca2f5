use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::auth::Role;

/// Room recorded on an accepted video appointment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRoom {
    pub provider: String,
    pub room_id: String,
    /// Provider-specific metadata, opaque to the scheduling core.
    #[serde(default)]
    pub token_meta: serde_json::Value,
}

/// Who is asking to join a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPrincipal {
    pub account_id: String,
    pub role: Role,
}

/// Time-boxed credential handed to a participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoAccessCredential {
    pub provider: String,
    pub room_id: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Claims embedded in a room access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomAccessClaims {
    pub sub: String,
    pub role: Role,
    pub room_id: String,
    pub provider: String,
    pub iat: i64,
    pub exp: i64,
}

// ==============================================================================
// CLOUDFLARE REALTIME WIRE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudflareSessionResponse {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "errorCode", skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(rename = "errorDescription", skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

#[derive(Error, Debug)]
pub enum VideoConferencingError {
    #[error("Video conferencing not configured")]
    NotConfigured,

    #[error("Cloudflare API error: {message}")]
    CloudflareApiError { message: String },

    #[error("Access token error: {0}")]
    TokenError(#[from] shared_utils::jwt::TokenError),

    #[error("Access token expired")]
    TokenExpired,

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}
