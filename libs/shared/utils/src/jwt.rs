use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{JwtClaims, User};

type HmacSha256 = Hmac<Sha256>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("JWT secret is not set")]
    MissingSecret,

    #[error("Invalid token format")]
    Malformed,

    #[error("Invalid signature encoding")]
    SignatureEncoding,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Invalid claims encoding")]
    ClaimsEncoding,

    #[error("Invalid claims format")]
    ClaimsFormat,

    #[error("Token expired")]
    Expired,
}

fn mac_for(secret: &str) -> Result<HmacSha256, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::MissingSecret)
}

/// Signs `claims` as a compact HS256 JWS.
pub fn encode_hs256<T: Serialize>(claims: &T, secret: &str) -> Result<String, TokenError> {
    let header = json!({ "alg": "HS256", "typ": "JWT" });
    let claims = serde_json::to_vec(claims).map_err(|_| TokenError::ClaimsFormat)?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims)
    );

    let mut mac = mac_for(secret)?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature))
}

/// Verifies the HS256 signature and decodes the claims. Expiry is left to the caller.
pub fn decode_hs256<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T, TokenError> {
    let mut mac = mac_for(secret)?;

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Malformed);
    }
    let (header_b64, claims_b64, signature_b64) = (parts[0], parts[1], parts[2]);

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Failed to decode signature: {}", e);
        TokenError::SignatureEncoding
    })?;

    mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());
    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(TokenError::BadSignature);
    }

    let claims_json = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| TokenError::ClaimsEncoding)?;

    serde_json::from_slice(&claims_json).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        TokenError::ClaimsFormat
    })
}

pub fn validate_token(token: &str, jwt_secret: &str) -> Result<User, TokenError> {
    let claims: JwtClaims = decode_hs256(token, jwt_secret)?;

    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp() as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err(TokenError::Expired);
        }
    }

    let created_at = claims
        .iat
        .and_then(|timestamp| Utc.timestamp_opt(timestamp as i64, 0).single());

    let user = User {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
        metadata: claims.user_metadata,
        created_at,
    };

    debug!("Token validated successfully for user: {}", user.id);
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{JwtTestUtils, TestUser};

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_valid_token_yields_user() {
        let doctor = TestUser::doctor("doc@example.com");
        let token = JwtTestUtils::create_test_token(&doctor, SECRET, Some(1));

        let user = validate_token(&token, SECRET).unwrap();
        assert_eq!(user.id, doctor.id);
        assert_eq!(user.role.as_deref(), Some("doctor"));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let patient = TestUser::patient("p@example.com");
        let token = JwtTestUtils::create_expired_token(&patient, SECRET);
        assert_eq!(validate_token(&token, SECRET).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let patient = TestUser::patient("p@example.com");
        let token = JwtTestUtils::create_invalid_signature_token(&patient);
        assert_eq!(validate_token(&token, SECRET).unwrap_err(), TokenError::BadSignature);
    }

    #[test]
    fn test_malformed_and_missing_secret() {
        assert!(validate_token(&JwtTestUtils::create_malformed_token(), SECRET).is_err());
        assert_eq!(validate_token("a.b", SECRET).unwrap_err(), TokenError::Malformed);
        assert_eq!(validate_token("a.b.c", "").unwrap_err(), TokenError::MissingSecret);
    }
}
