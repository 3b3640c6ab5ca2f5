use std::sync::Arc;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use shared_config::{AppConfig, StorageBackend, VideoProviderKind};
use shared_models::auth::User;

use crate::jwt::encode_hs256;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub video_token_secret: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            video_token_secret: "test-video-token-secret".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
            storage_backend: StorageBackend::Memory,
            server_port: 0,
            video_provider: VideoProviderKind::Local,
            video_token_secret: self.video_token_secret.clone(),
            video_token_ttl_minutes: 60,
            video_join_window_minutes: 15,
            reservation_max_attempts: 3,
            cloudflare_realtime_app_id: "test-app-id".to_string(),
            cloudflare_realtime_api_token: "test-api-token".to_string(),
            cloudflare_realtime_base_url: "http://localhost:54322".to_string(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "patient".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, "doctor")
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "patient")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            metadata: None,
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        encode_hs256(&payload, secret).expect("test secret must not be empty")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// PostgREST row shapes for wiremock-backed store tests.
pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn doctor_profile_response(profile_id: &str, account_id: &str) -> serde_json::Value {
        json!({
            "id": profile_id,
            "account_id": account_id,
            "specialties": ["General Practice"],
            "experience_years": 10,
            "credentials": ["MD123456"],
            "verification_status": "approved",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn availability_day_response(
        doctor_id: &str,
        date: &str,
        version: i64,
        slots: serde_json::Value,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "doctor_id": doctor_id,
            "date": date,
            "slots": slots,
            "version": version,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_response(
        appointment_id: &str,
        patient_account_id: &str,
        doctor_id: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": appointment_id,
            "patient_account_id": patient_account_id,
            "doctor_id": doctor_id,
            "hospital_id": null,
            "modality": "video",
            "start_time": "2024-10-20T10:00:00Z",
            "end_time": "2024-10-20T10:30:00Z",
            "status": status,
            "notes": null,
            "video_room": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code
        })
    }
}
