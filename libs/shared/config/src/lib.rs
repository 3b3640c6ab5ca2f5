use std::env;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Supabase,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoProviderKind {
    Local,
    Cloudflare,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub storage_backend: StorageBackend,
    pub server_port: u16,
    pub video_provider: VideoProviderKind,
    pub video_token_secret: String,
    pub video_token_ttl_minutes: i64,
    pub video_join_window_minutes: i64,
    pub reservation_max_attempts: u32,
    pub cloudflare_realtime_app_id: String,
    pub cloudflare_realtime_api_token: String,
    pub cloudflare_realtime_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            storage_backend: match env::var("STORAGE_BACKEND").as_deref() {
                Ok("memory") => StorageBackend::Memory,
                Ok("supabase") => StorageBackend::Supabase,
                Ok(other) => {
                    warn!("Unknown STORAGE_BACKEND '{}', using supabase", other);
                    StorageBackend::Supabase
                }
                Err(_) => StorageBackend::Supabase,
            },
            server_port: parse_or("PORT", 3000),
            video_provider: match env::var("VIDEO_PROVIDER").as_deref() {
                Ok("cloudflare") => VideoProviderKind::Cloudflare,
                Ok("local") | Err(_) => VideoProviderKind::Local,
                Ok(other) => {
                    warn!("Unknown VIDEO_PROVIDER '{}', using local rooms", other);
                    VideoProviderKind::Local
                }
            },
            video_token_secret: env::var("VIDEO_TOKEN_SECRET")
                .unwrap_or_else(|_| {
                    warn!("VIDEO_TOKEN_SECRET not set, using empty value");
                    String::new()
                }),
            video_token_ttl_minutes: parse_or("VIDEO_TOKEN_TTL_MINUTES", 60),
            video_join_window_minutes: parse_or("VIDEO_JOIN_WINDOW_MINUTES", 15),
            reservation_max_attempts: parse_or("RESERVATION_MAX_ATTEMPTS", 3),
            cloudflare_realtime_app_id: env::var("CLOUDFLARE_REALTIME_APP_ID")
                .unwrap_or_default(),
            cloudflare_realtime_api_token: env::var("CLOUDFLARE_REALTIME_API_TOKEN")
                .unwrap_or_default(),
            cloudflare_realtime_base_url: env::var("CLOUDFLARE_REALTIME_BASE_URL")
                .unwrap_or_else(|_| "https://rtc.live.cloudflare.com/v1".to_string()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        if config.video_provider == VideoProviderKind::Cloudflare
            && !config.is_video_conferencing_configured()
        {
            warn!("VIDEO_PROVIDER=cloudflare but Cloudflare Realtime credentials are missing");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        let storage_ready = match self.storage_backend {
            StorageBackend::Memory => true,
            StorageBackend::Supabase => {
                !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
            }
        };

        storage_ready
            && !self.supabase_jwt_secret.is_empty()
            && !self.video_token_secret.is_empty()
    }

    pub fn is_video_conferencing_configured(&self) -> bool {
        !self.cloudflare_realtime_app_id.is_empty()
            && !self.cloudflare_realtime_api_token.is_empty()
            && !self.cloudflare_realtime_base_url.is_empty()
    }
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
