pub mod cloudflare;
pub mod local;
pub mod provider;
pub mod token;

pub use cloudflare::CloudflareRealtimeClient;
pub use local::LocalRoomProvider;
pub use provider::{build_provider, VideoRoomProvider};
pub use token::AccessTokenSigner;
