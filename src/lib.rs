/// Linkdeck - headless client for a link-in-bio service
///
/// Provides typed API adapters over the Linkdeck backend, per-session
/// entity stores (auth, profile, links), and a session-scoped draft buffer
/// that preserves edits made before authentication and replays them after
/// OAuth login completes.
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod store;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use store::Session;
