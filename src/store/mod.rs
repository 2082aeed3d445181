/// Client-side entity stores and the session context
///
/// The session context replaces the original product's process-global
/// singleton stores: all state is scoped to one `Session`, whose lifetime
/// matches the browser session it models.
pub mod auth;
pub mod links;
pub mod profile;

pub use auth::{AuthState, AuthStore};
pub use links::{LinksState, LinksStore};
pub use profile::{ProfileState, ProfileStore};

use crate::{
    api::{
        AnalyticsApi, ApiClient, AuthApi, AuthTransport, LinksApi,
        LinksTransport, ProfileApi, ProfileTransport, PublicApi,
    },
    config::ClientConfig,
    error::ClientResult,
    models::{OAuthCallbackData, Profile},
    session::{MemorySessionStore, SessionStore},
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

/// One user's session: stores, adapters, and the draft buffer storage
pub struct Session {
    pub auth: AuthStore,
    pub profile: ProfileStore,
    pub links: LinksStore,
    pub public: PublicApi,
    pub analytics: AnalyticsApi,
}

impl Session {
    /// Create a session over the HTTP adapters with in-memory session
    /// storage
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;
        let client = ApiClient::new(&config)?;
        let storage: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        Ok(Self::assemble(
            &config,
            client.clone(),
            Arc::new(AuthApi::new(client.clone())),
            Arc::new(ProfileApi::new(client.clone())),
            Arc::new(LinksApi::new(client)),
            storage,
        ))
    }

    /// Create a session with explicit transports and storage; used by
    /// tests and alternative backends
    pub fn with_parts(
        config: &ClientConfig,
        auth_transport: Arc<dyn AuthTransport>,
        profile_transport: Arc<dyn ProfileTransport>,
        links_transport: Arc<dyn LinksTransport>,
        storage: Arc<dyn SessionStore>,
    ) -> ClientResult<Self> {
        let client = ApiClient::new(config)?;
        Ok(Self::assemble(
            config,
            client,
            auth_transport,
            profile_transport,
            links_transport,
            storage,
        ))
    }

    fn assemble(
        config: &ClientConfig,
        client: ApiClient,
        auth_transport: Arc<dyn AuthTransport>,
        profile_transport: Arc<dyn ProfileTransport>,
        links_transport: Arc<dyn LinksTransport>,
        storage: Arc<dyn SessionStore>,
    ) -> Self {
        let authenticated = Arc::new(AtomicBool::new(false));

        let auth = AuthStore::new(
            auth_transport,
            Arc::clone(&storage),
            client.tokens(),
            Arc::clone(&authenticated),
            config.service_code.clone(),
        );
        let profile = ProfileStore::new(
            profile_transport,
            Arc::clone(&storage),
            Arc::clone(&authenticated),
        );
        let links = LinksStore::new(
            links_transport,
            storage,
            authenticated,
            config.max_social_links,
        );

        Self {
            auth,
            profile,
            links,
            public: PublicApi::new(client.clone()),
            analytics: AnalyticsApi::new(client),
        }
    }

    /// Initialize the session: re-hydrate any anonymous drafts from
    /// session storage (before any network call), then try to restore an
    /// authenticated session from stored tokens
    pub async fn init(&self) -> ClientResult<Option<Profile>> {
        self.profile.restore_draft();
        self.links.restore_draft();
        self.auth.load_user().await
    }

    /// Complete an OAuth login and drain buffered anonymous edits
    ///
    /// A drain failure does not fail the login; the buffer is left intact
    /// and will be retried on the next successful authentication.
    pub async fn handle_oauth_callback(
        &self,
        data: &OAuthCallbackData,
    ) -> ClientResult<Profile> {
        let user = self.auth.handle_oauth_callback(data).await?;

        if let Err(e) = self.sync_drafts().await {
            warn!("Failed to sync session drafts to server: {}", e);
        }

        Ok(user)
    }

    /// Drain buffered anonymous edits in fixed order: profile fields
    /// first, then links, then social links. Strictly sequential; halts
    /// on the first failure with the remaining buffer intact.
    pub async fn sync_drafts(&self) -> ClientResult<()> {
        self.profile.sync_draft_to_server().await?;
        self.links.sync_draft_to_server().await?;
        Ok(())
    }
}
