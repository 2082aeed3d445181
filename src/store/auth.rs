/// Auth store - OAuth login flow and session lifecycle
use crate::{
    api::AuthTransport,
    error::{ClientError, ClientResult},
    models::{AuthTokens, OAuthCallbackData, Profile, SubscriptionStatus},
    session::{keys, SessionStore},
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Auth state snapshot
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<Profile>,
    pub is_authenticated: bool,
    pub subscription: Option<SubscriptionStatus>,
    pub error: Option<String>,
}

/// Per-session authentication store
pub struct AuthStore {
    transport: Arc<dyn AuthTransport>,
    storage: Arc<dyn SessionStore>,
    tokens: Arc<RwLock<Option<AuthTokens>>>,
    authenticated: Arc<AtomicBool>,
    service_code: String,
    state: RwLock<AuthState>,
}

impl AuthStore {
    pub fn new(
        transport: Arc<dyn AuthTransport>,
        storage: Arc<dyn SessionStore>,
        tokens: Arc<RwLock<Option<AuthTokens>>>,
        authenticated: Arc<AtomicBool>,
        service_code: String,
    ) -> Self {
        Self {
            transport,
            storage,
            tokens,
            authenticated,
            service_code,
            state: RwLock::new(AuthState::default()),
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> AuthState {
        self.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    fn set_error(&self, error: &ClientError) {
        self.state.write().error = Some(error.display_message());
    }

    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    /// Begin the OAuth flow: fetch the provider login URL and persist the
    /// CSRF state parameter for verification on the callback. Returns the
    /// URL the caller should redirect to.
    pub async fn start_oauth_login(&self) -> ClientResult<String> {
        let response = self.transport.oauth_login_url().await.map_err(|e| {
            self.set_error(&e);
            e
        })?;

        // A storage failure here only weakens CSRF verification on the
        // callback; the login itself can still proceed.
        if let Err(e) = self.storage.set(keys::OAUTH_STATE, &response.state) {
            warn!("Failed to persist OAuth state: {}", e);
        }

        Ok(response.login_url)
    }

    /// Complete the OAuth flow: verify the state parameter, exchange the
    /// authorization code for tokens, and mark the session authenticated.
    ///
    /// On state mismatch any buffered anonymous edits are retained for a
    /// subsequent login attempt.
    pub async fn handle_oauth_callback(
        &self,
        data: &OAuthCallbackData,
    ) -> ClientResult<Profile> {
        let saved_state = match self.storage.get(keys::OAUTH_STATE) {
            Ok(saved) => saved,
            Err(e) => {
                warn!("Failed to read OAuth state: {}", e);
                None
            }
        };

        if let Some(saved) = saved_state {
            if saved != data.state {
                let _ = self.storage.remove(keys::OAUTH_STATE);
                let error = ClientError::Authentication(
                    "Invalid state parameter. Please try logging in again."
                        .to_string(),
                );
                self.set_error(&error);
                return Err(error);
            }
        }

        let response = self.transport.oauth_callback(data).await.map_err(|e| {
            let _ = self.storage.remove(keys::OAUTH_STATE);
            self.set_error(&e);
            e
        })?;

        *self.tokens.write() = Some(response.data);
        self.authenticated.store(true, Ordering::SeqCst);
        let _ = self.storage.remove(keys::OAUTH_STATE);

        info!("OAuth login completed for {}", response.user.username);

        let mut state = self.state.write();
        state.user = Some(response.user.clone());
        state.is_authenticated = true;
        state.error = None;
        drop(state);

        Ok(response.user)
    }

    /// Restore a session from previously stored tokens
    ///
    /// Any failure clears the tokens and leaves the session anonymous; the
    /// caller sees `Ok(None)` rather than an error.
    pub async fn load_user(&self) -> ClientResult<Option<Profile>> {
        if self.tokens.read().is_none() {
            self.authenticated.store(false, Ordering::SeqCst);
            self.state.write().is_authenticated = false;
            return Ok(None);
        }

        match self.transport.get_me().await {
            Ok(user) => {
                self.authenticated.store(true, Ordering::SeqCst);
                {
                    let mut state = self.state.write();
                    state.user = Some(user.clone());
                    state.is_authenticated = true;
                }
                self.load_subscription().await;
                Ok(Some(user))
            }
            Err(e) => {
                warn!("Stored session is no longer valid: {}", e);
                *self.tokens.write() = None;
                self.authenticated.store(false, Ordering::SeqCst);
                let mut state = self.state.write();
                state.user = None;
                state.is_authenticated = false;
                state.subscription = None;
                Ok(None)
            }
        }
    }

    /// Exchange the refresh token for a new token pair
    pub async fn refresh_session(&self) -> ClientResult<()> {
        let refresh_token = self
            .tokens
            .read()
            .as_ref()
            .map(|t| t.refresh_token.clone())
            .ok_or_else(|| {
                ClientError::Authentication("No session to refresh".to_string())
            })?;

        let response = self
            .transport
            .refresh_token(&refresh_token)
            .await
            .map_err(|e| {
                self.set_error(&e);
                e
            })?;

        *self.tokens.write() = Some(response.data);
        self.authenticated.store(true, Ordering::SeqCst);
        let mut state = self.state.write();
        state.user = Some(response.user);
        state.is_authenticated = true;

        Ok(())
    }

    /// Fetch subscription status; failures leave it unset
    pub async fn load_subscription(&self) {
        if self.tokens.read().is_none() {
            self.state.write().subscription = None;
            return;
        }

        match self.transport.subscription_status(&self.service_code).await {
            Ok(subscription) => {
                self.state.write().subscription = Some(subscription);
            }
            Err(e) => {
                warn!("Failed to load subscription: {}", e);
                self.state.write().subscription = None;
            }
        }
    }

    /// End the session; the server call is best-effort, local state is
    /// always cleared
    pub async fn logout(&self) {
        if let Err(e) = self.transport.logout().await {
            warn!("Logout request failed: {}", e);
        }

        *self.tokens.write() = None;
        self.authenticated.store(false, Ordering::SeqCst);
        let _ = self.storage.remove(keys::OAUTH_STATE);

        let mut state = self.state.write();
        state.user = None;
        state.is_authenticated = false;
        state.subscription = None;
        state.error = None;
    }
}
