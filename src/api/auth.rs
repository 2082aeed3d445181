/// Auth API adapter - OAuth login, session, and subscription endpoints
use crate::{
    api::{ApiClient, DataEnvelope, MessageResponse},
    error::ClientResult,
    models::{
        AuthResponse, OAuthCallbackData, OAuthLoginUrl, Profile,
        SubscriptionStatus,
    },
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Transport seam for auth endpoints, mockable in tests
#[async_trait]
pub trait AuthTransport: Send + Sync {
    /// Fetch the OAuth login URL and CSRF state parameter
    async fn oauth_login_url(&self) -> ClientResult<OAuthLoginUrl>;

    /// Exchange an authorization code for tokens
    async fn oauth_callback(
        &self,
        data: &OAuthCallbackData,
    ) -> ClientResult<AuthResponse>;

    /// Refresh the session tokens
    async fn refresh_token(&self, refresh_token: &str) -> ClientResult<AuthResponse>;

    /// Fetch the current user
    async fn get_me(&self) -> ClientResult<Profile>;

    /// Invalidate the server-side session
    async fn logout(&self) -> ClientResult<()>;

    /// Fetch subscription status for a service code
    async fn subscription_status(
        &self,
        service_code: &str,
    ) -> ClientResult<SubscriptionStatus>;
}

/// HTTP implementation of [`AuthTransport`]
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct SubscriptionEnvelope {
    #[allow(dead_code)]
    success: bool,
    data: SubscriptionStatus,
}

#[async_trait]
impl AuthTransport for AuthApi {
    async fn oauth_login_url(&self) -> ClientResult<OAuthLoginUrl> {
        self.client
            .get_json("/api/auth/oauth/login", "Failed to start login")
            .await
    }

    async fn oauth_callback(
        &self,
        data: &OAuthCallbackData,
    ) -> ClientResult<AuthResponse> {
        self.client
            .post_json("/api/auth/oauth/callback", data, "Login failed")
            .await
    }

    async fn refresh_token(&self, refresh_token: &str) -> ClientResult<AuthResponse> {
        self.client
            .post_json(
                "/api/auth/oauth/refresh",
                &json!({ "refresh_token": refresh_token }),
                "Failed to refresh session",
            )
            .await
    }

    async fn get_me(&self) -> ClientResult<Profile> {
        let envelope: DataEnvelope<Profile> = self
            .client
            .get_json("/api/auth/me", "Failed to load user")
            .await?;
        Ok(envelope.data)
    }

    async fn logout(&self) -> ClientResult<()> {
        let _: MessageResponse = self
            .client
            .post_empty("/api/auth/logout", "Logout failed")
            .await?;
        Ok(())
    }

    async fn subscription_status(
        &self,
        service_code: &str,
    ) -> ClientResult<SubscriptionStatus> {
        let path = format!(
            "/api/auth/subscription/{}",
            urlencoding::encode(service_code)
        );
        let envelope: SubscriptionEnvelope = self
            .client
            .get_json(&path, "Failed to load subscription")
            .await?;
        Ok(envelope.data)
    }
}
