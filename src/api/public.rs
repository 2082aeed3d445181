/// Public profile API adapter - anonymous visitor endpoints
use crate::{
    api::{ApiClient, DataEnvelope, MessageResponse},
    error::ClientResult,
    models::PublicProfile,
};

/// HTTP adapter for the public, unauthenticated endpoints
#[derive(Clone)]
pub struct PublicApi {
    client: ApiClient,
}

impl PublicApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch a public profile by its opaque public link id
    pub async fn get_public_profile(
        &self,
        public_link_id: &str,
    ) -> ClientResult<PublicProfile> {
        let path = format!("/api/public/{}", urlencoding::encode(public_link_id));
        let envelope: DataEnvelope<PublicProfile> = self
            .client
            .get_json(&path, "Failed to fetch profile")
            .await?;
        Ok(envelope.data)
    }

    /// Record a click on a link; fire-and-forget from the renderer's
    /// perspective, so the caller typically ignores the error
    pub async fn record_click(
        &self,
        public_link_id: &str,
        link_id: &str,
    ) -> ClientResult<()> {
        let path = format!(
            "/api/public/{}/click/{}",
            urlencoding::encode(public_link_id),
            urlencoding::encode(link_id)
        );
        let _: MessageResponse = self
            .client
            .post_empty(&path, "Failed to record click")
            .await?;
        Ok(())
    }
}
