/// Links API adapter - outbound links and social links
use crate::{
    api::{ApiClient, DataEnvelope, MessageResponse},
    error::ClientResult,
    models::{
        Link, LinkCreate, LinkUpdate, SocialLink, SocialLinkCreate,
        SocialLinkUpdate,
    },
};
use async_trait::async_trait;
use serde_json::json;

/// Transport seam for link endpoints, mockable in tests
#[async_trait]
pub trait LinksTransport: Send + Sync {
    async fn get_links(&self) -> ClientResult<Vec<Link>>;
    async fn create_link(&self, data: &LinkCreate) -> ClientResult<Link>;
    async fn update_link(&self, link_id: &str, data: &LinkUpdate) -> ClientResult<Link>;
    async fn delete_link(&self, link_id: &str) -> ClientResult<()>;
    /// Submit the full ordered id list
    async fn reorder_links(&self, link_ids: &[String]) -> ClientResult<Vec<Link>>;

    async fn get_social_links(&self) -> ClientResult<Vec<SocialLink>>;
    async fn create_social_link(
        &self,
        data: &SocialLinkCreate,
    ) -> ClientResult<SocialLink>;
    async fn update_social_link(
        &self,
        social_link_id: &str,
        data: &SocialLinkUpdate,
    ) -> ClientResult<SocialLink>;
    async fn delete_social_link(&self, social_link_id: &str) -> ClientResult<()>;
}

/// HTTP implementation of [`LinksTransport`]
#[derive(Clone)]
pub struct LinksApi {
    client: ApiClient,
}

impl LinksApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinksTransport for LinksApi {
    async fn get_links(&self) -> ClientResult<Vec<Link>> {
        let envelope: DataEnvelope<Vec<Link>> = self
            .client
            .get_json("/api/links", "Failed to fetch links")
            .await?;
        Ok(envelope.data)
    }

    async fn create_link(&self, data: &LinkCreate) -> ClientResult<Link> {
        let envelope: DataEnvelope<Link> = self
            .client
            .post_json("/api/links", data, "Failed to create link")
            .await?;
        Ok(envelope.data)
    }

    async fn update_link(&self, link_id: &str, data: &LinkUpdate) -> ClientResult<Link> {
        let path = format!("/api/links/{}", urlencoding::encode(link_id));
        let envelope: DataEnvelope<Link> = self
            .client
            .put_json(&path, data, "Failed to update link")
            .await?;
        Ok(envelope.data)
    }

    async fn delete_link(&self, link_id: &str) -> ClientResult<()> {
        let path = format!("/api/links/{}", urlencoding::encode(link_id));
        let _: MessageResponse = self
            .client
            .delete_json(&path, "Failed to delete link")
            .await?;
        Ok(())
    }

    async fn reorder_links(&self, link_ids: &[String]) -> ClientResult<Vec<Link>> {
        let envelope: DataEnvelope<Vec<Link>> = self
            .client
            .put_json(
                "/api/links/reorder",
                &json!({ "link_ids": link_ids }),
                "Failed to reorder links",
            )
            .await?;
        Ok(envelope.data)
    }

    async fn get_social_links(&self) -> ClientResult<Vec<SocialLink>> {
        let envelope: DataEnvelope<Vec<SocialLink>> = self
            .client
            .get_json("/api/links/social", "Failed to fetch social links")
            .await?;
        Ok(envelope.data)
    }

    async fn create_social_link(
        &self,
        data: &SocialLinkCreate,
    ) -> ClientResult<SocialLink> {
        let envelope: DataEnvelope<SocialLink> = self
            .client
            .post_json("/api/links/social", data, "Failed to create social link")
            .await?;
        Ok(envelope.data)
    }

    async fn update_social_link(
        &self,
        social_link_id: &str,
        data: &SocialLinkUpdate,
    ) -> ClientResult<SocialLink> {
        let path = format!(
            "/api/links/social/{}",
            urlencoding::encode(social_link_id)
        );
        let envelope: DataEnvelope<SocialLink> = self
            .client
            .put_json(&path, data, "Failed to update social link")
            .await?;
        Ok(envelope.data)
    }

    async fn delete_social_link(&self, social_link_id: &str) -> ClientResult<()> {
        let path = format!(
            "/api/links/social/{}",
            urlencoding::encode(social_link_id)
        );
        let _: MessageResponse = self
            .client
            .delete_json(&path, "Failed to delete social link")
            .await?;
        Ok(())
    }
}
