/// Profile API adapter - profile fields, theme, and image uploads
use crate::{
    api::{ApiClient, DataEnvelope},
    error::ClientResult,
    models::{Profile, ProfileUpdate, UploadedImage},
};
use async_trait::async_trait;
use serde_json::json;

/// Transport seam for profile endpoints, mockable in tests
#[async_trait]
pub trait ProfileTransport: Send + Sync {
    async fn get_profile(&self) -> ClientResult<Profile>;
    /// Partial update; unset fields are left untouched server-side
    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<Profile>;
    async fn update_theme(&self, theme: &str) -> ClientResult<Profile>;
    async fn upload_profile_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<UploadedImage>;
    async fn upload_background_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<UploadedImage>;
}

/// HTTP implementation of [`ProfileTransport`]
#[derive(Clone)]
pub struct ProfileApi {
    client: ApiClient,
}

impl ProfileApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn upload(
        &self,
        path: &str,
        file_name: &str,
        bytes: Vec<u8>,
        fallback: &str,
    ) -> ClientResult<UploadedImage> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        self.client.post_multipart(path, form, fallback).await
    }
}

#[async_trait]
impl ProfileTransport for ProfileApi {
    async fn get_profile(&self) -> ClientResult<Profile> {
        let envelope: DataEnvelope<Profile> = self
            .client
            .get_json("/api/profile", "Failed to fetch profile")
            .await?;
        Ok(envelope.data)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<Profile> {
        let envelope: DataEnvelope<Profile> = self
            .client
            .put_json("/api/profile", update, "Failed to update profile")
            .await?;
        Ok(envelope.data)
    }

    async fn update_theme(&self, theme: &str) -> ClientResult<Profile> {
        let envelope: DataEnvelope<Profile> = self
            .client
            .put_json(
                "/api/profile/theme",
                &json!({ "theme": theme }),
                "Failed to update theme",
            )
            .await?;
        Ok(envelope.data)
    }

    async fn upload_profile_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<UploadedImage> {
        self.upload("/api/profile/image", file_name, bytes, "Failed to upload image")
            .await
    }

    async fn upload_background_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<UploadedImage> {
        self.upload(
            "/api/profile/background",
            file_name,
            bytes,
            "Failed to upload background",
        )
        .await
    }
}
