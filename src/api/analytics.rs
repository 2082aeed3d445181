/// Analytics API adapter - click statistics for the dashboard
use crate::{api::ApiClient, error::ClientResult, models::AnalyticsSummary};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AnalyticsEnvelope {
    #[allow(dead_code)]
    success: bool,
    data: AnalyticsSummary,
}

/// HTTP adapter for the analytics endpoint
#[derive(Clone)]
pub struct AnalyticsApi {
    client: ApiClient,
}

impl AnalyticsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the full analytics summary for the current user
    pub async fn get_analytics(&self) -> ClientResult<AnalyticsSummary> {
        let envelope: AnalyticsEnvelope = self
            .client
            .get_json("/api/analytics", "Failed to fetch analytics")
            .await?;
        Ok(envelope.data)
    }
}
