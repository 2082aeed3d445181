/// Wire types exchanged with the Linkdeck backend
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Button rendering style for a public profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Default,
    Outline,
    Filled,
}

/// Authenticated user's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    /// Sequential number used by the backend for public link id generation
    pub user_seq: Option<i64>,
    /// Opaque public link id (e.g. Ab3x2Kq9)
    pub public_link_id: Option<String>,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub background_image_url: Option<String>,
    pub background_color: Option<String>,
    pub theme: String,
    pub button_style: ButtonStyle,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Ordered outbound link entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub display_order: u32,
    pub is_active: bool,
    /// Server-maintained; read-only from the client's perspective
    pub click_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Social platform icon link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub id: String,
    pub user_id: String,
    pub platform: String,
    pub url: String,
    pub display_order: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial profile update payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(length(max = 50))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[validate(length(max = 500))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[validate(length(max = 32))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_style: Option<ButtonStyle>,
}

/// Link creation payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LinkCreate {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(url)]
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// Link update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LinkUpdate {
    #[validate(length(min = 1, max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[validate(url)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Social link creation payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SocialLinkCreate {
    #[validate(length(min = 1, max = 32))]
    pub platform: String,
    #[validate(url)]
    pub url: String,
}

/// Social link update payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SocialLinkUpdate {
    #[validate(url)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Bearer tokens issued on login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

/// Response to an OAuth code exchange or token refresh
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub data: AuthTokens,
    pub user: Profile,
}

/// OAuth login URL response
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthLoginUrl {
    pub success: bool,
    pub login_url: String,
    /// CSRF state parameter, echoed back on the callback
    pub state: String,
}

/// OAuth callback parameters received from the redirect
#[derive(Debug, Clone, Serialize)]
pub struct OAuthCallbackData {
    pub code: String,
    pub state: String,
}

/// Subscription plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionPlan {
    Basic,
    Pro,
}

/// Subscription lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubscriptionState {
    Active,
    Cancelled,
    Expired,
    None,
}

/// Subscription status as reported by the auth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub has_access: bool,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionState,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Uploaded image response
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

/// Public profile as rendered for anonymous visitors
#[derive(Debug, Clone, Deserialize)]
pub struct PublicProfile {
    pub public_link_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub background_image_url: Option<String>,
    pub background_color: Option<String>,
    pub theme: String,
    pub button_style: ButtonStyle,
    pub links: Vec<Link>,
    pub social_links: Vec<SocialLink>,
}

/// Per-link click statistics
#[derive(Debug, Clone, Deserialize)]
pub struct LinkClickStats {
    pub link_id: String,
    pub title: String,
    pub url: String,
    pub click_count: u64,
    pub today_clicks: u64,
    pub week_clicks: u64,
    pub month_clicks: u64,
}

/// Clicks bucketed by day
#[derive(Debug, Clone, Deserialize)]
pub struct DailyClicks {
    pub date: String,
    pub clicks: u64,
}

/// Account-wide click totals
#[derive(Debug, Clone, Deserialize)]
pub struct OverviewStats {
    pub total_clicks: u64,
    pub total_links: u64,
    pub today_clicks: u64,
    pub week_clicks: u64,
    pub month_clicks: u64,
}

/// Full analytics summary
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsSummary {
    pub overview: OverviewStats,
    pub link_stats: Vec<LinkClickStats>,
    pub daily_clicks: Vec<DailyClicks>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_button_style_wire_form() {
        assert_eq!(
            serde_json::to_string(&ButtonStyle::Outline).unwrap(),
            "\"outline\""
        );
        let style: ButtonStyle = serde_json::from_str("\"filled\"").unwrap();
        assert_eq!(style, ButtonStyle::Filled);
    }

    #[test]
    fn test_subscription_status_camel_case() {
        let json = r#"{
            "hasAccess": true,
            "plan": "PRO",
            "status": "ACTIVE",
            "expiresAt": null
        }"#;
        let status: SubscriptionStatus = serde_json::from_str(json).unwrap();
        assert!(status.has_access);
        assert_eq!(status.plan, SubscriptionPlan::Pro);
        assert_eq!(status.status, SubscriptionState::Active);
    }

    #[test]
    fn test_link_create_rejects_invalid_url() {
        let payload = LinkCreate {
            title: "Blog".to_string(),
            url: "not-a-url".to_string(),
            thumbnail_url: None,
        };
        assert!(payload.validate().is_err());

        let payload = LinkCreate {
            title: "Blog".to_string(),
            url: "https://a.example".to_string(),
            thumbnail_url: None,
        };
        assert!(payload.validate().is_ok());
    }
}
