/// Anonymous-edit draft buffer
///
/// Holds edits composed before authentication so they survive reloads
/// within the same session, then hands them to the backend once OAuth
/// login completes. At most one snapshot exists per entity class; repeated
/// edits overwrite the previous snapshot. Storage and parse failures never
/// surface to callers: buffering degrades to memory-only and a corrupt
/// buffer is treated as absent.
use crate::{
    models::{ButtonStyle, Link, Profile, ProfileUpdate, SocialLink},
    session::{keys, SessionStore},
};
use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Prefix marking records that have never been acknowledged by the server.
/// Such records are only ever sent as create payloads, never as
/// update/delete targets.
pub const TEMP_ID_PREFIX: &str = "temp-";

/// Generate a locally-unique synthetic id
///
/// Timestamp plus a random suffix; carries no server-side meaning.
pub fn temp_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!("{}{}-{}", TEMP_ID_PREFIX, Utc::now().timestamp_millis(), suffix)
}

/// True for ids synthesized by [`temp_id`]
pub fn is_temp_id(id: &str) -> bool {
    id.starts_with(TEMP_ID_PREFIX)
}

/// Buffered profile snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub background_color: Option<String>,
    pub button_style: Option<ButtonStyle>,
    pub saved_at: DateTime<Utc>,
}

impl ProfileDraft {
    pub fn from_update(update: &ProfileUpdate) -> Self {
        Self {
            display_name: update.display_name.clone(),
            bio: update.bio.clone(),
            background_color: update.background_color.clone(),
            button_style: update.button_style,
            saved_at: Utc::now(),
        }
    }

    /// Merge a partial update onto this snapshot, last write wins
    pub fn merge(&mut self, update: &ProfileUpdate) {
        if update.display_name.is_some() {
            self.display_name = update.display_name.clone();
        }
        if update.bio.is_some() {
            self.bio = update.bio.clone();
        }
        if update.background_color.is_some() {
            self.background_color = update.background_color.clone();
        }
        if update.button_style.is_some() {
            self.button_style = update.button_style;
        }
        self.saved_at = Utc::now();
    }

    /// The combined update call sent during drain
    pub fn as_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            display_name: self.display_name.clone(),
            bio: self.bio.clone(),
            background_color: self.background_color.clone(),
            button_style: self.button_style,
        }
    }

    /// Idempotence guard: true when every buffered field already matches
    /// the server profile, in which case the drain skips the update call
    pub fn matches_profile(&self, profile: &Profile) -> bool {
        if let Some(name) = &self.display_name {
            if profile.display_name.as_deref() != Some(name.as_str()) {
                return false;
            }
        }
        if let Some(bio) = &self.bio {
            if profile.bio.as_deref() != Some(bio.as_str()) {
                return false;
            }
        }
        if let Some(color) = &self.background_color {
            if profile.background_color.as_deref() != Some(color.as_str()) {
                return false;
            }
        }
        if let Some(style) = self.button_style {
            if profile.button_style != style {
                return false;
            }
        }
        true
    }
}

/// Wire form of the links draft: one JSON array holding both link-shaped
/// and social-link-shaped records, synthetic ids included
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DraftRecord {
    Link(Link),
    Social(SocialLink),
}

/// Synthesize an unconfirmed link appended at the given position
pub fn draft_link(title: &str, url: &str, display_order: u32) -> Link {
    Link {
        id: temp_id(),
        user_id: String::new(),
        title: title.to_string(),
        url: url.to_string(),
        thumbnail_url: None,
        display_order,
        is_active: true,
        click_count: 0,
        created_at: Utc::now(),
        updated_at: None,
    }
}

/// Synthesize an unconfirmed social link appended at the given position
pub fn draft_social_link(platform: &str, url: &str, display_order: u32) -> SocialLink {
    SocialLink {
        id: temp_id(),
        user_id: String::new(),
        platform: platform.to_string(),
        url: url.to_string(),
        display_order,
        is_active: true,
        created_at: Utc::now(),
        updated_at: None,
    }
}

/// Persist the profile snapshot, overwriting any previous one
pub fn save_profile_draft(storage: &dyn SessionStore, draft: &ProfileDraft) {
    let json = match serde_json::to_string(draft) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize profile draft: {}", e);
            return;
        }
    };
    if let Err(e) = storage.set(keys::PROFILE_DRAFT, &json) {
        warn!("Failed to persist profile draft, edits are memory-only: {}", e);
    }
}

/// Read back the profile snapshot; a corrupt buffer is treated as absent
pub fn load_profile_draft(storage: &dyn SessionStore) -> Option<ProfileDraft> {
    let json = match storage.get(keys::PROFILE_DRAFT) {
        Ok(json) => json?,
        Err(e) => {
            warn!("Failed to read profile draft: {}", e);
            return None;
        }
    };
    match serde_json::from_str(&json) {
        Ok(draft) => Some(draft),
        Err(e) => {
            warn!("Discarding corrupt profile draft: {}", e);
            None
        }
    }
}

pub fn clear_profile_draft(storage: &dyn SessionStore) {
    if let Err(e) = storage.remove(keys::PROFILE_DRAFT) {
        warn!("Failed to clear profile draft: {}", e);
    }
}

/// Persist the full in-memory collections (not a delta) under the links key
pub fn save_links_draft(
    storage: &dyn SessionStore,
    links: &[Link],
    social_links: &[SocialLink],
) {
    let records: Vec<DraftRecord> = links
        .iter()
        .cloned()
        .map(DraftRecord::Link)
        .chain(social_links.iter().cloned().map(DraftRecord::Social))
        .collect();

    let json = match serde_json::to_string(&records) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize links draft: {}", e);
            return;
        }
    };
    if let Err(e) = storage.set(keys::LINKS_DRAFT, &json) {
        warn!("Failed to persist links draft, edits are memory-only: {}", e);
    }
}

/// Read back the buffered collections, partitioned by record shape
pub fn load_links_draft(
    storage: &dyn SessionStore,
) -> Option<(Vec<Link>, Vec<SocialLink>)> {
    let json = match storage.get(keys::LINKS_DRAFT) {
        Ok(json) => json?,
        Err(e) => {
            warn!("Failed to read links draft: {}", e);
            return None;
        }
    };
    let records: Vec<DraftRecord> = match serde_json::from_str(&json) {
        Ok(records) => records,
        Err(e) => {
            warn!("Discarding corrupt links draft: {}", e);
            return None;
        }
    };

    let mut links = Vec::new();
    let mut social_links = Vec::new();
    for record in records {
        match record {
            DraftRecord::Link(link) => links.push(link),
            DraftRecord::Social(social) => social_links.push(social),
        }
    }
    debug!(
        "Restored links draft: {} links, {} social links",
        links.len(),
        social_links.len()
    );
    Some((links, social_links))
}

pub fn clear_links_draft(storage: &dyn SessionStore) {
    if let Err(e) = storage.remove(keys::LINKS_DRAFT) {
        warn!("Failed to clear links draft: {}", e);
    }
}

/// True when the links draft key is present in storage
pub fn has_links_draft(storage: &dyn SessionStore) -> bool {
    matches!(storage.get(keys::LINKS_DRAFT), Ok(Some(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use std::collections::HashSet;

    #[test]
    fn test_temp_ids_are_prefixed_and_distinct() {
        let ids: HashSet<String> = (0..100).map(|_| temp_id()).collect();
        assert_eq!(ids.len(), 100);
        for id in &ids {
            assert!(is_temp_id(id));
        }
        assert!(!is_temp_id("a1b2c3d4"));
    }

    #[test]
    fn test_profile_draft_merge_last_write_wins() {
        let mut draft = ProfileDraft::from_update(&ProfileUpdate {
            display_name: Some("Ava".to_string()),
            bio: Some("hello".to_string()),
            ..ProfileUpdate::default()
        });

        draft.merge(&ProfileUpdate {
            display_name: Some("Ava Lee".to_string()),
            background_color: Some("#112233".to_string()),
            ..ProfileUpdate::default()
        });

        assert_eq!(draft.display_name.as_deref(), Some("Ava Lee"));
        assert_eq!(draft.bio.as_deref(), Some("hello"));
        assert_eq!(draft.background_color.as_deref(), Some("#112233"));
        assert_eq!(draft.button_style, None);
    }

    #[test]
    fn test_links_draft_round_trip_partition() {
        let storage = MemorySessionStore::new();
        let links = vec![
            draft_link("Blog", "https://a.example", 0),
            draft_link("Shop", "https://b.example", 1),
        ];
        let socials = vec![draft_social_link("github", "https://gh.example", 0)];

        save_links_draft(&storage, &links, &socials);
        let (restored_links, restored_socials) =
            load_links_draft(&storage).unwrap();

        assert_eq!(restored_links, links);
        assert_eq!(restored_socials, socials);
    }

    #[test]
    fn test_corrupt_draft_treated_as_absent() {
        let storage = MemorySessionStore::new();
        storage.set(keys::PROFILE_DRAFT, "{not json").unwrap();
        storage.set(keys::LINKS_DRAFT, "[42, true]").unwrap();

        assert!(load_profile_draft(&storage).is_none());
        assert!(load_links_draft(&storage).is_none());
    }

    #[test]
    fn test_buffer_layer_has_no_social_cap() {
        // Cap enforcement is a caller responsibility; the buffer itself
        // accepts any number of records.
        let storage = MemorySessionStore::new();
        let socials: Vec<SocialLink> = (0..8)
            .map(|i| draft_social_link("x", "https://x.example", i))
            .collect();
        save_links_draft(&storage, &[], &socials);

        let (_, restored) = load_links_draft(&storage).unwrap();
        assert_eq!(restored.len(), 8);
    }

    #[test]
    fn test_matches_profile_guard() {
        let profile = serde_json::from_value::<Profile>(serde_json::json!({
            "id": "u1",
            "user_seq": 1,
            "public_link_id": "Ab3x2Kq9",
            "username": "ava",
            "email": "ava@example.com",
            "display_name": "Ava",
            "bio": null,
            "profile_image_url": null,
            "background_image_url": null,
            "background_color": "#000000",
            "theme": "default",
            "button_style": "default",
            "is_active": true,
            "is_admin": false,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": null
        }))
        .unwrap();

        let matching = ProfileDraft::from_update(&ProfileUpdate {
            display_name: Some("Ava".to_string()),
            background_color: Some("#000000".to_string()),
            ..ProfileUpdate::default()
        });
        assert!(matching.matches_profile(&profile));

        let diverged = ProfileDraft::from_update(&ProfileUpdate {
            display_name: Some("Someone Else".to_string()),
            ..ProfileUpdate::default()
        });
        assert!(!diverged.matches_profile(&profile));
    }
}
