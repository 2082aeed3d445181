/// Profile store - display fields, theme, and image uploads
///
/// Mutations run directly against the backend while authenticated; while
/// anonymous they are merged into the session draft buffer and replayed
/// after login.
use crate::{
    api::ProfileTransport,
    error::{ClientError, ClientResult},
    models::{Profile, ProfileUpdate},
    session::{draft, SessionStore},
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// Profile state snapshot
#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub error: Option<String>,
}

/// Per-session profile store
pub struct ProfileStore {
    transport: Arc<dyn ProfileTransport>,
    storage: Arc<dyn SessionStore>,
    authenticated: Arc<AtomicBool>,
    state: RwLock<ProfileState>,
    /// In-memory mirror of the buffered snapshot
    draft: RwLock<Option<draft::ProfileDraft>>,
}

impl ProfileStore {
    pub fn new(
        transport: Arc<dyn ProfileTransport>,
        storage: Arc<dyn SessionStore>,
        authenticated: Arc<AtomicBool>,
    ) -> Self {
        Self {
            transport,
            storage,
            authenticated,
            state: RwLock::new(ProfileState::default()),
            draft: RwLock::new(None),
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> ProfileState {
        self.state.read().clone()
    }

    /// Current buffered snapshot, if any
    pub fn draft(&self) -> Option<draft::ProfileDraft> {
        self.draft.read().clone()
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    fn set_error(&self, error: &ClientError) {
        self.state.write().error = Some(error.display_message());
    }

    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    pub async fn fetch_profile(&self) -> ClientResult<Profile> {
        let profile = self.transport.get_profile().await.map_err(|e| {
            self.set_error(&e);
            e
        })?;
        self.state.write().profile = Some(profile.clone());
        Ok(profile)
    }

    /// Apply a partial update
    ///
    /// Authenticated: sent to the backend, local state adopts the
    /// response. Anonymous: merged into the draft buffer (last write wins)
    /// and applied optimistically to local state; persistence failures
    /// degrade to memory-only and are never surfaced.
    pub async fn update_profile(&self, update: ProfileUpdate) -> ClientResult<()> {
        update
            .validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;

        if self.is_authenticated() {
            let profile = self.transport.update_profile(&update).await.map_err(|e| {
                self.set_error(&e);
                e
            })?;
            self.state.write().profile = Some(profile);
            return Ok(());
        }

        self.buffer_edit(&update);
        Ok(())
    }

    /// Merge the partial update onto the buffered snapshot and persist it
    fn buffer_edit(&self, update: &ProfileUpdate) {
        let mut guard = self.draft.write();
        match guard.as_mut() {
            Some(existing) => existing.merge(update),
            None => *guard = Some(draft::ProfileDraft::from_update(update)),
        }
        let snapshot = guard.clone();
        drop(guard);

        // Optimistic local view for the current page session
        if let Some(profile) = self.state.write().profile.as_mut() {
            if let Some(name) = &update.display_name {
                profile.display_name = Some(name.clone());
            }
            if let Some(bio) = &update.bio {
                profile.bio = Some(bio.clone());
            }
            if let Some(color) = &update.background_color {
                profile.background_color = Some(color.clone());
            }
            if let Some(style) = update.button_style {
                profile.button_style = style;
            }
        }

        if let Some(snapshot) = snapshot {
            draft::save_profile_draft(&*self.storage, &snapshot);
            debug!("Buffered anonymous profile edit");
        }
    }

    /// Re-hydrate the buffered snapshot at session init, before any
    /// network call. Returns whether a draft was adopted. Idempotent.
    pub fn restore_draft(&self) -> bool {
        match draft::load_profile_draft(&*self.storage) {
            Some(restored) => {
                *self.draft.write() = Some(restored);
                true
            }
            None => false,
        }
    }

    /// Drain the buffered profile snapshot to the backend
    ///
    /// Fetches the server profile first and skips the update call when the
    /// buffered fields already match. The buffer is cleared only on
    /// success; on failure it is left intact for the next login attempt.
    pub async fn sync_draft_to_server(&self) -> ClientResult<()> {
        let pending = match self.draft.read().clone() {
            Some(pending) => Some(pending),
            None => draft::load_profile_draft(&*self.storage),
        };
        let Some(pending) = pending else {
            return Ok(());
        };

        let server_profile = self.transport.get_profile().await.map_err(|e| {
            self.set_error(&e);
            e
        })?;

        if pending.matches_profile(&server_profile) {
            debug!("Buffered profile matches server state, skipping update");
            self.state.write().profile = Some(server_profile);
        } else {
            let updated = self
                .transport
                .update_profile(&pending.as_update())
                .await
                .map_err(|e| {
                    self.set_error(&e);
                    e
                })?;
            info!("Synced buffered profile edit to server");
            self.state.write().profile = Some(updated);
        }

        draft::clear_profile_draft(&*self.storage);
        *self.draft.write() = None;
        Ok(())
    }

    /// Update the theme; authenticated sessions only
    pub async fn update_theme(&self, theme: &str) -> ClientResult<()> {
        if !self.is_authenticated() {
            return Err(ClientError::Authentication(
                "Sign in to change the theme".to_string(),
            ));
        }
        let profile = self.transport.update_theme(theme).await.map_err(|e| {
            self.set_error(&e);
            e
        })?;
        self.state.write().profile = Some(profile);
        Ok(())
    }

    /// Upload a profile image; authenticated sessions only
    pub async fn upload_profile_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<String> {
        if !self.is_authenticated() {
            return Err(ClientError::Authentication(
                "Sign in to upload images".to_string(),
            ));
        }
        let uploaded = self
            .transport
            .upload_profile_image(file_name, bytes)
            .await
            .map_err(|e| {
                self.set_error(&e);
                e
            })?;
        if let Some(profile) = self.state.write().profile.as_mut() {
            profile.profile_image_url = Some(uploaded.url.clone());
        }
        Ok(uploaded.url)
    }

    /// Upload a background image; authenticated sessions only
    pub async fn upload_background_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<String> {
        if !self.is_authenticated() {
            return Err(ClientError::Authentication(
                "Sign in to upload images".to_string(),
            ));
        }
        let uploaded = self
            .transport
            .upload_background_image(file_name, bytes)
            .await
            .map_err(|e| {
                self.set_error(&e);
                e
            })?;
        if let Some(profile) = self.state.write().profile.as_mut() {
            profile.background_image_url = Some(uploaded.url.clone());
        }
        Ok(uploaded.url)
    }
}
