/// Links store - outbound links and social links
///
/// Creations while anonymous synthesize temp-id records and persist the
/// full collections in the session draft buffer; temp-id records are only
/// ever submitted to the backend as creates, never as update/delete
/// targets.
use crate::{
    api::LinksTransport,
    error::{ClientError, ClientResult},
    models::{
        Link, LinkCreate, LinkUpdate, SocialLink, SocialLinkCreate,
        SocialLinkUpdate,
    },
    session::{draft, SessionStore},
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// Links state snapshot
#[derive(Debug, Clone, Default)]
pub struct LinksState {
    pub links: Vec<Link>,
    pub social_links: Vec<SocialLink>,
    pub error: Option<String>,
}

/// Per-session links store
pub struct LinksStore {
    transport: Arc<dyn LinksTransport>,
    storage: Arc<dyn SessionStore>,
    authenticated: Arc<AtomicBool>,
    max_social_links: usize,
    state: RwLock<LinksState>,
}

impl LinksStore {
    pub fn new(
        transport: Arc<dyn LinksTransport>,
        storage: Arc<dyn SessionStore>,
        authenticated: Arc<AtomicBool>,
        max_social_links: usize,
    ) -> Self {
        Self {
            transport,
            storage,
            authenticated,
            max_social_links,
            state: RwLock::new(LinksState::default()),
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> LinksState {
        self.state.read().clone()
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

    /// Persist the full in-memory collections under the links draft key;
    /// failures degrade to memory-only and are never surfaced
    fn persist_draft(&self) {
        let state = self.state.read();
        draft::save_links_draft(&*self.storage, &state.links, &state.social_links);
    }

    pub async fn fetch_links(&self) -> ClientResult<Vec<Link>> {
        let links = self.transport.get_links().await.map_err(|e| {
            self.set_error(&e);
            e
        })?;
        self.state.write().links = links.clone();
        Ok(links)
    }

    pub async fn fetch_social_links(&self) -> ClientResult<Vec<SocialLink>> {
        let social_links = self.transport.get_social_links().await.map_err(|e| {
            self.set_error(&e);
            e
        })?;
        self.state.write().social_links = social_links.clone();
        Ok(social_links)
    }

    /// Add a link
    ///
    /// Authenticated: created on the backend. Anonymous: a temp-id record
    /// is appended with `display_order` equal to the current collection
    /// length and the collections are persisted to the draft buffer.
    pub async fn create_link(&self, title: &str, url: &str) -> ClientResult<Link> {
        let payload = LinkCreate {
            title: title.to_string(),
            url: url.to_string(),
            thumbnail_url: None,
        };
        payload
            .validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;

        if self.is_authenticated() {
            let link = self.transport.create_link(&payload).await.map_err(|e| {
                self.set_error(&e);
                e
            })?;
            self.state.write().links.push(link.clone());
            return Ok(link);
        }

        let link = {
            let mut state = self.state.write();
            let link = draft::draft_link(title, url, state.links.len() as u32);
            state.links.push(link.clone());
            link
        };
        self.persist_draft();
        debug!("Buffered anonymous link '{}'", title);
        Ok(link)
    }

    /// Update a link in place
    ///
    /// Temp-id records are edited locally and re-persisted; real ids
    /// require an authenticated session.
    pub async fn update_link(
        &self,
        link_id: &str,
        update: LinkUpdate,
    ) -> ClientResult<Link> {
        update
            .validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;

        if draft::is_temp_id(link_id) {
            let updated = {
                let mut state = self.state.write();
                let link = state
                    .links
                    .iter_mut()
                    .find(|l| l.id == link_id)
                    .ok_or_else(|| {
                        ClientError::NotFound(format!("Link {}", link_id))
                    })?;
                apply_link_update(link, &update);
                link.clone()
            };
            self.persist_draft();
            return Ok(updated);
        }

        if !self.is_authenticated() {
            return Err(ClientError::Authentication(
                "Sign in to edit links".to_string(),
            ));
        }

        let updated = self
            .transport
            .update_link(link_id, &update)
            .await
            .map_err(|e| {
                self.set_error(&e);
                e
            })?;
        let mut state = self.state.write();
        if let Some(link) = state.links.iter_mut().find(|l| l.id == link_id) {
            *link = updated.clone();
        }
        Ok(updated)
    }

    /// Delete a link
    pub async fn delete_link(&self, link_id: &str) -> ClientResult<()> {
        if draft::is_temp_id(link_id) {
            // display_order is not renumbered; true order is re-derived
            // from array position until the server assigns it on create
            self.state.write().links.retain(|l| l.id != link_id);
            self.persist_draft();
            return Ok(());
        }

        if !self.is_authenticated() {
            return Err(ClientError::Authentication(
                "Sign in to delete links".to_string(),
            ));
        }

        self.transport.delete_link(link_id).await.map_err(|e| {
            self.set_error(&e);
            e
        })?;
        self.state.write().links.retain(|l| l.id != link_id);
        Ok(())
    }

    /// Submit the full ordered id list; authenticated sessions only
    pub async fn reorder_links(&self, link_ids: &[String]) -> ClientResult<()> {
        if !self.is_authenticated() {
            return Err(ClientError::Authentication(
                "Sign in to reorder links".to_string(),
            ));
        }
        if link_ids.iter().any(|id| draft::is_temp_id(id)) {
            return Err(ClientError::Validation(
                "Unsynced links cannot be reordered".to_string(),
            ));
        }

        let links = self.transport.reorder_links(link_ids).await.map_err(|e| {
            self.set_error(&e);
            e
        })?;
        self.state.write().links = links;
        Ok(())
    }

    /// Add a social link, subject to the client-side cap
    ///
    /// The cap is enforced here, before the buffer is touched; the buffer
    /// itself accepts any number of records.
    pub async fn create_social_link(
        &self,
        platform: &str,
        url: &str,
    ) -> ClientResult<SocialLink> {
        if self.state.read().social_links.len() >= self.max_social_links {
            return Err(ClientError::Validation(format!(
                "Social link limit reached ({})",
                self.max_social_links
            )));
        }

        let payload = SocialLinkCreate {
            platform: platform.to_string(),
            url: url.to_string(),
        };
        payload
            .validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;

        if self.is_authenticated() {
            let social = self
                .transport
                .create_social_link(&payload)
                .await
                .map_err(|e| {
                    self.set_error(&e);
                    e
                })?;
            self.state.write().social_links.push(social.clone());
            return Ok(social);
        }

        let social = {
            let mut state = self.state.write();
            let social = draft::draft_social_link(
                platform,
                url,
                state.social_links.len() as u32,
            );
            state.social_links.push(social.clone());
            social
        };
        self.persist_draft();
        debug!("Buffered anonymous social link '{}'", platform);
        Ok(social)
    }

    /// Update a social link in place
    pub async fn update_social_link(
        &self,
        social_link_id: &str,
        update: SocialLinkUpdate,
    ) -> ClientResult<SocialLink> {
        update
            .validate()
            .map_err(|e| ClientError::Validation(e.to_string()))?;

        if draft::is_temp_id(social_link_id) {
            let updated = {
                let mut state = self.state.write();
                let social = state
                    .social_links
                    .iter_mut()
                    .find(|s| s.id == social_link_id)
                    .ok_or_else(|| {
                        ClientError::NotFound(format!(
                            "Social link {}",
                            social_link_id
                        ))
                    })?;
                if let Some(url) = &update.url {
                    social.url = url.clone();
                }
                if let Some(active) = update.is_active {
                    social.is_active = active;
                }
                social.clone()
            };
            self.persist_draft();
            return Ok(updated);
        }

        if !self.is_authenticated() {
            return Err(ClientError::Authentication(
                "Sign in to edit social links".to_string(),
            ));
        }

        let updated = self
            .transport
            .update_social_link(social_link_id, &update)
            .await
            .map_err(|e| {
                self.set_error(&e);
                e
            })?;
        let mut state = self.state.write();
        if let Some(social) = state
            .social_links
            .iter_mut()
            .find(|s| s.id == social_link_id)
        {
            *social = updated.clone();
        }
        Ok(updated)
    }

    /// Delete a social link
    pub async fn delete_social_link(&self, social_link_id: &str) -> ClientResult<()> {
        if draft::is_temp_id(social_link_id) {
            self.state
                .write()
                .social_links
                .retain(|s| s.id != social_link_id);
            self.persist_draft();
            return Ok(());
        }

        if !self.is_authenticated() {
            return Err(ClientError::Authentication(
                "Sign in to delete social links".to_string(),
            ));
        }

        self.transport
            .delete_social_link(social_link_id)
            .await
            .map_err(|e| {
                self.set_error(&e);
                e
            })?;
        self.state
            .write()
            .social_links
            .retain(|s| s.id != social_link_id);
        Ok(())
    }

    /// Re-hydrate buffered collections at session init, before any
    /// network call. Returns whether a draft was adopted. Idempotent.
    pub fn restore_draft(&self) -> bool {
        match draft::load_links_draft(&*self.storage) {
            Some((links, social_links)) => {
                let mut state = self.state.write();
                state.links = links;
                state.social_links = social_links;
                true
            }
            None => false,
        }
    }

    /// Drain buffered creations to the backend
    ///
    /// Each temp-id link is submitted as an individual create in insertion
    /// order, then each temp-id social link. The first failure halts the
    /// drain with the buffer left intact; confirmed records replace their
    /// temp-id counterparts in memory as each create succeeds, so a retry
    /// only re-submits what is still unconfirmed. The draft key is cleared
    /// only after a fully successful pass.
    pub async fn sync_draft_to_server(&self) -> ClientResult<()> {
        let (pending_links, pending_socials) = {
            let state = self.state.read();
            (
                state
                    .links
                    .iter()
                    .filter(|l| draft::is_temp_id(&l.id))
                    .cloned()
                    .collect::<Vec<_>>(),
                state
                    .social_links
                    .iter()
                    .filter(|s| draft::is_temp_id(&s.id))
                    .cloned()
                    .collect::<Vec<_>>(),
            )
        };

        if pending_links.is_empty() && pending_socials.is_empty() {
            // Nothing unconfirmed; drop a stale key if one is around
            if draft::has_links_draft(&*self.storage) {
                draft::clear_links_draft(&*self.storage);
            }
            return Ok(());
        }

        for pending in pending_links {
            let payload = LinkCreate {
                title: pending.title.clone(),
                url: pending.url.clone(),
                thumbnail_url: pending.thumbnail_url.clone(),
            };
            let confirmed =
                self.transport.create_link(&payload).await.map_err(|e| {
                    self.set_error(&e);
                    e
                })?;
            let mut state = self.state.write();
            if let Some(link) =
                state.links.iter_mut().find(|l| l.id == pending.id)
            {
                *link = confirmed;
            }
        }

        for pending in pending_socials {
            let payload = SocialLinkCreate {
                platform: pending.platform.clone(),
                url: pending.url.clone(),
            };
            let confirmed = self
                .transport
                .create_social_link(&payload)
                .await
                .map_err(|e| {
                    self.set_error(&e);
                    e
                })?;
            let mut state = self.state.write();
            if let Some(social) = state
                .social_links
                .iter_mut()
                .find(|s| s.id == pending.id)
            {
                *social = confirmed;
            }
        }

        draft::clear_links_draft(&*self.storage);
        info!("Synced buffered links to server");
        Ok(())
    }
}

fn apply_link_update(link: &mut Link, update: &LinkUpdate) {
    if let Some(title) = &update.title {
        link.title = title.clone();
    }
    if let Some(url) = &update.url {
        link.url = url.clone();
    }
    if let Some(thumbnail) = &update.thumbnail_url {
        link.thumbnail_url = Some(thumbnail.clone());
    }
    if let Some(active) = update.is_active {
        link.is_active = active;
    }
}
