// Source lifecycle operations
//
// All state lives in the store; this struct owns the collaborators and drives
// the token-gated transitions. Inputs arrive already parsed and validated by
// the calling adapter, and boolean results map back to rendered notices there.

use crate::config::SourcedeskConfig;
use crate::source::emails::{self, Email};
use crate::source::errors::SourceError;
use crate::source::tokens;
use crate::source::traits::{LinkBuilder, Mailer, SourceStore};
use crate::source::types::{
    ModerationAction, NewSource, SourceId, SourceRecord, SourceStatus, TokenKind,
};

const META_EMAIL: &str = "_source_email";

/// The submission desk: create, confirm, moderate, and edit-gate records.
#[derive(Debug)]
pub struct SourceDesk<S, M, L> {
    config: SourcedeskConfig,
    store: S,
    mailer: M,
    links: L,
}

impl<S, M, L> SourceDesk<S, M, L>
where
    S: SourceStore,
    M: Mailer,
    L: LinkBuilder,
{
    pub fn new(config: SourcedeskConfig, store: S, mailer: M, links: L) -> Self {
        Self {
            config,
            store,
            mailer,
            links,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    pub fn links(&self) -> &L {
        &self.links
    }

    /// Load a record by id.
    pub fn record(&self, id: SourceId) -> Result<SourceRecord, SourceError> {
        self.store
            .get(id)
            .map_err(SourceError::Persistence)?
            .ok_or(SourceError::NotFound { id })
    }

    /// Records waiting on a moderation decision.
    pub fn moderation_queue(&self) -> Result<Vec<SourceRecord>, SourceError> {
        self.store
            .list_by_status(SourceStatus::Pending)
            .map_err(SourceError::Persistence)
    }

    /// Accept a new submission.
    ///
    /// Persists the record as Draft, stores the contact address as record
    /// metadata, issues a confirm token, and emails the confirmation link.
    pub fn submit(&self, new: NewSource) -> Result<SourceRecord, SourceError> {
        let id = self.store.create(&new).map_err(SourceError::Persistence)?;
        self.store
            .set_meta(id, META_EMAIL, &new.email)
            .map_err(SourceError::Persistence)?;

        tracing::info!(source = id, status = %SourceStatus::Draft, "source submitted");

        let token = self.generate_token(id, TokenKind::Confirm)?;
        let mail = emails::confirmation(
            &self.config.site.name,
            &self.links.confirm_link(id, &token),
        );
        self.dispatch(&new.email, &mail);

        self.record(id)
    }

    /// Process an attempt to confirm an email address.
    ///
    /// On a matching confirm token: the token is consumed, the record moves to
    /// Pending, and the operator is emailed publish/trash links carrying the
    /// admin token. Any mismatch leaves the record untouched.
    pub fn confirm_email(&self, id: SourceId, supplied: &str) -> Result<bool, SourceError> {
        let Some(record) = self.store.get(id).map_err(SourceError::Persistence)? else {
            tracing::debug!(source = id, "confirmation attempt for unknown record");
            return Ok(false);
        };

        if !self.validate_token(id, TokenKind::Confirm, supplied)? {
            tracing::debug!(source = id, "confirmation token mismatch");
            return Ok(false);
        }
        if !record.status.can_become(SourceStatus::Pending) {
            tracing::warn!(source = id, status = %record.status, "confirmation on non-draft record");
            return Ok(false);
        }

        self.delete_token(id, TokenKind::Confirm)?;
        self.set_status(id, record.status, SourceStatus::Pending)?;

        let admin_token = self.force_token(id, TokenKind::Admin)?;
        let mail = emails::moderation(
            &self.config.site.name,
            &record,
            &self
                .links
                .admin_action_link(ModerationAction::Publish, id, &admin_token),
            &self
                .links
                .admin_action_link(ModerationAction::Trash, id, &admin_token),
        );
        self.dispatch(&self.config.operator.email, &mail);

        Ok(true)
    }

    /// Execute a moderation decision, gated by the admin token.
    ///
    /// Publish consumes the admin token, issues the edit token on the first
    /// publish, and sends the listing-live email exactly once. Trash consumes
    /// the admin token and sends nothing. A stale or wrong token is a no-op.
    pub fn moderate(
        &self,
        id: SourceId,
        action: ModerationAction,
        supplied: &str,
    ) -> Result<bool, SourceError> {
        let Some(record) = self.store.get(id).map_err(SourceError::Persistence)? else {
            tracing::debug!(source = id, "moderation attempt for unknown record");
            return Ok(false);
        };

        if !self.validate_token(id, TokenKind::Admin, supplied)? {
            tracing::debug!(source = id, action = %action, "admin token mismatch");
            return Ok(false);
        }
        if !record.status.can_become(action.target_status()) {
            tracing::warn!(source = id, status = %record.status, action = %action, "moderation on ineligible record");
            return Ok(false);
        }

        self.delete_token(id, TokenKind::Admin)?;

        match action {
            ModerationAction::Publish => {
                // The edit token doubles as the "approval email already sent"
                // marker, so re-publishing can never resend.
                let first_publish = self.token(id, TokenKind::Edit)?.is_none();
                self.set_status(id, record.status, SourceStatus::Published)?;

                if first_publish {
                    let edit_token = self.generate_token(id, TokenKind::Edit)?;
                    let published = self.record(id)?;
                    let mail = emails::published(
                        &self.config.site.name,
                        &self.links.permalink(&published),
                        &self.links.edit_link(&published, &edit_token),
                        &self.links.contact_link(),
                    );
                    self.dispatch(&published.email, &mail);
                }
            }
            ModerationAction::Trash => {
                self.set_status(id, record.status, SourceStatus::Trashed)?;
            }
        }

        Ok(true)
    }

    /// Check an edit-view request against the edit token.
    ///
    /// True means the caller renders the editable view; false means the
    /// standard public view. Never mutates status. The token is lazily issued
    /// on first check to cover records published before edit tokens existed.
    pub fn request_edit(&self, id: SourceId, supplied: &str) -> Result<bool, SourceError> {
        if self.store.get(id).map_err(SourceError::Persistence)?.is_none() {
            return Ok(false);
        }

        let expected = self.force_token(id, TokenKind::Edit)?;
        Ok(tokens::secrets_match(supplied, Some(&expected)))
    }

    // ---- token primitives ----

    /// Read the current secret for `kind`, if any.
    pub fn token(&self, id: SourceId, kind: TokenKind) -> Result<Option<String>, SourceError> {
        self.store
            .meta(id, kind.meta_key())
            .map_err(SourceError::Persistence)
    }

    /// Read the secret for `kind`, generating and persisting one if absent.
    pub fn force_token(&self, id: SourceId, kind: TokenKind) -> Result<String, SourceError> {
        if let Some(existing) = self.token(id, kind)? {
            return Ok(existing);
        }
        self.generate_token(id, kind)
    }

    /// Generate a fresh secret for `kind`, overwriting any prior value.
    pub fn generate_token(&self, id: SourceId, kind: TokenKind) -> Result<String, SourceError> {
        let secret = tokens::generate_secret(self.config.tokens.length);
        self.store
            .set_meta(id, kind.meta_key(), &secret)
            .map_err(SourceError::Persistence)?;
        tracing::debug!(source = id, kind = %kind, "token issued");
        Ok(secret)
    }

    /// Remove the secret for `kind`; later reads see absence.
    pub fn delete_token(&self, id: SourceId, kind: TokenKind) -> Result<(), SourceError> {
        self.store
            .delete_meta(id, kind.meta_key())
            .map_err(SourceError::Persistence)?;
        tracing::debug!(source = id, kind = %kind, "token deleted");
        Ok(())
    }

    /// Strict validation of a supplied secret for `kind`.
    pub fn validate_token(
        &self,
        id: SourceId,
        kind: TokenKind,
        supplied: &str,
    ) -> Result<bool, SourceError> {
        let stored = self.token(id, kind)?;
        Ok(tokens::secrets_match(supplied, stored.as_deref()))
    }

    // ---- internals ----

    fn set_status(
        &self,
        id: SourceId,
        from: SourceStatus,
        to: SourceStatus,
    ) -> Result<(), SourceError> {
        self.store
            .set_status(id, to)
            .map_err(SourceError::Persistence)?;
        tracing::info!(source = id, from = %from, to = %to, "status transition");
        Ok(())
    }

    fn dispatch(&self, to: &str, mail: &Email) {
        if let Err(err) = self.mailer.send(to, &mail.subject, &mail.body) {
            tracing::warn!(error = %err, "mail dispatch failed");
        }
    }
}
