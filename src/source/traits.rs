// Traits for dependency injection - separating concerns for testability

use anyhow::Result;

use crate::source::types::{ModerationAction, NewSource, SourceId, SourceRecord, SourceStatus};

/// Record storage interface
///
/// The host platform owns persistence; the workflow only needs create/read/
/// update by id plus string-valued metadata scoped to a record. Concurrent
/// writes to the same record are serialized by the store (last write wins).
pub trait SourceStore {
    /// Persist a new record with status Draft, returning its id
    fn create(&self, new: &NewSource) -> Result<SourceId>;

    /// Fetch a record by id
    fn get(&self, id: SourceId) -> Result<Option<SourceRecord>>;

    /// Update a record's lifecycle status
    fn set_status(&self, id: SourceId, status: SourceStatus) -> Result<()>;

    /// Read a metadata entry scoped to a record
    fn meta(&self, id: SourceId, key: &str) -> Result<Option<String>>;

    /// Write a metadata entry scoped to a record
    fn set_meta(&self, id: SourceId, key: &str, value: &str) -> Result<()>;

    /// Remove a metadata entry scoped to a record
    fn delete_meta(&self, id: SourceId, key: &str) -> Result<()>;

    /// List records in a given status, for the moderation queue
    fn list_by_status(&self, status: SourceStatus) -> Result<Vec<SourceRecord>>;
}

/// Outbound mail interface
///
/// Fire-and-forget: the workflow logs failures and moves on; retry behavior,
/// if any, belongs to the transport.
pub trait Mailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Builds the absolute URLs embedded in outbound emails
pub trait LinkBuilder {
    /// Canonical public URL for a record
    fn permalink(&self, record: &SourceRecord) -> String;

    /// Email-confirmation link carrying the record id and confirm token
    fn confirm_link(&self, id: SourceId, token: &str) -> String;

    /// Self-service edit link carrying the edit token
    fn edit_link(&self, record: &SourceRecord, token: &str) -> String;

    /// Moderation action link carrying the admin token
    fn admin_action_link(&self, action: ModerationAction, id: SourceId, token: &str) -> String;

    /// Site contact page, referenced from outbound emails
    fn contact_link(&self) -> String;
}
