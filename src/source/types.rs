// Core types for the source submission lifecycle

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::source::errors::SourceError;

/// Opaque record identifier assigned by the store at creation.
pub type SourceId = u64;

/// Lifecycle states of a submitted source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    /// Submitted, awaiting email confirmation
    Draft,
    /// Email confirmed, awaiting moderation
    Pending,
    /// Approved and publicly listed
    Published,
    /// Rejected or withdrawn; terminal
    Trashed,
}

impl SourceStatus {
    /// Label shown in list tables instead of the raw status name.
    pub fn label(self) -> &'static str {
        match self {
            SourceStatus::Draft => "Awaiting Email Confirmation",
            SourceStatus::Pending => "Needs Moderation",
            SourceStatus::Published => "Published",
            SourceStatus::Trashed => "Trashed",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceStatus::Draft => "draft",
            SourceStatus::Pending => "pending",
            SourceStatus::Published => "published",
            SourceStatus::Trashed => "trashed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SourceStatus::Trashed)
    }

    /// Whether the lifecycle permits moving from this status to `next`.
    /// Trash is reachable from every non-terminal status; nothing leaves it.
    pub fn can_become(self, next: SourceStatus) -> bool {
        match (self, next) {
            (SourceStatus::Draft, SourceStatus::Pending) => true,
            (SourceStatus::Pending, SourceStatus::Published) => true,
            (from, SourceStatus::Trashed) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of single-purpose bearer secrets attached to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Proves ownership of the submitted email address; draft-only
    Confirm,
    /// Post-publication self-service edit credential
    Edit,
    /// Authorizes one pending moderation decision
    Admin,
}

impl TokenKind {
    /// Metadata key the secret is stored under.
    pub(crate) fn meta_key(self) -> &'static str {
        match self {
            TokenKind::Confirm => "_source_email_confirm",
            TokenKind::Edit => "_source_edit_key",
            TokenKind::Admin => "_source_admin_nonce",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Confirm => "confirm",
            TokenKind::Edit => "edit",
            TokenKind::Admin => "admin",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenKind {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirm" => Ok(TokenKind::Confirm),
            "edit" => Ok(TokenKind::Edit),
            "admin" => Ok(TokenKind::Admin),
            other => Err(SourceError::InvalidArgument(format!(
                "unknown token kind: {other}"
            ))),
        }
    }
}

/// Moderation decisions available to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModerationAction {
    Publish,
    Trash,
}

impl ModerationAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ModerationAction::Publish => "publish",
            ModerationAction::Trash => "trash",
        }
    }

    /// Target status the action drives the record to.
    pub fn target_status(self) -> SourceStatus {
        match self {
            ModerationAction::Publish => SourceStatus::Published,
            ModerationAction::Trash => SourceStatus::Trashed,
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModerationAction {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "publish" => Ok(ModerationAction::Publish),
            "trash" => Ok(ModerationAction::Trash),
            other => Err(SourceError::InvalidArgument(format!(
                "unknown moderation action: {other}"
            ))),
        }
    }
}

/// A submission as received from the visitor, before persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSource {
    pub name: String,
    pub email: String,
    pub content: String,
}

/// A persisted source record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: SourceId,
    pub name: String,
    /// Contact address, held as record-scoped metadata by the store
    pub email: String,
    pub content: String,
    pub status: SourceStatus,
    pub created_at: DateTime<Utc>,
}

impl SourceRecord {
    pub fn is_publicly_listed(&self) -> bool {
        self.status == SourceStatus::Published
    }
}
