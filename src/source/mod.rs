// Source Module - Token-Gated Submission Lifecycle
//
// This module implements the contact-source lifecycle (draft -> pending ->
// published/trashed) with dependency injection for the storage, mail, and
// link-building collaborators.

pub mod emails;
pub mod errors;
pub mod memory;
pub mod tokens;
pub mod traits;
pub mod types;
pub mod workflow;


pub use errors::SourceError;
pub use traits::{LinkBuilder, Mailer, SourceStore};
pub use types::{ModerationAction, NewSource, SourceId, SourceRecord, SourceStatus, TokenKind};
pub use workflow::SourceDesk;
