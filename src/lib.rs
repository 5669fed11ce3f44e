// Sourcedesk Library - Contact-Source Submission & Moderation
// This exposes the core components for testing and integration

pub mod config;
pub mod source;
pub mod telemetry;

// Re-export key types for easy access
pub use config::{config, init_config, SourcedeskConfig};
pub use source::memory::{MemoryMailer, MemoryStore, SentMail, SiteLinks};
pub use source::{
    LinkBuilder, Mailer, ModerationAction, NewSource, SourceDesk, SourceError, SourceId,
    SourceRecord, SourceStatus, SourceStore, TokenKind,
};
pub use telemetry::init_telemetry;
