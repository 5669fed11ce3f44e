// In-memory collaborator implementations - no side effects
//
// MemoryStore and MemoryMailer back the test suites; SiteLinks is the stock
// query-string link builder for sites that route on id + token parameters.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use crate::source::traits::{LinkBuilder, Mailer, SourceStore};
use crate::source::types::{ModerationAction, NewSource, SourceId, SourceRecord, SourceStatus};

const META_EMAIL: &str = "_source_email";

#[derive(Debug, Clone)]
struct StoredRecord {
    name: String,
    content: String,
    status: SourceStatus,
    created_at: DateTime<Utc>,
}

/// Record store holding everything in RefCell-backed maps
#[derive(Debug, Default)]
pub struct MemoryStore {
    next_id: Cell<SourceId>,
    records: RefCell<HashMap<SourceId, StoredRecord>>,
    meta: RefCell<HashMap<(SourceId, String), String>>,
    fail_creates: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `create` calls fail, to exercise the persistence
    /// error path.
    pub fn reject_creates(&self, reject: bool) {
        self.fail_creates.set(reject);
    }

    fn assemble(&self, id: SourceId, stored: &StoredRecord) -> SourceRecord {
        let email = self
            .meta
            .borrow()
            .get(&(id, META_EMAIL.to_string()))
            .cloned()
            .unwrap_or_default();
        SourceRecord {
            id,
            name: stored.name.clone(),
            email,
            content: stored.content.clone(),
            status: stored.status,
            created_at: stored.created_at,
        }
    }
}

impl SourceStore for MemoryStore {
    fn create(&self, new: &NewSource) -> Result<SourceId> {
        if self.fail_creates.get() {
            return Err(anyhow!("storage rejected the record"));
        }

        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.records.borrow_mut().insert(
            id,
            StoredRecord {
                name: new.name.clone(),
                content: new.content.clone(),
                status: SourceStatus::Draft,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    fn get(&self, id: SourceId) -> Result<Option<SourceRecord>> {
        Ok(self
            .records
            .borrow()
            .get(&id)
            .map(|stored| self.assemble(id, stored)))
    }

    fn set_status(&self, id: SourceId, status: SourceStatus) -> Result<()> {
        let mut records = self.records.borrow_mut();
        let stored = records
            .get_mut(&id)
            .ok_or_else(|| anyhow!("no record {id}"))?;
        stored.status = status;
        Ok(())
    }

    fn meta(&self, id: SourceId, key: &str) -> Result<Option<String>> {
        Ok(self.meta.borrow().get(&(id, key.to_string())).cloned())
    }

    fn set_meta(&self, id: SourceId, key: &str, value: &str) -> Result<()> {
        self.meta
            .borrow_mut()
            .insert((id, key.to_string()), value.to_string());
        Ok(())
    }

    fn delete_meta(&self, id: SourceId, key: &str) -> Result<()> {
        self.meta.borrow_mut().remove(&(id, key.to_string()));
        Ok(())
    }

    fn list_by_status(&self, status: SourceStatus) -> Result<Vec<SourceRecord>> {
        let mut matches: Vec<SourceRecord> = self
            .records
            .borrow()
            .iter()
            .filter(|(_, stored)| stored.status == status)
            .map(|(id, stored)| self.assemble(*id, stored))
            .collect();
        matches.sort_by_key(|record| record.id);
        Ok(matches)
    }
}

/// A message captured by `MemoryMailer`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mailer that records outbound messages instead of sending them
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: RefCell<Vec<SentMail>>,
    fail_sends: Cell<bool>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `send` calls fail, to exercise the fire-and-forget
    /// dispatch path.
    pub fn reject_sends(&self, reject: bool) {
        self.fail_sends.set(reject);
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.borrow().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn last(&self) -> Option<SentMail> {
        self.sent.borrow().last().cloned()
    }
}

impl Mailer for MemoryMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        if self.fail_sends.get() {
            return Err(anyhow!("mail transport unavailable"));
        }
        self.sent.borrow_mut().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Query-string link builder rooted at a site base URL
#[derive(Debug, Clone)]
pub struct SiteLinks {
    base_url: String,
    contact_path: String,
}

impl SiteLinks {
    pub fn new(base_url: &str, contact_path: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            contact_path: contact_path.trim_matches('/').to_string(),
        }
    }
}

impl LinkBuilder for SiteLinks {
    fn permalink(&self, record: &SourceRecord) -> String {
        format!("{}/sources/{}", self.base_url, record.id)
    }

    fn confirm_link(&self, id: SourceId, token: &str) -> String {
        format!("{}/?email-confirm={id}&key={token}", self.base_url)
    }

    fn edit_link(&self, record: &SourceRecord, token: &str) -> String {
        format!("{}?edit={token}", self.permalink(record))
    }

    fn admin_action_link(&self, action: ModerationAction, id: SourceId, token: &str) -> String {
        format!(
            "{}/admin/sources?action={action}&id={id}&nonce={token}",
            self.base_url
        )
    }

    fn contact_link(&self) -> String {
        format!("{}/{}", self.base_url, self.contact_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_assigns_sequential_ids_and_draft_status() {
        let store = MemoryStore::new();
        let new = NewSource {
            name: "Jane Doe".to_string(),
            email: "jane@x.test".to_string(),
            content: "bio".to_string(),
        };

        let first = store.create(&new).unwrap();
        let second = store.create(&new).unwrap();
        assert_ne!(first, second);

        let record = store.get(first).unwrap().unwrap();
        assert_eq!(record.status, SourceStatus::Draft);
        assert_eq!(record.name, "Jane Doe");
    }

    #[test]
    fn store_meta_round_trip_and_delete() {
        let store = MemoryStore::new();
        let id = store
            .create(&NewSource {
                name: "n".to_string(),
                email: "e@x.test".to_string(),
                content: "c".to_string(),
            })
            .unwrap();

        assert_eq!(store.meta(id, "_k").unwrap(), None);
        store.set_meta(id, "_k", "v").unwrap();
        assert_eq!(store.meta(id, "_k").unwrap(), Some("v".to_string()));
        store.delete_meta(id, "_k").unwrap();
        assert_eq!(store.meta(id, "_k").unwrap(), None);
    }

    #[test]
    fn list_by_status_filters() {
        let store = MemoryStore::new();
        let new = NewSource {
            name: "n".to_string(),
            email: "e@x.test".to_string(),
            content: "c".to_string(),
        };
        let a = store.create(&new).unwrap();
        let b = store.create(&new).unwrap();
        store.set_status(b, SourceStatus::Pending).unwrap();

        let drafts = store.list_by_status(SourceStatus::Draft).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, a);

        let pending = store.list_by_status(SourceStatus::Pending).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, b);
    }

    #[test]
    fn site_links_embed_id_and_token() {
        let links = SiteLinks::new("https://x.test/", "contact");
        let record = SourceRecord {
            id: 7,
            name: "n".to_string(),
            email: "e@x.test".to_string(),
            content: "c".to_string(),
            status: SourceStatus::Published,
            created_at: Utc::now(),
        };

        assert_eq!(links.permalink(&record), "https://x.test/sources/7");
        assert_eq!(
            links.confirm_link(7, "tok"),
            "https://x.test/?email-confirm=7&key=tok"
        );
        assert_eq!(
            links.edit_link(&record, "tok"),
            "https://x.test/sources/7?edit=tok"
        );
        assert_eq!(
            links.admin_action_link(ModerationAction::Publish, 7, "tok"),
            "https://x.test/admin/sources?action=publish&id=7&nonce=tok"
        );
        assert_eq!(links.contact_link(), "https://x.test/contact");
    }
}
