use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;


/// Notification severity, as shown to the consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Alert,
}

/// An emitted notification event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Notification {
    /// UUIDv7 identifier (time-ordered, globally unique)
    pub id: String,

    /// Severity: enter transitions are `info`, exits are `alert`
    #[serde(rename = "type")]
    pub kind: NotificationKind,

    /// Human-readable message referencing the fence name
    pub message: String,

    /// Originating entity, when the event concerns one
    #[serde(rename = "userId")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Emission time
    pub timestamp: DateTime<Utc>,

    /// Cleared by the mark-all-read operation
    pub read: bool,
}

impl Notification {
    /// Build an unread notification with a fresh UUIDv7 id, stamped now.
    pub fn new(kind: NotificationKind, message: String, user_id: Option<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            kind,
            message,
            user_id,
            timestamp: Utc::now(),
            read: false,
        }
    }
}

/// Ordered, mutable collection of emitted notifications, newest first.
///
/// No capacity bound; retention is an external policy.
pub struct NotificationSink {
    entries: RwLock<Vec<Notification>>,
}

impl NotificationSink {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Prepend a batch of notifications, preserving the batch's own
    /// order ahead of everything already stored.
    pub fn push_batch(&self, batch: Vec<Notification>) {
        if batch.is_empty() {
            return;
        }
        let mut entries = self.entries.write().unwrap();
        let older = std::mem::replace(&mut *entries, batch);
        entries.extend(older);
    }

    /// All notifications, newest first.
    pub fn list(&self) -> Vec<Notification> {
        self.entries.read().unwrap().clone()
    }

    /// Remove one notification by id. Absent ids are a no-op, not an
    /// error. Returns whether anything was removed.
    pub fn dismiss(&self, id: &str) -> bool {
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|n| n.id != id);
        entries.len() != before
    }

    /// Set every entry's read flag. Idempotent.
    pub fn mark_all_read(&self) {
        let mut entries = self.entries.write().unwrap();
        for entry in entries.iter_mut() {
            entry.read = true;
        }
    }

    /// Count of unread entries (header badge).
    pub fn unread_count(&self) -> usize {
        self.entries.read().unwrap().iter().filter(|n| !n.read).count()
    }
}

impl Default for NotificationSink {
    fn default() -> Self {
        Self::new()
    }
}
