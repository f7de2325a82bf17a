use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A note saved from the editor buffer. The workspace tracks which note is
/// currently loaded ("active") separately; nothing in the note itself marks
/// it active.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedNote {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    pub last_modified: DateTime<Utc>,
}

impl SavedNote {
    pub fn new(name: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            content,
            last_modified: Utc::now(),
        }
    }

    /// Replaces name and content, refreshing the modification timestamp.
    pub fn update(&mut self, name: String, content: String) {
        self.name = name;
        self.content = content;
        self.last_modified = Utc::now();
    }
}

/// A single checklist entry. New tasks start incomplete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
}

impl Task {
    pub fn new(text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            completed: false,
        }
    }
}

/// A quick link. The URL is validated as absolute when the link is created
/// or edited, never after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkItem {
    pub id: Uuid,
    pub name: String,
    pub url: String,
}

impl LinkItem {
    pub fn new(name: String, url: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            url,
        }
    }
}

/// Per-day calendar notes, one entry per date. Serializes with ISO
/// `YYYY-MM-DD` keys. Deleting a day removes the key entirely; an empty
/// string is a valid (kept) entry.
pub type DailyNotes = BTreeMap<NaiveDate, String>;
