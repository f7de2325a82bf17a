use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WorkspaceError;
use crate::models::{DailyNotes, LinkItem, SavedNote, Task};

pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Whole-project export file: a point-in-time copy of all four collections.
/// Field names match the JSON project file format, so a snapshot written by
/// one session imports cleanly into another.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub saved_notes: Vec<SavedNote>,
    pub daily_calendar_notes: DailyNotes,
    pub tasks: Vec<Task>,
    pub links: Vec<LinkItem>,
}

impl ProjectSnapshot {
    /// Parses a project file, rejecting anything that is missing one of the
    /// four collection fields.
    pub fn from_json(raw: &str) -> std::result::Result<Self, WorkspaceError> {
        serde_json::from_str(raw).map_err(|e| WorkspaceError::InvalidSnapshot {
            message: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize project snapshot")
    }
}

/// Writes a snapshot to `path` as pretty-printed JSON.
pub fn write_snapshot(snapshot: &ProjectSnapshot, path: &Path) -> Result<()> {
    let json = snapshot.to_json()?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write project file {}", path.display()))
}

/// Reads a snapshot from `path`. I/O failures and malformed files both
/// surface as errors; nothing is mutated on failure.
pub fn read_snapshot(path: &Path) -> Result<ProjectSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read project file {}", path.display()))?;
    ProjectSnapshot::from_json(&raw)
        .with_context(|| format!("{} is not a valid project file", path.display()))
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn sample_snapshot() -> ProjectSnapshot {
        let mut daily = DailyNotes::new();
        daily.insert(
            chrono::NaiveDate::from_ymd_opt(2024, 5, 1).expect("date"),
            "Dentist at 3pm".to_string(),
        );
        ProjectSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            created_at: Utc::now(),
            saved_notes: vec![SavedNote::new(
                "Grocery List".to_string(),
                "milk, eggs".to_string(),
            )],
            daily_calendar_notes: daily,
            tasks: vec![Task::new("Buy milk".to_string())],
            links: vec![LinkItem::new(
                "Example".to_string(),
                "https://example.com".to_string(),
            )],
        }
    }

    #[test]
    fn snapshot_file_round_trip() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("project.json");
        let snapshot = sample_snapshot();

        write_snapshot(&snapshot, &path).expect("write");
        let loaded = read_snapshot(&path).expect("read");

        assert_eq!(loaded.version, snapshot.version);
        assert_eq!(loaded.saved_notes[0].name, "Grocery List");
        assert_eq!(
            loaded
                .daily_calendar_notes
                .get(&chrono::NaiveDate::from_ymd_opt(2024, 5, 1).expect("date"))
                .map(String::as_str),
            Some("Dentist at 3pm")
        );
        assert_eq!(loaded.tasks.len(), 1);
        assert_eq!(loaded.links.len(), 1);
    }

    #[test]
    fn uses_external_field_names() {
        let json = sample_snapshot().to_json().expect("json");
        assert!(json.contains("\"savedNotes\""));
        assert!(json.contains("\"dailyCalendarNotes\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"lastModified\""));
        assert!(json.contains("\"2024-05-01\""));
    }

    #[test]
    fn rejects_file_missing_a_collection() {
        let err = ProjectSnapshot::from_json(
            r#"{"version":"1.0.0","createdAt":"2024-05-01T00:00:00Z","savedNotes":[],"tasks":[]}"#,
        )
        .expect_err("missing collections should fail");
        assert!(matches!(err, WorkspaceError::InvalidSnapshot { .. }));
    }
}
