use anyhow::Result;
use chrono::NaiveDate;
use log::{info, warn};
use url::Url;
use uuid::Uuid;

use crate::error::WorkspaceError;
use crate::models::storage::{
    ACTIVE_NOTE_KEY, DAILY_NOTES_KEY, LINKS_KEY, NOTES_KEY, TASKS_KEY,
};
use crate::models::{
    DailyNotes, LinkItem, ProjectSnapshot, SNAPSHOT_VERSION, SavedNote, StorageManager, Task,
};

/// A destructive action waiting for the caller to confirm it. The workspace
/// never blocks on user interaction itself; the caller requests the action,
/// shows the returned description, and then either confirms or cancels.
#[derive(Debug, Clone)]
pub enum PendingAction {
    None,
    DeleteNote(Uuid),
    ImportSnapshot(ProjectSnapshot),
    ResetAll,
}

/// Single source of truth for the five persisted pieces of workspace state:
/// saved notes, daily calendar notes, tasks, quick links, and the
/// active-note pointer. Every mutation synchronously rewrites the whole
/// affected collection through the storage manager; persistence failures
/// degrade to in-memory-only state rather than rolling the mutation back.
pub struct Workspace {
    store: StorageManager,
    notes: Vec<SavedNote>,
    daily_notes: DailyNotes,
    tasks: Vec<Task>,
    links: Vec<LinkItem>,
    active_note: Option<Uuid>,
    pending_action: PendingAction,
}

impl Workspace {
    /// Loads all collections from the given store. An active-note pointer
    /// that no longer references an existing note is dropped on load.
    pub fn new(store: StorageManager) -> Self {
        let notes: Vec<SavedNote> = store.read(NOTES_KEY, Vec::new());
        let daily_notes: DailyNotes = store.read(DAILY_NOTES_KEY, DailyNotes::new());
        let tasks: Vec<Task> = store.read(TASKS_KEY, Vec::new());
        let links: Vec<LinkItem> = store.read(LINKS_KEY, Vec::new());

        let mut active_note: Option<Uuid> = store.read(ACTIVE_NOTE_KEY, None);
        if let Some(id) = active_note {
            if !notes.iter().any(|n| n.id == id) {
                warn!("Active note {} no longer exists, clearing pointer", id);
                active_note = None;
            }
        }

        info!(
            "Workspace loaded: {} notes, {} daily notes, {} tasks, {} links",
            notes.len(),
            daily_notes.len(),
            tasks.len(),
            links.len()
        );

        Self {
            store,
            notes,
            daily_notes,
            tasks,
            links,
            active_note,
            pending_action: PendingAction::None,
        }
    }

    /// Opens the workspace backed by the on-disk store.
    pub fn open() -> Result<Self> {
        Ok(Self::new(StorageManager::disk()?))
    }

    /// A workspace with no durable storage. Reads start empty and writes
    /// are discarded.
    pub fn in_memory() -> Self {
        Self::new(StorageManager::null())
    }

    pub fn notes(&self) -> &[SavedNote] {
        &self.notes
    }

    pub fn daily_notes(&self) -> &DailyNotes {
        &self.daily_notes
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn links(&self) -> &[LinkItem] {
        &self.links
    }

    pub fn active_note_id(&self) -> Option<Uuid> {
        self.active_note
    }

    pub fn active_note(&self) -> Option<&SavedNote> {
        self.active_note
            .and_then(|id| self.notes.iter().find(|n| n.id == id))
    }

    pub fn find_note(&self, id: Uuid) -> Option<&SavedNote> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Looks a note up by exact name first, then case-insensitive prefix.
    pub fn find_note_by_name(&self, name: &str) -> Option<&SavedNote> {
        let wanted = name.to_lowercase();
        self.notes
            .iter()
            .find(|n| n.name.to_lowercase() == wanted)
            .or_else(|| {
                self.notes
                    .iter()
                    .find(|n| n.name.to_lowercase().starts_with(&wanted))
            })
    }

    // ---- Notes -----------------------------------------------------------

    /// Saves the editor buffer. When `active` matches an existing note that
    /// note is updated in place; otherwise a new note is created, prepended,
    /// and made active. Blank titles are rejected, as is saving an empty
    /// buffer that isn't tied to an existing note.
    pub fn save_note(
        &mut self,
        title: &str,
        content: &str,
        active: Option<Uuid>,
    ) -> Result<SavedNote, WorkspaceError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(WorkspaceError::validation("Note title cannot be empty"));
        }
        if content.trim().is_empty() && active.is_none() {
            return Err(WorkspaceError::validation("Cannot save an empty new note"));
        }

        let existing = active.and_then(|id| self.notes.iter().position(|n| n.id == id));
        let saved = match existing {
            Some(index) => {
                let note = &mut self.notes[index];
                note.update(title.to_string(), content.to_string());
                note.clone()
            }
            None => {
                let note = SavedNote::new(title.to_string(), content.to_string());
                self.notes.insert(0, note.clone());
                self.set_active(Some(note.id));
                note
            }
        };

        self.persist_notes();
        info!("Saved note '{}' ({})", saved.name, saved.id);
        Ok(saved)
    }

    /// Loads a note into the editor, making it active. Callers should reset
    /// any derived state (e.g. a stale AI summary) after a successful load.
    pub fn load_note(&mut self, id: Uuid) -> Result<SavedNote, WorkspaceError> {
        let note = self
            .notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(WorkspaceError::NoteNotFound { id })?;
        self.set_active(Some(id));
        Ok(note)
    }

    /// Removes a note if present, returning it. Deleting the active note
    /// clears the pointer; the caller is expected to reset the editor
    /// buffer when that happens. Deleting an absent id is a no-op.
    pub fn delete_note(&mut self, id: Uuid) -> Option<SavedNote> {
        let position = self.notes.iter().position(|n| n.id == id)?;
        let removed = self.notes.remove(position);
        if self.active_note == Some(id) {
            self.set_active(None);
        }
        self.persist_notes();
        info!("Deleted note '{}' ({})", removed.name, removed.id);
        Some(removed)
    }

    pub fn rename_note(&mut self, id: Uuid, new_name: &str) -> Result<(), WorkspaceError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(WorkspaceError::validation("Note name cannot be empty"));
        }
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(WorkspaceError::NoteNotFound { id })?;
        note.name = new_name.to_string();
        note.last_modified = chrono::Utc::now();
        self.persist_notes();
        Ok(())
    }

    // ---- Daily calendar notes --------------------------------------------

    /// Unconditional overwrite of the date's entry, including with an empty
    /// string. Use `delete_daily_note` to remove the key entirely.
    pub fn upsert_daily_note(&mut self, date: NaiveDate, text: String) {
        self.daily_notes.insert(date, text);
        self.store.write(DAILY_NOTES_KEY, &self.daily_notes);
    }

    /// Removes the date's entry. Returns false (no-op) if there was none.
    pub fn delete_daily_note(&mut self, date: NaiveDate) -> bool {
        if self.daily_notes.remove(&date).is_some() {
            self.store.write(DAILY_NOTES_KEY, &self.daily_notes);
            true
        } else {
            false
        }
    }

    // ---- Tasks -----------------------------------------------------------

    /// Prepends a new incomplete task. Whitespace-only text is silently
    /// ignored.
    pub fn add_task(&mut self, text: &str) -> Option<Task> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let task = Task::new(text.to_string());
        self.tasks.insert(0, task.clone());
        self.store.write(TASKS_KEY, &self.tasks);
        Some(task)
    }

    pub fn toggle_task(&mut self, id: Uuid) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.completed = !task.completed;
        self.store.write(TASKS_KEY, &self.tasks);
        true
    }

    pub fn delete_task(&mut self, id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.store.write(TASKS_KEY, &self.tasks);
        true
    }

    // ---- Quick links -----------------------------------------------------

    /// Adds a link, or updates one in place when `id` is given and found.
    /// Both fields must be non-blank and the URL must parse as an absolute
    /// URL; nothing is mutated on a validation failure.
    pub fn upsert_link(
        &mut self,
        name: &str,
        url: &str,
        id: Option<Uuid>,
    ) -> Result<LinkItem, WorkspaceError> {
        let name = name.trim();
        let url = url.trim();
        if name.is_empty() || url.is_empty() {
            return Err(WorkspaceError::validation(
                "Link name and URL cannot be empty",
            ));
        }
        if Url::parse(url).is_err() {
            return Err(WorkspaceError::InvalidUrl {
                url: url.to_string(),
            });
        }

        let existing = id.and_then(|id| self.links.iter().position(|l| l.id == id));
        let link = match existing {
            Some(index) => {
                let link = &mut self.links[index];
                link.name = name.to_string();
                link.url = url.to_string();
                link.clone()
            }
            None => {
                let link = LinkItem::new(name.to_string(), url.to_string());
                self.links.insert(0, link.clone());
                link
            }
        };

        self.store.write(LINKS_KEY, &self.links);
        Ok(link)
    }

    pub fn delete_link(&mut self, id: Uuid) -> bool {
        let before = self.links.len();
        self.links.retain(|l| l.id != id);
        if self.links.len() == before {
            return false;
        }
        self.store.write(LINKS_KEY, &self.links);
        true
    }

    // ---- Snapshot --------------------------------------------------------

    /// A point-in-time copy of all four collections. Pure; no state is
    /// touched.
    pub fn export_snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            created_at: chrono::Utc::now(),
            saved_notes: self.notes.clone(),
            daily_calendar_notes: self.daily_notes.clone(),
            tasks: self.tasks.clone(),
            links: self.links.clone(),
        }
    }

    /// Replaces all four collections with the snapshot's contents and
    /// clears the active-note pointer. Destructive; callers go through the
    /// pending-confirmation flow before invoking this.
    pub fn import_snapshot(&mut self, snapshot: ProjectSnapshot) {
        self.notes = snapshot.saved_notes;
        self.daily_notes = snapshot.daily_calendar_notes;
        self.tasks = snapshot.tasks;
        self.links = snapshot.links;
        self.set_active(None);
        self.persist_all();
        info!("Imported project snapshot (version {})", snapshot.version);
    }

    /// Clears every collection and erases the durable keys. Used by "new
    /// project".
    pub fn reset_all(&mut self) {
        self.notes.clear();
        self.daily_notes.clear();
        self.tasks.clear();
        self.links.clear();
        self.active_note = None;
        self.store.erase_all();
        info!("Workspace reset to empty");
    }

    // ---- Pending confirmation --------------------------------------------

    /// Registers a destructive action and returns a human-readable
    /// description for the caller's confirmation prompt.
    pub fn request_confirmation(&mut self, action: PendingAction) -> String {
        let description = match &action {
            PendingAction::DeleteNote(id) => match self.find_note(*id) {
                Some(note) => format!("Delete note '{}'?", note.name),
                None => format!("Delete note {id}?"),
            },
            PendingAction::ImportSnapshot(snapshot) => format!(
                "Replace the current project with the imported one ({} notes, {} tasks)?",
                snapshot.saved_notes.len(),
                snapshot.tasks.len()
            ),
            PendingAction::ResetAll => "Erase all notes, daily notes, tasks and links?".to_string(),
            PendingAction::None => String::new(),
        };
        self.pending_action = action;
        description
    }

    /// Executes the pending action, if any. Returns true when something
    /// was executed.
    pub fn confirm_pending(&mut self) -> bool {
        let action = std::mem::replace(&mut self.pending_action, PendingAction::None);
        match action {
            PendingAction::DeleteNote(id) => {
                self.delete_note(id);
                true
            }
            PendingAction::ImportSnapshot(snapshot) => {
                self.import_snapshot(snapshot);
                true
            }
            PendingAction::ResetAll => {
                self.reset_all();
                true
            }
            PendingAction::None => false,
        }
    }

    pub fn cancel_pending(&mut self) {
        self.pending_action = PendingAction::None;
    }

    // ---- Persistence helpers ---------------------------------------------

    fn set_active(&mut self, id: Option<Uuid>) {
        self.active_note = id;
        self.store.write(ACTIVE_NOTE_KEY, &self.active_note);
    }

    fn persist_notes(&self) {
        self.store.write(NOTES_KEY, &self.notes);
    }

    fn persist_all(&self) {
        self.store.write(NOTES_KEY, &self.notes);
        self.store.write(DAILY_NOTES_KEY, &self.daily_notes);
        self.store.write(TASKS_KEY, &self.tasks);
        self.store.write(LINKS_KEY, &self.links);
        self.store.write(ACTIVE_NOTE_KEY, &self.active_note);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::models::StorageBackend;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn create_then_update_in_place() {
        let mut ws = Workspace::in_memory();

        let note = ws
            .save_note("Grocery List", "milk, eggs", None)
            .expect("save");
        assert_eq!(ws.notes().len(), 1);
        assert_eq!(note.name, "Grocery List");
        assert_eq!(note.content, "milk, eggs");
        assert_eq!(ws.active_note_id(), Some(note.id));

        let updated = ws
            .save_note("Grocery List v2", "milk, eggs, bread", Some(note.id))
            .expect("update");
        assert_eq!(ws.notes().len(), 1);
        assert_eq!(updated.id, note.id);
        assert_eq!(updated.name, "Grocery List v2");
        assert_eq!(updated.content, "milk, eggs, bread");
    }

    #[test]
    fn rejects_blank_title_and_empty_new_note() {
        let mut ws = Workspace::in_memory();
        assert!(matches!(
            ws.save_note("   ", "content", None),
            Err(WorkspaceError::Validation { .. })
        ));
        assert!(matches!(
            ws.save_note("Title", "   ", None),
            Err(WorkspaceError::Validation { .. })
        ));
        assert!(ws.notes().is_empty());

        // Blanking an existing note's content is allowed.
        let note = ws.save_note("Title", "content", None).expect("save");
        assert!(ws.save_note("Title", "", Some(note.id)).is_ok());
    }

    #[test]
    fn stale_active_id_creates_a_new_note() {
        let mut ws = Workspace::in_memory();
        let first = ws.save_note("A", "body", None).expect("save");
        let second = ws
            .save_note("B", "body", Some(Uuid::new_v4()))
            .expect("save");
        assert_ne!(first.id, second.id);
        assert_eq!(ws.notes().len(), 2);
    }

    #[test]
    fn ids_stay_unique_and_active_pointer_stays_valid() {
        let mut ws = Workspace::in_memory();
        let mut created = Vec::new();
        for i in 0..10 {
            let note = ws
                .save_note(&format!("Note {i}"), "body", None)
                .expect("save");
            created.push(note.id);
        }
        ws.delete_note(created[3]);
        ws.delete_note(created[7]);

        let ids: HashSet<Uuid> = ws.notes().iter().map(|n| n.id).collect();
        assert_eq!(ids.len(), ws.notes().len());
        if let Some(active) = ws.active_note_id() {
            assert!(ids.contains(&active));
        }
    }

    #[test]
    fn deleting_active_note_clears_pointer() {
        let mut ws = Workspace::in_memory();
        let note = ws.save_note("A", "body", None).expect("save");
        assert_eq!(ws.active_note_id(), Some(note.id));

        let removed = ws.delete_note(note.id).expect("deleted");
        assert_eq!(removed.id, note.id);
        assert_eq!(ws.active_note_id(), None);

        // Second delete is a no-op.
        assert!(ws.delete_note(note.id).is_none());
    }

    #[test]
    fn load_note_sets_active_and_missing_id_errors() {
        let mut ws = Workspace::in_memory();
        let a = ws.save_note("A", "body", None).expect("save");
        let b = ws.save_note("B", "body", None).expect("save");
        assert_eq!(ws.active_note_id(), Some(b.id));

        let loaded = ws.load_note(a.id).expect("load");
        assert_eq!(loaded.id, a.id);
        assert_eq!(ws.active_note_id(), Some(a.id));

        assert!(matches!(
            ws.load_note(Uuid::new_v4()),
            Err(WorkspaceError::NoteNotFound { .. })
        ));
        assert_eq!(ws.active_note_id(), Some(a.id));
    }

    #[test]
    fn rename_validates_and_updates_timestamp() {
        let mut ws = Workspace::in_memory();
        let note = ws.save_note("Old", "body", None).expect("save");
        let before = note.last_modified;

        assert!(matches!(
            ws.rename_note(note.id, "  "),
            Err(WorkspaceError::Validation { .. })
        ));
        ws.rename_note(note.id, "New").expect("rename");

        let renamed = ws.find_note(note.id).expect("exists");
        assert_eq!(renamed.name, "New");
        assert!(renamed.last_modified >= before);
    }

    #[test]
    fn daily_note_delete_removes_the_key() {
        let mut ws = Workspace::in_memory();
        let day = date(2024, 5, 1);
        ws.upsert_daily_note(day, "Dentist at 3pm".to_string());
        assert_eq!(
            ws.daily_notes().get(&day).map(String::as_str),
            Some("Dentist at 3pm")
        );

        assert!(ws.delete_daily_note(day));
        assert!(!ws.daily_notes().contains_key(&day));
        assert!(!ws.delete_daily_note(day));
    }

    #[test]
    fn empty_daily_note_is_kept_as_a_key() {
        let mut ws = Workspace::in_memory();
        let day = date(2024, 5, 1);
        ws.upsert_daily_note(day, "something".to_string());
        ws.upsert_daily_note(day, String::new());
        assert_eq!(ws.daily_notes().get(&day).map(String::as_str), Some(""));
    }

    #[test]
    fn whitespace_task_is_ignored() {
        let mut ws = Workspace::in_memory();
        assert!(ws.add_task("   ").is_none());
        assert!(ws.tasks().is_empty());

        let task = ws.add_task("Buy milk").expect("added");
        assert_eq!(ws.tasks().len(), 1);
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
    }

    #[test]
    fn delete_task_is_idempotent() {
        let mut ws = Workspace::in_memory();
        let task = ws.add_task("Buy milk").expect("added");
        assert!(ws.delete_task(task.id));
        let after_first = ws.tasks().len();
        assert!(!ws.delete_task(task.id));
        assert_eq!(ws.tasks().len(), after_first);
    }

    #[test]
    fn toggle_task_flips_completion() {
        let mut ws = Workspace::in_memory();
        let task = ws.add_task("Buy milk").expect("added");
        assert!(ws.toggle_task(task.id));
        assert!(ws.tasks()[0].completed);
        assert!(ws.toggle_task(task.id));
        assert!(!ws.tasks()[0].completed);
        assert!(!ws.toggle_task(Uuid::new_v4()));
    }

    #[test]
    fn link_url_is_validated() {
        let mut ws = Workspace::in_memory();
        assert!(matches!(
            ws.upsert_link("Example", "not a url", None),
            Err(WorkspaceError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ws.upsert_link("", "https://example.com", None),
            Err(WorkspaceError::Validation { .. })
        ));
        assert!(ws.links().is_empty());

        let link = ws
            .upsert_link("Example", "https://example.com", None)
            .expect("valid");
        assert_eq!(ws.links().len(), 1);

        let edited = ws
            .upsert_link("Example Docs", "https://example.com/docs", Some(link.id))
            .expect("edit");
        assert_eq!(edited.id, link.id);
        assert_eq!(ws.links().len(), 1);
        assert_eq!(ws.links()[0].url, "https://example.com/docs");
    }

    #[test]
    fn snapshot_round_trip_reproduces_state() {
        let mut ws = Workspace::in_memory();
        ws.save_note("A", "alpha", None).expect("save");
        ws.save_note("B", "beta", None).expect("save");
        ws.upsert_daily_note(date(2024, 5, 1), "dentist".to_string());
        ws.add_task("Buy milk").expect("task");
        ws.upsert_link("Example", "https://example.com", None)
            .expect("link");

        let snapshot = ws.export_snapshot();

        let mut other = Workspace::in_memory();
        other.import_snapshot(snapshot);

        let names: HashSet<&str> = other.notes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, HashSet::from(["A", "B"]));
        assert_eq!(other.daily_notes().len(), 1);
        assert_eq!(other.tasks().len(), 1);
        assert_eq!(other.links().len(), 1);
        assert_eq!(other.active_note_id(), None);
    }

    #[test]
    fn export_snapshot_has_no_side_effects() {
        let mut ws = Workspace::in_memory();
        let note = ws.save_note("A", "alpha", None).expect("save");
        let _ = ws.export_snapshot();
        assert_eq!(ws.notes().len(), 1);
        assert_eq!(ws.active_note_id(), Some(note.id));
    }

    #[test]
    fn reset_all_clears_everything() {
        let mut ws = Workspace::in_memory();
        ws.save_note("A", "alpha", None).expect("save");
        ws.add_task("Buy milk").expect("task");
        ws.reset_all();
        assert!(ws.notes().is_empty());
        assert!(ws.daily_notes().is_empty());
        assert!(ws.tasks().is_empty());
        assert!(ws.links().is_empty());
        assert_eq!(ws.active_note_id(), None);
    }

    #[test]
    fn confirmation_flow_gates_destructive_actions() {
        let mut ws = Workspace::in_memory();
        let note = ws.save_note("A", "alpha", None).expect("save");

        let description = ws.request_confirmation(PendingAction::DeleteNote(note.id));
        assert!(description.contains("'A'"));
        ws.cancel_pending();
        assert!(!ws.confirm_pending());
        assert_eq!(ws.notes().len(), 1);

        ws.request_confirmation(PendingAction::DeleteNote(note.id));
        assert!(ws.confirm_pending());
        assert!(ws.notes().is_empty());
    }

    /// Backend whose writes always fail, standing in for a full or
    /// unavailable store.
    struct FailingBackend;

    impl StorageBackend for FailingBackend {
        fn read_blob(&self, _key: &str) -> Option<String> {
            None
        }

        fn write_blob(&self, _key: &str, _json: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("store unavailable"))
        }

        fn erase_blob(&self, _key: &str) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("store unavailable"))
        }
    }

    #[test]
    fn storage_failure_does_not_roll_back_memory() {
        let mut ws = Workspace::new(StorageManager::new(Box::new(FailingBackend)));
        let note = ws.save_note("A", "alpha", None).expect("save");
        assert_eq!(ws.notes().len(), 1);
        assert_eq!(ws.active_note_id(), Some(note.id));

        assert!(ws.add_task("Buy milk").is_some());
        assert_eq!(ws.tasks().len(), 1);
    }

    #[test]
    fn persisted_state_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backend = || {
            crate::models::DiskBackend::from_dir(dir.path()).expect("backend")
        };

        let note_id = {
            let mut ws = Workspace::new(StorageManager::new(Box::new(backend())));
            let note = ws.save_note("A", "alpha", None).expect("save");
            ws.add_task("Buy milk").expect("task");
            note.id
        };

        let ws = Workspace::new(StorageManager::new(Box::new(backend())));
        assert_eq!(ws.notes().len(), 1);
        assert_eq!(ws.tasks().len(), 1);
        assert_eq!(ws.active_note_id(), Some(note_id));
    }
}
