pub mod export;
pub mod note;
pub mod storage;

pub use export::{ProjectSnapshot, SNAPSHOT_VERSION, read_snapshot, write_snapshot};
pub use note::{DailyNotes, LinkItem, SavedNote, Task};
pub use storage::{DiskBackend, NullBackend, StorageBackend, StorageManager};
