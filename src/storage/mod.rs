//! Key/value persistence for EduDash.
//!
//! The dashboard aggregates are stored as JSON strings under fixed keys,
//! with file-based and in-memory backends.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use traits::KeyValueStore;

/// Storage keys, one per persisted aggregate.
pub mod keys {
    /// Student profile.
    pub const STUDENT: &str = "@edudash_student";

    /// Course list.
    pub const COURSES: &str = "@edudash_courses";

    /// Announcement list.
    pub const ANNOUNCEMENTS: &str = "@edudash_announcements";

    /// Last successful sync timestamp (raw ISO-8601 string, not JSON).
    pub const LAST_SYNC_AT: &str = "@edudash_last_sync_at";

    /// Every key the dashboard writes.
    pub const ALL: &[&str] = &[STUDENT, COURSES, ANNOUNCEMENTS, LAST_SYNC_AT];
}
