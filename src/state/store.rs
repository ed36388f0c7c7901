//! The student state owner.
//!
//! `StudentStateStore` holds the canonical in-memory student, course list,
//! announcement list and sync marker, and mirrors each into a
//! [`KeyValueStore`]. It is fail-open: persistence failures are logged and the
//! in-memory state stays authoritative for the rest of the session.
//!
//! Course mutations run a best-effort chain (persist courses, recompute GPA,
//! persist student). The chain is not atomic; a crash between steps can leave
//! the stored GPA stale until the next course mutation.
//!
//! Writes to the backend are serialized, and each one renders its value from
//! the in-memory state at the moment it is written. Overlapping mutations can
//! therefore never leave an older list on disk after a newer one.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::core::announcements::unread_count;
use crate::core::gpa::{compute_gpa, GpaCalculation};
use crate::core::models::{Announcement, Course, Student};
use crate::error::{EduDashError, FailOpen, Result};
use crate::seed::SeedData;
use crate::storage::{keys, KeyValueStore};

/// Default simulated sync duration.
pub const DEFAULT_SYNC_DELAY: Duration = Duration::from_millis(800);

/// Load lifecycle of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// Constructed, never loaded.
    #[default]
    Uninitialized,
    /// A load is in flight.
    Loading,
    /// A load has completed (successfully or by falling back to seed data).
    Ready,
}

/// Read-only view of the dashboard for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub student: Student,
    pub courses: Vec<Course>,
    pub announcements: Vec<Announcement>,
    pub is_loading: bool,
    pub gpa_calculation: GpaCalculation,
    pub unread_announcements_count: usize,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub is_syncing: bool,
}

/// Mutable state behind the lock.
#[derive(Debug)]
struct DashboardState {
    student: Student,
    courses: Vec<Course>,
    announcements: Vec<Announcement>,
    last_sync_at: Option<DateTime<Utc>>,
    load_state: LoadState,
    is_syncing: bool,
}

/// Values read back from storage during a load.
struct LoadedState {
    student: Student,
    courses: Vec<Course>,
    announcements: Vec<Announcement>,
    last_sync_at: Option<DateTime<Utc>>,
}

/// Format a sync marker as ISO-8601 UTC with millisecond precision.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored sync marker.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| EduDashError::serde(format!("invalid sync timestamp '{}': {}", raw, e)))
}

/// Owner of the student's dashboard state.
///
/// Construct once, call [`load`](Self::load), then read and mutate through the
/// methods below. The state lock is never held across an await point; only
/// the write lock is, and it guards nothing but backend writes.
pub struct StudentStateStore<K: KeyValueStore> {
    kv: K,
    seed: SeedData,
    sync_delay: Duration,
    state: RwLock<DashboardState>,
    write_lock: Mutex<()>,
}

impl<K: KeyValueStore> StudentStateStore<K> {
    /// Create a store over a key/value backend and a seed dataset.
    ///
    /// Until [`load`](Self::load) completes the student is the seed student
    /// and both lists are empty.
    pub fn new(kv: K, seed: SeedData) -> Self {
        let state = DashboardState {
            student: seed.student.clone(),
            courses: Vec::new(),
            announcements: Vec::new(),
            last_sync_at: None,
            load_state: LoadState::Uninitialized,
            is_syncing: false,
        };
        Self {
            kv,
            seed,
            sync_delay: DEFAULT_SYNC_DELAY,
            state: RwLock::new(state),
            write_lock: Mutex::new(()),
        }
    }

    /// Set the simulated sync duration.
    pub fn with_sync_delay(mut self, delay: Duration) -> Self {
        self.sync_delay = delay;
        self
    }

    /// The key/value backend.
    pub fn backend(&self) -> &K {
        &self.kv
    }

    /// The seed dataset.
    pub fn seed(&self) -> &SeedData {
        &self.seed
    }

    fn read_state(&self) -> RwLockReadGuard<'_, DashboardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, DashboardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Current student profile.
    pub fn student(&self) -> Student {
        self.read_state().student.clone()
    }

    /// Current course list.
    pub fn courses(&self) -> Vec<Course> {
        self.read_state().courses.clone()
    }

    /// Current announcement list.
    pub fn announcements(&self) -> Vec<Announcement> {
        self.read_state().announcements.clone()
    }

    /// Timestamp of the last completed sync.
    pub fn last_sync_at(&self) -> Option<DateTime<Utc>> {
        self.read_state().last_sync_at
    }

    /// Load lifecycle state.
    pub fn load_state(&self) -> LoadState {
        self.read_state().load_state
    }

    /// True until a load has completed, and while a reload is in flight.
    pub fn is_loading(&self) -> bool {
        self.load_state() != LoadState::Ready
    }

    /// Whether a sync is in progress.
    pub fn is_syncing(&self) -> bool {
        self.read_state().is_syncing
    }

    /// GPA summary of the current course list.
    pub fn gpa_calculation(&self) -> GpaCalculation {
        compute_gpa(&self.read_state().courses)
    }

    /// Number of announcements not yet read.
    pub fn unread_announcements_count(&self) -> usize {
        unread_count(&self.read_state().announcements)
    }

    /// Consistent copy of the whole dashboard state.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let state = self.read_state();
        DashboardSnapshot {
            student: state.student.clone(),
            courses: state.courses.clone(),
            announcements: state.announcements.clone(),
            is_loading: state.load_state != LoadState::Ready,
            gpa_calculation: compute_gpa(&state.courses),
            unread_announcements_count: unread_count(&state.announcements),
            last_sync_at: state.last_sync_at,
            is_syncing: state.is_syncing,
        }
    }

    // ---------------------------------------------------------------------
    // Load
    // ---------------------------------------------------------------------

    /// Load every aggregate from storage, seeding the ones never persisted.
    ///
    /// Never fails. If storage cannot be read or parsed, courses and
    /// announcements fall back to the seed and the student keeps its current
    /// value. The store is `Ready` afterwards in every case.
    pub async fn load(&self) {
        self.write_state().load_state = LoadState::Loading;

        match self.read_persisted().await {
            Ok(loaded) => {
                let mut state = self.write_state();
                state.student = loaded.student;
                state.courses = loaded.courses;
                state.announcements = loaded.announcements;
                if loaded.last_sync_at.is_some() {
                    state.last_sync_at = loaded.last_sync_at;
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to load dashboard data, falling back to seed");
                let mut state = self.write_state();
                state.courses = self.seed.courses.clone();
                state.announcements = self.seed.announcements.clone();
            }
        }

        self.write_state().load_state = LoadState::Ready;
    }

    async fn read_persisted(&self) -> Result<LoadedState> {
        let (student, courses, announcements, last_sync) = tokio::join!(
            self.kv.get(keys::STUDENT),
            self.kv.get(keys::COURSES),
            self.kv.get(keys::ANNOUNCEMENTS),
            self.kv.get(keys::LAST_SYNC_AT),
        );

        let student = self
            .adopt_or_seed(keys::STUDENT, student?, &self.seed.student)
            .await?;
        let courses = self
            .adopt_or_seed(keys::COURSES, courses?, &self.seed.courses)
            .await?;
        let announcements = self
            .adopt_or_seed(keys::ANNOUNCEMENTS, announcements?, &self.seed.announcements)
            .await?;
        let last_sync_at = last_sync?.as_deref().map(parse_timestamp).transpose()?;

        Ok(LoadedState {
            student,
            courses,
            announcements,
            last_sync_at,
        })
    }

    /// Parse a stored value, or persist and return the seed when absent.
    async fn adopt_or_seed<T>(&self, key: &str, stored: Option<String>, seed: &T) -> Result<T>
    where
        T: Serialize + for<'de> Deserialize<'de> + Clone,
    {
        match stored {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => {
                info!(key, "no stored value, seeding");
                self.persist(key, seed).await?;
                Ok(seed.clone())
            }
        }
    }

    /// Remove every stored aggregate and load again from the seed.
    pub async fn reset(&self) {
        {
            let _guard = self.write_lock.lock().await;
            for key in keys::ALL {
                self.kv
                    .remove(key)
                    .await
                    .fail_open_default("removing stored aggregate");
            }
        }
        self.write_state().last_sync_at = None;
        self.load().await;
    }

    async fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        let _guard = self.write_lock.lock().await;
        self.kv.set(key, &json).await
    }

    /// Write one aggregate as it stands in memory when the write lock is held.
    ///
    /// Rendering happens after the lock is taken, so writes land in the same
    /// order as the state they capture.
    async fn write_through<F>(&self, key: &str, context: &str, render: F)
    where
        F: FnOnce(&DashboardState) -> Result<String>,
    {
        let _guard = self.write_lock.lock().await;
        let rendered = render(&*self.read_state());
        let result = match rendered {
            Ok(value) => self.kv.set(key, &value).await,
            Err(e) => Err(e),
        };
        result.fail_open_default(context);
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Replace the student profile and persist it.
    ///
    /// A failed write is logged; the in-memory profile is kept regardless.
    pub async fn update_student(&self, student: Student) {
        self.write_state().student = student;
        self.write_student("updating student").await;
    }

    async fn write_student(&self, context: &str) {
        self.write_through(keys::STUDENT, context, |state| {
            Ok(serde_json::to_string(&state.student)?)
        })
        .await;
    }

    /// Append a course. Duplicate IDs are not rejected.
    pub async fn add_course(&self, course: Course) {
        self.write_state().courses.push(course);
        self.commit_courses("adding course").await;
    }

    /// Replace every course whose ID matches `course_id`.
    ///
    /// Returns the number of courses replaced. With no match the list is
    /// rewritten unchanged.
    pub async fn update_course(&self, course_id: &str, updated: Course) -> usize {
        let replaced = {
            let mut state = self.write_state();
            let mut replaced = 0;
            for course in state.courses.iter_mut().filter(|c| c.id == course_id) {
                *course = updated.clone();
                replaced += 1;
            }
            replaced
        };
        if replaced == 0 {
            debug!(course_id, "update matched no course");
        }
        self.commit_courses("updating course").await;
        replaced
    }

    /// Remove every course whose ID matches `course_id`.
    ///
    /// Returns the number of courses removed.
    pub async fn delete_course(&self, course_id: &str) -> usize {
        let removed = {
            let mut state = self.write_state();
            let before = state.courses.len();
            state.courses.retain(|c| c.id != course_id);
            before - state.courses.len()
        };
        if removed == 0 {
            debug!(course_id, "delete matched no course");
        }
        self.commit_courses("deleting course").await;
        removed
    }

    /// Persist the course list, then write the recomputed GPA onto the student.
    ///
    /// The student update runs even if the course write failed.
    async fn commit_courses(&self, context: &str) {
        self.write_through(keys::COURSES, context, |state| {
            Ok(serde_json::to_string(&state.courses)?)
        })
        .await;

        {
            let mut state = self.write_state();
            state.student.gpa = compute_gpa(&state.courses).gpa;
        }
        self.write_student(context).await;
    }

    /// Mark an announcement as read and persist the announcement list.
    ///
    /// Returns whether any announcement changed. Already-read or unknown IDs
    /// leave the list as it was.
    pub async fn mark_announcement_as_read(&self, announcement_id: &str) -> bool {
        let changed = {
            let mut state = self.write_state();
            let mut changed = false;
            for announcement in state
                .announcements
                .iter_mut()
                .filter(|a| a.id == announcement_id && !a.read)
            {
                announcement.read = true;
                changed = true;
            }
            changed
        };
        self.write_through(keys::ANNOUNCEMENTS, "marking announcement as read", |state| {
            Ok(serde_json::to_string(&state.announcements)?)
        })
        .await;
        changed
    }

    /// Simulate a remote sync and record its completion time.
    ///
    /// Overlapping calls are not serialized; the last to finish sets the
    /// marker.
    pub async fn sync_now(&self) -> DateTime<Utc> {
        self.write_state().is_syncing = true;

        tokio::time::sleep(self.sync_delay).await;

        let now = Utc::now();
        self.write_state().last_sync_at = Some(now);
        self.write_through(keys::LAST_SYNC_AT, "persisting sync marker", |state| {
            Ok(format_timestamp(state.last_sync_at.unwrap_or(now)))
        })
        .await;
        info!(at = %format_timestamp(now), "sync completed");

        self.write_state().is_syncing = false;
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{AnnouncementCategory, LetterGrade, Priority};
    use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
    use std::sync::Arc;

    fn small_seed() -> SeedData {
        let mut seed = SeedData::builtin();
        seed.courses = vec![
            Course::new("c1", "Calculus", "MATH-201", 3.0, LetterGrade::A),
            Course::new("c2", "History", "HIST-110", 4.0, LetterGrade::BPlus),
        ];
        seed.student.gpa = compute_gpa(&seed.courses).gpa;
        seed.announcements = vec![
            Announcement {
                id: "a1".to_string(),
                title: "Exam".to_string(),
                content: "Schedule".to_string(),
                category: AnnouncementCategory::Academic,
                date: "2025-03-10".to_string(),
                author: "Office".to_string(),
                priority: Priority::High,
                read: false,
            },
            Announcement {
                id: "a2".to_string(),
                title: "Library".to_string(),
                content: "Hours".to_string(),
                category: AnnouncementCategory::General,
                date: "2025-03-01".to_string(),
                author: "Library".to_string(),
                priority: Priority::Low,
                read: true,
            },
        ];
        seed
    }

    fn new_store() -> (
        StudentStateStore<Arc<MemoryKeyValueStore>>,
        Arc<MemoryKeyValueStore>,
    ) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = StudentStateStore::new(Arc::clone(&kv), small_seed())
            .with_sync_delay(Duration::ZERO);
        (store, kv)
    }

    async fn loaded_store() -> (
        StudentStateStore<Arc<MemoryKeyValueStore>>,
        Arc<MemoryKeyValueStore>,
    ) {
        let (store, kv) = new_store();
        store.load().await;
        (store, kv)
    }

    fn stored<T: for<'de> Deserialize<'de>>(kv: &MemoryKeyValueStore, key: &str) -> T {
        serde_json::from_str(&kv.get_raw(key).unwrap()).unwrap()
    }

    // --- load ---------------------------------------------------------------

    #[test]
    fn test_initial_state_before_load() {
        let (store, _kv) = new_store();
        assert_eq!(store.load_state(), LoadState::Uninitialized);
        assert!(store.is_loading());
        assert!(store.courses().is_empty());
        assert!(store.announcements().is_empty());
        assert_eq!(store.student(), small_seed().student);
    }

    #[tokio::test]
    async fn test_first_load_seeds_and_persists() {
        let (store, kv) = loaded_store().await;
        let seed = small_seed();

        assert_eq!(store.load_state(), LoadState::Ready);
        assert!(!store.is_loading());
        assert_eq!(store.courses(), seed.courses);
        assert_eq!(store.announcements(), seed.announcements);
        assert_eq!(store.student(), seed.student);
        assert!(store.last_sync_at().is_none());

        let courses: Vec<Course> = stored(&kv, keys::COURSES);
        assert_eq!(courses, seed.courses);
        let announcements: Vec<Announcement> = stored(&kv, keys::ANNOUNCEMENTS);
        assert_eq!(announcements, seed.announcements);
        let student: Student = stored(&kv, keys::STUDENT);
        assert_eq!(student, seed.student);
        assert!(kv.get_raw(keys::LAST_SYNC_AT).is_none());
    }

    #[tokio::test]
    async fn test_load_adopts_stored_values() {
        let (store, kv) = new_store();
        let courses = vec![Course::new("x", "Art", "ART-100", 2.0, LetterGrade::C)];
        kv.insert_raw(keys::COURSES, serde_json::to_string(&courses).unwrap());
        kv.insert_raw(keys::ANNOUNCEMENTS, "[]");
        kv.insert_raw(keys::LAST_SYNC_AT, "2025-03-01T10:00:00.000Z");

        store.load().await;

        assert_eq!(store.courses(), courses);
        assert!(store.announcements().is_empty());
        assert_eq!(
            store.last_sync_at().map(format_timestamp).as_deref(),
            Some("2025-03-01T10:00:00.000Z")
        );
    }

    #[tokio::test]
    async fn test_load_is_idempotent() {
        let (store, _kv) = loaded_store().await;
        let first = store.snapshot();
        store.load().await;
        assert_eq!(store.snapshot(), first);
    }

    #[tokio::test]
    async fn test_load_read_failure_falls_back_to_seed() {
        let (store, kv) = new_store();
        kv.set_fail_reads(true);

        store.load().await;

        let seed = small_seed();
        assert_eq!(store.load_state(), LoadState::Ready);
        assert_eq!(store.courses(), seed.courses);
        assert_eq!(store.announcements(), seed.announcements);
        assert_eq!(store.student(), seed.student);
    }

    #[tokio::test]
    async fn test_load_corrupt_courses_falls_back_to_seed() {
        let (store, kv) = new_store();
        let mut custom = small_seed().student;
        custom.first_name = "Stored".to_string();
        kv.insert_raw(keys::STUDENT, serde_json::to_string(&custom).unwrap());
        kv.insert_raw(keys::COURSES, "{not json");

        store.load().await;

        let seed = small_seed();
        assert_eq!(store.courses(), seed.courses);
        assert_eq!(store.announcements(), seed.announcements);
        // The student keeps its pre-load value.
        assert_eq!(store.student().first_name, seed.student.first_name);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_load_invalid_sync_marker_falls_back() {
        let (store, kv) = new_store();
        kv.insert_raw(keys::LAST_SYNC_AT, "yesterday-ish");
        store.load().await;
        assert!(store.last_sync_at().is_none());
        assert_eq!(store.courses(), small_seed().courses);
    }

    #[tokio::test]
    async fn test_load_after_restart_sees_mutations() {
        let (store, kv) = loaded_store().await;
        store
            .add_course(Course::new("c3", "Art", "ART-100", 2.0, LetterGrade::B))
            .await;
        store.mark_announcement_as_read("a1").await;

        let restarted = StudentStateStore::new(Arc::clone(&kv), small_seed());
        restarted.load().await;

        assert_eq!(restarted.courses().len(), 3);
        assert_eq!(restarted.unread_announcements_count(), 0);
        assert_eq!(restarted.student().gpa, store.student().gpa);
    }

    // --- course mutations ---------------------------------------------------

    #[tokio::test]
    async fn test_add_course_reconciles_gpa() {
        let (store, kv) = loaded_store().await;
        let course = Course::new("c3", "Chemistry", "CHEM-110", 4.0, LetterGrade::C);

        store.add_course(course.clone()).await;

        let mut expected = small_seed().courses;
        expected.push(course);
        assert_eq!(store.courses(), expected);
        assert_eq!(store.student().gpa, compute_gpa(&expected).gpa);

        let persisted: Student = stored(&kv, keys::STUDENT);
        assert_eq!(persisted.gpa, compute_gpa(&expected).gpa);
        let persisted_courses: Vec<Course> = stored(&kv, keys::COURSES);
        assert_eq!(persisted_courses, expected);
    }

    #[tokio::test]
    async fn test_add_course_allows_duplicate_ids() {
        let (store, _kv) = loaded_store().await;
        store
            .add_course(Course::new("c1", "Calculus II", "MATH-202", 3.0, LetterGrade::B))
            .await;
        assert_eq!(store.courses().iter().filter(|c| c.id == "c1").count(), 2);
    }

    #[tokio::test]
    async fn test_update_course_replaces_and_reconciles() {
        let (store, _kv) = loaded_store().await;
        let updated = Course::new("c2", "History", "HIST-110", 4.0, LetterGrade::A);

        let replaced = store.update_course("c2", updated.clone()).await;

        assert_eq!(replaced, 1);
        assert_eq!(store.courses()[1], updated);
        assert_eq!(store.student().gpa, 4.0);
        assert_eq!(store.gpa_calculation().letter_grade, LetterGrade::APlus);
    }

    #[tokio::test]
    async fn test_update_course_unknown_id_is_noop() {
        let (store, _kv) = loaded_store().await;
        let before = store.snapshot();

        let replaced = store
            .update_course("missing", Course::new("z", "Z", "Z", 1.0, LetterGrade::F))
            .await;

        assert_eq!(replaced, 0);
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_update_course_replaces_all_duplicates() {
        let (store, _kv) = loaded_store().await;
        store
            .add_course(Course::new("c1", "Dup", "DUP-1", 1.0, LetterGrade::F))
            .await;

        let replaced = store
            .update_course("c1", Course::new("c1", "Calc", "MATH-201", 3.0, LetterGrade::B))
            .await;

        assert_eq!(replaced, 2);
        assert!(store
            .courses()
            .iter()
            .filter(|c| c.id == "c1")
            .all(|c| c.grade == LetterGrade::B));
    }

    #[tokio::test]
    async fn test_delete_course_reconciles() {
        let (store, _kv) = loaded_store().await;

        let removed = store.delete_course("c2").await;

        assert_eq!(removed, 1);
        assert_eq!(store.courses().len(), 1);
        assert_eq!(store.student().gpa, 4.0);
    }

    #[tokio::test]
    async fn test_delete_last_course_zeroes_gpa() {
        let (store, _kv) = loaded_store().await;
        store.delete_course("c1").await;
        store.delete_course("c2").await;

        assert!(store.courses().is_empty());
        assert_eq!(store.student().gpa, 0.0);
        assert_eq!(store.gpa_calculation(), GpaCalculation::empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_course_leaves_state_unchanged() {
        let (store, kv) = loaded_store().await;
        let before = store.snapshot();
        let stored_student: Student = stored(&kv, keys::STUDENT);

        let removed = store.delete_course("missing").await;

        assert_eq!(removed, 0);
        assert_eq!(store.snapshot(), before);
        let after_student: Student = stored(&kv, keys::STUDENT);
        assert_eq!(after_student, stored_student);
    }

    #[tokio::test]
    async fn test_course_write_failure_still_updates_memory() {
        let (store, kv) = loaded_store().await;
        kv.set_fail_writes(true);
        let course = Course::new("c3", "Art", "ART-100", 1.0, LetterGrade::F);

        store.add_course(course).await;

        assert_eq!(store.courses().len(), 3);
        assert_eq!(store.student().gpa, store.gpa_calculation().gpa);
        let persisted: Vec<Course> = stored(&kv, keys::COURSES);
        assert_eq!(persisted.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_adds_keep_both_courses() {
        let (store, _kv) = loaded_store().await;
        tokio::join!(
            store.add_course(Course::new("c3", "Art", "ART-100", 2.0, LetterGrade::B)),
            store.add_course(Course::new("c4", "Music", "MUS-100", 2.0, LetterGrade::A)),
        );
        assert_eq!(store.courses().len(), 4);
        assert_eq!(store.student().gpa, store.gpa_calculation().gpa);
    }

    #[tokio::test]
    async fn test_concurrent_mutations_on_disk_match_memory() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = StudentStateStore::new(
            FileKeyValueStore::with_dir(dir.path()).unwrap(),
            small_seed(),
        );
        store.load().await;

        for i in 0..10 {
            let id = format!("x{}", i);
            let victim = if i == 0 { "c1".to_string() } else { format!("x{}", i - 1) };
            tokio::join!(
                store.add_course(Course::new(&id, "Elective", "ELEC-100", 2.0, LetterGrade::B)),
                store.delete_course(&victim),
                store.mark_announcement_as_read("a1"),
            );
        }

        let restarted = StudentStateStore::new(
            FileKeyValueStore::with_dir(dir.path()).unwrap(),
            small_seed(),
        );
        restarted.load().await;

        assert_eq!(restarted.courses(), store.courses());
        assert_eq!(restarted.student(), store.student());
        assert_eq!(restarted.student().gpa, restarted.gpa_calculation().gpa);
        assert_eq!(restarted.unread_announcements_count(), 0);
    }

    #[tokio::test]
    async fn test_update_course_and_delete_race_persists_final_state() {
        let (store, kv) = loaded_store().await;

        tokio::join!(
            store.update_course("c2", Course::new("c2", "History", "HIST-110", 4.0, LetterGrade::A)),
            store.delete_course("c1"),
        );

        let persisted: Vec<Course> = stored(&kv, keys::COURSES);
        assert_eq!(persisted, store.courses());
        let student: Student = stored(&kv, keys::STUDENT);
        assert_eq!(student.gpa, store.gpa_calculation().gpa);
    }

    // --- student ------------------------------------------------------------

    #[tokio::test]
    async fn test_update_student_persists() {
        let (store, kv) = loaded_store().await;
        let mut student = store.student();
        student.email = "new@example.edu".to_string();
        student.avatar = Some("file:///avatar.png".to_string());

        store.update_student(student.clone()).await;

        assert_eq!(store.student(), student);
        let persisted: Student = stored(&kv, keys::STUDENT);
        assert_eq!(persisted, student);
    }

    #[tokio::test]
    async fn test_update_student_write_failure_keeps_memory() {
        let (store, kv) = loaded_store().await;
        kv.set_fail_writes(true);
        let mut student = store.student();
        student.section = "C".to_string();

        store.update_student(student).await;

        assert_eq!(store.student().section, "C");
        let persisted: Student = stored(&kv, keys::STUDENT);
        assert_ne!(persisted.section, "C");
    }

    // --- announcements ------------------------------------------------------

    #[tokio::test]
    async fn test_mark_announcement_as_read() {
        let (store, kv) = loaded_store().await;
        assert_eq!(store.unread_announcements_count(), 1);

        assert!(store.mark_announcement_as_read("a1").await);

        assert_eq!(store.unread_announcements_count(), 0);
        let persisted: Vec<Announcement> = stored(&kv, keys::ANNOUNCEMENTS);
        assert!(persisted.iter().all(|a| a.read));
    }

    #[tokio::test]
    async fn test_mark_already_read_is_noop() {
        let (store, _kv) = loaded_store().await;
        let before = store.snapshot();

        assert!(!store.mark_announcement_as_read("a2").await);
        assert!(!store.mark_announcement_as_read("missing").await);

        assert_eq!(store.snapshot(), before);
        assert_eq!(store.unread_announcements_count(), 1);
    }

    // --- sync ---------------------------------------------------------------

    #[tokio::test]
    async fn test_sync_now_stamps_and_persists() {
        let (store, kv) = loaded_store().await;

        let at = store.sync_now().await;

        assert_eq!(store.last_sync_at(), Some(at));
        assert!(!store.is_syncing());
        assert_eq!(
            kv.get_raw(keys::LAST_SYNC_AT).as_deref(),
            Some(format_timestamp(at).as_str())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sync_sets_flag_while_waiting() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = StudentStateStore::new(Arc::clone(&kv), small_seed());
        store.load().await;

        let observe = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            store.is_syncing()
        };
        let (at, during) = tokio::join!(store.sync_now(), observe);

        assert!(during);
        assert!(!store.is_syncing());
        assert_eq!(store.last_sync_at(), Some(at));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_syncs_last_write_wins() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = StudentStateStore::new(Arc::clone(&kv), small_seed());
        store.load().await;

        let (first, second) = tokio::join!(store.sync_now(), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            store.sync_now().await
        });

        assert!(second >= first);
        assert_eq!(store.last_sync_at(), Some(second));
        assert_eq!(
            kv.get_raw(keys::LAST_SYNC_AT).as_deref(),
            Some(format_timestamp(second).as_str())
        );
    }

    #[tokio::test]
    async fn test_sync_write_failure_keeps_memory_marker() {
        let (store, kv) = loaded_store().await;
        kv.set_fail_writes(true);

        let at = store.sync_now().await;

        assert_eq!(store.last_sync_at(), Some(at));
        assert!(kv.get_raw(keys::LAST_SYNC_AT).is_none());
    }

    // --- reset & snapshot ---------------------------------------------------

    #[tokio::test]
    async fn test_reset_reseeds() {
        let (store, kv) = loaded_store().await;
        store.delete_course("c1").await;
        store.mark_announcement_as_read("a1").await;
        store.sync_now().await;

        store.reset().await;

        let seed = small_seed();
        assert_eq!(store.courses(), seed.courses);
        assert_eq!(store.announcements(), seed.announcements);
        assert_eq!(store.student(), seed.student);
        assert!(store.last_sync_at().is_none());
        // Student, courses and announcements are reseeded; the marker stays gone.
        assert_eq!(kv.len(), 3);
        assert!(kv.get_raw(keys::LAST_SYNC_AT).is_none());
    }

    #[tokio::test]
    async fn test_snapshot_serializes_camel_case() {
        let (store, _kv) = loaded_store().await;
        let value = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(value["isLoading"], false);
        assert_eq!(value["unreadAnnouncementsCount"], 1);
        assert_eq!(value["gpaCalculation"]["letterGrade"], "A-");
        assert!(value["lastSyncAt"].is_null());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let ts = parse_timestamp("2025-03-01T10:00:00.123Z").unwrap();
        assert_eq!(format_timestamp(ts), "2025-03-01T10:00:00.123Z");
        assert!(parse_timestamp("not a time").is_err());
    }
}
