//! Domain types and pure computations for EduDash.
//!
//! Nothing here performs I/O. The state store in `crate::state` owns the
//! mutable aggregates and calls into these modules for derived values.

pub mod announcements;
pub mod gpa;
pub mod models;
pub mod ranking;
pub mod transcript;

pub use announcements::{format_relative_date, unread_count, AnnouncementFilter};
pub use gpa::{compute_gpa, letter_grade_for, round2, GpaCalculation, LETTER_THRESHOLDS};
pub use models::{
    next_course_id, Announcement, AnnouncementCategory, Course, LetterGrade, Priority,
    Student,
};
pub use ranking::{percentile, sorted_board, Medal, RankingEntry, Standing, Trend};
pub use transcript::{academic_year_for, Language, Transcript};
