//! EduDash - student dashboard core
//!
//! EduDash keeps a student's profile, courses and announcement feed in a
//! key/value store, computes the credit-weighted GPA and letter grade, and
//! exposes the dashboard through a small CLI.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod seed;
pub mod state;
pub mod storage;

pub use config::Config;
pub use core::{
    compute_gpa, Announcement, AnnouncementCategory, Course, GpaCalculation, LetterGrade,
    Student,
};
pub use error::{EduDashError, FailOpen, Result};
pub use seed::SeedData;
pub use state::{DashboardSnapshot, LoadState, StudentStateStore};
pub use storage::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};

// CLI commands
pub use cli::{
    CoursesCommand, NewsCommand, ProfileCommand, RankingCommand, ResetCommand, SummaryCommand,
    SyncCommand, TranscriptCommand,
};
