//! CLI commands for EduDash.
//!
//! Every command borrows a loaded [`StudentStateStore`](crate::state::StudentStateStore),
//! produces a serializable output struct and formats it as JSON or text:
//! - **Overview**: summary, ranking, transcript
//! - **Records**: courses, news, profile
//! - **Maintenance**: sync, reset

// Overview
pub mod ranking;
pub mod summary;
pub mod transcript;

// Records
pub mod courses;
pub mod news;
pub mod profile;

// Maintenance
pub mod reset;
pub mod sync;

pub use courses::CoursesCommand;
pub use news::NewsCommand;
pub use profile::ProfileCommand;
pub use ranking::RankingCommand;
pub use reset::ResetCommand;
pub use summary::SummaryCommand;
pub use sync::SyncCommand;
pub use transcript::TranscriptCommand;

/// Render an output struct as pretty JSON.
pub(crate) fn to_json<T: serde::Serialize>(output: &T) -> String {
    serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
}
