//! Reset command for EduDash.
//!
//! Discards every stored aggregate and reloads from the seed dataset.

use serde::{Deserialize, Serialize};

use crate::cli::to_json;
use crate::state::StudentStateStore;
use crate::storage::KeyValueStore;

/// Options for the reset command.
#[derive(Debug, Clone, Default)]
pub struct ResetOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Confirm the reset. Without it nothing is changed.
    pub force: bool,
}

/// Output format for the reset command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetOutput {
    pub success: bool,
    /// Whether stored data was actually discarded.
    pub reset: bool,
    pub course_count: usize,
    pub announcement_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The reset command implementation.
pub struct ResetCommand<'a, K: KeyValueStore> {
    store: &'a StudentStateStore<K>,
}

impl<'a, K: KeyValueStore> ResetCommand<'a, K> {
    /// Create a new reset command.
    pub fn new(store: &'a StudentStateStore<K>) -> Self {
        Self { store }
    }

    /// Run the reset command.
    pub async fn run(&self, options: &ResetOptions) -> ResetOutput {
        if !options.force {
            return ResetOutput {
                success: false,
                reset: false,
                course_count: self.store.courses().len(),
                announcement_count: self.store.announcements().len(),
                error: Some("refusing to reset without --force".to_string()),
            };
        }

        self.store.reset().await;

        ResetOutput {
            success: true,
            reset: true,
            course_count: self.store.courses().len(),
            announcement_count: self.store.announcements().len(),
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ResetOutput, options: &ResetOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return to_json(output);
        }

        if !output.success {
            return format!(
                "Reset failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        format!(
            "Reset to seed data: {} course(s), {} announcement(s).",
            output.course_count, output.announcement_count
        )
    }
}
