//! Sync command for EduDash.
//!
//! Runs the simulated remote sync and reports when it finished.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cli::to_json;
use crate::state::{format_timestamp, StudentStateStore};
use crate::storage::KeyValueStore;

/// Options for the sync command.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the sync command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOutput {
    pub success: bool,
    /// Previous sync time, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_sync_at: Option<DateTime<Utc>>,
    pub last_sync_at: DateTime<Utc>,
}

/// The sync command implementation.
pub struct SyncCommand<'a, K: KeyValueStore> {
    store: &'a StudentStateStore<K>,
}

impl<'a, K: KeyValueStore> SyncCommand<'a, K> {
    /// Create a new sync command.
    pub fn new(store: &'a StudentStateStore<K>) -> Self {
        Self { store }
    }

    /// Run the sync command.
    pub async fn run(&self, _options: &SyncOptions) -> SyncOutput {
        let previous_sync_at = self.store.last_sync_at();
        let last_sync_at = self.store.sync_now().await;

        SyncOutput {
            success: true,
            previous_sync_at,
            last_sync_at,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SyncOutput, options: &SyncOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return to_json(output);
        }

        let mut text = format!("Synced at {}", format_timestamp(output.last_sync_at));
        if let Some(previous) = output.previous_sync_at {
            text.push_str(&format!(" (previous: {})", format_timestamp(previous)));
        }
        text
    }
}
