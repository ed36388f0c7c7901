//! Transcript command for EduDash.
//!
//! Builds an exportable academic record from the current profile and courses,
//! rendered as text in one of the supported languages or as JSON.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cli::to_json;
use crate::core::{Language, Transcript};
use crate::error::EduDashError;
use crate::state::StudentStateStore;
use crate::storage::KeyValueStore;

/// Options for the transcript command.
#[derive(Debug, Clone, Default)]
pub struct TranscriptOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Label language for the text rendering.
    pub language: Language,
    /// Also write the rendered transcript to this file.
    pub output_path: Option<PathBuf>,
}

/// Output format for the transcript command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptOutput {
    pub success: bool,
    pub transcript: Transcript,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_to: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The transcript command implementation.
pub struct TranscriptCommand<'a, K: KeyValueStore> {
    store: &'a StudentStateStore<K>,
    generated_at: Option<DateTime<Utc>>,
}

impl<'a, K: KeyValueStore> TranscriptCommand<'a, K> {
    /// Create a new transcript command stamped at run time.
    pub fn new(store: &'a StudentStateStore<K>) -> Self {
        Self {
            store,
            generated_at: None,
        }
    }

    /// Use a fixed generation time.
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Run the transcript command.
    pub async fn run(&self, options: &TranscriptOptions) -> TranscriptOutput {
        let generated_at = self.generated_at.unwrap_or_else(Utc::now);
        let transcript =
            Transcript::assemble(&self.store.student(), &self.store.courses(), generated_at);

        let Some(path) = &options.output_path else {
            return TranscriptOutput {
                success: true,
                transcript,
                written_to: None,
                error: None,
            };
        };

        let rendered = if options.json {
            to_json(&transcript)
        } else {
            transcript.render_text(options.language)
        };

        match tokio::fs::write(path, rendered).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "transcript written");
                TranscriptOutput {
                    success: true,
                    transcript,
                    written_to: Some(path.clone()),
                    error: None,
                }
            }
            Err(e) => TranscriptOutput {
                success: false,
                transcript,
                written_to: None,
                error: Some(EduDashError::storage(path, e).to_string()),
            },
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &TranscriptOutput, options: &TranscriptOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            return to_json(output);
        }

        if !output.success {
            return format!(
                "Transcript export failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        match &output.written_to {
            Some(path) => format!("Transcript written to {}", path.display()),
            None => output.transcript.render_text(options.language),
        }
    }
}
