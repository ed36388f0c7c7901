//! Summary command for EduDash.
//!
//! Shows the dashboard home view: profile, cumulative GPA, class standing,
//! unread news and the last sync time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cli::to_json;
use crate::core::{GpaCalculation, Standing};
use crate::state::StudentStateStore;
use crate::storage::KeyValueStore;

/// Options for the summary command.
#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the summary command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOutput {
    pub success: bool,
    pub student_name: String,
    pub student_id: String,
    pub grade: String,
    pub section: String,
    pub gpa_calculation: GpaCalculation,
    pub standing: Standing,
    pub course_count: usize,
    pub unread_announcements: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sync_at: Option<DateTime<Utc>>,
}

/// The summary command implementation.
pub struct SummaryCommand<'a, K: KeyValueStore> {
    store: &'a StudentStateStore<K>,
}

impl<'a, K: KeyValueStore> SummaryCommand<'a, K> {
    /// Create a new summary command.
    pub fn new(store: &'a StudentStateStore<K>) -> Self {
        Self { store }
    }

    /// Run the summary command.
    pub async fn run(&self, _options: &SummaryOptions) -> SummaryOutput {
        let snapshot = self.store.snapshot();
        let student = &snapshot.student;

        SummaryOutput {
            success: true,
            student_name: student.full_name(),
            student_id: student.student_id.clone(),
            grade: student.grade.clone(),
            section: student.section.clone(),
            gpa_calculation: snapshot.gpa_calculation,
            standing: Standing::for_student(student),
            course_count: snapshot.courses.len(),
            unread_announcements: snapshot.unread_announcements_count,
            last_sync_at: snapshot.last_sync_at,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &SummaryOutput, options: &SummaryOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            to_json(output)
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &SummaryOutput) -> String {
        let gpa = &output.gpa_calculation;
        let mut lines = vec![
            format!("{} ({})", output.student_name, output.student_id),
            format!("{}, Section {}", output.grade, output.section),
            String::new(),
            format!("GPA:      {:.2} ({})", gpa.gpa, gpa.letter_grade),
            format!(
                "Credits:  {} across {} course(s)",
                gpa.total_credits, output.course_count
            ),
            format!(
                "Rank:     #{} of {} (top {}%)",
                output.standing.rank,
                output.standing.total_students,
                100 - output.standing.percentile.min(100)
            ),
            format!("Unread:   {} announcement(s)", output.unread_announcements),
        ];

        match output.last_sync_at {
            Some(at) => lines.push(format!("Synced:   {}", at.format("%Y-%m-%d %H:%M UTC"))),
            None => lines.push("Synced:   never".to_string()),
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::loaded_store;
    use crate::core::LetterGrade;

    #[tokio::test]
    async fn test_summary_reflects_seed() {
        let store = loaded_store().await;
        let cmd = SummaryCommand::new(&store);

        let output = cmd.run(&SummaryOptions::default()).await;

        assert!(output.success);
        assert_eq!(output.student_name, "Alex Morgan");
        assert_eq!(output.course_count, 6);
        assert_eq!(output.gpa_calculation.gpa, 3.65);
        assert_eq!(output.gpa_calculation.letter_grade, LetterGrade::AMinus);
        assert_eq!(output.standing.rank, 12);
        assert_eq!(output.standing.percentile, 92);
        assert_eq!(output.unread_announcements, 3);
        assert!(output.last_sync_at.is_none());
    }

    #[tokio::test]
    async fn test_summary_after_sync_has_timestamp() {
        let store = loaded_store().await;
        let synced_at = store.sync_now().await;

        let output = SummaryCommand::new(&store)
            .run(&SummaryOptions::default())
            .await;

        assert_eq!(output.last_sync_at, Some(synced_at));
    }

    #[tokio::test]
    async fn test_format_output_modes() {
        let store = loaded_store().await;
        let cmd = SummaryCommand::new(&store);
        let output = cmd.run(&SummaryOptions::default()).await;

        let quiet = SummaryOptions {
            quiet: true,
            ..Default::default()
        };
        assert!(cmd.format_output(&output, &quiet).is_empty());

        let json = SummaryOptions {
            json: true,
            ..Default::default()
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&cmd.format_output(&output, &json)).unwrap();
        assert_eq!(parsed["gpaCalculation"]["letterGrade"], "A-");
        assert_eq!(parsed["unreadAnnouncements"], 3);

        let text = cmd.format_output(&output, &SummaryOptions::default());
        assert!(text.contains("GPA:      3.65 (A-)"));
        assert!(text.contains("#12 of 150"));
        assert!(text.contains("Synced:   never"));
    }
}
