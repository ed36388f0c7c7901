//! Ranking command for EduDash.
//!
//! Shows the class leaderboard with the student's own row highlighted.

use serde::{Deserialize, Serialize};

use crate::cli::to_json;
use crate::core::{sorted_board, Medal, RankingEntry, Standing};
use crate::state::StudentStateStore;
use crate::storage::KeyValueStore;

/// Options for the ranking command.
#[derive(Debug, Clone, Default)]
pub struct RankingOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Maximum number of rows.
    pub limit: Option<usize>,
}

/// One leaderboard row as shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRow {
    #[serde(flatten)]
    pub entry: RankingEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medal: Option<Medal>,
    pub is_current_student: bool,
}

/// Output format for the ranking command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingOutput {
    pub success: bool,
    pub standing: Standing,
    pub rows: Vec<RankingRow>,
}

/// The ranking command implementation.
pub struct RankingCommand<'a, K: KeyValueStore> {
    store: &'a StudentStateStore<K>,
}

impl<'a, K: KeyValueStore> RankingCommand<'a, K> {
    /// Create a new ranking command.
    pub fn new(store: &'a StudentStateStore<K>) -> Self {
        Self { store }
    }

    /// Run the ranking command.
    pub async fn run(&self, options: &RankingOptions) -> RankingOutput {
        let student = self.store.student();

        let mut rows: Vec<RankingRow> = sorted_board(&self.store.seed().rankings)
            .into_iter()
            .map(|entry| RankingRow {
                medal: entry.medal(),
                is_current_student: entry.is_current_student(&student),
                entry,
            })
            .collect();

        if let Some(limit) = options.limit {
            rows.truncate(limit);
        }

        RankingOutput {
            success: true,
            standing: Standing::for_student(&student),
            rows,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &RankingOutput, options: &RankingOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            to_json(output)
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &RankingOutput) -> String {
        let mut lines = vec![format!(
            "Rank #{} of {} ({}th percentile)\n",
            output.standing.rank, output.standing.total_students, output.standing.percentile
        )];

        if output.rows.is_empty() {
            lines.push("No leaderboard data.".to_string());
        }

        for row in &output.rows {
            let medal = match row.medal {
                Some(Medal::Gold) => "🥇",
                Some(Medal::Silver) => "🥈",
                Some(Medal::Bronze) => "🥉",
                None => "  ",
            };
            let you = if row.is_current_student { "  ← you" } else { "" };
            let trend = row.entry.trend.map(|t| t.symbol()).unwrap_or(" ");
            lines.push(format!(
                "{} {:>3}. {:<24} {:.2} {}{}",
                medal, row.entry.rank, row.entry.student_name, row.entry.gpa, trend, you
            ));
        }

        lines.join("\n")
    }
}
