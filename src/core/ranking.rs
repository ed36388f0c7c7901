//! Class standing derived from the student's rank.
//!
//! Rank and class size are not computed locally; they arrive with the seed
//! data. This module only derives presentation values from them.

use serde::{Deserialize, Serialize};

use crate::core::models::Student;

/// Percentage of the class ranked below the student, rounded to a whole number.
///
/// An empty class yields 0.
pub fn percentile(rank: u32, total_students: u32) -> u32 {
    if total_students == 0 {
        return 0;
    }
    let below = f64::from(total_students) - f64::from(rank);
    let pct = (below / f64::from(total_students) * 100.0).round();
    pct.clamp(0.0, 100.0) as u32
}

/// A student's position in the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub rank: u32,
    pub total_students: u32,
    pub percentile: u32,
}

impl Standing {
    /// Standing of the given student.
    pub fn for_student(student: &Student) -> Self {
        Self {
            rank: student.rank,
            total_students: student.total_students,
            percentile: percentile(student.rank, student.total_students),
        }
    }
}

/// Podium medal for the top three ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Medal for a rank, if it is on the podium.
    pub fn for_rank(rank: u32) -> Option<Self> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

/// Movement on the leaderboard since the last period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Same,
}

impl Trend {
    /// Single-character marker for text output.
    pub fn symbol(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Same => "–",
        }
    }
}

/// One row of the class leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub id: String,
    pub student_name: String,
    pub gpa: f64,
    pub rank: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

impl RankingEntry {
    /// Whether this row belongs to the given student.
    ///
    /// Leaderboard rows carry no student ID, so rows are matched by rank.
    pub fn is_current_student(&self, student: &Student) -> bool {
        self.rank == student.rank
    }

    /// Podium medal for this row.
    pub fn medal(&self) -> Option<Medal> {
        Medal::for_rank(self.rank)
    }
}

/// Leaderboard rows ordered by rank, best first.
pub fn sorted_board(entries: &[RankingEntry]) -> Vec<RankingEntry> {
    let mut board = entries.to_vec();
    board.sort_by_key(|entry| entry.rank);
    board
}
