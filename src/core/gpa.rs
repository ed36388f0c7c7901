//! Cumulative grade aggregation.
//!
//! Reduces a course list to a credit-weighted GPA with its letter band.
//!
//! Letter thresholds (evaluated highest first, over the rounded GPA):
//! - A+ 3.85, A 3.70, A- 3.50
//! - B+ 3.30, B 3.00, B- 2.70
//! - C+ 2.30, C 2.00, C- 1.70
//! - D+ 1.30, D 1.00, otherwise F

use serde::{Deserialize, Serialize};

use crate::core::models::{Course, LetterGrade};

/// Letter-band thresholds, highest first.
pub const LETTER_THRESHOLDS: &[(f64, LetterGrade)] = &[
    (3.85, LetterGrade::APlus),
    (3.70, LetterGrade::A),
    (3.50, LetterGrade::AMinus),
    (3.30, LetterGrade::BPlus),
    (3.00, LetterGrade::B),
    (2.70, LetterGrade::BMinus),
    (2.30, LetterGrade::CPlus),
    (2.00, LetterGrade::C),
    (1.70, LetterGrade::CMinus),
    (1.30, LetterGrade::DPlus),
    (1.00, LetterGrade::D),
];

/// Cumulative grade summary for a course list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpaCalculation {
    pub gpa: f64,
    pub total_credits: f64,
    pub total_grade_points: f64,
    pub letter_grade: LetterGrade,
}

impl GpaCalculation {
    /// Summary of an empty course list.
    pub fn empty() -> Self {
        Self {
            gpa: 0.0,
            total_credits: 0.0,
            total_grade_points: 0.0,
            letter_grade: LetterGrade::F,
        }
    }
}

impl Default for GpaCalculation {
    fn default() -> Self {
        Self::empty()
    }
}

/// Round to two decimals, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Band a GPA into its letter grade.
pub fn letter_grade_for(gpa: f64) -> LetterGrade {
    LETTER_THRESHOLDS
        .iter()
        .find(|(threshold, _)| gpa >= *threshold)
        .map(|(_, letter)| *letter)
        .unwrap_or(LetterGrade::F)
}

/// Compute the cumulative GPA of a course list.
///
/// Credits and numeric grades are not validated; negative values flow through
/// the arithmetic unchanged.
pub fn compute_gpa(courses: &[Course]) -> GpaCalculation {
    if courses.is_empty() {
        return GpaCalculation::empty();
    }

    let (total_grade_points, total_credits) = courses
        .iter()
        .fold((0.0f64, 0.0f64), |(points, credits), course| {
            (points + course.grade_points(), credits + course.credits)
        });

    let raw_gpa = if total_credits > 0.0 {
        total_grade_points / total_credits
    } else {
        0.0
    };
    let gpa = round2(raw_gpa);

    GpaCalculation {
        gpa,
        total_credits,
        total_grade_points: round2(total_grade_points),
        letter_grade: letter_grade_for(gpa),
    }
}
