//! Entity types for EduDash.
//!
//! These are the persisted shapes of the dashboard: courses, the student
//! profile and announcements. Field names serialize in camelCase so the stored
//! JSON matches the record layout the dashboard has always written.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{EduDashError, Result};

/// Next free course ID in the form `crs_YYYYMMDD_NNN`.
///
/// Scans the existing courses for today's prefix and takes one past the
/// highest counter, so IDs stay unique across runs sharing one store.
pub fn next_course_id(existing: &[Course]) -> String {
    let prefix = format!("crs_{}_", Utc::now().format("%Y%m%d"));

    let next = existing
        .iter()
        .filter_map(|course| course.id.strip_prefix(&prefix))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .map(|n| n + 1)
        .max()
        .unwrap_or(0);

    format!("{}{:03}", prefix, next)
}

/// Banded letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D+")]
    DPlus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

impl LetterGrade {
    /// All letters, best first.
    pub fn all() -> &'static [LetterGrade] {
        &[
            LetterGrade::APlus,
            LetterGrade::A,
            LetterGrade::AMinus,
            LetterGrade::BPlus,
            LetterGrade::B,
            LetterGrade::BMinus,
            LetterGrade::CPlus,
            LetterGrade::C,
            LetterGrade::CMinus,
            LetterGrade::DPlus,
            LetterGrade::D,
            LetterGrade::F,
        ]
    }

    /// The printed form of the letter.
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::AMinus => "A-",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::BMinus => "B-",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::CMinus => "C-",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }

    /// Conventional 4.0-scale value of the letter.
    ///
    /// Used to default a course's numeric grade when only the letter is known.
    pub fn points(&self) -> f64 {
        match self {
            LetterGrade::APlus | LetterGrade::A => 4.0,
            LetterGrade::AMinus => 3.7,
            LetterGrade::BPlus => 3.3,
            LetterGrade::B => 3.0,
            LetterGrade::BMinus => 2.7,
            LetterGrade::CPlus => 2.3,
            LetterGrade::C => 2.0,
            LetterGrade::CMinus => 1.7,
            LetterGrade::DPlus => 1.3,
            LetterGrade::D => 1.0,
            LetterGrade::F => 0.0,
        }
    }

    /// Position in the banding, 0 for A+ up to 11 for F.
    pub fn band_index(&self) -> usize {
        Self::all()
            .iter()
            .position(|letter| letter == self)
            .unwrap_or(Self::all().len() - 1)
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LetterGrade {
    type Err = EduDashError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        LetterGrade::all()
            .iter()
            .find(|letter| letter.as_str().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| EduDashError::invalid_input(format!("unknown letter grade '{}'", s)))
    }
}

/// A single academic enrollment record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique course identifier.
    pub id: String,
    /// Course name.
    pub name: String,
    /// Course code (e.g. "MATH-201").
    pub code: String,
    /// Credit weight.
    pub credits: f64,
    /// Letter grade earned.
    pub grade: LetterGrade,
    /// Numeric equivalent of the letter grade, used for weighting.
    pub numeric_grade: f64,
    /// Semester label.
    pub semester: String,
    /// Instructor name.
    pub teacher: String,
    /// Display color.
    pub color: String,
}

impl Course {
    /// Create a course whose numeric grade is the letter's 4.0-scale value.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        code: impl Into<String>,
        credits: f64,
        grade: LetterGrade,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            credits,
            grade,
            numeric_grade: grade.points(),
            semester: String::new(),
            teacher: String::new(),
            color: "#3B82F6".to_string(),
        }
    }

    /// Override the numeric grade.
    pub fn with_numeric_grade(mut self, numeric_grade: f64) -> Self {
        self.numeric_grade = numeric_grade;
        self
    }

    /// Set the semester label.
    pub fn with_semester(mut self, semester: impl Into<String>) -> Self {
        self.semester = semester.into();
        self
    }

    /// Set the instructor name.
    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = teacher.into();
        self
    }

    /// Set the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Grade points contributed by this course.
    pub fn grade_points(&self) -> f64 {
        self.numeric_grade * self.credits
    }
}

/// Student profile and standing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// School-issued student number.
    pub student_id: String,
    /// Grade level.
    pub grade: String,
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Derived from the course list by the state store.
    pub gpa: f64,
    /// Class rank, sourced from seed data.
    pub rank: u32,
    /// Class size, sourced from seed data.
    pub total_students: u32,
}

impl Student {
    /// First and last name joined.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Announcement category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementCategory {
    #[default]
    General,
    Academic,
    Event,
    Urgent,
}

impl AnnouncementCategory {
    /// Get all category variants.
    pub fn all() -> &'static [AnnouncementCategory] {
        &[
            AnnouncementCategory::General,
            AnnouncementCategory::Academic,
            AnnouncementCategory::Event,
            AnnouncementCategory::Urgent,
        ]
    }

    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            AnnouncementCategory::General => "General",
            AnnouncementCategory::Academic => "Academic",
            AnnouncementCategory::Event => "Event",
            AnnouncementCategory::Urgent => "Urgent",
        }
    }
}

impl FromStr for AnnouncementCategory {
    type Err = EduDashError;

    fn from_str(s: &str) -> Result<Self> {
        AnnouncementCategory::all()
            .iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| EduDashError::invalid_input(format!("unknown category '{}'", s)))
    }
}

/// Announcement priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// A notice shown on the news feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: AnnouncementCategory,
    /// ISO-8601 date or timestamp.
    pub date: String,
    pub author: String,
    pub priority: Priority,
    /// Only ever moves from false to true.
    pub read: bool,
}

impl Announcement {
    /// Whether the announcement carries the high-priority badge.
    pub fn is_high_priority(&self) -> bool {
        self.priority == Priority::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_grade_serializes_with_symbols() {
        let json = serde_json::to_string(&LetterGrade::AMinus).unwrap();
        assert_eq!(json, "\"A-\"");
        let parsed: LetterGrade = serde_json::from_str("\"B+\"").unwrap();
        assert_eq!(parsed, LetterGrade::BPlus);
    }

    #[test]
    fn test_letter_grade_from_str() {
        assert_eq!("a+".parse::<LetterGrade>().unwrap(), LetterGrade::APlus);
        assert_eq!(" C- ".parse::<LetterGrade>().unwrap(), LetterGrade::CMinus);
        assert!("E".parse::<LetterGrade>().is_err());
    }

    #[test]
    fn test_letter_grade_band_index_is_ordered() {
        let indices: Vec<usize> = LetterGrade::all().iter().map(|l| l.band_index()).collect();
        assert_eq!(indices, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_course_serializes_camel_case() {
        let course = Course::new("c1", "Calculus", "MATH-201", 4.0, LetterGrade::A)
            .with_teacher("Dr. Rivera");
        let value = serde_json::to_value(&course).unwrap();
        assert_eq!(value["numericGrade"], 4.0);
        assert_eq!(value["teacher"], "Dr. Rivera");
        assert_eq!(value["grade"], "A");
    }

    #[test]
    fn test_course_new_uses_letter_points() {
        let course = Course::new("c1", "History", "HIST-101", 3.0, LetterGrade::BPlus);
        assert!((course.numeric_grade - 3.3).abs() < f64::EPSILON);
        assert!((course.grade_points() - 9.9).abs() < 1e-9);
    }

    #[test]
    fn test_student_avatar_omitted_when_absent() {
        let student = Student {
            id: "s1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Park".to_string(),
            email: "ada@example.edu".to_string(),
            student_id: "2024-0001".to_string(),
            grade: "11".to_string(),
            section: "B".to_string(),
            avatar: None,
            gpa: 3.5,
            rank: 4,
            total_students: 120,
        };
        let value = serde_json::to_value(&student).unwrap();
        assert!(value.get("avatar").is_none());
        assert_eq!(value["totalStudents"], 120);
        assert_eq!(student.full_name(), "Ada Park");
    }

    #[test]
    fn test_announcement_enums_lowercase() {
        let json = r#"{"id":"a1","title":"T","content":"C","category":"urgent",
            "date":"2025-01-10","author":"Office","priority":"high","read":false}"#;
        let announcement: Announcement = serde_json::from_str(json).unwrap();
        assert_eq!(announcement.category, AnnouncementCategory::Urgent);
        assert!(announcement.is_high_priority());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "event".parse::<AnnouncementCategory>().unwrap(),
            AnnouncementCategory::Event
        );
        assert!("sports".parse::<AnnouncementCategory>().is_err());
    }

    #[test]
    fn test_next_course_id_starts_at_zero() {
        let id = next_course_id(&[]);
        assert!(id.starts_with("crs_"));
        assert!(id.ends_with("_000"));
        assert_eq!(id.len(), "crs_20250101_000".len());
    }

    #[test]
    fn test_next_course_id_follows_highest_existing() {
        let first = next_course_id(&[]);
        let prefix = &first[..first.len() - 3];
        let courses = vec![
            Course::new(format!("{}007", prefix), "A", "A-1", 1.0, LetterGrade::A),
            Course::new(format!("{}002", prefix), "B", "B-1", 1.0, LetterGrade::B),
            Course::new("crs_19990101_050", "Old", "O-1", 1.0, LetterGrade::C),
            Course::new("crs-001", "Seed", "S-1", 1.0, LetterGrade::C),
        ];

        assert_eq!(next_course_id(&courses), format!("{}008", prefix));
    }

    #[test]
    fn test_next_course_id_never_repeats_existing() {
        let mut courses = Vec::new();
        for _ in 0..5 {
            let id = next_course_id(&courses);
            assert!(courses.iter().all(|c: &Course| c.id != id));
            courses.push(Course::new(id, "X", "X-1", 1.0, LetterGrade::B));
        }
        assert!(courses[4].id.ends_with("_004"));
    }
}
