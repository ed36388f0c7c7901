//! Initial dataset for first-run seeding.
//!
//! The state store adopts these values whenever an aggregate has never been
//! persisted. The built-in dataset is a demo record; a JSON file with the same
//! shape can replace it through configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::models::{
    Announcement, AnnouncementCategory, Course, LetterGrade, Priority, Student,
};
use crate::core::ranking::{RankingEntry, Trend};
use crate::error::{EduDashError, Result};

/// Seed values for every aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    pub student: Student,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub announcements: Vec<Announcement>,
    /// Class leaderboard. Never persisted; rank data is external.
    #[serde(default)]
    pub rankings: Vec<RankingEntry>,
}

impl SeedData {
    /// Load a seed dataset from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| EduDashError::storage(path, e))?;
        serde_json::from_str(&content)
            .map_err(|e| EduDashError::seed(format!("{}: {}", path.display(), e)))
    }

    /// Load from `path` when given, otherwise use the built-in dataset.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Built-in demo dataset.
    pub fn builtin() -> Self {
        Self {
            student: builtin_student(),
            courses: builtin_courses(),
            announcements: builtin_announcements(),
            rankings: builtin_rankings(),
        }
    }
}

impl Default for SeedData {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_student() -> Student {
    Student {
        id: "stu-001".to_string(),
        first_name: "Alex".to_string(),
        last_name: "Morgan".to_string(),
        email: "alex.morgan@northfield.edu".to_string(),
        student_id: "NF-2024-0412".to_string(),
        grade: "11th Grade".to_string(),
        section: "B".to_string(),
        avatar: None,
        gpa: 3.65,
        rank: 12,
        total_students: 150,
    }
}

fn builtin_courses() -> Vec<Course> {
    vec![
        Course::new("crs-001", "Advanced Calculus", "MATH-301", 4.0, LetterGrade::A)
            .with_semester("Fall 2024")
            .with_teacher("Dr. Elena Rivera")
            .with_color("#3B82F6"),
        Course::new("crs-002", "Physics", "PHYS-201", 4.0, LetterGrade::AMinus)
            .with_semester("Fall 2024")
            .with_teacher("Mr. David Okafor")
            .with_color("#8B5CF6"),
        Course::new("crs-003", "English Literature", "ENG-210", 3.0, LetterGrade::BPlus)
            .with_semester("Fall 2024")
            .with_teacher("Ms. Hannah Lee")
            .with_color("#EC4899"),
        Course::new("crs-004", "World History", "HIST-150", 3.0, LetterGrade::A)
            .with_semester("Fall 2024")
            .with_teacher("Mr. James Carter")
            .with_color("#F59E0B"),
        Course::new("crs-005", "Chemistry", "CHEM-110", 4.0, LetterGrade::B)
            .with_semester("Spring 2025")
            .with_teacher("Dr. Priya Nair")
            .with_color("#10B981"),
        Course::new("crs-006", "Computer Science", "CS-120", 3.0, LetterGrade::APlus)
            .with_semester("Spring 2025")
            .with_teacher("Ms. Sofia Alvarez")
            .with_color("#06B6D4"),
    ]
}

fn builtin_announcements() -> Vec<Announcement> {
    let announcement = |id: &str,
                        title: &str,
                        content: &str,
                        category: AnnouncementCategory,
                        date: &str,
                        author: &str,
                        priority: Priority,
                        read: bool| Announcement {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        category,
        date: date.to_string(),
        author: author.to_string(),
        priority,
        read,
    };

    vec![
        announcement(
            "ann-001",
            "Midterm Exam Schedule Released",
            "The midterm schedule is now available. Check the academic calendar for room assignments.",
            AnnouncementCategory::Academic,
            "2025-03-10T08:00:00.000Z",
            "Academic Office",
            Priority::High,
            false,
        ),
        announcement(
            "ann-002",
            "Spring Science Fair",
            "Registration for the spring science fair closes on Friday. Teams of up to three students.",
            AnnouncementCategory::Event,
            "2025-03-08T12:30:00.000Z",
            "Science Department",
            Priority::Medium,
            false,
        ),
        announcement(
            "ann-003",
            "Campus Closed for Maintenance",
            "The east wing will be closed on Saturday for electrical maintenance.",
            AnnouncementCategory::Urgent,
            "2025-03-06T16:00:00.000Z",
            "Facilities",
            Priority::High,
            false,
        ),
        announcement(
            "ann-004",
            "Library Hours Extended",
            "The library will stay open until 8 PM on weekdays during exam season.",
            AnnouncementCategory::General,
            "2025-03-01T09:00:00.000Z",
            "Library Staff",
            Priority::Low,
            true,
        ),
    ]
}

fn builtin_rankings() -> Vec<RankingEntry> {
    let entry = |rank: u32, name: &str, gpa: f64, trend: Trend| RankingEntry {
        id: format!("rank-{:03}", rank),
        student_name: name.to_string(),
        gpa,
        rank,
        avatar: None,
        trend: Some(trend),
    };

    vec![
        entry(1, "Maya Thompson", 3.98, Trend::Same),
        entry(2, "Ethan Brooks", 3.95, Trend::Up),
        entry(3, "Olivia Chen", 3.93, Trend::Down),
        entry(4, "Noah Patel", 3.9, Trend::Up),
        entry(5, "Sophia Kim", 3.88, Trend::Same),
        entry(10, "Liam Garcia", 3.71, Trend::Down),
        entry(11, "Ava Johnson", 3.68, Trend::Same),
        entry(12, "Alex Morgan", 3.65, Trend::Up),
        entry(13, "Lucas Wright", 3.61, Trend::Down),
    ]
}
