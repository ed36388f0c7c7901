//! Transcript assembly and plain-text rendering.
//!
//! A transcript is a frozen view of the student's profile and course list with
//! the cumulative GPA at the time it was generated. Labels can be rendered in
//! any of the supported languages.

use std::fmt::Write as _;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::gpa::compute_gpa;
use crate::core::models::{Course, LetterGrade, Student};
use crate::error::{EduDashError, Result};

/// Month (1-based) on which a new academic year begins.
pub const ACADEMIC_YEAR_START_MONTH: u32 = 8;

/// Academic year label ("2024-2025") containing the given date.
pub fn academic_year_for(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() >= ACADEMIC_YEAR_START_MONTH {
        format!("{}-{}", year, year + 1)
    } else {
        format!("{}-{}", year - 1, year)
    }
}

/// Transcript rendering language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    Ru,
    Uz,
}

/// Labels that vary by language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub transcript: &'static str,
    pub student: &'static str,
    pub grade: &'static str,
    pub section: &'static str,
    pub gpa: &'static str,
    pub courses: &'static str,
}

impl Language {
    /// Get all supported languages.
    pub fn all() -> &'static [Language] {
        &[
            Language::En,
            Language::Es,
            Language::Fr,
            Language::Ru,
            Language::Uz,
        ]
    }

    /// Two-letter language code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::Ru => "ru",
            Language::Uz => "uz",
        }
    }

    /// Translated transcript labels.
    pub fn labels(&self) -> Labels {
        match self {
            Language::En => Labels {
                transcript: "Transcript",
                student: "Student",
                grade: "Grade",
                section: "Section",
                gpa: "GPA",
                courses: "Courses",
            },
            Language::Es => Labels {
                transcript: "Certificado Académico",
                student: "Estudiante",
                grade: "Grado",
                section: "Sección",
                gpa: "Promedio",
                courses: "Cursos",
            },
            Language::Fr => Labels {
                transcript: "Relevé de Notes",
                student: "Élève",
                grade: "Classe",
                section: "Section",
                gpa: "Moyenne",
                courses: "Cours",
            },
            Language::Ru => Labels {
                transcript: "Академическая выписка",
                student: "Ученик",
                grade: "Класс",
                section: "Секция",
                gpa: "Средний балл",
                courses: "Курсы",
            },
            Language::Uz => Labels {
                transcript: "Akademik maʼlumotnoma",
                student: "Oʻquvchi",
                grade: "Sinf",
                section: "Boʻlim",
                gpa: "Oʻrtacha ball",
                courses: "Fanlar",
            },
        }
    }
}

impl FromStr for Language {
    type Err = EduDashError;

    fn from_str(s: &str) -> Result<Self> {
        Language::all()
            .iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| EduDashError::invalid_input(format!("unsupported language '{}'", s)))
    }
}

/// Exportable academic record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub student_id: String,
    pub student_name: String,
    pub grade: String,
    pub section: String,
    pub academic_year: String,
    pub courses: Vec<Course>,
    #[serde(rename = "overallGPA")]
    pub overall_gpa: f64,
    pub letter_grade: LetterGrade,
    pub generated_date: DateTime<Utc>,
}

impl Transcript {
    /// Build a transcript from the current profile and course list.
    pub fn assemble(student: &Student, courses: &[Course], generated_at: DateTime<Utc>) -> Self {
        let calc = compute_gpa(courses);
        Self {
            student_id: student.student_id.clone(),
            student_name: student.full_name(),
            grade: student.grade.clone(),
            section: student.section.clone(),
            academic_year: academic_year_for(generated_at.date_naive()),
            courses: courses.to_vec(),
            overall_gpa: calc.gpa,
            letter_grade: calc.letter_grade,
            generated_date: generated_at,
        }
    }

    /// Render as a plain-text document.
    pub fn render_text(&self, language: Language) -> String {
        let labels = language.labels();
        let mut out = String::new();

        let _ = writeln!(out, "{}", labels.transcript);
        let _ = writeln!(out, "{}", "=".repeat(labels.transcript.chars().count()));
        let _ = writeln!(out, "{}: {}", labels.student, self.student_name);
        let _ = writeln!(out, "{}: {}", labels.grade, self.grade);
        let _ = writeln!(out, "{}: {}", labels.section, self.section);
        let _ = writeln!(out, "Student ID: {}", self.student_id);
        let _ = writeln!(out, "Academic Year: {}", self.academic_year);
        let _ = writeln!(out);

        let _ = writeln!(out, "{}", labels.courses);
        let _ = writeln!(
            out,
            "{:<10} {:<28} {:<20} {:>7} {:>5}",
            "Code", "Name", "Teacher", "Credits", "Grade"
        );
        for course in &self.courses {
            let _ = writeln!(
                out,
                "{:<10} {:<28} {:<20} {:>7} {:>5}",
                course.code,
                course.name,
                course.teacher,
                course.credits,
                course.grade.as_str()
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}: {:.2} ({})",
            labels.gpa, self.overall_gpa, self.letter_grade
        );
        let _ = writeln!(
            out,
            "Generated: {}",
            self.generated_date.format("%Y-%m-%d %H:%M UTC")
        );

        out
    }
}
