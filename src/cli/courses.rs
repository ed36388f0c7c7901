//! Courses command for EduDash.
//!
//! Lists, adds, edits and removes courses. Every mutation recomputes the GPA
//! and writes it onto the student profile.

use serde::{Deserialize, Serialize};

use crate::cli::to_json;
use crate::core::{next_course_id, Course, GpaCalculation, LetterGrade};
use crate::error::{EduDashError, Result};
use crate::state::StudentStateStore;
use crate::storage::KeyValueStore;

/// Options for the courses command.
#[derive(Debug, Clone, Default)]
pub struct CoursesOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Fields for a new course.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub name: String,
    pub code: String,
    pub credits: f64,
    pub grade: LetterGrade,
    pub semester: Option<String>,
    pub teacher: Option<String>,
    pub color: Option<String>,
}

/// Field changes for an existing course. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoursePatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub credits: Option<f64>,
    pub grade: Option<LetterGrade>,
    pub semester: Option<String>,
    pub teacher: Option<String>,
    pub color: Option<String>,
}

impl CoursePatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to a course.
    ///
    /// Changing the letter grade also resets the numeric grade to the
    /// letter's point value.
    pub fn apply(&self, course: &Course) -> Course {
        let mut updated = course.clone();
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(code) = &self.code {
            updated.code = code.clone();
        }
        if let Some(credits) = self.credits {
            updated.credits = credits;
        }
        if let Some(grade) = self.grade {
            updated.grade = grade;
            updated.numeric_grade = grade.points();
        }
        if let Some(semester) = &self.semester {
            updated.semester = semester.clone();
        }
        if let Some(teacher) = &self.teacher {
            updated.teacher = teacher.clone();
        }
        if let Some(color) = &self.color {
            updated.color = color.clone();
        }
        updated
    }
}

/// What the courses command should do.
#[derive(Debug, Clone, PartialEq)]
pub enum CoursesAction {
    List,
    Add(NewCourse),
    Update { id: String, patch: CoursePatch },
    Delete { id: String },
}

impl CoursesAction {
    fn name(&self) -> &'static str {
        match self {
            CoursesAction::List => "list",
            CoursesAction::Add(_) => "add",
            CoursesAction::Update { .. } => "update",
            CoursesAction::Delete { .. } => "delete",
        }
    }
}

/// Output format for the courses command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursesOutput {
    pub success: bool,
    pub action: String,
    /// Number of courses added, replaced or removed.
    pub affected: usize,
    /// ID of the course that was added.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub courses: Vec<Course>,
    pub gpa_calculation: GpaCalculation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reject credit values the GPA cannot be computed from.
fn validate_credits(credits: f64) -> Result<()> {
    if credits.is_finite() && credits >= 0.0 {
        Ok(())
    } else {
        Err(EduDashError::invalid_input(format!(
            "credits must be a non-negative number, got {}",
            credits
        )))
    }
}

/// The courses command implementation.
pub struct CoursesCommand<'a, K: KeyValueStore> {
    store: &'a StudentStateStore<K>,
}

impl<'a, K: KeyValueStore> CoursesCommand<'a, K> {
    /// Create a new courses command.
    pub fn new(store: &'a StudentStateStore<K>) -> Self {
        Self { store }
    }

    /// Run the courses command.
    pub async fn run(&self, action: &CoursesAction, _options: &CoursesOptions) -> CoursesOutput {
        match self.execute(action).await {
            Ok((affected, course_id)) => CoursesOutput {
                success: true,
                action: action.name().to_string(),
                affected,
                course_id,
                courses: self.store.courses(),
                gpa_calculation: self.store.gpa_calculation(),
                error: None,
            },
            Err(e) => CoursesOutput {
                success: false,
                action: action.name().to_string(),
                affected: 0,
                course_id: None,
                courses: self.store.courses(),
                gpa_calculation: self.store.gpa_calculation(),
                error: Some(e.to_string()),
            },
        }
    }

    async fn execute(&self, action: &CoursesAction) -> Result<(usize, Option<String>)> {
        match action {
            CoursesAction::List => Ok((0, None)),
            CoursesAction::Add(new) => {
                validate_credits(new.credits)?;
                let id = next_course_id(&self.store.courses());
                let mut course = Course::new(
                    id.clone(),
                    new.name.clone(),
                    new.code.clone(),
                    new.credits,
                    new.grade,
                );
                if let Some(semester) = &new.semester {
                    course = course.with_semester(semester.clone());
                }
                if let Some(teacher) = &new.teacher {
                    course = course.with_teacher(teacher.clone());
                }
                if let Some(color) = &new.color {
                    course = course.with_color(color.clone());
                }
                self.store.add_course(course).await;
                Ok((1, Some(id)))
            }
            CoursesAction::Update { id, patch } => {
                if patch.is_empty() {
                    return Err(EduDashError::invalid_input("nothing to update"));
                }
                if let Some(credits) = patch.credits {
                    validate_credits(credits)?;
                }
                let current = self
                    .store
                    .courses()
                    .into_iter()
                    .find(|c| &c.id == id)
                    .ok_or_else(|| EduDashError::invalid_input(format!("no course '{}'", id)))?;
                let replaced = self.store.update_course(id, patch.apply(&current)).await;
                Ok((replaced, None))
            }
            CoursesAction::Delete { id } => {
                let removed = self.store.delete_course(id).await;
                if removed == 0 {
                    return Err(EduDashError::invalid_input(format!("no course '{}'", id)));
                }
                Ok((removed, None))
            }
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &CoursesOutput, options: &CoursesOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            to_json(output)
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &CoursesOutput) -> String {
        if !output.success {
            return format!(
                "Course {} failed: {}",
                output.action,
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();
        match output.action.as_str() {
            "add" => lines.push(format!(
                "Added course {}.\n",
                output.course_id.as_deref().unwrap_or("?")
            )),
            "update" => lines.push(format!("Updated {} course(s).\n", output.affected)),
            "delete" => lines.push(format!("Deleted {} course(s).\n", output.affected)),
            _ => {}
        }

        if output.courses.is_empty() {
            lines.push("No courses.".to_string());
        } else {
            for course in &output.courses {
                lines.push(format!(
                    "{:<22} {:<10} {:<28} {:>4} cr  {:<2}",
                    course.id,
                    course.code,
                    course.name,
                    course.credits,
                    course.grade.as_str()
                ));
            }
        }

        let gpa = &output.gpa_calculation;
        lines.push(String::new());
        lines.push(format!(
            "GPA {:.2} ({}) over {} credits",
            gpa.gpa, gpa.letter_grade, gpa.total_credits
        ));

        lines.join("\n")
    }
}
