//! Profile command for EduDash.
//!
//! Shows or edits the student profile. GPA, rank and class size are not
//! editable here: GPA follows the course list and standing comes from the
//! school.

use serde::{Deserialize, Serialize};

use crate::cli::to_json;
use crate::core::{Standing, Student};
use crate::error::{EduDashError, Result};
use crate::state::StudentStateStore;
use crate::storage::KeyValueStore;

/// Options for the profile command.
#[derive(Debug, Clone, Default)]
pub struct ProfileOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Editable profile fields. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub grade: Option<String>,
    pub section: Option<String>,
    pub avatar: Option<String>,
}

impl ProfilePatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to a profile. An empty avatar clears it.
    pub fn apply(&self, student: &Student) -> Result<Student> {
        let mut updated = student.clone();
        if let Some(first_name) = &self.first_name {
            updated.first_name = non_blank("first name", first_name)?;
        }
        if let Some(last_name) = &self.last_name {
            updated.last_name = non_blank("last name", last_name)?;
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(EduDashError::invalid_input(format!(
                    "'{}' is not an email address",
                    email
                )));
            }
            updated.email = email.trim().to_string();
        }
        if let Some(grade) = &self.grade {
            updated.grade = grade.clone();
        }
        if let Some(section) = &self.section {
            updated.section = section.clone();
        }
        if let Some(avatar) = &self.avatar {
            updated.avatar = if avatar.is_empty() {
                None
            } else {
                Some(avatar.clone())
            };
        }
        Ok(updated)
    }
}

fn non_blank(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EduDashError::invalid_input(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// What the profile command should do.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileAction {
    Show,
    Set(ProfilePatch),
}

/// Output format for the profile command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOutput {
    pub success: bool,
    pub updated: bool,
    pub student: Student,
    pub standing: Standing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The profile command implementation.
pub struct ProfileCommand<'a, K: KeyValueStore> {
    store: &'a StudentStateStore<K>,
}

impl<'a, K: KeyValueStore> ProfileCommand<'a, K> {
    /// Create a new profile command.
    pub fn new(store: &'a StudentStateStore<K>) -> Self {
        Self { store }
    }

    /// Run the profile command.
    pub async fn run(&self, action: &ProfileAction, _options: &ProfileOptions) -> ProfileOutput {
        let result = match action {
            ProfileAction::Show => Ok(false),
            ProfileAction::Set(patch) => self.set(patch).await.map(|_| true),
        };

        let student = self.store.student();
        let standing = Standing::for_student(&student);
        match result {
            Ok(updated) => ProfileOutput {
                success: true,
                updated,
                student,
                standing,
                error: None,
            },
            Err(e) => ProfileOutput {
                success: false,
                updated: false,
                student,
                standing,
                error: Some(e.to_string()),
            },
        }
    }

    async fn set(&self, patch: &ProfilePatch) -> Result<()> {
        if patch.is_empty() {
            return Err(EduDashError::invalid_input("nothing to update"));
        }
        let updated = patch.apply(&self.store.student())?;
        self.store.update_student(updated).await;
        Ok(())
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ProfileOutput, options: &ProfileOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            to_json(output)
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &ProfileOutput) -> String {
        if !output.success {
            return format!(
                "Profile update failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let s = &output.student;
        let mut lines = Vec::new();
        if output.updated {
            lines.push("Profile updated.\n".to_string());
        }
        lines.push(format!("Name:       {}", s.full_name()));
        lines.push(format!("Email:      {}", s.email));
        lines.push(format!("Student ID: {}", s.student_id));
        lines.push(format!("Grade:      {}, Section {}", s.grade, s.section));
        lines.push(format!("GPA:        {:.2}", s.gpa));
        lines.push(format!(
            "Rank:       #{} of {} ({}th percentile)",
            output.standing.rank, output.standing.total_students, output.standing.percentile
        ));
        lines.join("\n")
    }
}
