pub mod types;

use serde::Deserialize;

use crate::auth::validate;
use crate::models::category::STUDENT_CATEGORIES;
use crate::models::common::format_number;
use crate::models::team::Team;

pub use self::types::{Student, StudentPayload, StudentRow};

/// Form data from the create/edit student forms.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub chest_no: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub team: String,
    pub is_active: Option<String>,
    #[serde(default)]
    pub csrf_token: String,
}

impl Default for StudentForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            chest_no: String::new(),
            class_name: String::new(),
            category: String::new(),
            team: String::new(),
            is_active: Some("on".to_string()),
            csrf_token: String::new(),
        }
    }
}

impl From<&Student> for StudentForm {
    fn from(s: &Student) -> Self {
        Self {
            name: s.name.clone(),
            chest_no: s.chest_no.clone(),
            class_name: s.class_name.clone(),
            category: s.category.clone(),
            team: s.team_id().to_string(),
            is_active: s.is_active.then(|| "on".to_string()),
            csrf_token: String::new(),
        }
    }
}

impl StudentForm {
    pub fn validate(&self) -> Result<StudentPayload, Vec<String>> {
        let mut errors = vec![];
        errors.extend(validate::validate_required(&self.name, "Name", 100));
        errors.extend(validate::validate_required(&self.chest_no, "Chest No.", 20));
        errors.extend(validate::validate_optional(&self.class_name, "Class", 20));
        errors.extend(validate::validate_one_of(&self.category, "Category", &STUDENT_CATEGORIES));
        if self.team.trim().is_empty() {
            errors.push("Team is required".to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(StudentPayload {
            name: self.name.trim().to_string(),
            chest_no: self.chest_no.trim().to_string(),
            class_name: self.class_name.trim().to_string(),
            category: self.category.trim().to_string(),
            team: self.team.trim().to_string(),
            is_active: self.is_active.is_some(),
        })
    }
}

/// Table rows, resolving team names from the team list when the reference is bare.
pub fn to_rows(students: &[Student], teams: &[Team]) -> Vec<StudentRow> {
    students
        .iter()
        .map(|s| {
            let team_id = s.team_id();
            let team = teams.iter().find(|t| t.id == team_id);
            let team_name = match (team, &s.team) {
                (Some(t), _) => t.name.clone(),
                (None, Some(r)) => r.label().to_string(),
                (None, None) => String::new(),
            };
            let team_color = team
                .map(|t| t.color.clone())
                .or_else(|| s.team.as_ref().and_then(|r| r.populated()).map(|l| l.color.clone()))
                .unwrap_or_default();
            StudentRow {
                id: s.id.clone(),
                name: s.name.clone(),
                chest_no: s.chest_no.clone(),
                class_name: s.class_name.clone(),
                category: s.category.clone(),
                team_name,
                team_color,
                points: format_number(s.total_point.value()),
                is_active: s.is_active,
            }
        })
        .collect()
}
