use serde::{Deserialize, Serialize};

use crate::api::Resource;
use crate::auth::validate;
use crate::models::common::{Points, Ref, format_number, refs_lenient, split_list};
use crate::models::listing::{Searchable, SelectOption, SortValue};
use crate::models::student::Student;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Team {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub color: String,
    pub leader: Option<Ref>,
    #[serde(deserialize_with = "refs_lenient")]
    pub asst_leaders: Vec<Ref>,
    pub user_id: Option<Ref>,
    pub total_point: Points,
}

impl Resource for Team {
    const PATH: &'static str = "/teams";
}

impl Searchable for Team {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "name" => Some(SortValue::Text(self.name.clone())),
            "points" => Some(SortValue::Number(self.total_point.value())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPayload {
    pub name: String,
    pub color: String,
    pub leader: Option<String>,
    pub asst_leaders: Vec<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub leader: String,
    #[serde(default)]
    pub asst_leaders: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl Default for TeamForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: "#1e90ff".to_string(),
            leader: String::new(),
            asst_leaders: String::new(),
            user_id: String::new(),
            csrf_token: String::new(),
        }
    }
}

impl From<&Team> for TeamForm {
    fn from(t: &Team) -> Self {
        Self {
            name: t.name.clone(),
            color: t.color.clone(),
            leader: t.leader.as_ref().map(|r| r.id().to_string()).unwrap_or_default(),
            asst_leaders: t.asst_leaders.iter().map(|r| r.id()).collect::<Vec<_>>().join(", "),
            user_id: t.user_id.as_ref().map(|r| r.id().to_string()).unwrap_or_default(),
            csrf_token: String::new(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl TeamForm {
    pub fn validate(&self) -> Result<TeamPayload, Vec<String>> {
        let mut errors = vec![];
        errors.extend(validate::validate_required(&self.name, "Team name", 60));
        errors.extend(validate::validate_hex_color(&self.color, "Color"));
        errors.extend(validate::validate_optional(&self.leader, "Leader", 100));
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(TeamPayload {
            name: self.name.trim().to_string(),
            color: self.color.trim().to_lowercase(),
            leader: non_empty(&self.leader),
            asst_leaders: split_list(&self.asst_leaders),
            user_id: non_empty(&self.user_id),
        })
    }
}

#[derive(Debug, Clone)]
pub struct TeamRow {
    pub id: String,
    pub name: String,
    pub color: String,
    pub leader: String,
    pub asst_leaders: String,
    pub points: String,
    pub has_login: bool,
}

/// Resolve a student id to a name; free text is shown as-is.
fn person_label(r: &Ref, students: &[Student]) -> String {
    students
        .iter()
        .find(|s| s.id == r.id())
        .map(|s| s.name.clone())
        .unwrap_or_else(|| r.label().to_string())
}

pub fn to_rows(teams: &[Team], students: &[Student]) -> Vec<TeamRow> {
    teams
        .iter()
        .map(|t| TeamRow {
            id: t.id.clone(),
            name: t.name.clone(),
            color: t.color.clone(),
            leader: t.leader.as_ref().map(|r| person_label(r, students)).unwrap_or_default(),
            asst_leaders: t
                .asst_leaders
                .iter()
                .map(|r| person_label(r, students))
                .collect::<Vec<_>>()
                .join(", "),
            points: format_number(t.total_point.value()),
            has_login: t.user_id.is_some(),
        })
        .collect()
}

/// Teams ordered by published points, highest first.
pub fn standings(teams: &[Team]) -> Vec<&Team> {
    let mut ranked: Vec<&Team> = teams.iter().collect();
    ranked.sort_by(|a, b| {
        b.total_point
            .value()
            .partial_cmp(&a.total_point.value())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked
}

/// Team dropdown; the value is the team id.
pub fn options(teams: &[Team], current: &str) -> Vec<SelectOption> {
    teams.iter().map(|t| SelectOption::new(t.id.as_str(), t.name.as_str(), current)).collect()
}
