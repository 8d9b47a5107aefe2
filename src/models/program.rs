use serde::{Deserialize, Serialize};

use crate::api::Resource;
use crate::auth::validate;
use crate::models::category::PROGRAM_CATEGORIES;
use crate::models::common::{Ref, string_or_number};
use crate::models::listing::{Facet, Searchable, SelectOption, SortValue, plain_options};

/// Backend-owned scheduling workflow.
pub const PROGRAM_STATUSES: [&str; 5] = ["Draft", "Pending", "Scheduled", "Cancelled", "Completed"];

/// Backend-owned result publication workflow.
pub const RESULT_STATUSES: [&str; 5] = ["pending", "processing", "completed", "archived", "published"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Program {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub program_code: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub is_stage: bool,
    pub is_group: bool,
    #[serde(deserialize_with = "string_or_number")]
    pub duration: String,
    #[serde(deserialize_with = "string_or_number")]
    pub max_participants: String,
    #[serde(deserialize_with = "string_or_number")]
    pub no_of_participation: String,
    #[serde(deserialize_with = "string_or_number")]
    pub candidates_per_participation: String,
    pub venue: String,
    pub date: String,
    pub starting_time: String,
    pub ending_time: String,
    pub status: String,
    pub result_status: String,
    pub judge: Option<Ref>,
    pub curb: Option<Ref>,
}

impl Resource for Program {
    const PATH: &'static str = "/programs";
}

impl Program {
    /// `2025-01-05T00:00:00.000Z` and `2025-01-05` both show as `2025-01-05`.
    pub fn date_only(&self) -> &str {
        date_only(&self.date)
    }

    pub fn schedule_label(&self) -> String {
        let date = self.date_only();
        match (self.starting_time.is_empty(), self.ending_time.is_empty()) {
            (false, false) => format!("{date} {}-{}", self.starting_time, self.ending_time).trim().to_string(),
            (false, true) => format!("{date} {}", self.starting_time).trim().to_string(),
            _ => date.to_string(),
        }
    }

    pub fn display_name(&self) -> String {
        if self.program_code.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.program_code, self.name)
        }
    }
}

pub fn date_only(raw: &str) -> &str {
    match raw.split_once('T') {
        Some((date, _)) => date,
        None => raw,
    }
}

impl Searchable for Program {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.program_code.as_str(), self.venue.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => Some(self.category.as_str()),
            Facet::Status => Some(self.status.as_str()),
            Facet::Stage => Some(if self.is_stage { "stage" } else { "offstage" }),
            Facet::Team => None,
        }
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "code" => Some(SortValue::Text(self.program_code.clone())),
            "name" => Some(SortValue::Text(self.name.clone())),
            "date" => Some(SortValue::Text(format!("{} {}", self.date_only(), self.starting_time))),
            _ => None,
        }
    }
}

/// CSS badge class for a scheduling or result status.
pub fn status_class(status: &str) -> &'static str {
    match status.to_ascii_lowercase().as_str() {
        "scheduled" | "published" => "badge-success",
        "completed" => "badge-info",
        "pending" | "processing" => "badge-warning",
        "cancelled" => "badge-danger",
        "archived" => "badge-muted",
        _ => "badge-neutral",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramPayload {
    pub program_code: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub is_stage: bool,
    pub is_group: bool,
    pub duration: Option<i64>,
    pub max_participants: i64,
    pub no_of_participation: i64,
    pub candidates_per_participation: i64,
    pub venue: String,
    pub date: Option<String>,
    pub starting_time: Option<String>,
    pub ending_time: Option<String>,
    pub status: String,
    pub judge: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgramForm {
    #[serde(default)]
    pub program_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub is_stage: Option<String>,
    pub is_group: Option<String>,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub max_participants: String,
    #[serde(default)]
    pub no_of_participation: String,
    #[serde(default)]
    pub candidates_per_participation: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub starting_time: String,
    #[serde(default)]
    pub ending_time: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub judge: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl Default for ProgramForm {
    fn default() -> Self {
        Self {
            program_code: String::new(),
            name: String::new(),
            description: String::new(),
            category: String::new(),
            is_stage: None,
            is_group: None,
            duration: String::new(),
            max_participants: "3".to_string(),
            no_of_participation: "1".to_string(),
            candidates_per_participation: "1".to_string(),
            venue: String::new(),
            date: String::new(),
            starting_time: String::new(),
            ending_time: String::new(),
            status: "Draft".to_string(),
            judge: String::new(),
            csrf_token: String::new(),
        }
    }
}

impl From<&Program> for ProgramForm {
    fn from(p: &Program) -> Self {
        Self {
            program_code: p.program_code.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            category: p.category.clone(),
            is_stage: p.is_stage.then(|| "on".to_string()),
            is_group: p.is_group.then(|| "on".to_string()),
            duration: p.duration.clone(),
            max_participants: p.max_participants.clone(),
            no_of_participation: p.no_of_participation.clone(),
            candidates_per_participation: p.candidates_per_participation.clone(),
            venue: p.venue.clone(),
            date: p.date_only().to_string(),
            starting_time: p.starting_time.clone(),
            ending_time: p.ending_time.clone(),
            status: p.status.clone(),
            judge: p.judge.as_ref().map(|r| r.id().to_string()).unwrap_or_default(),
            csrf_token: String::new(),
        }
    }
}

fn keep<T>(result: Result<T, String>, errors: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

impl ProgramForm {
    pub fn validate(&self) -> Result<ProgramPayload, Vec<String>> {
        let mut errors = vec![];
        errors.extend(validate::validate_required(&self.program_code, "Program code", 20));
        errors.extend(validate::validate_required(&self.name, "Program name", 120));
        errors.extend(validate::validate_optional(&self.description, "Description", 1000));
        errors.extend(validate::validate_one_of(&self.category, "Category", &PROGRAM_CATEGORIES));
        errors.extend(validate::validate_one_of(&self.status, "Status", &PROGRAM_STATUSES));
        errors.extend(validate::validate_optional(&self.venue, "Venue", 100));

        let duration = keep(validate::parse_optional_positive_int(&self.duration, "Duration"), &mut errors);
        let max_participants = keep(validate::parse_positive_int(&self.max_participants, "Max participants"), &mut errors);
        let participations = keep(validate::parse_positive_int(&self.no_of_participation, "Participations per team"), &mut errors);
        let per_participation = keep(
            validate::parse_positive_int(&self.candidates_per_participation, "Candidates per participation"),
            &mut errors,
        );
        let date = keep(validate::parse_optional_date(&self.date, "Date"), &mut errors);
        let start = keep(validate::parse_optional_time(&self.starting_time, "Starting time"), &mut errors);
        let end = keep(validate::parse_optional_time(&self.ending_time, "Ending time"), &mut errors);
        if let (Some(start), Some(end)) = (start, end) {
            errors.extend(validate::validate_time_range(start, end));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let fmt_time = |t: Option<chrono::NaiveTime>| t.map(|t| t.format("%H:%M").to_string());
        Ok(ProgramPayload {
            program_code: self.program_code.trim().to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            is_stage: self.is_stage.is_some(),
            is_group: self.is_group.is_some(),
            duration: duration.flatten(),
            max_participants: max_participants.unwrap_or(1),
            no_of_participation: participations.unwrap_or(1),
            candidates_per_participation: per_participation.unwrap_or(1),
            venue: self.venue.trim().to_string(),
            date: date.flatten().map(|d| d.format("%Y-%m-%d").to_string()),
            starting_time: start.and_then(fmt_time),
            ending_time: end.and_then(fmt_time),
            status: self.status.trim().to_string(),
            judge: Some(self.judge.trim().to_string()).filter(|j| !j.is_empty()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProgramRow {
    pub id: String,
    pub code: String,
    pub name: String,
    pub category: String,
    pub stage_label: &'static str,
    pub group_label: &'static str,
    pub venue: String,
    pub schedule: String,
    pub status: String,
    pub status_class: &'static str,
    pub result_status: String,
    pub result_status_class: &'static str,
    pub curb: String,
}

impl From<&Program> for ProgramRow {
    fn from(p: &Program) -> Self {
        Self {
            id: p.id.clone(),
            code: p.program_code.clone(),
            name: p.name.clone(),
            category: p.category.clone(),
            stage_label: if p.is_stage { "Stage" } else { "Off-stage" },
            group_label: if p.is_group { "Group" } else { "Individual" },
            venue: p.venue.clone(),
            schedule: p.schedule_label(),
            status: p.status.clone(),
            status_class: status_class(&p.status),
            result_status: p.result_status.clone(),
            result_status_class: status_class(&p.result_status),
            curb: p.curb.as_ref().map(|c| c.label().to_string()).unwrap_or_default(),
        }
    }
}

impl ProgramRow {
    /// Choices for the inline result-status select, current one selected.
    pub fn result_status_options(&self) -> Vec<SelectOption> {
        plain_options(&RESULT_STATUSES, &self.result_status)
    }
}

/// Body for `PATCH /programs/change_result_status/:id`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultStatusChange {
    pub result_status: String,
}

impl ResultStatusChange {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if RESULT_STATUSES.contains(&trimmed) {
            Ok(Self { result_status: trimmed.to_string() })
        } else {
            Err(format!("Unknown result status '{trimmed}'"))
        }
    }
}

pub fn result_status_path(program_id: &str) -> String {
    format!("/programs/change_result_status/{program_id}")
}
