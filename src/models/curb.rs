use serde::{Deserialize, Serialize};

use crate::api::Resource;
use crate::auth::validate;
use crate::models::common::{Ref, refs_lenient, string_or_number};
use crate::models::listing::{Searchable, SortValue};
use crate::models::program::Program;

/// A named group of programs with a cap on how many it may hold.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Curb {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub max_count_of_prog: String,
    #[serde(deserialize_with = "refs_lenient")]
    pub programs: Vec<Ref>,
}

impl Resource for Curb {
    const PATH: &'static str = "/curbs";
}

impl Curb {
    pub fn capacity(&self) -> Option<usize> {
        self.max_count_of_prog.trim().parse::<usize>().ok()
    }

    pub fn program_ids(&self) -> Vec<String> {
        self.programs.iter().map(|p| p.id().to_string()).collect()
    }

    pub fn is_full(&self) -> bool {
        self.capacity().is_some_and(|cap| self.programs.len() >= cap)
    }

    pub fn contains(&self, program_id: &str) -> bool {
        self.programs.iter().any(|p| p.id() == program_id)
    }
}

impl Searchable for Curb {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "name" => Some(SortValue::Text(self.name.clone())),
            "programs" => Some(SortValue::Number(self.programs.len() as f64)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurbPayload {
    pub name: String,
    pub max_count_of_prog: i64,
}

/// Body that replaces a curb's program list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurbPrograms {
    pub programs: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurbForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub max_count_of_prog: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl From<&Curb> for CurbForm {
    fn from(c: &Curb) -> Self {
        Self {
            name: c.name.clone(),
            max_count_of_prog: c.max_count_of_prog.clone(),
            csrf_token: String::new(),
        }
    }
}

impl CurbForm {
    pub fn validate(&self) -> Result<CurbPayload, Vec<String>> {
        let mut errors = vec![];
        errors.extend(validate::validate_required(&self.name, "Curb name", 60));
        let max = validate::parse_positive_int(&self.max_count_of_prog, "Maximum program count")
            .map_err(|e| errors.push(e))
            .ok();
        match max {
            Some(max_count_of_prog) if errors.is_empty() => Ok(CurbPayload {
                name: self.name.trim().to_string(),
                max_count_of_prog,
            }),
            _ => Err(errors),
        }
    }
}

/// Program list after adding one; refused when full or already present.
pub fn with_program_added(curb: &Curb, program_id: &str) -> Result<CurbPrograms, String> {
    if program_id.trim().is_empty() {
        return Err("Choose a program to add".to_string());
    }
    if curb.contains(program_id) {
        return Err("That program is already in this curb".to_string());
    }
    if curb.is_full() {
        return Err(format!(
            "Curb '{}' already holds its maximum of {} programs",
            curb.name, curb.max_count_of_prog
        ));
    }
    let mut programs = curb.program_ids();
    programs.push(program_id.to_string());
    Ok(CurbPrograms { programs })
}

/// Program list after removing one.
pub fn with_program_removed(curb: &Curb, program_id: &str) -> Result<CurbPrograms, String> {
    if !curb.contains(program_id) {
        return Err("That program is not in this curb".to_string());
    }
    let programs = curb
        .program_ids()
        .into_iter()
        .filter(|id| id != program_id)
        .collect();
    Ok(CurbPrograms { programs })
}

#[derive(Debug, Clone)]
pub struct CurbProgramEntry {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct CurbRow {
    pub id: String,
    pub name: String,
    pub max_count: String,
    pub program_count: usize,
    pub is_full: bool,
    pub programs: Vec<CurbProgramEntry>,
}

pub fn to_rows(curbs: &[Curb], programs: &[Program]) -> Vec<CurbRow> {
    curbs
        .iter()
        .map(|c| CurbRow {
            id: c.id.clone(),
            name: c.name.clone(),
            max_count: c.max_count_of_prog.clone(),
            program_count: c.programs.len(),
            is_full: c.is_full(),
            programs: c
                .programs
                .iter()
                .map(|r| CurbProgramEntry {
                    id: r.id().to_string(),
                    label: programs
                        .iter()
                        .find(|p| p.id == r.id())
                        .map(Program::display_name)
                        .unwrap_or_else(|| r.label().to_string()),
                })
                .collect(),
        })
        .collect()
}
