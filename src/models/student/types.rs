use serde::{Deserialize, Serialize};

use crate::api::Resource;
use crate::models::common::{Points, Ref, default_true, string_or_number};
use crate::models::listing::{Facet, Searchable, SortValue};

/// A student as the backend returns it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub chest_no: String,
    #[serde(rename = "class", deserialize_with = "string_or_number")]
    pub class_name: String,
    pub category: String,
    pub team: Option<Ref>,
    pub total_point: Points,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Resource for Student {
    const PATH: &'static str = "/students";
}

impl Student {
    pub fn team_id(&self) -> &str {
        self.team.as_ref().map(Ref::id).unwrap_or("")
    }
}

impl Searchable for Student {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.chest_no.as_str(), self.class_name.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => Some(self.category.as_str()),
            Facet::Team => Some(self.team_id()),
            Facet::Status => Some(if self.is_active { "active" } else { "inactive" }),
            Facet::Stage => None,
        }
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "name" => Some(SortValue::Text(self.name.clone())),
            "chest_no" => Some(match self.chest_no.parse::<f64>() {
                Ok(n) => SortValue::Number(n),
                Err(_) => SortValue::Text(self.chest_no.clone()),
            }),
            "points" => Some(SortValue::Number(self.total_point.value())),
            _ => None,
        }
    }
}

/// Body for POST/PATCH `/students`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    pub name: String,
    pub chest_no: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub category: String,
    pub team: String,
    pub is_active: bool,
}

/// Flattened row for the students table.
#[derive(Debug, Clone)]
pub struct StudentRow {
    pub id: String,
    pub name: String,
    pub chest_no: String,
    pub class_name: String,
    pub category: String,
    pub team_name: String,
    pub team_color: String,
    pub points: String,
    pub is_active: bool,
}
