use serde::{Deserialize, Serialize};

use crate::api::Resource;
use crate::auth::validate;
use crate::models::common::{default_true, format_number};
use crate::models::listing::{Searchable, SortValue};

/// Administrator-configured score band. This is the scoring authority, unlike the
/// fixed bands on the judgment sheet.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Grade {
    #[serde(rename = "_id")]
    pub id: String,
    pub category: String,
    pub from: f64,
    pub to: f64,
    pub points: i64,
    pub color: String,
    pub is_starred: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Resource for Grade {
    const PATH: &'static str = "/grades";
}

impl Searchable for Grade {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.category.as_str()]
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "category" => Some(SortValue::Text(self.category.clone())),
            "from" => Some(SortValue::Number(self.from)),
            "points" => Some(SortValue::Number(self.points as f64)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradePayload {
    pub category: String,
    pub from: f64,
    pub to: f64,
    pub points: i64,
    pub color: String,
    pub is_starred: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradeForm {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub points: String,
    #[serde(default)]
    pub color: String,
    pub is_starred: Option<String>,
    pub is_active: Option<String>,
    #[serde(default)]
    pub csrf_token: String,
}

impl Default for GradeForm {
    fn default() -> Self {
        Self {
            category: String::new(),
            from: String::new(),
            to: String::new(),
            points: "0".to_string(),
            color: "#2e7d32".to_string(),
            is_starred: None,
            is_active: Some("on".to_string()),
            csrf_token: String::new(),
        }
    }
}

impl From<&Grade> for GradeForm {
    fn from(g: &Grade) -> Self {
        Self {
            category: g.category.clone(),
            from: format_number(g.from),
            to: format_number(g.to),
            points: g.points.to_string(),
            color: g.color.clone(),
            is_starred: g.is_starred.then(|| "on".to_string()),
            is_active: g.is_active.then(|| "on".to_string()),
            csrf_token: String::new(),
        }
    }
}

impl GradeForm {
    pub fn validate(&self) -> Result<GradePayload, Vec<String>> {
        let mut errors = vec![];
        errors.extend(validate::validate_required(&self.category, "Category", 10));
        errors.extend(validate::validate_hex_color(&self.color, "Color"));
        let from = validate::parse_number_in_range(&self.from, "From", 0.0, 100.0)
            .map_err(|e| errors.push(e))
            .ok();
        let to = validate::parse_number_in_range(&self.to, "To", 0.0, 100.0)
            .map_err(|e| errors.push(e))
            .ok();
        let points = validate::parse_non_negative_int(&self.points, "Points")
            .map_err(|e| errors.push(e))
            .ok();
        if let (Some(from), Some(to)) = (from, to) {
            if from >= to {
                errors.push("From must be lower than To".to_string());
            }
        }
        match (from, to, points) {
            (Some(from), Some(to), Some(points)) if errors.is_empty() => Ok(GradePayload {
                category: self.category.trim().to_string(),
                from,
                to,
                points,
                color: self.color.trim().to_lowercase(),
                is_starred: self.is_starred.is_some(),
                is_active: self.is_active.is_some(),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GradeRow {
    pub id: String,
    pub category: String,
    pub range: String,
    pub points: i64,
    pub color: String,
    pub is_starred: bool,
    pub is_active: bool,
}

impl From<&Grade> for GradeRow {
    fn from(g: &Grade) -> Self {
        Self {
            id: g.id.clone(),
            category: g.category.clone(),
            range: format!("{}% - {}%", format_number(g.from), format_number(g.to)),
            points: g.points,
            color: g.color.clone(),
            is_starred: g.is_starred,
            is_active: g.is_active,
        }
    }
}
