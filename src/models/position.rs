use serde::{Deserialize, Serialize};

use crate::api::Resource;
use crate::auth::validate;
use crate::models::common::default_true;
use crate::models::listing::{Searchable, SortValue};

/// Point award for a placement (First/Second/Third...).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Position {
    #[serde(rename = "_id")]
    pub id: String,
    pub category: String,
    pub rank: Option<i64>,
    pub points: i64,
    pub is_group: bool,
    pub is_kulliyya: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Resource for Position {
    const PATH: &'static str = "/positions";
}

impl Searchable for Position {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.category.as_str()]
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "rank" => self.rank.map(|r| SortValue::Number(r as f64)),
            "points" => Some(SortValue::Number(self.points as f64)),
            _ => None,
        }
    }
}

/// Badge class for a placement.
pub fn rank_class(rank: Option<i64>) -> &'static str {
    match rank {
        Some(1) => "badge-gold",
        Some(2) => "badge-silver",
        Some(3) => "badge-bronze",
        _ => "badge-neutral",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionPayload {
    pub category: String,
    pub rank: i64,
    pub points: i64,
    pub is_group: bool,
    pub is_kulliyya: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionForm {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub points: String,
    pub is_group: Option<String>,
    pub is_kulliyya: Option<String>,
    pub is_active: Option<String>,
    #[serde(default)]
    pub csrf_token: String,
}

impl Default for PositionForm {
    fn default() -> Self {
        Self {
            category: String::new(),
            rank: String::new(),
            points: "0".to_string(),
            is_group: None,
            is_kulliyya: None,
            is_active: Some("on".to_string()),
            csrf_token: String::new(),
        }
    }
}

impl From<&Position> for PositionForm {
    fn from(p: &Position) -> Self {
        Self {
            category: p.category.clone(),
            rank: p.rank.map(|r| r.to_string()).unwrap_or_default(),
            points: p.points.to_string(),
            is_group: p.is_group.then(|| "on".to_string()),
            is_kulliyya: p.is_kulliyya.then(|| "on".to_string()),
            is_active: p.is_active.then(|| "on".to_string()),
            csrf_token: String::new(),
        }
    }
}

impl PositionForm {
    pub fn validate(&self) -> Result<PositionPayload, Vec<String>> {
        let mut errors = vec![];
        errors.extend(validate::validate_required(&self.category, "Category", 40));
        let rank = validate::parse_positive_int(&self.rank, "Rank").map_err(|e| errors.push(e)).ok();
        let points = validate::parse_non_negative_int(&self.points, "Points").map_err(|e| errors.push(e)).ok();
        match (rank, points) {
            (Some(rank), Some(points)) if errors.is_empty() => Ok(PositionPayload {
                category: self.category.trim().to_string(),
                rank,
                points,
                is_group: self.is_group.is_some(),
                is_kulliyya: self.is_kulliyya.is_some(),
                is_active: self.is_active.is_some(),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PositionRow {
    pub id: String,
    pub category: String,
    pub rank: String,
    pub rank_class: &'static str,
    pub points: i64,
    pub is_group: bool,
    pub is_kulliyya: bool,
    pub is_active: bool,
}

impl From<&Position> for PositionRow {
    fn from(p: &Position) -> Self {
        Self {
            id: p.id.clone(),
            category: p.category.clone(),
            rank: p.rank.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string()),
            rank_class: rank_class(p.rank),
            points: p.points,
            is_group: p.is_group,
            is_kulliyya: p.is_kulliyya,
            is_active: p.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_may_be_zero_but_not_negative() {
        let ok = PositionForm { category: "Third".into(), rank: "3".into(), points: "0".into(), ..Default::default() };
        assert_eq!(ok.validate().unwrap().points, 0);

        let bad = PositionForm { points: "-2".into(), ..ok.clone() };
        assert_eq!(bad.validate().unwrap_err(), vec!["Points cannot be negative".to_string()]);
    }

    #[test]
    fn rank_and_category_required() {
        let errors = PositionForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn rank_badges() {
        assert_eq!(rank_class(Some(1)), "badge-gold");
        assert_eq!(rank_class(Some(4)), "badge-neutral");
        assert_eq!(rank_class(None), "badge-neutral");
    }
}
