use std::cmp::Ordering;

use serde::Deserialize;

use crate::api::Resource;
use crate::models::common::{Ref, format_number, populated_only, refs_lenient};
use crate::models::grade::Grade;
use crate::models::position::{Position, rank_class};
use crate::models::team::Team;

/// Rank assigned to participations with no placement so they sort last.
pub const MISSING_RANK: i64 = 9999;

/// Candidates and team entered into a program, with the backend-computed result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Participation {
    #[serde(rename = "_id")]
    pub id: String,
    pub program: Option<Ref>,
    #[serde(deserialize_with = "refs_lenient")]
    pub candidates: Vec<Ref>,
    pub team: Option<Ref>,
    #[serde(deserialize_with = "populated_only")]
    pub position: Option<Position>,
    #[serde(deserialize_with = "populated_only")]
    pub grade: Option<Grade>,
    pub points_earned: Option<f64>,
}

impl Resource for Participation {
    const PATH: &'static str = "/participations";
}

impl Participation {
    pub fn program_id(&self) -> &str {
        self.program.as_ref().map(Ref::id).unwrap_or("")
    }

    pub fn rank(&self) -> i64 {
        self.position.as_ref().and_then(|p| p.rank).unwrap_or(MISSING_RANK)
    }

    pub fn grade_category(&self) -> &str {
        self.grade.as_ref().map(|g| g.category.as_str()).unwrap_or("")
    }

    pub fn candidate_names(&self) -> String {
        self.candidates.iter().map(Ref::label).collect::<Vec<_>>().join(", ")
    }

    pub fn chest_numbers(&self) -> String {
        self.candidates
            .iter()
            .filter_map(|c| c.populated())
            .map(|c| c.chest_no.as_str())
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Earned points, or position plus grade points when the backend omits the sum.
    pub fn points(&self) -> f64 {
        self.points_earned.unwrap_or_else(|| {
            let position = self.position.as_ref().map(|p| p.points).unwrap_or(0);
            let grade = self.grade.as_ref().map(|g| g.points).unwrap_or(0);
            (position + grade) as f64
        })
    }
}

/// Result order: rank ascending (missing last), then grade category ascending.
pub fn result_order(a: &Participation, b: &Participation) -> Ordering {
    a.rank()
        .cmp(&b.rank())
        .then_with(|| a.grade_category().cmp(b.grade_category()))
}

pub fn sort_results(participations: &mut [Participation]) {
    participations.sort_by(result_order);
}

#[derive(Debug, Clone)]
pub struct ParticipationRow {
    pub id: String,
    pub candidates: String,
    pub chest_numbers: String,
    pub team_name: String,
    pub team_color: String,
    pub position: String,
    pub rank_class: &'static str,
    pub grade: String,
    pub grade_color: String,
    pub points: String,
}

impl ParticipationRow {
    pub fn build(p: &Participation, teams: &[Team]) -> Self {
        let team_ref = p.team.as_ref();
        let team = team_ref.and_then(|r| teams.iter().find(|t| t.id == r.id()));
        let team_name = match (team, team_ref) {
            (Some(t), _) => t.name.clone(),
            (None, Some(r)) => r.label().to_string(),
            (None, None) => String::new(),
        };
        let team_color = team
            .map(|t| t.color.clone())
            .or_else(|| team_ref.and_then(|r| r.populated()).map(|l| l.color.clone()))
            .unwrap_or_default();
        let rank = p.position.as_ref().and_then(|pos| pos.rank);
        Self {
            id: p.id.clone(),
            candidates: p.candidate_names(),
            chest_numbers: p.chest_numbers(),
            team_name,
            team_color,
            position: p
                .position
                .as_ref()
                .map(|pos| pos.category.clone())
                .unwrap_or_else(|| "-".to_string()),
            rank_class: rank_class(rank),
            grade: p.grade.as_ref().map(|g| g.category.clone()).unwrap_or_else(|| "-".to_string()),
            grade_color: p.grade.as_ref().map(|g| g.color.clone()).unwrap_or_default(),
            points: format_number(p.points()),
        }
    }
}
