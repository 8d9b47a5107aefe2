//! Judging sheet: five capped sub-scores per participation, a total and a
//! letter band.
//!
//! The letter band here is presentational only. Awarded grades come from the
//! administrator-managed grade table.

use std::collections::HashMap;

use crate::auth::validate;
use crate::models::common::format_number;
use crate::models::participation::{Participation, ParticipationRow};
use crate::models::team::Team;

pub struct Criterion {
    pub field: &'static str,
    pub label: &'static str,
    pub max: f64,
}

pub const CRITERIA: [Criterion; 5] = [
    Criterion { field: "performance", label: "Performance", max: 40.0 },
    Criterion { field: "presentation", label: "Presentation", max: 40.0 },
    Criterion { field: "creativity", label: "Creativity", max: 30.0 },
    Criterion { field: "technique", label: "Technique", max: 20.0 },
    Criterion { field: "time_management", label: "Time management", max: 10.0 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterGrade {
    APlus,
    A,
    BPlus,
    B,
    C,
    F,
}

impl LetterGrade {
    pub fn from_total(total: f64) -> Self {
        match total {
            t if t >= 90.0 => LetterGrade::APlus,
            t if t >= 80.0 => LetterGrade::A,
            t if t >= 70.0 => LetterGrade::BPlus,
            t if t >= 60.0 => LetterGrade::B,
            t if t >= 50.0 => LetterGrade::C,
            _ => LetterGrade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::F => "F",
        }
    }
}

/// Form input name for one sub-score of one participation.
pub fn input_name(field: &str, participation_id: &str) -> String {
    format!("{field}_{participation_id}")
}

#[derive(Debug, Clone)]
pub struct ScoreInput {
    pub name: String,
    pub label: &'static str,
    pub max: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ScoreCard {
    pub participation: ParticipationRow,
    pub inputs: Vec<ScoreInput>,
    pub total: f64,
    pub total_label: String,
    pub grade: &'static str,
    pub errors: Vec<String>,
}

impl ScoreCard {
    /// Parse one participation's inputs. Blank counts as 0.
    fn score(p: &Participation, teams: &[Team], submitted: &HashMap<&str, &str>) -> Self {
        let mut errors = vec![];
        let mut total = 0.0;
        let inputs = CRITERIA
            .iter()
            .map(|c| {
                let name = input_name(c.field, &p.id);
                let value = submitted.get(name.as_str()).map(|v| v.trim().to_string()).unwrap_or_default();
                if !value.is_empty() {
                    match validate::parse_number_in_range(&value, c.label, 0.0, c.max) {
                        Ok(score) => total += score,
                        Err(e) => errors.push(e),
                    }
                }
                ScoreInput { name, label: c.label, max: format_number(c.max), value }
            })
            .collect();
        Self {
            participation: ParticipationRow::build(p, teams),
            inputs,
            total,
            total_label: format_number(total),
            grade: LetterGrade::from_total(total).as_str(),
            errors,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreSheet {
    pub cards: Vec<ScoreCard>,
}

impl ScoreSheet {
    pub fn blank(participations: &[Participation], teams: &[Team]) -> Self {
        Self::parse(participations, teams, &[])
    }

    pub fn parse(participations: &[Participation], teams: &[Team], pairs: &[(String, String)]) -> Self {
        let submitted: HashMap<&str, &str> = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        let cards = participations
            .iter()
            .map(|p| ScoreCard::score(p, teams, &submitted))
            .collect();
        Self { cards }
    }

    pub fn has_errors(&self) -> bool {
        self.cards.iter().any(|c| !c.errors.is_empty())
    }

    /// Highest total first; stable for equal totals.
    pub fn ranked(mut self) -> Self {
        self.cards
            .sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn entries() -> Vec<Participation> {
        vec![
            Participation { id: "a".into(), ..Default::default() },
            Participation { id: "b".into(), ..Default::default() },
        ]
    }

    #[test]
    fn grade_band_boundaries() {
        assert_eq!(LetterGrade::from_total(90.0).as_str(), "A+");
        assert_eq!(LetterGrade::from_total(89.0).as_str(), "A");
        assert_eq!(LetterGrade::from_total(70.0).as_str(), "B+");
        assert_eq!(LetterGrade::from_total(69.0).as_str(), "B");
        assert_eq!(LetterGrade::from_total(50.0).as_str(), "C");
        assert_eq!(LetterGrade::from_total(49.0).as_str(), "F");
    }

    #[test]
    fn caps_sum_to_140_and_inputs_are_per_participation() {
        let sheet = ScoreSheet::blank(&entries(), &[]);
        let names: Vec<&str> = sheet.cards[1].inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["performance_b", "presentation_b", "creativity_b", "technique_b", "time_management_b"]
        );
        assert_eq!(CRITERIA.iter().map(|c| c.max).sum::<f64>(), 140.0);
    }

    #[test]
    fn each_input_feeds_its_own_score() {
        let sheet = ScoreSheet::parse(
            &entries(),
            &[],
            &pairs(&[("performance_a", "35"), ("creativity_a", "25"), ("performance_b", "10"), ("time_management_b", "")]),
        );
        assert_eq!(sheet.cards[0].total, 60.0);
        assert_eq!(sheet.cards[0].grade, "B");
        assert_eq!(sheet.cards[1].total, 10.0);
        assert!(!sheet.has_errors());
    }

    #[test]
    fn over_cap_and_garbage_are_row_errors() {
        let sheet = ScoreSheet::parse(
            &entries(),
            &[],
            &pairs(&[("technique_a", "25"), ("presentation_b", "abc"), ("creativity_b", "-1")]),
        );
        assert_eq!(sheet.cards[0].errors, vec!["Technique must be between 0 and 20".to_string()]);
        assert_eq!(sheet.cards[1].errors.len(), 2);
        assert_eq!(sheet.cards[0].inputs[3].value, "25");
        assert!(sheet.has_errors());
    }

    #[test]
    fn ranked_orders_by_total() {
        let sheet = ScoreSheet::parse(&entries(), &[], &pairs(&[("performance_b", "30"), ("performance_a", "20")]))
            .ranked();
        assert_eq!(sheet.cards[0].participation.id, "b");
    }
}
