use serde::{Deserialize, Serialize};

use crate::models::listing::{Facet, Searchable, SortValue};
use crate::models::participation::{Participation, ParticipationRow, sort_results};
use crate::models::program::{Program, status_class};
use crate::models::team::Team;

/// A program as the results page filters it: the status dropdown matches
/// `resultStatus`, not the scheduling status.
#[derive(Debug, Clone)]
pub struct ResultProgram(pub Program);

impl Searchable for ResultProgram {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.0.name.as_str(), self.0.program_code.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => Some(self.0.category.as_str()),
            Facet::Status => Some(self.0.result_status.as_str()),
            Facet::Stage => Some(if self.0.is_stage { "stage" } else { "offstage" }),
            Facet::Team => None,
        }
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        self.0.sort_value(column)
    }
}

#[derive(Debug, Clone)]
pub struct ResultSummaryRow {
    pub id: String,
    pub code: String,
    pub name: String,
    pub category: String,
    pub result_status: String,
    pub result_status_class: &'static str,
    pub participation_count: usize,
}

pub fn summary_rows(programs: &[ResultProgram], results: &[Participation]) -> Vec<ResultSummaryRow> {
    programs
        .iter()
        .map(|ResultProgram(p)| ResultSummaryRow {
            id: p.id.clone(),
            code: p.program_code.clone(),
            name: p.name.clone(),
            category: p.category.clone(),
            result_status: p.result_status.clone(),
            result_status_class: status_class(&p.result_status),
            participation_count: results.iter().filter(|r| r.program_id() == p.id).count(),
        })
        .collect()
}

/// Body for `POST /programs/bulk_result`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResultRequest {
    pub program_ids: Vec<String>,
}

/// One entry of the bulk result response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProgramResults {
    pub program: Program,
    pub participations: Vec<Participation>,
}

/// A program block on the printable results sheet.
#[derive(Debug, Clone)]
pub struct PrintSection {
    pub title: String,
    pub category: String,
    pub stage_label: &'static str,
    pub rows: Vec<ParticipationRow>,
}

pub fn print_sections(bundles: Vec<ProgramResults>, teams: &[Team]) -> Vec<PrintSection> {
    bundles
        .into_iter()
        .map(|mut bundle| {
            sort_results(&mut bundle.participations);
            PrintSection {
                title: bundle.program.display_name(),
                category: bundle.program.category.clone(),
                stage_label: if bundle.program.is_stage { "Stage" } else { "Off-stage" },
                rows: bundle
                    .participations
                    .iter()
                    .map(|p| ParticipationRow::build(p, teams))
                    .collect(),
            }
        })
        .collect()
}

/// Attachment name for a program's CSV export.
pub fn export_filename(program: Option<&Program>, program_id: &str) -> String {
    let stem = program
        .map(|p| p.program_code.trim())
        .filter(|code| !code.is_empty())
        .unwrap_or(program_id);
    let safe: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("results-{safe}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::listing::ListQuery;
    use crate::models::position::Position;

    #[test]
    fn status_filter_uses_result_status() {
        let programs = vec![
            ResultProgram(Program { id: "p1".into(), name: "Speech".into(), status: "Completed".into(), result_status: "published".into(), ..Default::default() }),
            ResultProgram(Program { id: "p2".into(), name: "Song".into(), status: "Completed".into(), result_status: "pending".into(), ..Default::default() }),
        ];
        let query = ListQuery { status: Some("published".into()), ..Default::default() };
        let kept = query.apply(programs);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].0.id, "p1");
    }

    #[test]
    fn counts_participations_per_program() {
        let programs = vec![ResultProgram(Program { id: "p1".into(), ..Default::default() })];
        let results: Vec<Participation> = serde_json::from_str(r#"[{"program":"p1"},{"program":{"_id":"p1"}},{"program":"p2"}]"#).unwrap();
        assert_eq!(summary_rows(&programs, &results)[0].participation_count, 2);
    }

    #[test]
    fn print_sections_sort_each_program() {
        let ranked = |id: &str, rank: Option<i64>| Participation {
            id: id.into(),
            position: rank.map(|r| Position { rank: Some(r), category: format!("#{r}"), ..Default::default() }),
            ..Default::default()
        };
        let bundle = ProgramResults {
            program: Program { program_code: "P7".into(), name: "Essay".into(), ..Default::default() },
            participations: vec![ranked("x", None), ranked("y", Some(2)), ranked("z", Some(1))],
        };
        let sections = print_sections(vec![bundle], &[]);
        let ids: Vec<&str> = sections[0].rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "y", "x"]);
        assert_eq!(sections[0].title, "P7 - Essay");
    }

    #[test]
    fn export_name_prefers_code() {
        let p = Program { program_code: "P 12".into(), ..Default::default() };
        assert_eq!(export_filename(Some(&p), "abc"), "results-P_12.csv");
        assert_eq!(export_filename(None, "abc"), "results-abc.csv");
    }
}
