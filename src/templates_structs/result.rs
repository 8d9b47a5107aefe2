use askama::Template;

use crate::models::participation::ParticipationRow;
use crate::models::program::ProgramRow;
use crate::models::result::{PrintSection, ResultSummaryRow};
use super::{ListControls, PageContext};

#[derive(Template)]
#[template(path = "results/list.html")]
pub struct ResultListTemplate {
    pub ctx: PageContext,
    pub controls: ListControls,
    pub rows: Vec<ResultSummaryRow>,
}

#[derive(Template)]
#[template(path = "results/program.html")]
pub struct ProgramResultTemplate {
    pub ctx: PageContext,
    pub program: ProgramRow,
    pub rows: Vec<ParticipationRow>,
}

/// Standalone printable document; does not extend the layout.
#[derive(Template)]
#[template(path = "results/print.html")]
pub struct PrintResultsTemplate {
    pub app_name: String,
    pub generated_at: String,
    pub sections: Vec<PrintSection>,
}
