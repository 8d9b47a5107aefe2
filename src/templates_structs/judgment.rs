use askama::Template;

use crate::models::judgment::ScoreSheet;
use crate::models::program::ProgramRow;
use super::{ListControls, PageContext};

#[derive(Template)]
#[template(path = "judgments/list.html")]
pub struct JudgmentListTemplate {
    pub ctx: PageContext,
    pub controls: ListControls,
    pub rows: Vec<ProgramRow>,
}

#[derive(Template)]
#[template(path = "judgments/sheet.html")]
pub struct JudgmentSheetTemplate {
    pub ctx: PageContext,
    pub program: ProgramRow,
    pub sheet: ScoreSheet,
    pub previewed: bool,
    pub notice: Option<String>,
}
