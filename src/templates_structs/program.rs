use askama::Template;

use crate::models::listing::SelectOption;
use crate::models::program::{ProgramForm, ProgramRow};
use super::{ListControls, PageContext};

#[derive(Template)]
#[template(path = "programs/list.html")]
pub struct ProgramListTemplate {
    pub ctx: PageContext,
    pub controls: ListControls,
    pub rows: Vec<ProgramRow>,
}

#[derive(Template)]
#[template(path = "programs/form.html")]
pub struct ProgramFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: ProgramForm,
    pub category_options: Vec<SelectOption>,
    pub status_options: Vec<SelectOption>,
    pub judge_options: Vec<SelectOption>,
    pub errors: Vec<String>,
}
