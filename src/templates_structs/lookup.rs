use askama::Template;

use crate::models::grade::{GradeForm, GradeRow};
use crate::models::position::{PositionForm, PositionRow};
use super::{ListControls, PageContext};

#[derive(Template)]
#[template(path = "positions/list.html")]
pub struct PositionListTemplate {
    pub ctx: PageContext,
    pub controls: ListControls,
    pub rows: Vec<PositionRow>,
}

#[derive(Template)]
#[template(path = "positions/form.html")]
pub struct PositionFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: PositionForm,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "grades/list.html")]
pub struct GradeListTemplate {
    pub ctx: PageContext,
    pub controls: ListControls,
    pub rows: Vec<GradeRow>,
}

#[derive(Template)]
#[template(path = "grades/form.html")]
pub struct GradeFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: GradeForm,
    pub errors: Vec<String>,
}
