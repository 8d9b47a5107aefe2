use askama::Template;

use crate::models::curb::{CurbForm, CurbRow};
use crate::models::listing::SelectOption;
use super::{ListControls, PageContext};

#[derive(Template)]
#[template(path = "curbs/list.html")]
pub struct CurbListTemplate {
    pub ctx: PageContext,
    pub controls: ListControls,
    pub rows: Vec<CurbRow>,
    /// Programs not yet placed in any curb.
    pub program_options: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "curbs/form.html")]
pub struct CurbFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: CurbForm,
    pub errors: Vec<String>,
}
