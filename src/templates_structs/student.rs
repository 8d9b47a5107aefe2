use askama::Template;

use crate::models::listing::SelectOption;
use crate::models::student::{StudentForm, StudentRow};
use super::{ListControls, PageContext};

#[derive(Template)]
#[template(path = "students/list.html")]
pub struct StudentListTemplate {
    pub ctx: PageContext,
    pub controls: ListControls,
    pub rows: Vec<StudentRow>,
}

#[derive(Template)]
#[template(path = "students/form.html")]
pub struct StudentFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: StudentForm,
    pub category_options: Vec<SelectOption>,
    pub team_options: Vec<SelectOption>,
    pub errors: Vec<String>,
}
