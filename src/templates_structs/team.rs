use askama::Template;

use crate::models::listing::SelectOption;
use crate::models::team::{TeamForm, TeamRow};
use super::{ListControls, PageContext};

#[derive(Template)]
#[template(path = "teams/list.html")]
pub struct TeamListTemplate {
    pub ctx: PageContext,
    pub controls: ListControls,
    pub rows: Vec<TeamRow>,
}

#[derive(Template)]
#[template(path = "teams/form.html")]
pub struct TeamFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: TeamForm,
    /// Students of this team, offered as leader suggestions.
    pub student_options: Vec<SelectOption>,
    pub user_options: Vec<SelectOption>,
    pub errors: Vec<String>,
}
