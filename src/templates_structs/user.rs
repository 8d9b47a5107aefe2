use askama::Template;

use crate::models::listing::SelectOption;
use crate::models::user::{UserForm, UserRow};
use super::{ListControls, PageContext};

#[derive(Template)]
#[template(path = "users/list.html")]
pub struct UserListTemplate {
    pub ctx: PageContext,
    pub controls: ListControls,
    pub rows: Vec<UserRow>,
}

#[derive(Template)]
#[template(path = "users/form.html")]
pub struct UserFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: UserForm,
    pub is_new: bool,
    pub role_options: Vec<SelectOption>,
    pub team_options: Vec<SelectOption>,
    pub errors: Vec<String>,
}
