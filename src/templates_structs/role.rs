use askama::Template;

use crate::models::permission::PermissionCheckbox;
use crate::models::role::{RoleForm, RoleRow};
use super::{ListControls, PageContext};

#[derive(Template)]
#[template(path = "roles/list.html")]
pub struct RoleListTemplate {
    pub ctx: PageContext,
    pub controls: ListControls,
    pub rows: Vec<RoleRow>,
}

#[derive(Template)]
#[template(path = "roles/form.html")]
pub struct RoleFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: RoleForm,
    pub permissions: Vec<PermissionCheckbox>,
    pub errors: Vec<String>,
}
