use askama::Template;

use super::PageContext;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub notice: Option<String>,
    pub app_name: String,
    pub csrf_token: String,
    pub username: String,
}

/// Shared "are you sure?" page for every delete.
#[derive(Template)]
#[template(path = "confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub ctx: PageContext,
    pub entity: String,
    pub item_label: String,
    pub action: String,
    pub cancel_url: String,
}
