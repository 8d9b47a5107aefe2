// Template context structures for Askama templates, organized by domain.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{Flash, Permissions, get_permissions, get_username, take_flash};
use crate::errors::AppError;
use crate::models::listing::{ListQuery, SelectOption, plain_options};
use crate::models::nav_item::{self, NavSidebarItem};
use crate::state::AppState;

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.username`, `ctx.sidebar_items`, etc.
pub struct PageContext {
    pub username: String,
    pub avatar_initial: String,
    pub permissions: Permissions,
    pub flash: Option<Flash>,
    pub sidebar_items: Vec<NavSidebarItem>,
    pub app_name: String,
    pub csrf_token: String,
    pub current_path: String,
}

impl PageContext {
    pub fn build(session: &Session, state: &AppState, current_path: &str) -> Result<Self, AppError> {
        let username = get_username(session)
            .map_err(|e| AppError::Session(format!("Failed to get username: {}", e)))?;
        let permissions = get_permissions(session)
            .map_err(|e| AppError::Session(format!("Failed to get permissions: {}", e)))?;
        let flash = take_flash(session);
        let sidebar_items = nav_item::sidebar(&permissions, current_path);
        let csrf_token = csrf::get_or_create_token(session);
        let avatar_initial = username.chars().next().unwrap_or('?').to_uppercase().to_string();
        Ok(Self {
            username,
            avatar_initial,
            permissions,
            flash,
            sidebar_items,
            app_name: state.app_name.clone(),
            csrf_token,
            current_path: current_path.to_string(),
        })
    }

    /// Show an error notice on this render instead of the next one.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.flash = Some(Flash { kind: "error".to_string(), message: message.into() });
        self
    }
}

/// Search box, dropdown filters and sort state echoed back into a list page.
pub struct ListControls {
    pub q: String,
    pub category_options: Vec<SelectOption>,
    pub status_options: Vec<SelectOption>,
    pub team_options: Vec<SelectOption>,
    pub stage_options: Vec<SelectOption>,
    pub sort_column: String,
    pub sort_dir: String,
    pub filtered: bool,
    pub total: usize,
    pub shown: usize,
    /// Active search and dropdown values, carried into sort links.
    filters: Vec<(&'static str, String)>,
}

impl ListControls {
    pub fn new(query: &ListQuery, total: usize, shown: usize) -> Self {
        let spec = query.sort_spec();
        Self {
            q: query.search().to_string(),
            category_options: vec![],
            status_options: vec![],
            team_options: vec![],
            stage_options: vec![],
            sort_column: spec.column.clone(),
            sort_dir: spec.dir_str().to_string(),
            filtered: query.is_filtered(),
            total,
            shown,
            filters: active_filters(query),
        }
    }

    pub fn categories(mut self, values: &[&str], query: &ListQuery) -> Self {
        self.category_options = plain_options(values, query.category.as_deref().unwrap_or(""));
        self
    }

    /// Category filter over values taken from the records themselves.
    pub fn categories_from(self, values: &[String], query: &ListQuery) -> Self {
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        self.categories(&values, query)
    }

    pub fn statuses(mut self, values: &[&str], query: &ListQuery) -> Self {
        self.status_options = plain_options(values, query.status.as_deref().unwrap_or(""));
        self
    }

    pub fn teams(mut self, options: Vec<SelectOption>) -> Self {
        self.team_options = options;
        self
    }

    pub fn stages(mut self, query: &ListQuery) -> Self {
        let current = query.stage.as_deref().unwrap_or("");
        self.stage_options = vec![
            SelectOption::new("stage", "Stage", current),
            SelectOption::new("offstage", "Off-stage", current),
        ];
        self
    }

    /// Next direction for a column header link.
    pub fn dir_for(&self, column: &str) -> &'static str {
        if self.sort_column == column && self.sort_dir == "asc" { "desc" } else { "asc" }
    }

    /// Query string for a column header: same filters, this column, next direction.
    pub fn sort_href(&self, column: &str) -> String {
        let mut params: Vec<(&str, &str)> = self.filters.iter().map(|(k, v)| (*k, v.as_str())).collect();
        params.push(("sort", column));
        params.push(("dir", self.dir_for(column)));
        format!("?{}", serde_urlencoded::to_string(&params).unwrap_or_default())
    }

    /// Arrow shown next to the sorted column.
    pub fn sort_marker(&self, column: &str) -> &'static str {
        match (self.sort_column == column, self.sort_dir.as_str()) {
            (true, "desc") => "\u{25bc}",
            (true, _) => "\u{25b2}",
            _ => "",
        }
    }
}

fn active_filters(query: &ListQuery) -> Vec<(&'static str, String)> {
    [
        ("q", &query.q),
        ("category", &query.category),
        ("status", &query.status),
        ("team", &query.team),
        ("stage", &query.stage),
    ]
    .into_iter()
    .filter_map(|(key, value)| {
        let value = value.as_deref().map(str::trim).unwrap_or("");
        (!value.is_empty()).then(|| (key, value.to_string()))
    })
    .collect()
}

mod common;
mod content;
mod curb;
mod dashboard;
mod judgment;
mod lookup;
mod program;
mod result;
mod role;
mod student;
mod team;
mod user;

// Re-export all types for seamless imports
pub use self::common::{ConfirmDeleteTemplate, LoginTemplate};
pub use self::content::{
    DownloadFormTemplate, DownloadListTemplate, EventFormTemplate, EventListTemplate, GalleryFormTemplate,
    GalleryListTemplate, NewsFormTemplate, NewsListTemplate,
};
pub use self::curb::{CurbFormTemplate, CurbListTemplate};
pub use self::dashboard::DashboardTemplate;
pub use self::judgment::{JudgmentListTemplate, JudgmentSheetTemplate};
pub use self::lookup::{GradeFormTemplate, GradeListTemplate, PositionFormTemplate, PositionListTemplate};
pub use self::program::{ProgramFormTemplate, ProgramListTemplate};
pub use self::result::{PrintResultsTemplate, ProgramResultTemplate, ResultListTemplate};
pub use self::role::{RoleFormTemplate, RoleListTemplate};
pub use self::student::{StudentFormTemplate, StudentListTemplate};
pub use self::team::{TeamFormTemplate, TeamListTemplate};
pub use self::user::{UserFormTemplate, UserListTemplate};
