use askama::Template;

use crate::models::dashboard::{StatCard, TeamStanding};
use super::PageContext;

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub greeting: String,
    pub cards: Vec<StatCard>,
    pub top_teams: Vec<TeamStanding>,
    pub teams_available: bool,
}
