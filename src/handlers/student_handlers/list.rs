use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::require_permission;
use crate::errors::{AppError, render};
use crate::handlers::helpers::{settle, with_failure};
use crate::models::category::STUDENT_CATEGORIES;
use crate::models::listing::ListQuery;
use crate::models::student::{self, Student};
use crate::models::team::{self, Team};
use crate::state::AppState;
use crate::templates_structs::{ListControls, PageContext, StudentListTemplate};

/// GET /students
/// Students with their team names; search over name, chest number and class.
pub async fn list(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "students.view")?;
    let api = state.api_for(&session)?;

    let (students, teams) = futures::join!(api.find_all::<Student>(), api.find_all::<Team>());
    let mut failure = None;
    let students = settle("students", students, &mut failure)?;
    let teams = settle("teams", teams, &mut failure)?;

    let total = students.len();
    let shown = query.apply(students);
    let controls = ListControls::new(&query, total, shown.len())
        .categories(&STUDENT_CATEGORIES, &query)
        .statuses(&["active", "inactive"], &query)
        .teams(team::options(&teams, query.team.as_deref().unwrap_or("")));

    let ctx = with_failure(PageContext::build(&session, &state, "/students")?, failure);
    render(StudentListTemplate { ctx, controls, rows: student::to_rows(&shown, &teams) })
}
