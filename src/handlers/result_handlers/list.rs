use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::session::require_permission;
use crate::errors::{AppError, render};
use crate::handlers::helpers::{checked_id, redirect, settle, with_failure};
use crate::handlers::program_handlers::{ResultStatusForm, apply_result_status};
use crate::models::category::PROGRAM_CATEGORIES;
use crate::models::listing::ListQuery;
use crate::models::participation::{Participation, ParticipationRow, sort_results};
use crate::models::program::{Program, ProgramRow, RESULT_STATUSES};
use crate::models::result::{ResultProgram, summary_rows};
use crate::models::team::Team;
use crate::state::AppState;
use crate::templates_structs::{ListControls, PageContext, ProgramResultTemplate, ResultListTemplate};

/// GET /results
/// Programs and all results are fetched together; the status dropdown filters
/// on result status.
pub async fn list(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "results.view")?;
    let api = state.api_for(&session)?;

    let (programs, results) = futures::join!(api.find_all::<Program>(), api.list::<Participation>("/results"));
    let mut failure = None;
    let programs: Vec<ResultProgram> =
        settle("programs", programs, &mut failure)?.into_iter().map(ResultProgram).collect();
    let results = settle("results", results, &mut failure)?;

    let total = programs.len();
    let shown = query.apply(programs);
    let controls = ListControls::new(&query, total, shown.len())
        .categories(&PROGRAM_CATEGORIES, &query)
        .statuses(&RESULT_STATUSES, &query)
        .stages(&query);
    let ctx = with_failure(PageContext::build(&session, &state, "/results")?, failure);
    render(ResultListTemplate {
        ctx,
        controls,
        rows: summary_rows(&shown, &results),
    })
}

/// GET /results/program/{id}
/// Rank ascending, unplaced entries last, ties by grade.
pub async fn program(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "results.view")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;

    let results_path = format!("/results/program/{id}");
    let (program, results, teams) = futures::join!(
        api.find::<Program>(&id),
        api.list::<Participation>(&results_path),
        api.find_all::<Team>(),
    );
    let program = program?;
    let mut failure = None;
    let mut results = settle("results", results, &mut failure)?;
    let teams = settle("teams", teams, &mut failure)?;
    sort_results(&mut results);

    let ctx = with_failure(PageContext::build(&session, &state, "/results")?, failure);
    render(ProgramResultTemplate {
        ctx,
        program: ProgramRow::from(&program),
        rows: results.iter().map(|p| ParticipationRow::build(p, &teams)).collect(),
    })
}

/// POST /results/program/{id}/status
pub async fn change_status(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<ResultStatusForm>,
) -> Result<HttpResponse, AppError> {
    let id = checked_id(path)?;
    apply_result_status(&state, &session, &id, &form).await?;
    Ok(redirect(&format!("/results/program/{id}")))
}
