//! Judging sheets. Scores are validated and totalled here; the backend has no
//! endpoint that stores them yet, so submitting answers 501 and sends nothing.

use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::require_permission;
use crate::errors::{AppError, render, render_with_status};
use crate::handlers::helpers::{checked_id, get_field, parse_form_body, settle, with_failure};
use crate::models::category::PROGRAM_CATEGORIES;
use crate::models::judgment::ScoreSheet;
use crate::models::listing::ListQuery;
use crate::models::participation::Participation;
use crate::models::program::{Program, ProgramRow};
use crate::models::team::Team;
use crate::state::AppState;
use crate::templates_structs::{JudgmentListTemplate, JudgmentSheetTemplate, ListControls, PageContext};

pub const SUBMIT_UNAVAILABLE: &str =
    "Scores were checked but not saved: the score submission endpoint is not yet available.";

/// GET /judgments
pub async fn list(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "judgments.view")?;
    let api = state.api_for(&session)?;

    let mut failure = None;
    let programs = settle("programs", api.find_all::<Program>().await, &mut failure)?;
    let total = programs.len();
    let shown = query.apply(programs);
    let controls = ListControls::new(&query, total, shown.len()).categories(&PROGRAM_CATEGORIES, &query);
    let ctx = with_failure(PageContext::build(&session, &state, "/judgments")?, failure);
    render(JudgmentListTemplate { ctx, controls, rows: shown.iter().map(ProgramRow::from).collect() })
}

struct SheetData {
    program: Program,
    participations: Vec<Participation>,
    teams: Vec<Team>,
    failure: Option<String>,
}

/// The program itself must exist; entries and teams degrade to an empty sheet.
async fn load_sheet(api: &ApiClient, program_id: &str) -> Result<SheetData, AppError> {
    let (program, participations, teams) = futures::join!(
        api.find::<Program>(program_id),
        api.find_all::<Participation>(),
        api.find_all::<Team>(),
    );
    let program = program?;
    let mut failure = None;
    let participations = settle("participations", participations, &mut failure)?
        .into_iter()
        .filter(|p| p.program_id() == program_id)
        .collect();
    let teams = settle("teams", teams, &mut failure)?;
    Ok(SheetData { program, participations, teams, failure })
}

fn sheet_page(
    state: &AppState,
    session: &Session,
    status: StatusCode,
    data: &SheetData,
    sheet: ScoreSheet,
    previewed: bool,
    notice: Option<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = with_failure(PageContext::build(session, state, "/judgments")?, data.failure.clone());
    render_with_status(
        status,
        JudgmentSheetTemplate { ctx, program: ProgramRow::from(&data.program), sheet, previewed, notice },
    )
}

/// GET /judgments/{program_id}
pub async fn sheet(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "judgments.view")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let data = load_sheet(&api, &id).await?;
    let sheet = ScoreSheet::blank(&data.participations, &data.teams);
    sheet_page(&state, &session, StatusCode::OK, &data, sheet, false, None)
}

/// POST /judgments/{program_id}/preview
/// Recompute totals and bands, highest total first.
pub async fn preview(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    body: String,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "judgments.view")?;
    let pairs = parse_form_body(&body);
    csrf::validate_csrf(&session, get_field(&pairs, "csrf_token"))?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;

    let data = load_sheet(&api, &id).await?;
    let sheet = ScoreSheet::parse(&data.participations, &data.teams, &pairs).ranked();
    sheet_page(&state, &session, StatusCode::OK, &data, sheet, true, None)
}

/// POST /judgments/{program_id}/submit
pub async fn submit(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    body: String,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "judgments.view")?;
    let pairs = parse_form_body(&body);
    csrf::validate_csrf(&session, get_field(&pairs, "csrf_token"))?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;

    let data = load_sheet(&api, &id).await?;
    let sheet = ScoreSheet::parse(&data.participations, &data.teams, &pairs);
    if sheet.has_errors() {
        return sheet_page(&state, &session, StatusCode::UNPROCESSABLE_ENTITY, &data, sheet, true, None);
    }

    log::warn!(
        "Judgment submit for program {id} ({} entries) not sent: no score submission endpoint",
        sheet.cards.len()
    );
    let sheet = sheet.ranked();
    sheet_page(
        &state,
        &session,
        StatusCode::NOT_IMPLEMENTED,
        &data,
        sheet,
        true,
        Some(SUBMIT_UNAVAILABLE.to_string()),
    )
}
