use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{flash_success, require_permission};
use crate::errors::{AppError, render};
use crate::handlers::helpers::{self, CsrfOnly, checked_id, mutation_error, redirect, settle, with_failure};
use crate::models::listing::{ListQuery, SelectOption};
use crate::models::student::Student;
use crate::models::team::{self, Team, TeamForm};
use crate::models::user::{self, User};
use crate::state::AppState;
use crate::templates_structs::{ListControls, PageContext, TeamFormTemplate, TeamListTemplate};

/// GET /teams
pub async fn list(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "teams.view")?;
    let api = state.api_for(&session)?;

    let (teams, students) = futures::join!(api.find_all::<Team>(), api.find_all::<Student>());
    let mut failure = None;
    let teams = settle("teams", teams, &mut failure)?;
    let students = settle("students", students, &mut failure)?;

    let total = teams.len();
    let shown = query.apply(teams);
    let controls = ListControls::new(&query, total, shown.len());
    let ctx = with_failure(PageContext::build(&session, &state, "/teams")?, failure);
    render(TeamListTemplate { ctx, controls, rows: team::to_rows(&shown, &students) })
}

/// Leader suggestions are the team's own students; a new team has none yet,
/// so every student is offered.
fn leader_options(students: &[Student], team_id: Option<&str>) -> Vec<SelectOption> {
    students
        .iter()
        .filter(|s| team_id.is_none_or(|id| s.team_id() == id))
        .map(|s| SelectOption::new(s.id.as_str(), format!("{} ({})", s.name, s.chest_no), ""))
        .collect()
}

async fn form_page(
    state: &AppState,
    session: &Session,
    api: &ApiClient,
    team_id: Option<&str>,
    form: TeamForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let (students, users) = futures::join!(api.find_all::<Student>(), api.find_all::<User>());
    let mut failure = None;
    let students = settle("students", students, &mut failure)?;
    let users = settle("users", users, &mut failure)?;

    let (form_action, form_title) = match team_id {
        Some(id) => (format!("/teams/{id}"), "Edit Team"),
        None => ("/teams".to_string(), "New Team"),
    };
    let ctx = with_failure(PageContext::build(session, state, "/teams")?, failure);
    render(TeamFormTemplate {
        ctx,
        form_action,
        form_title: form_title.to_string(),
        student_options: leader_options(&students, team_id),
        user_options: user::options(&users, &form.user_id),
        form,
        errors,
    })
}

pub async fn new_form(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "teams.create")?;
    let api = state.api_for(&session)?;
    form_page(&state, &session, &api, None, TeamForm::default(), vec![]).await
}

pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<TeamForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "teams.create")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let api = state.api_for(&session)?;
    let form = form.into_inner();

    let errors = match form.validate() {
        Ok(payload) => match api.create::<Team, _>(&payload).await {
            Ok(_) => {
                log::info!("Created team '{}'", payload.name);
                flash_success(&session, format!("Team '{}' created", payload.name));
                return Ok(redirect("/teams"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => mutation_error("Creating team", &e),
        },
        Err(errors) => errors,
    };
    form_page(&state, &session, &api, None, form, errors).await
}

pub async fn edit_form(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "teams.edit")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let team: Team = api.find(&id).await?;
    form_page(&state, &session, &api, Some(&id), TeamForm::from(&team), vec![]).await
}

pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<TeamForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "teams.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let form = form.into_inner();

    let errors = match form.validate() {
        Ok(payload) => match api.update::<Team, _>(&id, &payload).await {
            Ok(_) => {
                log::info!("Updated team {id}");
                flash_success(&session, format!("Team '{}' updated", payload.name));
                return Ok(redirect("/teams"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => mutation_error("Updating team", &e),
        },
        Err(errors) => errors,
    };
    form_page(&state, &session, &api, Some(&id), form, errors).await
}

pub async fn confirm_delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "teams.delete")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    helpers::confirm_delete::<Team, _>(&state, &session, &api, &id, "Team", "/teams", |t| t.name.clone()).await
}

pub async fn delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let id = checked_id(path)?;
    helpers::delete_record::<Team>(&state, &session, &id, &form.csrf_token, "teams.delete", "Team", "/teams").await
}
