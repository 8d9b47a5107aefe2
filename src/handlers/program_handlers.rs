use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{flash_error, flash_success, require_permission};
use crate::errors::{AppError, render};
use crate::handlers::helpers::{self, CsrfOnly, checked_id, mutation_error, redirect, settle, with_failure};
use crate::models::category::PROGRAM_CATEGORIES;
use crate::models::listing::{ListQuery, plain_options};
use crate::models::program::{
    PROGRAM_STATUSES, Program, ProgramForm, ProgramRow, ResultStatusChange, result_status_path,
};
use crate::models::user::{self, User};
use crate::state::AppState;
use crate::templates_structs::{ListControls, PageContext, ProgramFormTemplate, ProgramListTemplate};

#[derive(Deserialize)]
pub struct ResultStatusForm {
    #[serde(default)]
    pub result_status: String,
    pub csrf_token: String,
}

/// GET /programs
/// Filters: category, scheduling status, stage/off-stage.
pub async fn list(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "programs.view")?;
    let api = state.api_for(&session)?;

    let mut failure = None;
    let programs = settle("programs", api.find_all::<Program>().await, &mut failure)?;

    let total = programs.len();
    let shown = query.apply(programs);
    let controls = ListControls::new(&query, total, shown.len())
        .categories(&PROGRAM_CATEGORIES, &query)
        .statuses(&PROGRAM_STATUSES, &query)
        .stages(&query);

    let ctx = with_failure(PageContext::build(&session, &state, "/programs")?, failure);
    render(ProgramListTemplate {
        ctx,
        controls,
        rows: shown.iter().map(ProgramRow::from).collect(),
    })
}

async fn form_page(
    state: &AppState,
    session: &Session,
    api: &ApiClient,
    program_id: Option<&str>,
    form: ProgramForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let mut failure = None;
    let judges = settle("judges", api.find_all::<User>().await, &mut failure)?;

    let (form_action, form_title) = match program_id {
        Some(id) => (format!("/programs/{id}"), "Edit Program"),
        None => ("/programs".to_string(), "New Program"),
    };
    let ctx = with_failure(PageContext::build(session, state, "/programs")?, failure);
    render(ProgramFormTemplate {
        ctx,
        form_action,
        form_title: form_title.to_string(),
        category_options: plain_options(&PROGRAM_CATEGORIES, &form.category),
        status_options: plain_options(&PROGRAM_STATUSES, &form.status),
        judge_options: user::options(&judges, &form.judge),
        form,
        errors,
    })
}

pub async fn new_form(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "programs.create")?;
    let api = state.api_for(&session)?;
    form_page(&state, &session, &api, None, ProgramForm::default(), vec![]).await
}

pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<ProgramForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "programs.create")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let api = state.api_for(&session)?;
    let form = form.into_inner();

    let errors = match form.validate() {
        Ok(payload) => match api.create::<Program, _>(&payload).await {
            Ok(_) => {
                log::info!("Created program {} '{}'", payload.program_code, payload.name);
                flash_success(&session, format!("Program '{}' created", payload.name));
                return Ok(redirect("/programs"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => mutation_error("Creating program", &e),
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
    require_permission(&session, "programs.edit")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let program: Program = api.find(&id).await?;
    form_page(&state, &session, &api, Some(&id), ProgramForm::from(&program), vec![]).await
}

pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<ProgramForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "programs.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let form = form.into_inner();

    let errors = match form.validate() {
        Ok(payload) => match api.update::<Program, _>(&id, &payload).await {
            Ok(_) => {
                log::info!("Updated program {id}");
                flash_success(&session, format!("Program '{}' updated", payload.name));
                return Ok(redirect("/programs"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => mutation_error("Updating program", &e),
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
    require_permission(&session, "programs.delete")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    helpers::confirm_delete::<Program, _>(&state, &session, &api, &id, "Program", "/programs", Program::display_name)
        .await
}

pub async fn delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let id = checked_id(path)?;
    helpers::delete_record::<Program>(&state, &session, &id, &form.csrf_token, "programs.delete", "Program", "/programs")
        .await
}

/// PATCH the result status and flash the outcome. Shared by the programs and
/// results pages, which redirect to different places afterwards.
pub async fn apply_result_status(
    state: &AppState,
    session: &Session,
    program_id: &str,
    form: &ResultStatusForm,
) -> Result<(), AppError> {
    require_permission(session, "programs.edit")?;
    csrf::validate_csrf(session, &form.csrf_token)?;

    let change = match ResultStatusChange::parse(&form.result_status) {
        Ok(change) => change,
        Err(message) => {
            flash_error(session, message);
            return Ok(());
        }
    };

    let api = state.api_for(session)?;
    match api.patch::<_, serde_json::Value>(&result_status_path(program_id), &change).await {
        Ok(_) => {
            log::info!("Result status of program {program_id} set to {}", change.result_status);
            flash_success(session, format!("Result status changed to {}", change.result_status));
        }
        Err(e) if e.is_unauthorized() => return Err(e.into()),
        Err(e) => {
            log::error!("Changing result status of program {program_id} failed: {e}");
            flash_error(session, e.user_message());
        }
    }
    Ok(())
}

/// POST /programs/{id}/result-status
pub async fn change_result_status(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<ResultStatusForm>,
) -> Result<HttpResponse, AppError> {
    let id = checked_id(path)?;
    apply_result_status(&state, &session, &id, &form).await?;
    Ok(redirect("/programs"))
}
