use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::csrf;
use crate::auth::session::{flash_success, require_permission};
use crate::errors::{AppError, render};
use crate::handlers::helpers::{self, CsrfOnly, checked_id, mutation_error, redirect, settle, with_failure};
use crate::models::listing::ListQuery;
use crate::models::position::{Position, PositionForm, PositionRow};
use crate::state::AppState;
use crate::templates_structs::{ListControls, PageContext, PositionFormTemplate, PositionListTemplate};

/// GET /positions
pub async fn list(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "positions.view")?;
    let api = state.api_for(&session)?;

    let mut failure = None;
    let positions = settle("positions", api.find_all::<Position>().await, &mut failure)?;
    let total = positions.len();
    let shown = query.apply(positions);
    let controls = ListControls::new(&query, total, shown.len());
    let ctx = with_failure(PageContext::build(&session, &state, "/positions")?, failure);
    render(PositionListTemplate { ctx, controls, rows: shown.iter().map(PositionRow::from).collect() })
}

fn form_page(
    state: &AppState,
    session: &Session,
    position_id: Option<&str>,
    form: PositionForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let (form_action, form_title) = match position_id {
        Some(id) => (format!("/positions/{id}"), "Edit Position"),
        None => ("/positions".to_string(), "New Position"),
    };
    let ctx = PageContext::build(session, state, "/positions")?;
    render(PositionFormTemplate { ctx, form_action, form_title: form_title.to_string(), form, errors })
}

pub async fn new_form(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "positions.create")?;
    form_page(&state, &session, None, PositionForm::default(), vec![])
}

pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<PositionForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "positions.create")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let form = form.into_inner();

    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => return form_page(&state, &session, None, form, errors),
    };
    let api = state.api_for(&session)?;
    match api.create::<Position, _>(&payload).await {
        Ok(_) => {
            log::info!("Created position '{}'", payload.category);
            flash_success(&session, format!("Position '{}' created", payload.category));
            Ok(redirect("/positions"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let errors = mutation_error("Creating position", &e);
            form_page(&state, &session, None, form, errors)
        }
    }
}

pub async fn edit_form(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "positions.edit")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let position: Position = api.find(&id).await?;
    form_page(&state, &session, Some(&id), PositionForm::from(&position), vec![])
}

pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<PositionForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "positions.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = checked_id(path)?;
    let form = form.into_inner();

    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => return form_page(&state, &session, Some(&id), form, errors),
    };
    let api = state.api_for(&session)?;
    match api.update::<Position, _>(&id, &payload).await {
        Ok(_) => {
            log::info!("Updated position {id}");
            flash_success(&session, format!("Position '{}' updated", payload.category));
            Ok(redirect("/positions"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let errors = mutation_error("Updating position", &e);
            form_page(&state, &session, Some(&id), form, errors)
        }
    }
}

pub async fn confirm_delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "positions.delete")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    helpers::confirm_delete::<Position, _>(&state, &session, &api, &id, "Position", "/positions", |p| p.category.clone())
        .await
}

pub async fn delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let id = checked_id(path)?;
    helpers::delete_record::<Position>(&state, &session, &id, &form.csrf_token, "positions.delete", "Position", "/positions")
        .await
}
