use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{flash_success, require_permission};
use crate::errors::{AppError, render};
use crate::handlers::helpers::{
    self, CsrfOnly, checked_id, mutation_error, parse_form_body, redirect, settle, with_failure,
};
use crate::models::listing::ListQuery;
use crate::models::permission::{self, Permission};
use crate::models::role::{Role, RoleForm, RoleRow};
use crate::state::AppState;
use crate::templates_structs::{ListControls, PageContext, RoleFormTemplate, RoleListTemplate};

/// GET /roles
pub async fn list(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "roles.view")?;
    let api = state.api_for(&session)?;

    let mut failure = None;
    let roles = settle("roles", api.find_all::<Role>().await, &mut failure)?;
    let total = roles.len();
    let shown = query.apply(roles);
    let controls = ListControls::new(&query, total, shown.len());
    let ctx = with_failure(PageContext::build(&session, &state, "/roles")?, failure);
    render(RoleListTemplate { ctx, controls, rows: shown.iter().map(RoleRow::from).collect() })
}

async fn form_page(
    state: &AppState,
    session: &Session,
    api: &ApiClient,
    role_id: Option<&str>,
    form: RoleForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let mut failure = None;
    let all = settle("permissions", api.find_all::<Permission>().await, &mut failure)?;

    let (form_action, form_title) = match role_id {
        Some(id) => (format!("/roles/{id}"), "Edit Role"),
        None => ("/roles".to_string(), "New Role"),
    };
    let ctx = with_failure(PageContext::build(session, state, "/roles")?, failure);
    render(RoleFormTemplate {
        ctx,
        form_action,
        form_title: form_title.to_string(),
        permissions: permission::checkboxes(&all, &form.permissions),
        form,
        errors,
    })
}

pub async fn new_form(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "roles.create")?;
    let api = state.api_for(&session)?;
    form_page(&state, &session, &api, None, RoleForm::default(), vec![]).await
}

/// Checkboxes repeat the `permissions` key, which `web::Form` cannot collect.
pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    body: String,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "roles.create")?;
    let form = RoleForm::from_pairs(parse_form_body(&body));
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let api = state.api_for(&session)?;

    let errors = match form.validate() {
        Ok(payload) => match api.create::<Role, _>(&payload).await {
            Ok(_) => {
                log::info!("Created role '{}' with {} permissions", payload.name, payload.permissions.len());
                flash_success(&session, format!("Role '{}' created", payload.name));
                return Ok(redirect("/roles"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => mutation_error("Creating role", &e),
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
    require_permission(&session, "roles.edit")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let role: Role = api.find(&id).await?;
    form_page(&state, &session, &api, Some(&id), RoleForm::from(&role), vec![]).await
}

pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    body: String,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "roles.edit")?;
    let form = RoleForm::from_pairs(parse_form_body(&body));
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;

    let errors = match form.validate() {
        Ok(payload) => match api.update::<Role, _>(&id, &payload).await {
            Ok(_) => {
                log::info!("Updated role {id} ({} permissions)", payload.permissions.len());
                flash_success(&session, format!("Role '{}' updated", payload.name));
                return Ok(redirect("/roles"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => mutation_error("Updating role", &e),
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
    require_permission(&session, "roles.delete")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    helpers::confirm_delete::<Role, _>(&state, &session, &api, &id, "Role", "/roles", |r| r.name.clone()).await
}

pub async fn delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let id = checked_id(path)?;
    helpers::delete_record::<Role>(&state, &session, &id, &form.csrf_token, "roles.delete", "Role", "/roles").await
}
