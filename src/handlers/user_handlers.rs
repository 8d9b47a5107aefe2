use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{flash_success, require_permission};
use crate::errors::{AppError, render};
use crate::handlers::helpers::{self, CsrfOnly, checked_id, mutation_error, redirect, settle, with_failure};
use crate::models::listing::ListQuery;
use crate::models::role::{self, Role};
use crate::models::team::{self, Team};
use crate::models::user::{self, User, UserForm};
use crate::state::AppState;
use crate::templates_structs::{ListControls, PageContext, UserFormTemplate, UserListTemplate};

/// GET /users
/// Role and team names are resolved from their own collections when the
/// backend sends bare ids.
pub async fn list(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "users.view")?;
    let api = state.api_for(&session)?;

    let (users, roles, teams) =
        futures::join!(api.find_all::<User>(), api.find_all::<Role>(), api.find_all::<Team>());
    let mut failure = None;
    let users = settle("users", users, &mut failure)?;
    let roles = settle("roles", roles, &mut failure)?;
    let teams = settle("teams", teams, &mut failure)?;

    let total = users.len();
    let shown = query.apply(users);
    let controls = ListControls::new(&query, total, shown.len())
        .statuses(&["active", "inactive"], &query)
        .teams(team::options(&teams, query.team.as_deref().unwrap_or("")));
    let ctx = with_failure(PageContext::build(&session, &state, "/users")?, failure);
    render(UserListTemplate { ctx, controls, rows: user::to_rows(&shown, &roles, &teams) })
}

async fn form_page(
    state: &AppState,
    session: &Session,
    api: &ApiClient,
    user_id: Option<&str>,
    mut form: UserForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let (roles, teams) = futures::join!(api.find_all::<Role>(), api.find_all::<Team>());
    let mut failure = None;
    let roles = settle("roles", roles, &mut failure)?;
    let teams = settle("teams", teams, &mut failure)?;

    // Never echo a password back into the page.
    form.password.clear();
    let (form_action, form_title) = match user_id {
        Some(id) => (format!("/users/{id}"), "Edit User"),
        None => ("/users".to_string(), "New User"),
    };
    let ctx = with_failure(PageContext::build(session, state, "/users")?, failure);
    render(UserFormTemplate {
        ctx,
        form_action,
        form_title: form_title.to_string(),
        is_new: user_id.is_none(),
        role_options: role::options(&roles, &form.role),
        team_options: team::options(&teams, &form.team),
        form,
        errors,
    })
}

pub async fn new_form(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "users.create")?;
    let api = state.api_for(&session)?;
    form_page(&state, &session, &api, None, UserForm::default(), vec![]).await
}

pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<UserForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "users.create")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let api = state.api_for(&session)?;
    let form = form.into_inner();

    let errors = match form.validate(true) {
        Ok(payload) => match api.create::<User, _>(&payload).await {
            Ok(_) => {
                log::info!("Created user '{}'", payload.username);
                flash_success(&session, format!("User '{}' created", payload.username));
                return Ok(redirect("/users"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => mutation_error("Creating user", &e),
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
    require_permission(&session, "users.edit")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let user: User = api.find(&id).await?;
    form_page(&state, &session, &api, Some(&id), UserForm::from(&user), vec![]).await
}

pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<UserForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "users.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let form = form.into_inner();

    let errors = match form.validate(false) {
        Ok(payload) => match api.update::<User, _>(&id, &payload).await {
            Ok(_) => {
                log::info!("Updated user {id}");
                flash_success(&session, format!("User '{}' updated", payload.username));
                return Ok(redirect("/users"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => mutation_error("Updating user", &e),
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
    require_permission(&session, "users.delete")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    helpers::confirm_delete::<User, _>(&state, &session, &api, &id, "User", "/users", |u| u.username.clone()).await
}

pub async fn delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let id = checked_id(path)?;
    helpers::delete_record::<User>(&state, &session, &id, &form.csrf_token, "users.delete", "User", "/users").await
}
