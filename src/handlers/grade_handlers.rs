use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::csrf;
use crate::auth::session::{flash_success, require_permission};
use crate::errors::{AppError, render};
use crate::handlers::helpers::{self, CsrfOnly, checked_id, mutation_error, redirect, settle, with_failure};
use crate::models::grade::{Grade, GradeForm, GradeRow};
use crate::models::listing::ListQuery;
use crate::state::AppState;
use crate::templates_structs::{GradeFormTemplate, GradeListTemplate, ListControls, PageContext};

/// GET /grades
pub async fn list(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "grades.view")?;
    let api = state.api_for(&session)?;

    let mut failure = None;
    let grades = settle("grades", api.find_all::<Grade>().await, &mut failure)?;
    let total = grades.len();
    let shown = query.apply(grades);
    let controls = ListControls::new(&query, total, shown.len());
    let ctx = with_failure(PageContext::build(&session, &state, "/grades")?, failure);
    render(GradeListTemplate { ctx, controls, rows: shown.iter().map(GradeRow::from).collect() })
}

fn form_page(
    state: &AppState,
    session: &Session,
    grade_id: Option<&str>,
    form: GradeForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let (form_action, form_title) = match grade_id {
        Some(id) => (format!("/grades/{id}"), "Edit Grade"),
        None => ("/grades".to_string(), "New Grade"),
    };
    let ctx = PageContext::build(session, state, "/grades")?;
    render(GradeFormTemplate { ctx, form_action, form_title: form_title.to_string(), form, errors })
}

pub async fn new_form(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "grades.create")?;
    form_page(&state, &session, None, GradeForm::default(), vec![])
}

pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<GradeForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "grades.create")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let form = form.into_inner();

    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => return form_page(&state, &session, None, form, errors),
    };
    let api = state.api_for(&session)?;
    match api.create::<Grade, _>(&payload).await {
        Ok(_) => {
            log::info!("Created grade '{}'", payload.category);
            flash_success(&session, format!("Grade '{}' created", payload.category));
            Ok(redirect("/grades"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let errors = mutation_error("Creating grade", &e);
            form_page(&state, &session, None, form, errors)
        }
    }
}

pub async fn edit_form(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "grades.edit")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let grade: Grade = api.find(&id).await?;
    form_page(&state, &session, Some(&id), GradeForm::from(&grade), vec![])
}

pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<GradeForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "grades.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = checked_id(path)?;
    let form = form.into_inner();

    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => return form_page(&state, &session, Some(&id), form, errors),
    };
    let api = state.api_for(&session)?;
    match api.update::<Grade, _>(&id, &payload).await {
        Ok(_) => {
            log::info!("Updated grade {id}");
            flash_success(&session, format!("Grade '{}' updated", payload.category));
            Ok(redirect("/grades"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let errors = mutation_error("Updating grade", &e);
            form_page(&state, &session, Some(&id), form, errors)
        }
    }
}

pub async fn confirm_delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "grades.delete")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    helpers::confirm_delete::<Grade, _>(&state, &session, &api, &id, "Grade", "/grades", |g| {
        format!("{} ({}% - {}%)", g.category, g.from, g.to)
    })
    .await
}

pub async fn delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let id = checked_id(path)?;
    helpers::delete_record::<Grade>(&state, &session, &id, &form.csrf_token, "grades.delete", "Grade", "/grades").await
}
