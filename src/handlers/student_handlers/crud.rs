use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{flash_success, require_permission};
use crate::errors::{AppError, render};
use crate::handlers::helpers::{self, CsrfOnly, checked_id, mutation_error, redirect, settle, with_failure};
use crate::models::category::STUDENT_CATEGORIES;
use crate::models::listing::plain_options;
use crate::models::student::{Student, StudentForm};
use crate::models::team::{self, Team};
use crate::state::AppState;
use crate::templates_structs::{PageContext, StudentFormTemplate};

async fn form_page(
    state: &AppState,
    session: &Session,
    api: &ApiClient,
    form_action: String,
    form_title: &str,
    form: StudentForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let mut failure = None;
    let teams = settle("teams", api.find_all::<Team>().await, &mut failure)?;
    let ctx = with_failure(PageContext::build(session, state, "/students")?, failure);
    render(StudentFormTemplate {
        ctx,
        form_action,
        form_title: form_title.to_string(),
        category_options: plain_options(&STUDENT_CATEGORIES, &form.category),
        team_options: team::options(&teams, &form.team),
        form,
        errors,
    })
}

pub async fn new_form(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "students.create")?;
    let api = state.api_for(&session)?;
    form_page(&state, &session, &api, "/students".to_string(), "New Student", StudentForm::default(), vec![]).await
}

pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<StudentForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "students.create")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let api = state.api_for(&session)?;
    let form = form.into_inner();

    let errors = match form.validate() {
        Ok(payload) => match api.create::<Student, _>(&payload).await {
            Ok(_) => {
                log::info!("Created student '{}' ({})", payload.name, payload.chest_no);
                flash_success(&session, format!("Student '{}' created", payload.name));
                return Ok(redirect("/students"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => mutation_error("Creating student", &e),
        },
        Err(errors) => errors,
    };
    form_page(&state, &session, &api, "/students".to_string(), "New Student", form, errors).await
}

pub async fn edit_form(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "students.edit")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let student: Student = api.find(&id).await?;
    form_page(&state, &session, &api, format!("/students/{id}"), "Edit Student", StudentForm::from(&student), vec![]).await
}

pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<StudentForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "students.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let form = form.into_inner();

    let errors = match form.validate() {
        Ok(payload) => match api.update::<Student, _>(&id, &payload).await {
            Ok(_) => {
                log::info!("Updated student {id}");
                flash_success(&session, format!("Student '{}' updated", payload.name));
                return Ok(redirect("/students"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => mutation_error("Updating student", &e),
        },
        Err(errors) => errors,
    };
    form_page(&state, &session, &api, format!("/students/{id}"), "Edit Student", form, errors).await
}

pub async fn confirm_delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "students.delete")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    helpers::confirm_delete::<Student, _>(&state, &session, &api, &id, "Student", "/students", |s| {
        format!("{} (chest no. {})", s.name, s.chest_no)
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
    helpers::delete_record::<Student>(&state, &session, &id, &form.csrf_token, "students.delete", "Student", "/students").await
}
