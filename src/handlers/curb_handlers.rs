use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{flash_error, flash_success, require_permission};
use crate::auth::validate::is_valid_id;
use crate::errors::{AppError, render};
use crate::handlers::helpers::{self, CsrfOnly, checked_id, mutation_error, redirect, settle, with_failure};
use crate::models::curb::{self, Curb, CurbForm, CurbPrograms};
use crate::models::listing::{ListQuery, SelectOption};
use crate::models::program::Program;
use crate::state::AppState;
use crate::templates_structs::{CurbFormTemplate, CurbListTemplate, ListControls, PageContext};

#[derive(Deserialize)]
pub struct AddProgramForm {
    #[serde(default)]
    pub program_id: String,
    pub csrf_token: String,
}

/// Programs that no curb holds yet.
fn unplaced_programs(programs: &[Program], curbs: &[Curb]) -> Vec<SelectOption> {
    programs
        .iter()
        .filter(|p| !curbs.iter().any(|c| c.contains(&p.id)))
        .map(|p| SelectOption::new(p.id.as_str(), p.display_name(), ""))
        .collect()
}

/// GET /curbs
pub async fn list(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "curbs.view")?;
    let api = state.api_for(&session)?;

    let (curbs, programs) = futures::join!(api.find_all::<Curb>(), api.find_all::<Program>());
    let mut failure = None;
    let curbs = settle("curbs", curbs, &mut failure)?;
    let programs = settle("programs", programs, &mut failure)?;

    let program_options = unplaced_programs(&programs, &curbs);
    let total = curbs.len();
    let shown = query.apply(curbs);
    let controls = ListControls::new(&query, total, shown.len());
    let ctx = with_failure(PageContext::build(&session, &state, "/curbs")?, failure);
    render(CurbListTemplate { ctx, controls, rows: curb::to_rows(&shown, &programs), program_options })
}

// The curb form has no dropdowns, so rendering it never touches the backend.
fn form_page(
    state: &AppState,
    session: &Session,
    curb_id: Option<&str>,
    form: CurbForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let (form_action, form_title) = match curb_id {
        Some(id) => (format!("/curbs/{id}"), "Edit Curb"),
        None => ("/curbs".to_string(), "New Curb"),
    };
    let ctx = PageContext::build(session, state, "/curbs")?;
    render(CurbFormTemplate { ctx, form_action, form_title: form_title.to_string(), form, errors })
}

pub async fn new_form(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "curbs.create")?;
    form_page(&state, &session, None, CurbForm::default(), vec![])
}

pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<CurbForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "curbs.create")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let form = form.into_inner();

    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => return form_page(&state, &session, None, form, errors),
    };
    let api = state.api_for(&session)?;
    match api.create::<Curb, _>(&payload).await {
        Ok(_) => {
            log::info!("Created curb '{}'", payload.name);
            flash_success(&session, format!("Curb '{}' created", payload.name));
            Ok(redirect("/curbs"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let errors = mutation_error("Creating curb", &e);
            form_page(&state, &session, None, form, errors)
        }
    }
}

pub async fn edit_form(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "curbs.edit")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let curb: Curb = api.find(&id).await?;
    form_page(&state, &session, Some(&id), CurbForm::from(&curb), vec![])
}

pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CurbForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "curbs.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = checked_id(path)?;
    let form = form.into_inner();

    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => return form_page(&state, &session, Some(&id), form, errors),
    };
    let api = state.api_for(&session)?;
    match api.update::<Curb, _>(&id, &payload).await {
        Ok(_) => {
            log::info!("Updated curb {id}");
            flash_success(&session, format!("Curb '{}' updated", payload.name));
            Ok(redirect("/curbs"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let errors = mutation_error("Updating curb", &e);
            form_page(&state, &session, Some(&id), form, errors)
        }
    }
}

pub async fn confirm_delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "curbs.delete")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    helpers::confirm_delete::<Curb, _>(&state, &session, &api, &id, "Curb", "/curbs", |c| c.name.clone()).await
}

pub async fn delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let id = checked_id(path)?;
    helpers::delete_record::<Curb>(&state, &session, &id, &form.csrf_token, "curbs.delete", "Curb", "/curbs").await
}

/// Send the new program list and wait for the backend before flashing.
/// On failure nothing changes locally; the redirect re-fetches the curb as
/// the backend has it.
async fn save_programs(
    session: &Session,
    api: &ApiClient,
    curb: &Curb,
    programs: CurbPrograms,
    done: &str,
) -> Result<HttpResponse, AppError> {
    match api.update::<Curb, _>(&curb.id, &programs).await {
        Ok(_) => {
            log::info!("Curb {} now holds {} programs", curb.id, programs.programs.len());
            flash_success(session, done.to_string());
        }
        Err(e) if e.is_unauthorized() => return Err(e.into()),
        Err(e) => {
            log::error!("Updating programs of curb {} failed: {e}", curb.id);
            flash_error(session, e.user_message());
        }
    }
    Ok(redirect("/curbs"))
}

/// POST /curbs/{id}/programs
pub async fn add_program(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<AddProgramForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "curbs.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;

    let program_id = form.program_id.trim();
    if !program_id.is_empty() && !is_valid_id(program_id) {
        return Err(AppError::NotFound);
    }
    let curb: Curb = api.find(&id).await?;
    match curb::with_program_added(&curb, program_id) {
        Ok(programs) => save_programs(&session, &api, &curb, programs, &format!("Program added to '{}'", curb.name)).await,
        Err(message) => {
            flash_error(&session, message);
            Ok(redirect("/curbs"))
        }
    }
}

/// POST /curbs/{id}/programs/{program_id}/remove
pub async fn remove_program(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(String, String)>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "curbs.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let (id, program_id) = path.into_inner();
    if !is_valid_id(&id) || !is_valid_id(&program_id) {
        return Err(AppError::NotFound);
    }
    let api = state.api_for(&session)?;

    let curb: Curb = api.find(&id).await?;
    match curb::with_program_removed(&curb, &program_id) {
        Ok(programs) => {
            save_programs(&session, &api, &curb, programs, &format!("Program removed from '{}'", curb.name)).await
        }
        Err(message) => {
            flash_error(&session, message);
            Ok(redirect("/curbs"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::Ref;

    #[test]
    fn placed_programs_are_not_offered() {
        let programs = vec![
            Program { id: "p1".into(), name: "Speech".into(), ..Default::default() },
            Program { id: "p2".into(), program_code: "Q1".into(), name: "Quiz".into(), ..Default::default() },
        ];
        let curbs = vec![Curb { id: "c1".into(), programs: vec![Ref::Id("p1".into())], ..Default::default() }];
        let options = unplaced_programs(&programs, &curbs);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "p2");
        assert_eq!(options[0].label, "Q1 - Quiz");
    }
}
