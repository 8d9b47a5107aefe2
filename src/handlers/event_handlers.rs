use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::csrf;
use crate::auth::session::{flash_success, require_permission};
use crate::errors::{AppError, render};
use crate::handlers::helpers::{self, CsrfOnly, checked_id, mutation_error, redirect, settle, with_failure};
use crate::models::event::{EVENT_STATUSES, Event, EventForm, EventRow};
use crate::models::listing::{ListQuery, plain_options};
use crate::state::AppState;
use crate::templates_structs::{EventFormTemplate, EventListTemplate, ListControls, PageContext};

/// GET /events
pub async fn list(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "events.view")?;
    let api = state.api_for(&session)?;

    let mut failure = None;
    let events = settle("events", api.find_all::<Event>().await, &mut failure)?;
    let total = events.len();
    let shown = query.apply(events);
    let controls = ListControls::new(&query, total, shown.len()).statuses(&EVENT_STATUSES, &query);
    let ctx = with_failure(PageContext::build(&session, &state, "/events")?, failure);
    render(EventListTemplate { ctx, controls, rows: shown.iter().map(EventRow::from).collect() })
}

fn form_page(
    state: &AppState,
    session: &Session,
    event_id: Option<&str>,
    form: EventForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let (form_action, form_title) = match event_id {
        Some(id) => (format!("/events/{id}"), "Edit Event"),
        None => ("/events".to_string(), "New Event"),
    };
    let ctx = PageContext::build(session, state, "/events")?;
    render(EventFormTemplate {
        ctx,
        form_action,
        form_title: form_title.to_string(),
        status_options: plain_options(&EVENT_STATUSES, &form.status),
        form,
        errors,
    })
}

pub async fn new_form(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "events.create")?;
    form_page(&state, &session, None, EventForm::default(), vec![])
}

pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<EventForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "events.create")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let form = form.into_inner();

    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => return form_page(&state, &session, None, form, errors),
    };
    let api = state.api_for(&session)?;
    match api.create::<Event, _>(&payload).await {
        Ok(_) => {
            log::info!("Created event '{}' on {}", payload.title, payload.date);
            flash_success(&session, format!("Event '{}' created", payload.title));
            Ok(redirect("/events"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let errors = mutation_error("Creating event", &e);
            form_page(&state, &session, None, form, errors)
        }
    }
}

pub async fn edit_form(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "events.edit")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let event: Event = api.find(&id).await?;
    form_page(&state, &session, Some(&id), EventForm::from(&event), vec![])
}

pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<EventForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "events.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = checked_id(path)?;
    let form = form.into_inner();

    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => return form_page(&state, &session, Some(&id), form, errors),
    };
    let api = state.api_for(&session)?;
    match api.update::<Event, _>(&id, &payload).await {
        Ok(_) => {
            log::info!("Updated event {id}");
            flash_success(&session, format!("Event '{}' updated", payload.title));
            Ok(redirect("/events"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let errors = mutation_error("Updating event", &e);
            form_page(&state, &session, Some(&id), form, errors)
        }
    }
}

pub async fn confirm_delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "events.delete")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    helpers::confirm_delete::<Event, _>(&state, &session, &api, &id, "Event", "/events", |e| e.title.clone()).await
}

pub async fn delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let id = checked_id(path)?;
    helpers::delete_record::<Event>(&state, &session, &id, &form.csrf_token, "events.delete", "Event", "/events").await
}
