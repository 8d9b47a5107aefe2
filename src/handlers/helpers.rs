use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::api::{ApiClient, ApiError, Resource};
use crate::auth::csrf;
use crate::auth::session::{flash_error, flash_success, require_permission};
use crate::auth::validate::is_valid_id;
use crate::errors::{AppError, render};
use crate::state::AppState;
use crate::templates_structs::{ConfirmDeleteTemplate, PageContext};

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

/// Path ids go straight into backend URLs, so anything unusual is a 404.
pub fn checked_id(path: web::Path<String>) -> Result<String, AppError> {
    let id = path.into_inner();
    if is_valid_id(&id) { Ok(id) } else { Err(AppError::NotFound) }
}

/// Parse a URL-encoded form body, keeping duplicate keys (checkboxes, score sheets).
pub fn parse_form_body(body: &str) -> Vec<(String, String)> {
    serde_urlencoded::from_str(body).unwrap_or_default()
}

pub fn get_field<'a>(params: &'a [(String, String)], key: &str) -> &'a str {
    params.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

/// Unwrap a collection fetch for a list page. A failure is logged, remembered
/// for the page notice, and leaves the table empty. An expired token is the
/// one error that still propagates.
pub fn settle<T>(
    what: &str,
    fetched: Result<Vec<T>, ApiError>,
    failure: &mut Option<String>,
) -> Result<Vec<T>, AppError> {
    match fetched {
        Ok(items) => Ok(items),
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            log::error!("Failed to load {what}: {e}");
            if failure.is_none() {
                *failure = Some(format!("Could not load {what}: {}", e.user_message()));
            }
            Ok(vec![])
        }
    }
}

/// Attach a load failure, if any, to the page context.
pub fn with_failure(ctx: PageContext, failure: Option<String>) -> PageContext {
    match failure {
        Some(message) => ctx.with_error(message),
        None => ctx,
    }
}

/// Log a rejected mutation and turn it into form-level error text.
pub fn mutation_error(action: &str, e: &ApiError) -> Vec<String> {
    log::error!("{action} failed: {e}");
    vec![e.user_message()]
}

/// GET /<entity>/{id}/delete: confirmation page.
pub async fn confirm_delete<R, F>(
    state: &AppState,
    session: &Session,
    api: &ApiClient,
    id: &str,
    entity: &str,
    list_url: &str,
    label: F,
) -> Result<HttpResponse, AppError>
where
    R: Resource,
    F: Fn(&R) -> String,
{
    let record: R = api.find(id).await?;
    let ctx = PageContext::build(session, state, list_url)?;
    render(ConfirmDeleteTemplate {
        ctx,
        entity: entity.to_string(),
        item_label: label(&record),
        action: format!("{list_url}/{id}/delete"),
        cancel_url: list_url.to_string(),
    })
}

/// POST /<entity>/{id}/delete: one DELETE, then back to the re-fetched list.
pub async fn delete_record<R: Resource>(
    state: &AppState,
    session: &Session,
    id: &str,
    csrf_token: &str,
    permission: &str,
    entity: &str,
    list_url: &str,
) -> Result<HttpResponse, AppError> {
    require_permission(session, permission)?;
    csrf::validate_csrf(session, csrf_token)?;
    let api = state.api_for(session)?;

    match api.remove::<R>(id).await {
        Ok(()) => {
            log::info!("Deleted {entity} {id}");
            flash_success(session, format!("{entity} deleted"));
        }
        Err(e) if e.is_unauthorized() => return Err(e.into()),
        Err(e) => {
            log::error!("Deleting {entity} {id} failed: {e}");
            flash_error(session, e.user_message());
        }
    }
    Ok(redirect(list_url))
}
