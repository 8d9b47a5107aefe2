use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::csrf;
use crate::auth::session::{flash_success, require_permission};
use crate::errors::{AppError, render};
use crate::handlers::helpers::{self, CsrfOnly, checked_id, mutation_error, redirect, settle, with_failure};
use crate::handlers::upload::read_upload;
use crate::models::download::{DownloadFile, DownloadForm, DownloadRow, FILE_FIELD};
use crate::models::listing::{ListQuery, distinct_values};
use crate::state::AppState;
use crate::templates_structs::{DownloadFormTemplate, DownloadListTemplate, ListControls, PageContext};

/// GET /downloads
pub async fn list(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "downloads.view")?;
    let api = state.api_for(&session)?;

    let mut failure = None;
    let files = settle("downloads", api.find_all::<DownloadFile>().await, &mut failure)?;
    let categories = distinct_values(files.iter().map(|d| d.category.as_str()));
    let total = files.len();
    let shown = query.apply(files);
    let controls = ListControls::new(&query, total, shown.len())
        .categories_from(&categories, &query)
        .statuses(&["public", "private"], &query);
    let ctx = with_failure(PageContext::build(&session, &state, "/downloads")?, failure);
    render(DownloadListTemplate { ctx, controls, rows: shown.iter().map(DownloadRow::from).collect() })
}

fn form_page(
    state: &AppState,
    session: &Session,
    file_id: Option<&str>,
    form: DownloadForm,
    current_file: String,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let (form_action, form_title) = match file_id {
        Some(id) => (format!("/downloads/{id}"), "Edit Download"),
        None => ("/downloads".to_string(), "New Download"),
    };
    let ctx = PageContext::build(session, state, "/downloads")?;
    render(DownloadFormTemplate {
        ctx,
        form_action,
        form_title: form_title.to_string(),
        form,
        is_new: file_id.is_none(),
        current_file,
        errors,
    })
}

pub async fn new_form(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "downloads.create")?;
    form_page(&state, &session, None, DownloadForm::default(), String::new(), vec![])
}

pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "downloads.create")?;
    let upload = read_upload(payload, FILE_FIELD).await?;
    csrf::validate_csrf(&session, upload.csrf_token())?;
    let form = DownloadForm::from_fields(&upload.fields);

    let fields = match form.validate(upload.file.is_some(), true) {
        Ok(fields) => fields,
        Err(errors) => return form_page(&state, &session, None, form, String::new(), errors),
    };
    let api = state.api_for(&session)?;
    match api.create_with_file::<DownloadFile>(fields, upload.file).await {
        Ok(_) => {
            log::info!("Uploaded download '{}'", form.title.trim());
            flash_success(&session, format!("Download '{}' created", form.title.trim()));
            Ok(redirect("/downloads"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let errors = mutation_error("Uploading download", &e);
            form_page(&state, &session, None, form, String::new(), errors)
        }
    }
}

pub async fn edit_form(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "downloads.edit")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let file: DownloadFile = api.find(&id).await?;
    form_page(&state, &session, Some(&id), DownloadForm::from(&file), file.file_url.clone(), vec![])
}

pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "downloads.edit")?;
    let id = checked_id(path)?;
    let upload = read_upload(payload, FILE_FIELD).await?;
    csrf::validate_csrf(&session, upload.csrf_token())?;
    let form = DownloadForm::from_fields(&upload.fields);
    let current_file = upload.fields.get("current_file").cloned().unwrap_or_default();

    let fields = match form.validate(upload.file.is_some(), false) {
        Ok(fields) => fields,
        Err(errors) => return form_page(&state, &session, Some(&id), form, current_file, errors),
    };
    let api = state.api_for(&session)?;
    match api.update_with_file::<DownloadFile>(&id, fields, upload.file).await {
        Ok(_) => {
            log::info!("Updated download {id}");
            flash_success(&session, format!("Download '{}' updated", form.title.trim()));
            Ok(redirect("/downloads"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let errors = mutation_error("Updating download", &e);
            form_page(&state, &session, Some(&id), form, current_file, errors)
        }
    }
}

pub async fn confirm_delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "downloads.delete")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    helpers::confirm_delete::<DownloadFile, _>(&state, &session, &api, &id, "Download", "/downloads", |d| {
        d.title.clone()
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
    helpers::delete_record::<DownloadFile>(&state, &session, &id, &form.csrf_token, "downloads.delete", "Download", "/downloads")
        .await
}
