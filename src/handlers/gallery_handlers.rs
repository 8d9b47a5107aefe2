use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::csrf;
use crate::auth::session::{flash_success, require_permission};
use crate::errors::{AppError, render};
use crate::handlers::helpers::{self, CsrfOnly, checked_id, mutation_error, redirect, settle, with_failure};
use crate::handlers::upload::read_upload;
use crate::models::gallery::{FILE_FIELD, GalleryForm, GalleryItem, GalleryRow};
use crate::models::listing::{ListQuery, distinct_values};
use crate::state::AppState;
use crate::templates_structs::{GalleryFormTemplate, GalleryListTemplate, ListControls, PageContext};

/// GET /gallery
pub async fn list(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "gallery.view")?;
    let api = state.api_for(&session)?;

    let mut failure = None;
    let items = settle("gallery items", api.find_all::<GalleryItem>().await, &mut failure)?;
    let categories = distinct_values(items.iter().map(|g| g.category.as_str()));
    let total = items.len();
    let shown = query.apply(items);
    let controls = ListControls::new(&query, total, shown.len())
        .categories_from(&categories, &query)
        .statuses(&["visible", "hidden"], &query);
    let ctx = with_failure(PageContext::build(&session, &state, "/gallery")?, failure);
    render(GalleryListTemplate { ctx, controls, rows: shown.iter().map(GalleryRow::from).collect() })
}

fn form_page(
    state: &AppState,
    session: &Session,
    item_id: Option<&str>,
    form: GalleryForm,
    current_file: String,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let (form_action, form_title) = match item_id {
        Some(id) => (format!("/gallery/{id}"), "Edit Gallery Item"),
        None => ("/gallery".to_string(), "Upload to Gallery"),
    };
    let ctx = PageContext::build(session, state, "/gallery")?;
    render(GalleryFormTemplate {
        ctx,
        form_action,
        form_title: form_title.to_string(),
        form,
        is_new: item_id.is_none(),
        current_file,
        errors,
    })
}

pub async fn new_form(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "gallery.create")?;
    form_page(&state, &session, None, GalleryForm::default(), String::new(), vec![])
}

pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "gallery.create")?;
    let upload = read_upload(payload, FILE_FIELD).await?;
    csrf::validate_csrf(&session, upload.csrf_token())?;
    let form = GalleryForm::from_fields(&upload.fields);

    let fields = match form.validate(upload.file.is_some(), true) {
        Ok(fields) => fields,
        Err(errors) => return form_page(&state, &session, None, form, String::new(), errors),
    };
    let api = state.api_for(&session)?;
    match api.create_with_file::<GalleryItem>(fields, upload.file).await {
        Ok(_) => {
            log::info!("Uploaded gallery item '{}'", form.title.trim());
            flash_success(&session, format!("'{}' added to the gallery", form.title.trim()));
            Ok(redirect("/gallery"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let errors = mutation_error("Uploading gallery item", &e);
            form_page(&state, &session, None, form, String::new(), errors)
        }
    }
}

pub async fn edit_form(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "gallery.edit")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let item: GalleryItem = api.find(&id).await?;
    form_page(&state, &session, Some(&id), GalleryForm::from(&item), item.file_url.clone(), vec![])
}

pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "gallery.edit")?;
    let id = checked_id(path)?;
    let upload = read_upload(payload, FILE_FIELD).await?;
    csrf::validate_csrf(&session, upload.csrf_token())?;
    let form = GalleryForm::from_fields(&upload.fields);
    let current_file = upload.fields.get("current_file").cloned().unwrap_or_default();

    let fields = match form.validate(upload.file.is_some(), false) {
        Ok(fields) => fields,
        Err(errors) => return form_page(&state, &session, Some(&id), form, current_file, errors),
    };
    let api = state.api_for(&session)?;
    match api.update_with_file::<GalleryItem>(&id, fields, upload.file).await {
        Ok(_) => {
            log::info!("Updated gallery item {id}");
            flash_success(&session, format!("Gallery item '{}' updated", form.title.trim()));
            Ok(redirect("/gallery"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let errors = mutation_error("Updating gallery item", &e);
            form_page(&state, &session, Some(&id), form, current_file, errors)
        }
    }
}

pub async fn confirm_delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "gallery.delete")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    helpers::confirm_delete::<GalleryItem, _>(&state, &session, &api, &id, "Gallery item", "/gallery", |g| {
        g.title.clone()
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
    helpers::delete_record::<GalleryItem>(&state, &session, &id, &form.csrf_token, "gallery.delete", "Gallery item", "/gallery")
        .await
}
