use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::auth::csrf;
use crate::auth::session::{flash_success, require_permission};
use crate::errors::{AppError, render};
use crate::handlers::helpers::{self, CsrfOnly, checked_id, mutation_error, redirect, settle, with_failure};
use crate::handlers::upload::{UploadForm, read_upload};
use crate::models::listing::{ListQuery, distinct_values, plain_options};
use crate::models::news::{IMAGE_FIELD, NEWS_STATUSES, News, NewsForm, NewsRow};
use crate::state::AppState;
use crate::templates_structs::{ListControls, NewsFormTemplate, NewsListTemplate, PageContext};

/// GET /news
pub async fn list(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "news.view")?;
    let api = state.api_for(&session)?;

    let mut failure = None;
    let news = settle("news", api.find_all::<News>().await, &mut failure)?;
    let categories = distinct_values(news.iter().map(|n| n.category.as_str()));
    let total = news.len();
    let shown = query.apply(news);
    let controls = ListControls::new(&query, total, shown.len())
        .categories_from(&categories, &query)
        .statuses(&NEWS_STATUSES, &query);
    let ctx = with_failure(PageContext::build(&session, &state, "/news")?, failure);
    render(NewsListTemplate { ctx, controls, rows: shown.iter().map(NewsRow::from).collect() })
}

fn form_page(
    state: &AppState,
    session: &Session,
    news_id: Option<&str>,
    form: NewsForm,
    current_image: String,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let (form_action, form_title) = match news_id {
        Some(id) => (format!("/news/{id}"), "Edit News"),
        None => ("/news".to_string(), "New News"),
    };
    let ctx = PageContext::build(session, state, "/news")?;
    render(NewsFormTemplate {
        ctx,
        form_action,
        form_title: form_title.to_string(),
        status_options: plain_options(&NEWS_STATUSES, &form.status),
        form,
        current_image,
        errors,
    })
}

/// The edit form echoes the stored image URL in a hidden field so a failed
/// save can show it again without another fetch.
fn echoed_image(upload: &UploadForm) -> String {
    upload.fields.get("current_image").cloned().unwrap_or_default()
}

pub async fn new_form(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "news.create")?;
    form_page(&state, &session, None, NewsForm::default(), String::new(), vec![])
}

pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "news.create")?;
    let upload = read_upload(payload, IMAGE_FIELD).await?;
    csrf::validate_csrf(&session, upload.csrf_token())?;
    let form = NewsForm::from_fields(&upload.fields);

    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return form_page(&state, &session, None, form, String::new(), errors),
    };
    let api = state.api_for(&session)?;
    match api.create_with_file::<News>(fields, upload.file).await {
        Ok(_) => {
            log::info!("Created news '{}'", form.title.trim());
            flash_success(&session, format!("News '{}' created", form.title.trim()));
            Ok(redirect("/news"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let errors = mutation_error("Creating news", &e);
            form_page(&state, &session, None, form, String::new(), errors)
        }
    }
}

pub async fn edit_form(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "news.edit")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    let news: News = api.find(&id).await?;
    let current_image = news.featured_image.as_ref().map(|f| f.url().to_string()).unwrap_or_default();
    form_page(&state, &session, Some(&id), NewsForm::from(&news), current_image, vec![])
}

pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "news.edit")?;
    let id = checked_id(path)?;
    let upload = read_upload(payload, IMAGE_FIELD).await?;
    csrf::validate_csrf(&session, upload.csrf_token())?;
    let form = NewsForm::from_fields(&upload.fields);
    let current_image = echoed_image(&upload);

    let fields = match form.validate() {
        Ok(fields) => fields,
        Err(errors) => return form_page(&state, &session, Some(&id), form, current_image, errors),
    };
    let api = state.api_for(&session)?;
    match api.update_with_file::<News>(&id, fields, upload.file).await {
        Ok(_) => {
            log::info!("Updated news {id}");
            flash_success(&session, format!("News '{}' updated", form.title.trim()));
            Ok(redirect("/news"))
        }
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            let errors = mutation_error("Updating news", &e);
            form_page(&state, &session, Some(&id), form, current_image, errors)
        }
    }
}

pub async fn confirm_delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "news.delete")?;
    let id = checked_id(path)?;
    let api = state.api_for(&session)?;
    helpers::confirm_delete::<News, _>(&state, &session, &api, &id, "News", "/news", |n| n.title.clone()).await
}

pub async fn delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    let id = checked_id(path)?;
    helpers::delete_record::<News>(&state, &session, &id, &form.csrf_token, "news.delete", "News", "/news").await
}
