use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use askama::Template;
use std::fmt;

use crate::api::ApiError;

#[derive(Debug)]
pub enum AppError {
    Api(ApiError),
    Template(askama::Error),
    Session(String),
    PermissionDenied(String),
    Csrf,
    NotFound,
    Upload(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Api(e) => write!(f, "Backend error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::PermissionDenied(code) => write!(f, "Permission denied: {code}"),
            AppError::Csrf => write!(f, "Invalid or missing CSRF token"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::Upload(e) => write!(f, "Upload error: {e}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Api(e) if e.is_unauthorized() => StatusCode::SEE_OTHER,
            AppError::Api(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Api(_) => StatusCode::BAD_GATEWAY,
            AppError::PermissionDenied(_) | AppError::Csrf => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Upload(_) => StatusCode::BAD_REQUEST,
            AppError::Template(_) | AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            // The backend no longer accepts the token: start over at the login page.
            AppError::Api(e) if e.is_unauthorized() => HttpResponse::SeeOther()
                .insert_header(("Location", "/login?expired=1"))
                .finish(),
            AppError::NotFound => not_found_page(),
            AppError::Api(e) if e.is_not_found() => not_found_page(),
            AppError::PermissionDenied(code) => {
                log::warn!("Permission denied: {code}");
                HttpResponse::Forbidden()
                    .content_type("text/html; charset=utf-8")
                    .body(include_str!("../templates/errors/403.html"))
            }
            AppError::Csrf => HttpResponse::Forbidden().body("Invalid or missing CSRF token"),
            AppError::Upload(msg) => HttpResponse::BadRequest().body(msg.clone()),
            AppError::Api(e) => {
                log::error!("{self}");
                HttpResponse::BadGateway().body(e.user_message())
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

pub fn not_found_page() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../templates/errors/404.html"))
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        AppError::Api(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

/// Render an askama template into an HTML response.
pub fn render<T: Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    let html = tmpl.render()?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

/// Same as `render` with a different status code.
pub fn render_with_status<T: Template>(status: StatusCode, tmpl: T) -> Result<HttpResponse, AppError> {
    let html = tmpl.render()?;
    Ok(HttpResponse::build(status).content_type("text/html; charset=utf-8").body(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(AppError::Csrf.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
        let expired = AppError::Api(ApiError::Backend { status: 401, message: "jwt expired".into() });
        assert_eq!(expired.status_code(), StatusCode::SEE_OTHER);
        let down = AppError::Api(ApiError::Backend { status: 500, message: String::new() });
        assert_eq!(down.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn expired_token_redirects_to_login() {
        let err = AppError::Api(ApiError::Backend { status: 401, message: String::new() });
        let response = err.error_response();
        assert_eq!(response.headers().get("Location").unwrap(), "/login?expired=1");
    }
}
