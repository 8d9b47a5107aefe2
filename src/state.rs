//! Shared state handed to every handler through `web::Data`.

use actix_session::Session;

use crate::api::ApiClient;
use crate::auth::session::get_token;
use crate::errors::AppError;

pub struct AppState {
    /// Unauthenticated client; handlers derive a per-session copy.
    pub api: ApiClient,
    pub app_name: String,
}

impl AppState {
    pub fn new(api: ApiClient, app_name: impl Into<String>) -> Self {
        Self { api, app_name: app_name.into() }
    }

    /// Client carrying the signed-in operator's bearer token.
    pub fn api_for(&self, session: &Session) -> Result<ApiClient, AppError> {
        match get_token(session) {
            Some(token) => Ok(self.api.with_token(&token)),
            None => Err(AppError::Session("No backend token in session".to_string())),
        }
    }
}
