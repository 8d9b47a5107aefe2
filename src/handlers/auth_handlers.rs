use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::auth::csrf;
use crate::auth::session::get_token;
use crate::errors::{AppError, render};
use crate::handlers::helpers::{CsrfOnly, redirect};
use crate::models::common::Ref;
use crate::models::role::Role;
use crate::state::AppState;
use crate::templates_structs::LoginTemplate;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub expired: Option<String>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// `POST /auth/login` response.
#[derive(Debug, Deserialize)]
pub struct SignedIn {
    pub token: String,
    #[serde(default)]
    pub user: SignedInUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignedInUser {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub role: Option<Ref<Role>>,
    pub team: Option<Ref>,
    pub permissions: Vec<String>,
}

impl SignedInUser {
    /// Codes from the user, then from a populated role. An `admin` role with
    /// no codes gets the wildcard.
    pub fn permission_codes(&self) -> Vec<String> {
        if !self.permissions.is_empty() {
            return self.permissions.clone();
        }
        match &self.role {
            Some(Ref::Populated(role)) if !role.permissions.is_empty() => role.permission_codes(),
            Some(Ref::Populated(role)) if role.name.eq_ignore_ascii_case("admin") => vec!["*".to_string()],
            _ => vec![],
        }
    }
}

fn login_page_with(
    session: &Session,
    state: &AppState,
    error: Option<String>,
    notice: Option<String>,
    username: &str,
) -> Result<HttpResponse, AppError> {
    let csrf_token = csrf::get_or_create_token(session);
    render(LoginTemplate {
        error,
        notice,
        app_name: state.app_name.clone(),
        csrf_token,
        username: username.to_string(),
    })
}

pub async fn login_page(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<LoginQuery>,
) -> Result<HttpResponse, AppError> {
    if query.expired.is_some() {
        // purge() would also discard the CSRF token issued below.
        session.clear();
        session.renew();
        return login_page_with(&session, &state, None, Some("Your session has expired. Please sign in again.".to_string()), "");
    }
    // Already signed in
    if get_token(&session).is_some() {
        return Ok(redirect("/dashboard"));
    }
    login_page_with(&session, &state, None, None, "")
}

pub async fn login_submit(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return login_page_with(
            &session,
            &state,
            Some("Username and password are required".to_string()),
            None,
            username,
        );
    }

    let credentials = Credentials { username, password: &form.password };
    let signed_in: SignedIn = match state.api.post("/auth/login", &credentials).await {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Login failed for '{username}': {e}");
            let message = if e.is_unauthorized() || e.status() == Some(400) {
                "Invalid username or password".to_string()
            } else {
                e.user_message()
            };
            return login_page_with(&session, &state, Some(message), None, username);
        }
    };

    let user = &signed_in.user;
    let display_name = if user.username.is_empty() { username.to_string() } else { user.username.clone() };
    let perms_csv = user.permission_codes().join(",");

    // New session id on privilege change
    session.renew();
    session
        .insert("api_token", &signed_in.token)
        .map_err(|e| AppError::Session(format!("Failed to store token: {e}")))?;
    session
        .insert("user_id", &user.id)
        .map_err(|e| AppError::Session(format!("Failed to store user id: {e}")))?;
    session
        .insert("username", &display_name)
        .map_err(|e| AppError::Session(format!("Failed to store username: {e}")))?;
    session
        .insert("permissions", &perms_csv)
        .map_err(|e| AppError::Session(format!("Failed to store permissions: {e}")))?;
    if let Some(team) = &user.team {
        let _ = session.insert("team_id", team.id());
    }

    log::info!("'{display_name}' signed in");
    Ok(redirect("/dashboard"))
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(redirect("/login"))
}
