use actix_session::Session;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Wrapper around permission codes with a `has()` method for use in Askama templates.
///
/// A `*` code grants everything.
#[derive(Debug, Clone, Default)]
pub struct Permissions(pub Vec<String>);

impl Permissions {
    pub fn has(&self, code: &str) -> bool {
        self.0.iter().any(|p| p == code || p == "*")
    }

    pub fn from_csv(csv: &str) -> Self {
        let codes = csv
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Permissions(codes)
    }
}

/// One-shot notice shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: String,
    pub message: String,
}

impl Flash {
    pub fn is_error(&self) -> bool {
        self.kind == "error"
    }
}

pub fn get_token(session: &Session) -> Option<String> {
    session.get::<String>("api_token").unwrap_or(None)
}

pub fn get_username(session: &Session) -> Result<String, String> {
    match session.get::<String>("username") {
        Ok(Some(username)) => Ok(username),
        Ok(None) => Err("No username in session".to_string()),
        Err(e) => Err(format!("Session error: {}", e)),
    }
}

pub fn get_permissions(session: &Session) -> Result<Permissions, String> {
    match session.get::<String>("permissions") {
        Ok(Some(csv)) => Ok(Permissions::from_csv(&csv)),
        Ok(None) => Err("No permissions in session".to_string()),
        Err(e) => Err(format!("Session error: {}", e)),
    }
}

fn set_flash(session: &Session, kind: &str, message: impl Into<String>) {
    let flash = Flash { kind: kind.to_string(), message: message.into() };
    if let Err(e) = session.insert("flash", &flash) {
        log::warn!("Failed to store flash message: {e}");
    }
}

pub fn flash_success(session: &Session, message: impl Into<String>) {
    set_flash(session, "success", message);
}

pub fn flash_error(session: &Session, message: impl Into<String>) {
    set_flash(session, "error", message);
}

pub fn take_flash(session: &Session) -> Option<Flash> {
    let flash = session.get::<Flash>("flash").unwrap_or(None);
    if flash.is_some() {
        session.remove("flash");
    }
    flash
}

/// Check permission; returns Err(AppError) if denied.
pub fn require_permission(session: &Session, code: &str) -> Result<(), AppError> {
    let permissions = get_permissions(session)
        .map_err(|e| AppError::Session(format!("Failed to get permissions: {}", e)))?;

    if permissions.has(code) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_grants_everything() {
        let perms = Permissions::from_csv("*");
        assert!(perms.has("students.delete"));
    }

    #[test]
    fn codes_are_exact() {
        let perms = Permissions::from_csv("students.view, teams.view,,");
        assert_eq!(perms.0.len(), 2);
        assert!(perms.has("teams.view"));
        assert!(!perms.has("teams.edit"));
    }
}
