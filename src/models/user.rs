use serde::{Deserialize, Serialize};

use crate::api::Resource;
use crate::auth::validate;
use crate::models::common::{Ref, default_true};
use crate::models::listing::{Facet, Searchable, SelectOption, SortValue};
use crate::models::role::Role;

/// A console login as the backend lists it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub role: Option<Ref<Role>>,
    pub team: Option<Ref>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Resource for User {
    const PATH: &'static str = "/users";
    const REPLACE_ON_UPDATE: bool = true;
}

impl User {
    pub fn role_id(&self) -> &str {
        match &self.role {
            Some(Ref::Populated(role)) => &role.id,
            Some(Ref::Id(id)) => id,
            None => "",
        }
    }

    pub fn team_id(&self) -> &str {
        self.team.as_ref().map(Ref::id).unwrap_or("")
    }
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.username.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(if self.is_active { "active" } else { "inactive" }),
            Facet::Team => Some(self.team_id()),
            _ => None,
        }
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "username" => Some(SortValue::Text(self.username.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: String,
    pub team: Option<String>,
    pub is_active: bool,
}

/// Form data from create/edit user forms.
#[derive(Debug, Clone, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub team: String,
    pub is_active: Option<String>,
    #[serde(default)]
    pub csrf_token: String,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            role: String::new(),
            team: String::new(),
            is_active: Some("on".to_string()),
            csrf_token: String::new(),
        }
    }
}

impl From<&User> for UserForm {
    fn from(u: &User) -> Self {
        Self {
            username: u.username.clone(),
            password: String::new(),
            role: u.role_id().to_string(),
            team: u.team_id().to_string(),
            is_active: u.is_active.then(|| "on".to_string()),
            csrf_token: String::new(),
        }
    }
}

impl UserForm {
    /// Password is required on create and optional (kept as-is when blank) on edit.
    pub fn validate(&self, require_password: bool) -> Result<UserPayload, Vec<String>> {
        let mut errors = vec![];
        errors.extend(validate::validate_username(&self.username));
        if require_password || !self.password.is_empty() {
            errors.extend(validate::validate_password(&self.password));
        }
        if self.role.trim().is_empty() {
            errors.push("Role is required".to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(UserPayload {
            username: self.username.trim().to_string(),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
            role: self.role.trim().to_string(),
            team: Some(self.team.trim().to_string()).filter(|t| !t.is_empty()),
            is_active: self.is_active.is_some(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub role: String,
    pub team: String,
    pub is_active: bool,
}

pub fn to_rows(users: &[User], roles: &[Role], teams: &[crate::models::team::Team]) -> Vec<UserRow> {
    users
        .iter()
        .map(|u| {
            let role = match &u.role {
                Some(Ref::Populated(role)) => role.name.clone(),
                Some(Ref::Id(id)) => roles
                    .iter()
                    .find(|r| &r.id == id)
                    .map(|r| r.name.clone())
                    .unwrap_or_else(|| id.clone()),
                None => String::new(),
            };
            let team = match &u.team {
                Some(r) => teams
                    .iter()
                    .find(|t| t.id == r.id())
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| r.label().to_string()),
                None => String::new(),
            };
            UserRow {
                id: u.id.clone(),
                username: u.username.clone(),
                role,
                team,
                is_active: u.is_active,
            }
        })
        .collect()
}

/// User dropdown (team logins, judges); the value is the user id.
pub fn options(users: &[User], current: &str) -> Vec<SelectOption> {
    users.iter().map(|u| SelectOption::new(u.id.as_str(), u.username.as_str(), current)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> UserForm {
        UserForm { username: "red_leader".into(), password: "secret1".into(), role: "r1".into(), ..Default::default() }
    }

    #[test]
    fn password_required_on_create_only() {
        let no_password = UserForm { password: String::new(), ..form() };
        assert!(no_password.validate(true).is_err());
        let payload = no_password.validate(false).unwrap();
        assert!(payload.password.is_none());
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("password").is_none());
    }

    #[test]
    fn role_required() {
        let errors = UserForm { role: String::new(), ..form() }.validate(true).unwrap_err();
        assert_eq!(errors, vec!["Role is required".to_string()]);
    }

    #[test]
    fn decodes_populated_role() {
        let u: User = serde_json::from_str(
            r#"{"_id":"u1","username":"judge1","role":{"_id":"r2","name":"Judge","permissions":["results.view"]}}"#,
        )
        .unwrap();
        assert_eq!(u.role_id(), "r2");
        let rows = to_rows(&[u], &[], &[]);
        assert_eq!(rows[0].role, "Judge");
        assert!(rows[0].is_active);
    }

    #[test]
    fn bare_role_resolves_from_role_list() {
        let u = User { id: "u1".into(), username: "x".into(), role: Some(Ref::Id("r1".into())), ..Default::default() };
        let roles = vec![Role { id: "r1".into(), name: "Admin".into(), ..Default::default() }];
        assert_eq!(to_rows(&[u], &roles, &[])[0].role, "Admin");
    }
}
