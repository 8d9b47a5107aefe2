use serde::{Deserialize, Serialize};

use crate::api::Resource;
use crate::auth::validate;
use crate::models::common::Ref;
use crate::models::listing::{Searchable, SelectOption, SortValue};
use crate::models::permission::Permission;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Role {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub permissions: Vec<Ref<Permission>>,
}

impl Resource for Role {
    const PATH: &'static str = "/roles";
    const REPLACE_ON_UPDATE: bool = true;
}

impl Role {
    /// Permission codes, whether the backend sent codes or populated objects.
    pub fn permission_codes(&self) -> Vec<String> {
        self.permissions
            .iter()
            .map(|p| match p {
                Ref::Populated(perm) => perm.name.clone(),
                Ref::Id(code) => code.clone(),
            })
            .collect()
    }
}

impl Searchable for Role {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "name" => Some(SortValue::Text(self.name.clone())),
            "permissions" => Some(SortValue::Number(self.permissions.len() as f64)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RolePayload {
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
}

/// Role form. Checkboxes repeat the `permissions` key, so it is read from
/// raw pairs rather than through `web::Form`.
#[derive(Debug, Clone, Default)]
pub struct RoleForm {
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
    pub csrf_token: String,
}

impl From<&Role> for RoleForm {
    fn from(r: &Role) -> Self {
        Self {
            name: r.name.clone(),
            description: r.description.clone(),
            permissions: r.permission_codes(),
            csrf_token: String::new(),
        }
    }
}

impl RoleForm {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = RoleForm::default();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => form.name = value,
                "description" => form.description = value,
                "permissions" if !value.trim().is_empty() => {
                    if !form.permissions.contains(&value) {
                        form.permissions.push(value);
                    }
                }
                "csrf_token" => form.csrf_token = value,
                _ => {}
            }
        }
        form
    }

    pub fn validate(&self) -> Result<RolePayload, Vec<String>> {
        let mut errors = vec![];
        errors.extend(validate::validate_required(&self.name, "Role name", 50));
        errors.extend(validate::validate_optional(&self.description, "Description", 255));
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(RolePayload {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            permissions: self.permissions.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RoleRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub permission_count: usize,
}

impl From<&Role> for RoleRow {
    fn from(r: &Role) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            description: r.description.clone(),
            permission_count: r.permissions.len(),
        }
    }
}

pub fn options(roles: &[Role], current: &str) -> Vec<SelectOption> {
    roles.iter().map(|r| SelectOption::new(r.id.as_str(), r.name.as_str(), current)).collect()
}
