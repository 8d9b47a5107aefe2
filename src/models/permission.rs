use serde::Deserialize;

use crate::api::Resource;

/// Read-only permission lookup; `name` is the permission code (e.g. `students.create`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Permission {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Resource for Permission {
    const PATH: &'static str = "/permissions";
}

/// A checkbox on the role form.
#[derive(Debug, Clone)]
pub struct PermissionCheckbox {
    pub code: String,
    pub group: String,
    pub description: String,
    pub checked: bool,
    /// First checkbox of its group; the form opens a new heading here.
    pub group_start: bool,
}

/// Checkboxes for every known permission, ticked when `granted` holds the code or id.
pub fn checkboxes(all: &[Permission], granted: &[String]) -> Vec<PermissionCheckbox> {
    let mut boxes: Vec<PermissionCheckbox> = all
        .iter()
        .map(|p| PermissionCheckbox {
            code: p.name.clone(),
            group: group_of(&p.name).to_string(),
            description: p.description.clone(),
            checked: granted.iter().any(|g| g == &p.name || g == &p.id),
            group_start: false,
        })
        .collect();
    boxes.sort_by(|a, b| a.code.cmp(&b.code));
    let mut previous = None;
    for b in boxes.iter_mut() {
        b.group_start = previous.as_deref() != Some(b.group.as_str());
        previous = Some(b.group.clone());
    }
    boxes
}

/// Group prefix of a permission code, used for the checkbox fieldsets.
pub fn group_of(code: &str) -> &str {
    code.split_once('.').map(|(group, _)| group).unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perm(id: &str, name: &str) -> Permission {
        Permission { id: id.into(), name: name.into(), description: String::new() }
    }

    #[test]
    fn checked_by_code_or_id() {
        let all = vec![perm("p2", "teams.view"), perm("p1", "students.view"), perm("p3", "users.edit")];
        let boxes = checkboxes(&all, &["students.view".to_string(), "p2".to_string()]);
        let ticked: Vec<&str> = boxes.iter().filter(|b| b.checked).map(|b| b.code.as_str()).collect();
        assert_eq!(ticked, vec!["students.view", "teams.view"]);
    }

    #[test]
    fn groups_by_prefix() {
        assert_eq!(group_of("students.create"), "students");
        assert_eq!(group_of("dashboard"), "dashboard");
    }

    #[test]
    fn first_of_each_group_opens_a_heading() {
        let all = vec![perm("a", "teams.view"), perm("b", "students.view"), perm("c", "students.edit")];
        let starts: Vec<bool> = checkboxes(&all, &[]).iter().map(|b| b.group_start).collect();
        assert_eq!(starts, vec![true, false, true]);
    }
}
