use crate::auth::session::Permissions;

pub struct NavSidebarItem {
    pub label: &'static str,
    pub url: &'static str,
    pub is_active: bool,
}

/// Sidebar entries and the permission each needs to be shown.
const SIDEBAR: [(&str, &str, &str); 15] = [
    ("Dashboard", "/dashboard", ""),
    ("Students", "/students", "students.view"),
    ("Teams", "/teams", "teams.view"),
    ("Programs", "/programs", "programs.view"),
    ("Curbs", "/curbs", "curbs.view"),
    ("Judgments", "/judgments", "judgments.view"),
    ("Results", "/results", "results.view"),
    ("Positions", "/positions", "positions.view"),
    ("Grades", "/grades", "grades.view"),
    ("Events", "/events", "events.view"),
    ("News", "/news", "news.view"),
    ("Gallery", "/gallery", "gallery.view"),
    ("Downloads", "/downloads", "downloads.view"),
    ("Users", "/users", "users.view"),
    ("Roles", "/roles", "roles.view"),
];

fn is_under(current_path: &str, url: &str) -> bool {
    current_path == url
        || current_path
            .strip_prefix(url)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Sidebar entries the current operator may open.
pub fn sidebar(permissions: &Permissions, current_path: &str) -> Vec<NavSidebarItem> {
    SIDEBAR
        .iter()
        .filter(|(_, _, code)| code.is_empty() || permissions.has(code))
        .map(|&(label, url, _)| NavSidebarItem {
            label,
            url,
            is_active: is_under(current_path, url),
        })
        .collect()
}
