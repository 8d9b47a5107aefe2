use std::collections::HashMap;

use serde::Deserialize;

use crate::api::Resource;
use crate::auth::validate;
use crate::models::common::{checkbox, default_true, string_or_number};
use crate::models::gallery::size_label;
use crate::models::listing::{Facet, Searchable, SortValue};

pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DownloadFile {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub file_url: String,
    #[serde(deserialize_with = "string_or_number")]
    pub file_size: String,
    pub file_type: String,
    #[serde(default = "default_true")]
    pub is_public: bool,
    pub download_count: i64,
}

impl Resource for DownloadFile {
    const PATH: &'static str = "/downloads";
}

impl Searchable for DownloadFile {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => Some(self.category.as_str()),
            Facet::Status => Some(if self.is_public { "public" } else { "private" }),
            _ => None,
        }
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "title" => Some(SortValue::Text(self.title.clone())),
            "downloads" => Some(SortValue::Number(self.download_count as f64)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub is_public: Option<String>,
    pub csrf_token: String,
}

impl Default for DownloadForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: String::new(),
            is_public: Some("on".to_string()),
            csrf_token: String::new(),
        }
    }
}

impl From<&DownloadFile> for DownloadForm {
    fn from(d: &DownloadFile) -> Self {
        Self {
            title: d.title.clone(),
            description: d.description.clone(),
            category: d.category.clone(),
            is_public: checkbox(d.is_public),
            csrf_token: String::new(),
        }
    }
}

impl DownloadForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let text = |key: &str| fields.get(key).cloned().unwrap_or_default();
        Self {
            title: text("title"),
            description: text("description"),
            category: text("category"),
            is_public: fields.get("is_public").cloned(),
            csrf_token: text("csrf_token"),
        }
    }

    pub fn validate(&self, has_file: bool, creating: bool) -> Result<Vec<(String, String)>, Vec<String>> {
        let mut errors = vec![];
        errors.extend(validate::validate_required(&self.title, "Title", 200));
        errors.extend(validate::validate_optional(&self.description, "Description", 2000));
        errors.extend(validate::validate_optional(&self.category, "Category", 50));
        if creating && !has_file {
            errors.push("Choose a file to upload".to_string());
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(vec![
            ("title".to_string(), self.title.trim().to_string()),
            ("description".to_string(), self.description.trim().to_string()),
            ("category".to_string(), self.category.trim().to_string()),
            ("isPublic".to_string(), self.is_public.is_some().to_string()),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct DownloadRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub file_url: String,
    pub file_type: String,
    pub size: String,
    pub is_public: bool,
    pub download_count: i64,
}

impl From<&DownloadFile> for DownloadRow {
    fn from(d: &DownloadFile) -> Self {
        Self {
            id: d.id.clone(),
            title: d.title.clone(),
            category: d.category.clone(),
            file_url: d.file_url.clone(),
            file_type: d.file_type.clone(),
            size: size_label(&d.file_size),
            is_public: d.is_public,
            download_count: d.download_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_needs_title_and_file() {
        let errors = DownloadForm::default().validate(false, true).unwrap_err();
        assert_eq!(errors, vec!["Title is required".to_string(), "Choose a file to upload".to_string()]);
    }

    #[test]
    fn private_files_filter_by_status() {
        let d = DownloadFile { is_public: false, ..Default::default() };
        assert_eq!(d.facet(Facet::Status), Some("private"));
    }
}
