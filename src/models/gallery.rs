use std::collections::HashMap;

use serde::Deserialize;

use crate::api::Resource;
use crate::auth::validate;
use crate::models::common::{checkbox, default_true, format_file_size, split_list, string_or_number, tags_lenient};
use crate::models::listing::{Facet, Searchable, SortValue};

/// Multipart field carrying the media file.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(deserialize_with = "tags_lenient")]
    pub tags: Vec<String>,
    pub file_url: String,
    #[serde(deserialize_with = "string_or_number")]
    pub file_size: String,
    pub file_type: String,
    #[serde(default = "default_true")]
    pub is_visible: bool,
}

impl Resource for GalleryItem {
    const PATH: &'static str = "/gallery";
}

impl GalleryItem {
    pub fn is_image(&self) -> bool {
        self.file_type.starts_with("image/")
    }
}

impl Searchable for GalleryItem {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.description.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => Some(self.category.as_str()),
            Facet::Status => Some(if self.is_visible { "visible" } else { "hidden" }),
            _ => None,
        }
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "title" => Some(SortValue::Text(self.title.clone())),
            "size" => self.file_size.parse().ok().map(SortValue::Number),
            _ => None,
        }
    }
}

/// Size column text; blank when the backend did not record one.
pub fn size_label(raw: &str) -> String {
    raw.trim().parse::<f64>().map(|b| format_file_size(b as u64)).unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct GalleryForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: String,
    pub is_visible: Option<String>,
    pub csrf_token: String,
}

impl Default for GalleryForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: String::new(),
            tags: String::new(),
            is_visible: Some("on".to_string()),
            csrf_token: String::new(),
        }
    }
}

impl From<&GalleryItem> for GalleryForm {
    fn from(g: &GalleryItem) -> Self {
        Self {
            title: g.title.clone(),
            description: g.description.clone(),
            category: g.category.clone(),
            tags: g.tags.join(", "),
            is_visible: checkbox(g.is_visible),
            csrf_token: String::new(),
        }
    }
}

impl GalleryForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let text = |key: &str| fields.get(key).cloned().unwrap_or_default();
        Self {
            title: text("title"),
            description: text("description"),
            category: text("category"),
            tags: text("tags"),
            is_visible: fields.get("is_visible").cloned(),
            csrf_token: text("csrf_token"),
        }
    }

    /// `has_file` is whether the upload carried a file; required when creating.
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
        let mut fields = vec![
            ("title".to_string(), self.title.trim().to_string()),
            ("description".to_string(), self.description.trim().to_string()),
            ("category".to_string(), self.category.trim().to_string()),
            ("isVisible".to_string(), self.is_visible.is_some().to_string()),
        ];
        fields.extend(split_list(&self.tags).into_iter().map(|t| ("tags".to_string(), t)));
        Ok(fields)
    }
}

#[derive(Debug, Clone)]
pub struct GalleryRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub tags: String,
    pub file_url: String,
    pub is_image: bool,
    pub file_type: String,
    pub size: String,
    pub is_visible: bool,
}

impl From<&GalleryItem> for GalleryRow {
    fn from(g: &GalleryItem) -> Self {
        Self {
            id: g.id.clone(),
            title: g.title.clone(),
            category: g.category.clone(),
            tags: g.tags.join(", "),
            file_url: g.file_url.clone(),
            is_image: g.is_image(),
            file_type: g.file_type.clone(),
            size: size_label(&g.file_size),
            is_visible: g.is_visible,
        }
    }
}
