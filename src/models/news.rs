use std::collections::HashMap;

use serde::Deserialize;

use crate::api::Resource;
use crate::auth::validate;
use crate::models::common::{StoredFile, checkbox, split_list, tags_lenient};
use crate::models::listing::{Facet, Searchable, SortValue};
use crate::models::program::date_only;

pub const NEWS_STATUSES: [&str; 3] = ["draft", "published", "archived"];

/// Multipart field carrying the featured image.
pub const IMAGE_FIELD: &str = "featuredImage";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct News {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(deserialize_with = "tags_lenient")]
    pub tags: Vec<String>,
    pub status: String,
    pub featured_image: Option<StoredFile>,
    pub is_featured: bool,
    pub created_at: String,
}

impl Resource for News {
    const PATH: &'static str = "/news";
}

impl Searchable for News {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.category.as_str()];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Category => Some(self.category.as_str()),
            Facet::Status => Some(self.status.as_str()),
            _ => None,
        }
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "title" => Some(SortValue::Text(self.title.clone())),
            "created" => Some(SortValue::Text(self.created_at.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewsForm {
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: String,
    pub status: String,
    pub is_featured: Option<String>,
    pub csrf_token: String,
}

impl Default for NewsForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            category: String::new(),
            tags: String::new(),
            status: "draft".to_string(),
            is_featured: None,
            csrf_token: String::new(),
        }
    }
}

impl From<&News> for NewsForm {
    fn from(n: &News) -> Self {
        Self {
            title: n.title.clone(),
            content: n.content.clone(),
            category: n.category.clone(),
            tags: n.tags.join(", "),
            status: n.status.clone(),
            is_featured: checkbox(n.is_featured),
            csrf_token: String::new(),
        }
    }
}

impl NewsForm {
    /// Build from the text parts of a multipart upload.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let text = |key: &str| fields.get(key).cloned().unwrap_or_default();
        Self {
            title: text("title"),
            content: text("content"),
            category: text("category"),
            tags: text("tags"),
            status: text("status"),
            is_featured: fields.get("is_featured").cloned(),
            csrf_token: text("csrf_token"),
        }
    }

    /// Multipart text fields for the backend.
    pub fn validate(&self) -> Result<Vec<(String, String)>, Vec<String>> {
        let mut errors = vec![];
        errors.extend(validate::validate_required(&self.title, "Title", 200));
        errors.extend(validate::validate_required(&self.content, "Content", 20_000));
        errors.extend(validate::validate_optional(&self.category, "Category", 50));
        errors.extend(validate::validate_one_of(&self.status, "Status", &NEWS_STATUSES));
        if !errors.is_empty() {
            return Err(errors);
        }
        let mut fields = vec![
            ("title".to_string(), self.title.trim().to_string()),
            ("content".to_string(), self.content.trim().to_string()),
            ("category".to_string(), self.category.trim().to_string()),
            ("status".to_string(), self.status.trim().to_string()),
            ("isFeatured".to_string(), self.is_featured.is_some().to_string()),
        ];
        fields.extend(split_list(&self.tags).into_iter().map(|t| ("tags".to_string(), t)));
        Ok(fields)
    }
}

#[derive(Debug, Clone)]
pub struct NewsRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub tags: String,
    pub status: String,
    pub status_class: &'static str,
    pub image_url: String,
    pub is_featured: bool,
    pub created: String,
}

pub fn news_status_class(status: &str) -> &'static str {
    match status {
        "published" => "badge-success",
        "archived" => "badge-muted",
        _ => "badge-warning",
    }
}

impl From<&News> for NewsRow {
    fn from(n: &News) -> Self {
        Self {
            id: n.id.clone(),
            title: n.title.clone(),
            category: n.category.clone(),
            tags: n.tags.join(", "),
            status: n.status.clone(),
            status_class: news_status_class(&n.status),
            image_url: n.featured_image.as_ref().map(|f| f.url().to_string()).unwrap_or_default(),
            is_featured: n.is_featured,
            created: date_only(&n.created_at).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn tags_become_repeated_fields() {
        let form = NewsForm::from_fields(&fields(&[
            ("title", "Day one"),
            ("content", "Results are out"),
            ("status", "published"),
            ("tags", "results, day1"),
            ("is_featured", "on"),
        ]));
        let sent = form.validate().unwrap();
        let tags: Vec<&str> = sent.iter().filter(|(k, _)| k == "tags").map(|(_, v)| v.as_str()).collect();
        assert_eq!(tags, vec!["results", "day1"]);
        assert!(sent.contains(&("isFeatured".to_string(), "true".to_string())));
    }

    #[test]
    fn unknown_status_rejected() {
        let form = NewsForm { title: "x".into(), content: "y".into(), status: "live".into(), ..Default::default() };
        assert_eq!(form.validate().unwrap_err().len(), 1);
    }

    #[test]
    fn decodes_featured_image_shapes() {
        let n: News = serde_json::from_str(
            r#"{"_id":"n1","title":"T","tags":"a,b","featuredImage":{"url":"/u/x.png","filename":"x.png"},"createdAt":"2025-01-05T10:00:00Z"}"#,
        )
        .unwrap();
        let row = NewsRow::from(&n);
        assert_eq!(row.image_url, "/u/x.png");
        assert_eq!(row.tags, "a, b");
        assert_eq!(row.created, "2025-01-05");
    }
}
