//! Shapes shared by several backend records.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Summary of a referenced record when the backend populates it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Linked {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(deserialize_with = "string_or_number")]
    pub chest_no: String,
    pub color: String,
    pub program_code: String,
    pub category: String,
}

/// A reference that is either populated or a bare id.
///
/// Team leaders are sometimes free text; that text lands in `Id` too.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Ref<T = Linked> {
    Populated(T),
    Id(String),
}

impl Ref<Linked> {
    pub fn id(&self) -> &str {
        match self {
            Ref::Populated(linked) => &linked.id,
            Ref::Id(id) => id,
        }
    }

    /// Display name: the populated name, or the raw value otherwise.
    pub fn label(&self) -> &str {
        match self {
            Ref::Populated(linked) if !linked.name.is_empty() => &linked.name,
            Ref::Populated(linked) if !linked.username.is_empty() => &linked.username,
            Ref::Populated(linked) => &linked.id,
            Ref::Id(id) => id,
        }
    }

    pub fn populated(&self) -> Option<&Linked> {
        match self {
            Ref::Populated(linked) => Some(linked),
            Ref::Id(_) => None,
        }
    }
}

/// `totalPoint` arrives as a number or as `{ "published": n }`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Points {
    Flat(f64),
    Published {
        #[serde(default)]
        published: f64,
    },
}

impl Default for Points {
    fn default() -> Self {
        Points::Flat(0.0)
    }
}

impl Points {
    pub fn value(&self) -> f64 {
        match self {
            Points::Flat(v) => *v,
            Points::Published { published } => *published,
        }
    }
}

/// Accept strings, numbers or null for fields like `chestNo` and `class`.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Int(i)) => i.to_string(),
        Some(Raw::Float(f)) => format_number(f),
        None => String::new(),
    })
}

/// Accept a list of references, a single reference, or null.
pub fn refs_lenient<'de, D>(deserializer: D) -> Result<Vec<Ref>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Many(Vec<Ref>),
        One(Ref),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Many(refs)) => refs,
        Some(Raw::One(Ref::Id(text))) if text.trim().is_empty() => vec![],
        Some(Raw::One(single)) => vec![single],
        None => vec![],
    })
}

/// Keep a populated object; bare ids and other shapes become `None`.
pub fn populated_only<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<V> {
        Populated(V),
        Other(IgnoredAny),
    }

    Ok(match Option::<Raw<T>>::deserialize(deserializer)? {
        Some(Raw::Populated(value)) => Some(value),
        Some(Raw::Other(_)) | None => None,
    })
}

pub fn default_true() -> bool {
    true
}

/// Whole numbers print without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

/// Human-readable byte count.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

/// Split a comma-separated input into trimmed, non-empty items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Tags arrive as a list or as one comma-separated string.
pub fn tags_lenient<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Many(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Many(tags)) => tags.into_iter().filter(|t| !t.trim().is_empty()).collect(),
        Some(Raw::Joined(joined)) => split_list(&joined),
        None => vec![],
    })
}

/// Uploaded file metadata; older records store only the URL.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StoredFile {
    Meta {
        #[serde(default, alias = "path")]
        url: String,
        #[serde(default, alias = "originalName")]
        filename: String,
    },
    Url(String),
}

impl StoredFile {
    pub fn url(&self) -> &str {
        match self {
            StoredFile::Meta { url, .. } => url,
            StoredFile::Url(url) => url,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            StoredFile::Meta { filename, url } if filename.is_empty() => url.rsplit('/').next().unwrap_or(url),
            StoredFile::Meta { filename, .. } => filename,
            StoredFile::Url(url) => url.rsplit('/').next().unwrap_or(url),
        }
    }
}

/// Checkbox value as the form posts it.
pub fn checkbox(on: bool) -> Option<String> {
    on.then(|| "on".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        team: Ref,
        #[serde(default)]
        points: Points,
        #[serde(default, deserialize_with = "string_or_number")]
        chest: String,
        #[serde(default, deserialize_with = "refs_lenient")]
        helpers: Vec<Ref>,
    }

    #[test]
    fn ref_accepts_object_or_id() {
        let populated: Holder = serde_json::from_str(r#"{"team":{"_id":"t1","name":"Red"}}"#).unwrap();
        assert_eq!(populated.team.id(), "t1");
        assert_eq!(populated.team.label(), "Red");
        assert!(populated.team.populated().is_some());

        let bare: Holder = serde_json::from_str(r#"{"team":"t2"}"#).unwrap();
        assert_eq!(bare.team.id(), "t2");
        assert_eq!(bare.team.label(), "t2");
    }

    #[test]
    fn points_accept_number_or_published_object() {
        let flat: Holder = serde_json::from_str(r#"{"team":"t","points":12.5}"#).unwrap();
        assert_eq!(flat.points.value(), 12.5);
        let nested: Holder = serde_json::from_str(r#"{"team":"t","points":{"published":40}}"#).unwrap();
        assert_eq!(nested.points.value(), 40.0);
        let missing: Holder = serde_json::from_str(r#"{"team":"t"}"#).unwrap();
        assert_eq!(missing.points.value(), 0.0);
    }

    #[test]
    fn chest_numbers_may_be_numeric() {
        let h: Holder = serde_json::from_str(r#"{"team":"t","chest":104}"#).unwrap();
        assert_eq!(h.chest, "104");
        let h: Holder = serde_json::from_str(r#"{"team":"t","chest":null}"#).unwrap();
        assert_eq!(h.chest, "");
    }

    #[test]
    fn reference_lists_accept_single_values() {
        let h: Holder = serde_json::from_str(r#"{"team":"t","helpers":["s1",{"_id":"s2","name":"Bilal"}]}"#).unwrap();
        assert_eq!(h.helpers.len(), 2);
        assert_eq!(h.helpers[1].label(), "Bilal");
        let h: Holder = serde_json::from_str(r#"{"team":"t","helpers":"Ustad Rafi"}"#).unwrap();
        assert_eq!(h.helpers, vec![Ref::Id("Ustad Rafi".into())]);
        let h: Holder = serde_json::from_str(r#"{"team":"t","helpers":null}"#).unwrap();
        assert!(h.helpers.is_empty());
    }

    #[test]
    fn number_and_size_formatting() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(7.25), "7.25");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn split_list_trims_and_drops_blanks() {
        assert_eq!(split_list(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(split_list("  ").is_empty());
    }

    #[test]
    fn tags_accept_list_or_joined_string() {
        #[derive(Deserialize)]
        struct Tagged {
            #[serde(default, deserialize_with = "tags_lenient")]
            tags: Vec<String>,
        }
        let t: Tagged = serde_json::from_str(r#"{"tags":["stage","day1"]}"#).unwrap();
        assert_eq!(t.tags, vec!["stage", "day1"]);
        let t: Tagged = serde_json::from_str(r#"{"tags":"stage, day1"}"#).unwrap();
        assert_eq!(t.tags, vec!["stage", "day1"]);
        let t: Tagged = serde_json::from_str(r#"{}"#).unwrap();
        assert!(t.tags.is_empty());
    }

    #[test]
    fn stored_file_names() {
        let meta: StoredFile = serde_json::from_str(r#"{"url":"/uploads/a/poster.png","size":12}"#).unwrap();
        assert_eq!(meta.name(), "poster.png");
        let bare: StoredFile = serde_json::from_str(r#""/uploads/b/cover.jpg""#).unwrap();
        assert_eq!(bare.url(), "/uploads/b/cover.jpg");
        assert_eq!(bare.name(), "cover.jpg");
    }
}
