//! Client-side search, dropdown filters and column sort for list pages.

use std::cmp::Ordering;

use serde::Deserialize;

/// Query string shared by every list page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub team: Option<String>,
    pub stage: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

/// Dropdown filters a record can be matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Category,
    Status,
    Team,
    Stage,
}

pub enum SortValue {
    Text(String),
    Number(f64),
}

/// Implemented by every record shown in a filterable table.
pub trait Searchable {
    /// Fields the free-text box searches.
    fn search_fields(&self) -> Vec<&str>;

    /// Value used for a dropdown filter; `None` means the facet does not apply.
    fn facet(&self, _facet: Facet) -> Option<&str> {
        None
    }

    fn sort_value(&self, _column: &str) -> Option<SortValue> {
        None
    }
}

impl ListQuery {
    pub fn search(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or("")
    }

    fn selected(&self, facet: Facet) -> Option<&str> {
        let value = match facet {
            Facet::Category => &self.category,
            Facet::Status => &self.status,
            Facet::Team => &self.team,
            Facet::Stage => &self.stage,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn is_filtered(&self) -> bool {
        !self.search().is_empty()
            || [Facet::Category, Facet::Status, Facet::Team, Facet::Stage]
                .iter()
                .any(|f| self.selected(*f).is_some())
    }

    /// Substring search AND every selected dropdown.
    pub fn matches<T: Searchable>(&self, item: &T) -> bool {
        if !matches_search(&item.search_fields(), self.search()) {
            return false;
        }
        [Facet::Category, Facet::Status, Facet::Team, Facet::Stage]
            .iter()
            .all(|facet| match self.selected(*facet) {
                None => true,
                Some(wanted) => item
                    .facet(*facet)
                    .is_some_and(|have| have.eq_ignore_ascii_case(wanted)),
            })
    }

    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::from_params(self.sort.as_deref(), self.dir.as_deref())
    }

    /// Filter then sort.
    pub fn apply<T: Searchable>(&self, items: Vec<T>) -> Vec<T> {
        let mut kept: Vec<T> = items.into_iter().filter(|item| self.matches(item)).collect();
        self.sort_spec().sort(&mut kept);
        kept
    }
}

/// Case-insensitive substring match over any of the fields. An empty needle matches all.
pub fn matches_search(fields: &[&str], needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SortDir { #[default] Asc, Desc }

#[derive(Debug, Clone, Default)]
pub struct SortSpec {
    pub column: String,
    pub dir: SortDir,
}

impl SortSpec {
    pub fn from_params(sort: Option<&str>, dir: Option<&str>) -> Self {
        SortSpec {
            column: sort.unwrap_or("").to_string(),
            dir: if dir == Some("desc") { SortDir::Desc } else { SortDir::Asc },
        }
    }
    pub fn dir_str(&self) -> &'static str {
        match self.dir { SortDir::Asc => "asc", SortDir::Desc => "desc" }
    }
    pub fn toggle_dir(&self) -> &'static str {
        match self.dir { SortDir::Asc => "desc", SortDir::Desc => "asc" }
    }

    /// Stable sort; records without a value for the column keep their order at the end.
    pub fn sort<T: Searchable>(&self, items: &mut [T]) {
        if self.column.is_empty() {
            return;
        }
        items.sort_by(|a, b| {
            let ordering = match (a.sort_value(&self.column), b.sort_value(&self.column)) {
                (Some(x), Some(y)) => compare_values(&x, &y),
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            match self.dir {
                SortDir::Asc => ordering,
                SortDir::Desc => ordering.reverse(),
            }
        });
    }
}

fn compare_values(a: &SortValue, b: &SortValue) -> Ordering {
    match (a, b) {
        (SortValue::Number(x), SortValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (SortValue::Text(x), SortValue::Text(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
        (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
    }
}

/// One `<option>` of a dropdown.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>, current: &str) -> Self {
        let value = value.into();
        let selected = !current.is_empty() && value == current;
        Self { value, label: label.into(), selected }
    }
}

/// Options whose value and label are the same string.
pub fn plain_options(values: &[&str], current: &str) -> Vec<SelectOption> {
    values.iter().map(|v| SelectOption::new(*v, *v, current)).collect()
}

/// Sorted, de-duplicated non-empty values, for filters over free-text fields.
pub fn distinct_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = values
        .into_iter()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    seen.sort_by_key(|v| v.to_lowercase());
    seen.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
    seen
}
