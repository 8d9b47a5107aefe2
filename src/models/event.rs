use serde::{Deserialize, Serialize};

use crate::api::Resource;
use crate::auth::validate;
use crate::models::listing::{Facet, Searchable, SortValue};
use crate::models::program::date_only;

pub const EVENT_STATUSES: [&str; 4] = ["upcoming", "ongoing", "completed", "cancelled"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub venue: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
}

impl Resource for Event {
    const PATH: &'static str = "/events";
}

impl Searchable for Event {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.venue.as_str(), self.description.as_str()]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(self.status.as_str()),
            _ => None,
        }
    }

    fn sort_value(&self, column: &str) -> Option<SortValue> {
        match column {
            "title" => Some(SortValue::Text(self.title.clone())),
            "date" => Some(SortValue::Text(format!("{} {}", date_only(&self.date), self.start_time))),
            _ => None,
        }
    }
}

pub fn event_status_class(status: &str) -> &'static str {
    match status {
        "upcoming" => "badge-info",
        "ongoing" => "badge-success",
        "cancelled" => "badge-danger",
        _ => "badge-muted",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub title: String,
    pub description: String,
    pub venue: String,
    pub date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl Default for EventForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            venue: String::new(),
            date: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            status: "upcoming".to_string(),
            csrf_token: String::new(),
        }
    }
}

impl From<&Event> for EventForm {
    fn from(e: &Event) -> Self {
        Self {
            title: e.title.clone(),
            description: e.description.clone(),
            venue: e.venue.clone(),
            date: date_only(&e.date).to_string(),
            start_time: e.start_time.clone(),
            end_time: e.end_time.clone(),
            status: e.status.clone(),
            csrf_token: String::new(),
        }
    }
}

impl EventForm {
    pub fn validate(&self) -> Result<EventPayload, Vec<String>> {
        let mut errors = vec![];
        errors.extend(validate::validate_required(&self.title, "Title", 200));
        errors.extend(validate::validate_optional(&self.description, "Description", 2000));
        errors.extend(validate::validate_optional(&self.venue, "Venue", 100));
        errors.extend(validate::validate_one_of(&self.status, "Status", &EVENT_STATUSES));

        let date = match validate::parse_optional_date(&self.date, "Date") {
            Ok(Some(d)) => Some(d),
            Ok(None) => {
                errors.push("Date is required".to_string());
                None
            }
            Err(e) => {
                errors.push(e);
                None
            }
        };
        let start = validate::parse_optional_time(&self.start_time, "Start time")
            .map_err(|e| errors.push(e))
            .ok()
            .flatten();
        let end = validate::parse_optional_time(&self.end_time, "End time")
            .map_err(|e| errors.push(e))
            .ok()
            .flatten();
        errors.extend(validate::validate_time_range(start, end));

        match date {
            Some(date) if errors.is_empty() => Ok(EventPayload {
                title: self.title.trim().to_string(),
                description: self.description.trim().to_string(),
                venue: self.venue.trim().to_string(),
                date: date.format("%Y-%m-%d").to_string(),
                start_time: start.map(|t| t.format("%H:%M").to_string()),
                end_time: end.map(|t| t.format("%H:%M").to_string()),
                status: self.status.trim().to_string(),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventRow {
    pub id: String,
    pub title: String,
    pub venue: String,
    pub date: String,
    pub time: String,
    pub status: String,
    pub status_class: &'static str,
}

impl From<&Event> for EventRow {
    fn from(e: &Event) -> Self {
        let time = match (e.start_time.is_empty(), e.end_time.is_empty()) {
            (false, false) => format!("{}-{}", e.start_time, e.end_time),
            (false, true) => e.start_time.clone(),
            _ => String::new(),
        };
        Self {
            id: e.id.clone(),
            title: e.title.clone(),
            venue: e.venue.clone(),
            date: date_only(&e.date).to_string(),
            time,
            status: e.status.clone(),
            status_class: event_status_class(&e.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> EventForm {
        EventForm { title: "Opening".into(), date: "2025-02-10".into(), ..Default::default() }
    }

    #[test]
    fn end_must_follow_start() {
        let bad = EventForm { start_time: "10:00".into(), end_time: "09:30".into(), ..form() };
        assert_eq!(bad.validate().unwrap_err(), vec!["End time must be after start time".to_string()]);
        let ok = EventForm { start_time: "09:00".into(), end_time: "09:30".into(), ..form() };
        assert_eq!(ok.validate().unwrap().end_time.as_deref(), Some("09:30"));
    }

    #[test]
    fn date_required() {
        let errors = EventForm { date: String::new(), ..form() }.validate().unwrap_err();
        assert_eq!(errors, vec!["Date is required".to_string()]);
    }

    #[test]
    fn status_must_be_known() {
        assert!(EventForm { status: "postponed".into(), ..form() }.validate().is_err());
    }
}
