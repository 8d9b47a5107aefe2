use crate::api::ApiError;
use crate::models::common::format_number;
use crate::models::team::{Team, standings};

/// A count card. `count` is `None` when that collection could not be fetched.
#[derive(Debug, Clone)]
pub struct StatCard {
    pub label: &'static str,
    pub url: &'static str,
    pub count: Option<usize>,
}

impl StatCard {
    /// Settle one fetch: a failure is logged and leaves the card unavailable.
    pub fn settle<T>(label: &'static str, url: &'static str, fetched: &Result<Vec<T>, ApiError>) -> Self {
        let count = match fetched {
            Ok(items) => Some(items.len()),
            Err(e) => {
                log::error!("Dashboard: failed to load {label}: {e}");
                None
            }
        };
        Self { label, url, count }
    }

    pub fn display(&self) -> String {
        match self.count {
            Some(n) => n.to_string(),
            None => "unavailable".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TeamStanding {
    pub place: usize,
    pub name: String,
    pub color: String,
    pub points: String,
}

/// Leading teams by published points.
pub fn top_teams(teams: &[Team], limit: usize) -> Vec<TeamStanding> {
    standings(teams)
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, t)| TeamStanding {
            place: i + 1,
            name: t.name.clone(),
            color: t.color.clone(),
            points: format_number(t.total_point.value()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::Points;

    #[test]
    fn failed_fetch_is_unavailable() {
        let ok: Result<Vec<u8>, ApiError> = Ok(vec![1, 2, 3]);
        let failed: Result<Vec<u8>, ApiError> = Err(ApiError::Backend { status: 500, message: "down".into() });
        assert_eq!(StatCard::settle("Students", "/students", &ok).display(), "3");
        assert_eq!(StatCard::settle("News", "/news", &failed).display(), "unavailable");
    }

    #[test]
    fn top_teams_by_points() {
        let team = |name: &str, pts: f64| Team { name: name.into(), total_point: Points::Flat(pts), ..Default::default() };
        let teams = vec![team("Blue", 40.0), team("Red", 75.5), team("Green", 60.0)];
        let top = top_teams(&teams, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "Red");
        assert_eq!(top[0].points, "75.50");
        assert_eq!(top[1].place, 2);
    }
}
