use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::{Local, Timelike};

use crate::api::ApiError;
use crate::errors::{AppError, render};
use crate::models::dashboard::{StatCard, top_teams};
use crate::models::download::DownloadFile;
use crate::models::event::Event;
use crate::models::gallery::GalleryItem;
use crate::models::news::News;
use crate::models::program::Program;
use crate::models::student::Student;
use crate::models::team::Team;
use crate::models::user::User;
use crate::state::AppState;
use crate::templates_structs::{DashboardTemplate, PageContext};

fn time_greeting(username: &str) -> String {
    let hour = Local::now().hour();
    let period = match hour {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    };
    format!("{}, {}", period, username)
}

/// An expired token ends the request; any other failure stays with its card.
fn unless_expired<T>(fetched: Result<T, ApiError>) -> Result<Result<T, ApiError>, AppError> {
    match fetched {
        Err(e) if e.is_unauthorized() => Err(e.into()),
        other => Ok(other),
    }
}

/// GET /dashboard
/// Eight collection fetches run together; each card settles on its own.
pub async fn index(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let api = state.api_for(&session)?;

    let (students, teams, programs, users, events, news, gallery, downloads) = futures::join!(
        api.find_all::<Student>(),
        api.find_all::<Team>(),
        api.find_all::<Program>(),
        api.find_all::<User>(),
        api.find_all::<Event>(),
        api.find_all::<News>(),
        api.find_all::<GalleryItem>(),
        api.find_all::<DownloadFile>(),
    );
    let students = unless_expired(students)?;
    let teams = unless_expired(teams)?;
    let programs = unless_expired(programs)?;
    let users = unless_expired(users)?;
    let events = unless_expired(events)?;
    let news = unless_expired(news)?;
    let gallery = unless_expired(gallery)?;
    let downloads = unless_expired(downloads)?;

    let cards = vec![
        StatCard::settle("Students", "/students", &students),
        StatCard::settle("Teams", "/teams", &teams),
        StatCard::settle("Programs", "/programs", &programs),
        StatCard::settle("Users", "/users", &users),
        StatCard::settle("Events", "/events", &events),
        StatCard::settle("News", "/news", &news),
        StatCard::settle("Gallery", "/gallery", &gallery),
        StatCard::settle("Downloads", "/downloads", &downloads),
    ];

    let (top_teams, teams_available) = match &teams {
        Ok(teams) => (top_teams(teams, 5), true),
        Err(_) => (vec![], false),
    };

    let ctx = PageContext::build(&session, &state, "/dashboard")?;
    let greeting = time_greeting(&ctx.username);
    render(DashboardTemplate { ctx, greeting, cards, top_teams, teams_available })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_an_expired_token_escapes_a_card() {
        let down: Result<Vec<u8>, _> = Err(ApiError::Backend { status: 500, message: "db down".into() });
        assert!(matches!(unless_expired(down), Ok(Err(_))));

        let expired: Result<Vec<u8>, _> = Err(ApiError::Backend { status: 401, message: "jwt expired".into() });
        assert!(matches!(unless_expired(expired), Err(AppError::Api(ref e)) if e.is_unauthorized()));
    }
}
