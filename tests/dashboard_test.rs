//! Dashboard cards settle independently of each other.

mod common;

use actix_web::http::StatusCode;
use common::*;
use serde_json::json;

#[actix_web::test]
async fn one_failing_collection_only_blanks_its_card() {
    let (backend, mut browser) = signed_in().await;
    backend.seed("students", vec![json!({"_id": "s1", "name": "A"}), json!({"_id": "s2", "name": "B"})]);
    backend.seed(
        "teams",
        vec![
            json!({"_id": "t1", "name": "Red House", "color": "#e53935", "totalPoint": 40}),
            json!({"_id": "t2", "name": "Blue House", "color": "#1e88e5", "totalPoint": 55}),
        ],
    );
    backend.fail("GET", "/gallery", 500, "storage offline");

    let page = browser.get("/dashboard").await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.count(r#"<span class="stat-value">unavailable</span>"#), 1);
    assert_eq!(page.count(r#"<span class="stat-value">2</span>"#), 2, "students and teams");
    assert!(!page.body.contains("storage offline"));

    let blue = page.body.find("Blue House").unwrap();
    let red = page.body.find("Red House").unwrap();
    assert!(blue < red, "standings are ordered by points");
}

#[actix_web::test]
async fn team_standings_degrade_when_teams_fail() {
    let (backend, mut browser) = signed_in().await;
    backend.fail("GET", "/teams", 503, "busy");

    let page = browser.get("/dashboard").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Team standings are unavailable right now."));
}

#[actix_web::test]
async fn sidebar_marks_the_current_section() {
    let (_backend, mut browser) = signed_in().await;
    let page = browser.get("/students").await;
    assert!(page.body.contains(r#"<a href="/students" class="active">Students</a>"#));
    assert!(page.body.contains(r#"<a href="/dashboard">Dashboard</a>"#));
}
