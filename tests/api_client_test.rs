//! The backend client against a live fake backend.

mod common;

use std::time::Duration;

use artfest::api::{ApiClient, GENERIC_FAILURE};
use artfest::models::student::Student;
use artfest::models::team::Team;
use common::*;
use serde_json::{Value, json};

fn client(backend: &FakeBackend) -> ApiClient {
    ApiClient::new(&backend.url, Duration::from_secs(5))
        .unwrap()
        .with_token(TOKEN)
}

#[actix_web::test]
async fn token_travels_as_a_bearer_header() {
    let backend = FakeBackend::start().await;
    backend.seed("teams", vec![json!({"_id": "t1", "name": "Red House"})]);
    let api = client(&backend);

    let teams: Vec<Team> = api.find_all().await.unwrap();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0].name, "Red House");

    let sent = backend.requests();
    assert_eq!(sent.last().unwrap().authorization.as_deref(), Some("Bearer test-token"));
}

#[actix_web::test]
async fn wrapped_and_bare_bodies_both_decode() {
    let backend = FakeBackend::start().await;
    backend.seed(
        "participations",
        vec![json!({"_id": "e1", "program": "p1"}), json!({"_id": "e2", "program": "p2"})],
    );
    let api = client(&backend);

    // `/participations` answers `{ "data": [...] }`, `/results` a bare array.
    let wrapped: Vec<Value> = api.list("/participations").await.unwrap();
    let bare: Vec<Value> = api.list("/results").await.unwrap();
    assert_eq!(wrapped.len(), 2);
    assert_eq!(wrapped, bare);
}

#[actix_web::test]
async fn numeric_chest_numbers_are_read_as_text() {
    let backend = FakeBackend::start().await;
    backend.seed("students", vec![json!({"_id": "s1", "name": "Ali Akbar", "chestNo": 101, "class": 7})]);
    let api = client(&backend);

    let student: Student = api.find("s1").await.unwrap();
    assert_eq!(student.chest_no, "101");
    assert_eq!(student.class_name, "7");
}

#[actix_web::test]
async fn backend_message_reaches_the_operator() {
    let backend = FakeBackend::start().await;
    backend.fail("POST", "/teams", 400, "Team name already exists");
    let api = client(&backend);

    let err = api.post::<_, Value>("/teams", &json!({"name": "Red House"})).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.user_message(), "Team name already exists");
    assert!(!err.is_unauthorized());
}

#[actix_web::test]
async fn missing_record_is_not_found() {
    let backend = FakeBackend::start().await;
    let api = client(&backend);

    let err = api.find::<Team>("t9").await.unwrap_err();
    assert!(err.is_not_found());
}

#[actix_web::test]
async fn missing_token_is_unauthorized() {
    let backend = FakeBackend::start().await;
    let api = ApiClient::new(&backend.url, Duration::from_secs(5)).unwrap();

    let err = api.find_all::<Team>().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Token expired");
}

#[actix_web::test]
async fn unreachable_backend_falls_back_to_the_generic_message() {
    let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

    let err = api.find_all::<Team>().await.unwrap_err();
    assert_eq!(err.status(), None);
    assert_eq!(err.user_message(), GENERIC_FAILURE);
}

#[actix_web::test]
async fn delete_accepts_an_empty_success() {
    let backend = FakeBackend::start().await;
    backend.seed("teams", vec![json!({"_id": "t1", "name": "Red House"})]);
    let api = client(&backend);

    api.remove::<Team>("t1").await.unwrap();
    assert!(backend.records("teams").is_empty());
}

#[actix_web::test]
async fn download_keeps_the_raw_bytes() {
    let backend = FakeBackend::start().await;
    let api = client(&backend);

    let file = api.download("/results/export/p1").await.unwrap();
    assert!(file.content_type.starts_with("text/csv"));
    assert_eq!(file.bytes, b"position,candidate,team\n1,p1-winner,Red\n");
}
