//! Curbs: validation, capacity and program membership.

mod common;

use actix_web::http::StatusCode;
use common::*;
use serde_json::json;

fn seed(backend: &FakeBackend) {
    backend.seed(
        "programs",
        vec![
            json!({"_id": "p1", "programCode": "P01", "name": "Speech"}),
            json!({"_id": "p2", "programCode": "P02", "name": "Quiz"}),
            json!({"_id": "p3", "programCode": "P03", "name": "Poem"}),
        ],
    );
    backend.seed(
        "curbs",
        vec![
            json!({"_id": "c1", "name": "Stage A", "maxCountOfProg": 2, "programs": ["p1", "p2"]}),
            json!({"_id": "c2", "name": "Stage B", "maxCountOfProg": "3", "programs": []}),
        ],
    );
}

#[actix_web::test]
async fn invalid_curb_makes_no_backend_request() {
    let (backend, mut browser) = signed_in().await;

    let page = browser.get("/curbs/new").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(backend.requests().is_empty(), "the curb form needs no backend data");

    let page = browser.post("/curbs", &[("name", "  "), ("max_count_of_prog", "0")]).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Curb name is required"));
    assert!(backend.requests().is_empty());
}

#[actix_web::test]
async fn valid_curb_is_created() {
    let (backend, mut browser) = signed_in().await;
    browser.get("/curbs/new").await;

    let page = browser.post("/curbs", &[("name", "Main Hall"), ("max_count_of_prog", "4")]).await;
    assert!(page.redirects_to("/curbs"));
    let sent = backend.mutations();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body["name"], "Main Hall");
    assert_eq!(sent[0].body["maxCountOfProg"], 4);
}

#[actix_web::test]
async fn list_shows_capacity_and_unplaced_programs() {
    let (backend, mut browser) = signed_in().await;
    seed(&backend);

    let page = browser.get("/curbs").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("2 / 2"));
    assert!(page.body.contains("This curb is full."));
    assert!(page.body.contains("P01 - Speech"));
    // Only the unplaced program is offered for adding.
    assert_eq!(page.count(r#"<option value="p3">"#), 1);
    assert_eq!(page.count(r#"<option value="p1">"#), 0);
}

#[actix_web::test]
async fn removing_a_program_patches_the_remaining_list() {
    let (backend, mut browser) = signed_in().await;
    seed(&backend);
    browser.get("/curbs").await;
    backend.clear_log();

    let page = browser.post("/curbs/c1/programs/p1/remove", &[]).await;
    assert!(page.redirects_to("/curbs"));
    let sent = backend.mutations();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, "PATCH");
    assert_eq!(sent[0].path, "/curbs/c1");
    assert_eq!(sent[0].body, json!({"programs": ["p2"]}));

    let page = browser.get("/curbs").await;
    assert!(page.body.contains("1 / 2"));
}

#[actix_web::test]
async fn failed_removal_shows_the_message_and_keeps_the_curb() {
    let (backend, mut browser) = signed_in().await;
    seed(&backend);
    backend.fail("PATCH", "/curbs/c1", 409, "Curb is locked during judging");
    browser.get("/curbs").await;

    let page = browser.post("/curbs/c1/programs/p1/remove", &[]).await;
    assert!(page.redirects_to("/curbs"));

    let page = browser.get("/curbs").await;
    assert!(page.body.contains("Curb is locked during judging"));
    assert!(page.body.contains("2 / 2"), "curb still holds both programs");
    assert_eq!(backend.records("curbs")[0]["programs"], json!(["p1", "p2"]));
}

#[actix_web::test]
async fn full_curb_refuses_another_program_without_a_request() {
    let (backend, mut browser) = signed_in().await;
    seed(&backend);
    browser.get("/curbs").await;
    backend.clear_log();

    let page = browser.post("/curbs/c1/programs", &[("program_id", "p3")]).await;
    assert!(page.redirects_to("/curbs"));
    assert!(backend.mutations().is_empty());

    let page = browser.get("/curbs").await;
    assert!(page.body.contains("already holds its maximum of 2 programs"));
}

#[actix_web::test]
async fn adding_a_program_appends_it() {
    let (backend, mut browser) = signed_in().await;
    seed(&backend);
    browser.get("/curbs").await;
    backend.clear_log();

    let page = browser.post("/curbs/c2/programs", &[("program_id", "p3")]).await;
    assert!(page.redirects_to("/curbs"));
    let sent = backend.mutations();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, json!({"programs": ["p3"]}));
}
