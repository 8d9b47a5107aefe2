//! Sign-in, sign-out and session expiry against the fake backend.

mod common;

use actix_web::http::StatusCode;
use common::*;

#[actix_web::test]
async fn protected_pages_redirect_to_login() {
    let backend = FakeBackend::start().await;
    let mut browser = Browser::new(console(backend.url.clone()).await);

    let page = browser.get("/students").await;
    assert!(page.redirects_to("/login"));
    assert!(backend.requests().is_empty(), "no backend call before sign-in");
}

#[actix_web::test]
async fn wrong_password_shows_a_generic_message() {
    let backend = FakeBackend::start().await;
    let mut browser = Browser::new(console(backend.url.clone()).await);

    browser.get("/login").await;
    let page = browser.post("/login", &[("username", ADMIN_USER), ("password", "nope")]).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Invalid username or password"));
    assert!(page.body.contains(r#"value="admin""#), "username is kept");
}

#[actix_web::test]
async fn login_stores_the_token_for_later_calls() {
    let backend = FakeBackend::start().await;
    let mut browser = Browser::new(console(backend.url.clone()).await);
    browser.login().await;

    let login = backend.requests().remove(0);
    assert_eq!(login.path, "/auth/login");
    assert_eq!(login.body["username"], "admin");

    backend.clear_log();
    let page = browser.get("/students").await;
    assert_eq!(page.status, StatusCode::OK);
    let calls = backend.requests();
    assert!(!calls.is_empty());
    assert!(calls.iter().all(|c| c.authorization.as_deref() == Some("Bearer test-token")));
}

#[actix_web::test]
async fn login_without_csrf_token_is_rejected() {
    let backend = FakeBackend::start().await;
    let mut browser = Browser::new(console(backend.url.clone()).await);

    browser.get("/login").await;
    let page = browser.post_raw("/login", &[("username", ADMIN_USER), ("password", ADMIN_PASS), ("csrf_token", "forged")]).await;
    assert_eq!(page.status, StatusCode::FORBIDDEN);
    assert!(backend.requests().is_empty());
}

#[actix_web::test]
async fn rejected_token_sends_operator_back_to_login() {
    let (backend, mut browser) = signed_in().await;
    backend.fail("GET", "/students/s1", 401, "jwt expired");

    let page = browser.get("/students/s1/edit").await;
    assert!(page.redirects_to("/login?expired=1"));

    let page = browser.get("/login?expired=1").await;
    assert!(page.body.contains("Your session has expired"));
    let page = browser.get("/dashboard").await;
    assert!(page.redirects_to("/login"), "session was cleared");
}

#[actix_web::test]
async fn list_pages_and_dashboard_do_not_hide_an_expired_token() {
    let (backend, mut browser) = signed_in().await;
    backend.fail("GET", "/teams", 401, "jwt expired");
    let page = browser.get("/teams").await;
    assert!(page.redirects_to("/login?expired=1"));

    let (backend, mut browser) = signed_in().await;
    backend.fail("GET", "/students", 401, "jwt expired");
    let page = browser.get("/dashboard").await;
    assert!(page.redirects_to("/login?expired=1"));
}

#[actix_web::test]
async fn dashboard_notices_expiry_on_any_card() {
    let (backend, mut browser) = signed_in().await;
    backend.fail("GET", "/students", 500, "db down");
    backend.fail("GET", "/downloads", 401, "jwt expired");

    let page = browser.get("/dashboard").await;
    assert!(page.redirects_to("/login?expired=1"));
}

#[actix_web::test]
async fn logout_clears_the_session() {
    let (_backend, mut browser) = signed_in().await;
    browser.get("/dashboard").await;

    let page = browser.post("/logout", &[]).await;
    assert!(page.redirects_to("/login"));
    let page = browser.get("/dashboard").await;
    assert!(page.redirects_to("/login"));
}

#[actix_web::test]
async fn unknown_paths_render_the_not_found_page() {
    let (_backend, mut browser) = signed_in().await;
    let page = browser.get("/no-such-page").await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("404"));
}
