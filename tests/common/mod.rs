//! Shared test infrastructure for the console's HTTP tests.
//!
//! - `FakeBackend` - an in-memory stand-in for the REST backend, served on a
//!   random local port, that records every request it receives
//! - `Browser` - the console app under `actix_web::test`, carrying the
//!   session cookie and CSRF token between requests like a real browser

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_http::Request;
use actix_multipart::Multipart;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::error::PayloadError;
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, test, web};
use futures::StreamExt;
use regex::Regex;
use serde_json::{Value, json};

use artfest::api::ApiClient;
use artfest::errors::not_found_page;
use artfest::handlers;
use artfest::state::AppState;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "admin123";
pub const TOKEN: &str = "test-token";

// ============================================================================
// FAKE BACKEND
// ============================================================================

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Logged {
    pub method: String,
    pub path: String,
    pub body: Value,
    pub authorization: Option<String>,
}

impl Logged {
    pub fn is_mutation(&self) -> bool {
        self.method != "GET"
    }
}

#[derive(Default)]
struct Store {
    collections: HashMap<String, Vec<Value>>,
    log: Vec<Logged>,
    failures: HashMap<(String, String), (u16, String)>,
    next_id: u64,
}

impl Store {
    fn collection(&mut self, name: &str) -> &mut Vec<Value> {
        self.collections.entry(name.to_string()).or_default()
    }
}

pub struct FakeBackend {
    pub url: String,
    store: Arc<Mutex<Store>>,
}

impl FakeBackend {
    /// Serve on 127.0.0.1 with a random port. Must be called inside an actix runtime.
    pub async fn start() -> Self {
        let store = Arc::new(Mutex::new(Store::default()));
        let data = web::Data::from(store.clone());
        let server = HttpServer::new(move || App::new().app_data(data.clone()).default_service(web::to(respond)))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .expect("Failed to bind fake backend");
        let addr = server.addrs()[0];
        actix_rt::spawn(server.run());
        Self { url: format!("http://{addr}"), store }
    }

    pub fn seed(&self, collection: &str, records: Vec<Value>) {
        let mut store = self.store.lock().unwrap();
        store.collection(collection).extend(records);
    }

    pub fn records(&self, collection: &str) -> Vec<Value> {
        let mut store = self.store.lock().unwrap();
        store.collection(collection).clone()
    }

    /// Answer `method path` with an error status and `{ "message": ... }` until cleared.
    pub fn fail(&self, method: &str, path: &str, status: u16, message: &str) {
        let mut store = self.store.lock().unwrap();
        store.failures.insert((method.to_string(), path.to_string()), (status, message.to_string()));
    }

    pub fn clear_failures(&self) {
        self.store.lock().unwrap().failures.clear();
    }

    pub fn requests(&self) -> Vec<Logged> {
        self.store.lock().unwrap().log.clone()
    }

    pub fn clear_log(&self) {
        self.store.lock().unwrap().log.clear();
    }

    pub fn mutations(&self) -> Vec<Logged> {
        self.requests().into_iter().filter(Logged::is_mutation).collect()
    }
}

fn message(status: StatusCode, text: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "message": text }))
}

fn merge(record: &mut Value, patch: &Value) {
    if let (Some(target), Some(fields)) = (record.as_object_mut(), patch.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn refers_to(value: Option<&Value>, id: &str) -> bool {
    match value {
        Some(Value::String(s)) => s == id,
        Some(Value::Object(o)) => o.get("_id").and_then(Value::as_str) == Some(id),
        _ => false,
    }
}

/// Decode a multipart body the way the backend's upload middleware would:
/// text parts become strings (`"true"`/`"false"` become booleans, repeated
/// names become arrays) and a file part becomes its metadata. A part named
/// `file` also fills `fileUrl`/`fileSize`/`fileType`.
async fn multipart_body(req: &HttpRequest, body: web::Bytes) -> Value {
    let stream = futures::stream::once(async move { Ok::<_, PayloadError>(body) });
    let mut parts = Multipart::new(req.headers(), stream);
    let mut fields = serde_json::Map::new();

    while let Some(Ok(mut part)) = parts.next().await {
        let name = part.name().unwrap_or_default().to_string();
        let filename = part
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = part.content_type().map(|m| m.to_string()).unwrap_or_default();
        let mut bytes = Vec::new();
        while let Some(Ok(chunk)) = part.next().await {
            bytes.extend_from_slice(&chunk);
        }

        let value = match filename {
            Some(filename) => {
                let url = format!("/uploads/{filename}");
                if name == "file" {
                    fields.insert("fileUrl".into(), json!(url));
                    fields.insert("fileSize".into(), json!(bytes.len()));
                    fields.insert("fileType".into(), json!(content_type));
                }
                json!({ "url": url, "filename": filename, "contentType": content_type, "size": bytes.len() })
            }
            None => match String::from_utf8_lossy(&bytes).as_ref() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                text => Value::String(text.to_string()),
            },
        };
        match fields.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = json!([first, value]);
            }
            None => {
                fields.insert(name, value);
            }
        }
    }
    Value::Object(fields)
}

async fn respond(req: HttpRequest, body: web::Bytes, store: web::Data<Mutex<Store>>) -> HttpResponse {
    let method = req.method().as_str().to_string();
    let path = req.path().to_string();
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));
    let payload: Value = if is_multipart {
        multipart_body(&req, body).await
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let mut store = store.lock().unwrap();
    store.log.push(Logged {
        method: method.clone(),
        path: path.clone(),
        body: payload.clone(),
        authorization: authorization.clone(),
    });

    if let Some((status, text)) = store.failures.get(&(method.clone(), path.clone())) {
        let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return message(status, text);
    }

    if path == "/auth/login" {
        let username = payload["username"].as_str().unwrap_or_default();
        let password = payload["password"].as_str().unwrap_or_default();
        if username == ADMIN_USER && password == ADMIN_PASS {
            return HttpResponse::Ok().json(json!({
                "token": TOKEN,
                "user": {
                    "_id": "u-admin",
                    "username": ADMIN_USER,
                    "role": { "_id": "r-admin", "name": "Admin" }
                }
            }));
        }
        return message(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    let expected = format!("Bearer {TOKEN}");
    if authorization.as_deref() != Some(expected.as_str()) {
        return message(StatusCode::UNAUTHORIZED, "Token expired");
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("GET", ["results", "export", id]) => HttpResponse::Ok()
            .content_type("text/csv")
            .body(format!("position,candidate,team\n1,{id}-winner,Red\n")),
        ("GET", ["results", "program", id]) => {
            let results: Vec<Value> = store
                .collection("participations")
                .iter()
                .filter(|p| refers_to(p.get("program"), id))
                .cloned()
                .collect();
            HttpResponse::Ok().json(json!({ "data": results }))
        }
        ("GET", ["results"]) => HttpResponse::Ok().json(store.collection("participations").clone()),
        ("POST", ["programs", "bulk_result"]) => {
            let ids: Vec<String> = payload["programIds"]
                .as_array()
                .map(|ids| ids.iter().filter_map(Value::as_str).map(String::from).collect())
                .unwrap_or_default();
            let programs = store.collection("programs").clone();
            let participations = store.collection("participations").clone();
            let bundles: Vec<Value> = ids
                .iter()
                .filter_map(|id| programs.iter().find(|p| p["_id"] == id.as_str()))
                .map(|program| {
                    let id = program["_id"].as_str().unwrap_or_default();
                    let entries: Vec<&Value> =
                        participations.iter().filter(|p| refers_to(p.get("program"), id)).collect();
                    json!({ "program": program, "participations": entries })
                })
                .collect();
            HttpResponse::Ok().json(json!({ "data": bundles }))
        }
        ("PATCH", ["programs", "change_result_status", id]) => {
            let programs = store.collection("programs");
            match programs.iter_mut().find(|p| p["_id"] == *id) {
                Some(program) => {
                    merge(program, &payload);
                    HttpResponse::Ok().json(program.clone())
                }
                None => message(StatusCode::NOT_FOUND, "Program not found"),
            }
        }
        ("GET", [collection]) => HttpResponse::Ok().json(json!({ "data": store.collection(collection).clone() })),
        ("GET", [collection, id]) => match store.collection(collection).iter().find(|r| r["_id"] == *id) {
            Some(record) => HttpResponse::Ok().json(json!({ "data": record })),
            None => message(StatusCode::NOT_FOUND, "Record not found"),
        },
        ("POST", [collection]) => {
            store.next_id += 1;
            let mut record = if payload.is_object() { payload.clone() } else { json!({}) };
            record["_id"] = json!(format!("{collection}-{}", store.next_id));
            store.collection(collection).push(record.clone());
            HttpResponse::Created().json(json!({ "data": record }))
        }
        ("PUT" | "PATCH", [collection, id]) => match store.collection(collection).iter_mut().find(|r| r["_id"] == *id) {
            Some(record) => {
                merge(record, &payload);
                HttpResponse::Ok().json(json!({ "data": record.clone() }))
            }
            None => message(StatusCode::NOT_FOUND, "Record not found"),
        },
        ("DELETE", [collection, id]) => {
            let records = store.collection(collection);
            let before = records.len();
            records.retain(|r| r["_id"] != *id);
            if records.len() == before {
                message(StatusCode::NOT_FOUND, "Record not found")
            } else {
                HttpResponse::NoContent().finish()
            }
        }
        _ => message(StatusCode::NOT_FOUND, "No such route"),
    }
}

// ============================================================================
// CONSOLE UNDER TEST
// ============================================================================

/// The console wired the way `main` wires it, pointed at the backend at `api_url`.
/// The URL is owned so the returned service holds no borrow of the backend.
pub async fn console(
    api_url: String,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let api = ApiClient::new(&api_url, Duration::from_secs(5)).expect("Failed to build API client");
    let state = web::Data::new(AppState::new(api, "ArtFest"));
    test::init_service(
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(state)
            .configure(handlers::configure)
            .default_service(web::to(|| async { not_found_page() })),
    )
    .await
}

/// A response reduced to what the tests look at.
#[derive(Debug)]
pub struct Page {
    pub status: StatusCode,
    pub location: Option<String>,
    pub content_type: String,
    pub disposition: Option<String>,
    pub body: String,
}

impl Page {
    pub fn redirects_to(&self, location: &str) -> bool {
        self.status == StatusCode::SEE_OTHER && self.location.as_deref() == Some(location)
    }

    pub fn count(&self, needle: &str) -> usize {
        self.body.matches(needle).count()
    }
}

pub fn extract_csrf_token(html: &str) -> Option<String> {
    let re = Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#).unwrap();
    re.captures(html).map(|c| c[1].to_string())
}

/// A file chosen in an upload form. An empty `filename` and no bytes is what a
/// browser sends for a file input left blank.
pub struct FileUpload<'a> {
    pub field: &'a str,
    pub filename: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

const FORM_BOUNDARY: &str = "----artfest-test-boundary";

pub struct Browser<S> {
    app: S,
    cookies: HashMap<String, String>,
    pub csrf: String,
}

impl<S> Browser<S> {
    pub fn new(app: S) -> Self {
        Self { app, cookies: HashMap::new(), csrf: String::new() }
    }

    async fn send<B>(&mut self, req: test::TestRequest) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = self
            .cookies
            .iter()
            .fold(req, |req, (name, value)| req.cookie(Cookie::new(name.clone(), value.clone())));
        let resp = test::call_service(&self.app, req.to_request()).await;
        for cookie in resp.response().cookies() {
            if cookie.value().is_empty() {
                self.cookies.remove(cookie.name());
            } else {
                self.cookies.insert(cookie.name().to_string(), cookie.value().to_string());
            }
        }
        let header_text = |name: header::HeaderName| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        let status = resp.status();
        let location = header_text(header::LOCATION);
        let content_type = header_text(header::CONTENT_TYPE).unwrap_or_default();
        let disposition = header_text(header::CONTENT_DISPOSITION);
        let bytes = test::read_body(resp).await;
        let body = String::from_utf8_lossy(&bytes).to_string();
        if let Some(token) = extract_csrf_token(&body) {
            self.csrf = token;
        }
        Page { status, location, content_type, disposition, body }
    }

    pub async fn get<B>(&mut self, path: &str) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(test::TestRequest::get().uri(path)).await
    }

    /// POST a form; the session's CSRF token is appended.
    pub async fn post<B>(&mut self, path: &str, fields: &[(&str, &str)]) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let csrf = self.csrf.clone();
        let mut form: Vec<(&str, &str)> = fields.to_vec();
        form.push(("csrf_token", csrf.as_str()));
        self.send(test::TestRequest::post().uri(path).set_form(&form)).await
    }

    /// POST without adding a CSRF token.
    pub async fn post_raw<B>(&mut self, path: &str, fields: &[(&str, &str)]) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        self.send(test::TestRequest::post().uri(path).set_form(fields)).await
    }

    /// POST a `multipart/form-data` form; the session's CSRF token is appended.
    pub async fn post_multipart<B>(&mut self, path: &str, fields: &[(&str, &str)], file: Option<FileUpload<'_>>) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let csrf = self.csrf.clone();
        let mut body: Vec<u8> = Vec::new();
        for (name, value) in fields.iter().copied().chain([("csrf_token", csrf.as_str())]) {
            body.extend_from_slice(
                format!("--{FORM_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                    .as_bytes(),
            );
        }
        if let Some(file) = file {
            body.extend_from_slice(
                format!(
                    "--{FORM_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: {}\r\n\r\n",
                    file.field, file.filename, file.content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(file.bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{FORM_BOUNDARY}--\r\n").as_bytes());

        let req = test::TestRequest::post()
            .uri(path)
            .insert_header((header::CONTENT_TYPE, format!("multipart/form-data; boundary={FORM_BOUNDARY}")))
            .set_payload(body);
        self.send(req).await
    }

    /// Sign in as the fake backend's admin.
    pub async fn login<B>(&mut self) -> Page
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let page = self.get("/login").await;
        assert_eq!(page.status, StatusCode::OK, "login page should render");
        let page = self.post("/login", &[("username", ADMIN_USER), ("password", ADMIN_PASS)]).await;
        assert!(page.redirects_to("/dashboard"), "login should redirect to the dashboard: {page:?}");
        page
    }
}

/// Backend plus a signed-in browser with an empty request log.
pub async fn signed_in() -> (
    FakeBackend,
    Browser<impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>>,
) {
    let backend = FakeBackend::start().await;
    let mut browser = Browser::new(console(backend.url.clone()).await);
    browser.login().await;
    backend.clear_log();
    (backend, browser)
}
