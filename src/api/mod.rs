//! Client for the ArtFest REST backend.
//!
//! One `reqwest::Client` is built at startup and shared by every handler.
//! Handlers derive a per-session copy with [`ApiClient::with_token`] so the
//! bearer token travels with each call.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, header};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub mod error;
pub mod resource;

pub use error::{ApiError, GENERIC_FAILURE};
pub use resource::Resource;

/// Binary response body, e.g. a CSV export.
#[derive(Debug, Clone)]
pub struct Download {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A file forwarded from an upload form.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Responses arrive either bare or wrapped as `{ "data": ... }`.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("artfest-console/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Copy of this client that sends `Authorization: Bearer <token>`.
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.to_string()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, self.url(path))
            .header(header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, method: &Method, path: &str, builder: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        log::debug!("backend {method} {path}");
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            let message = error::extract_message(&body);
            log::warn!("backend {method} {path} -> {status}: {message}");
            return Err(ApiError::Backend { status: status.as_u16(), message });
        }
        Ok(body.to_vec())
    }

    fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
        let envelope: Envelope<T> = serde_json::from_slice(body)?;
        Ok(envelope.into_inner())
    }

    /// GET a collection.
    pub async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        self.get(path).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.send(&Method::GET, path, self.request(Method::GET, path)).await?;
        Self::decode(&body)
    }

    pub async fn post<B, T>(&self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, payload).await
    }

    pub async fn put<B, T>(&self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, payload).await
    }

    pub async fn patch<B, T>(&self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, payload).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method.clone(), path).json(payload);
        let body = self.send(&method, path, builder).await?;
        Self::decode(&body)
    }

    /// DELETE; any success status is enough, the body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(&Method::DELETE, path, self.request(Method::DELETE, path))
            .await
            .map(|_| ())
    }

    /// Send text fields plus an optional file as `multipart/form-data`.
    pub async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        fields: Vec<(String, String)>,
        file: Option<FilePart>,
    ) -> Result<T, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }
        if let Some(file) = file {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.filename)
                .mime_str(&file.content_type)?;
            form = form.part(file.field, part);
        }
        let builder = self.request(method.clone(), path).multipart(form);
        let body = self.send(&method, path, builder).await?;
        Self::decode(&body)
    }

    /// GET a binary body such as a CSV export.
    pub async fn download(&self, path: &str) -> Result<Download, ApiError> {
        log::debug!("backend GET {path} (download)");
        let response = self
            .http
            .get(self.url(path))
            .header(header::ACCEPT, "text/csv, application/octet-stream, */*");
        let response = match &self.token {
            Some(token) => response.bearer_auth(token),
            None => response,
        }
        .send()
        .await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message: error::extract_message(&bytes),
            });
        }
        Ok(Download { content_type, bytes: bytes.to_vec() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct Item {
        name: String,
    }

    #[test]
    fn decodes_wrapped_and_bare_bodies() {
        let wrapped: Vec<Item> = ApiClient::decode(br#"{"data":[{"name":"Duff"}]}"#).unwrap();
        let bare: Vec<Item> = ApiClient::decode(br#"[{"name":"Duff"}]"#).unwrap();
        assert_eq!(wrapped, bare);
        assert_eq!(bare[0].name, "Duff");
    }

    #[test]
    fn url_joins_with_or_without_slash() {
        let api = ApiClient::new("http://localhost:5000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.url("/students"), "http://localhost:5000/api/students");
        assert_eq!(api.url("teams/1"), "http://localhost:5000/api/teams/1");
    }

    #[test]
    fn with_token_keeps_base_url() {
        let api = ApiClient::new("http://x", Duration::from_secs(1)).unwrap();
        let authed = api.with_token("abc");
        assert_eq!(authed.base_url(), "http://x");
        assert_eq!(authed.token.as_deref(), Some("abc"));
        assert!(api.token.is_none());
    }
}
