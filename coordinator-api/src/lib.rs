//! HTTP client for the mesh coordination API.
//!
//! A thin wrapper around reqwest, configured once per process with a base URL
//! and a static API key. Every request carries a bearer `Authorization`
//! header. Non-2xx responses are classified in two tiers: if the service
//! returned its `{code, message, details}` error envelope the caller gets a
//! structured [`Error::Api`]; otherwise the raw HTTP failure surfaces as
//! [`Error::Http`].

pub mod machines;
pub mod namespaces;
pub mod users;

pub use machines::Machine;
pub use namespaces::Namespace;
pub use reqwest::StatusCode;
pub use users::User;

use reqwest::{IntoUrl, Method, RequestBuilder, Url, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error within the reqwest library (connect failure, body decode, ...)
    #[error("coordination API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response without a parseable error envelope
    #[error("HTTP error from API: {0}")]
    Http(StatusCode),

    /// Non-2xx response carrying the service's structured error envelope
    #[error("{message}")]
    Api {
        status: StatusCode,
        status_text: String,
        code: i64,
        message: String,
        details: Vec<HashMap<String, String>>,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error envelope returned by the coordination service on failures.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    code: i64,
    message: String,
    #[serde(default)]
    details: Vec<HashMap<String, String>>,
}

/// Empty JSON object responses (e.g. from delete operations).
#[derive(Debug, Deserialize)]
pub(crate) struct Empty {}

/// Authenticated client for the coordination API.
///
/// Cheap to share behind an `Arc`: it carries no mutable per-call state, so
/// concurrent requests can reuse one value.
pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl Client {
    /// Create a client rooted at `base_url` (the versioned `api/v1/` prefix
    /// is appended here, callers pass resource-relative paths).
    pub fn new<T: IntoUrl>(base_url: T, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent("meshboard").build()?;
        Ok(Self {
            http,
            base_url: base_url.into_url()?.join("api/v1/").unwrap(),
            api_key: api_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Url {
        self.base_url.join(path).unwrap()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!(%method, path, "coordination API request");
        self.http
            .request(method, self.endpoint(path))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    /// Send a request and parse the JSON body, classifying failures.
    pub(crate) async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.json().await?)
        } else {
            let body = resp.bytes().await.unwrap_or_default();
            Err(classify_error(status, &body))
        }
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::GET, path)).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::POST, path)).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub(crate) async fn post_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        self.send(self.request(Method::POST, path).query(query)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let _: Empty = self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

/// Classify a non-2xx response body into the two-tier error model.
fn classify_error(status: StatusCode, body: &[u8]) -> Error {
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => Error::Api {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            code: envelope.code,
            message: envelope.message,
            details: envelope.details,
        },
        Err(_) => Error::Http(status),
    }
}
