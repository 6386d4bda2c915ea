//! API gateway
//!
//! A thin HTTP layer over the bookshop API: every path is prefixed with the configured base URL,
//! requests and responses are JSON, and cookies set by the server are sent back on later calls.

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use reqwest::{
    Client,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

const JSON: &str = "application/json";

/// HTTP methods used by the bookshop API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,

    /// `POST`
    Post,

    /// `PUT`
    Put,

    /// `DELETE`
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Body served as `application/json`.
    Json(Value),

    /// Any other body, verbatim.
    Text(String),
}

impl Payload {
    /// Deserialize a JSON payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnexpectedText`] for a text payload and [`GatewayError::Decode`]
    /// when the JSON does not match `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, GatewayError> {
        match self {
            Payload::Json(value) => serde_json::from_value(value).map_err(GatewayError::Decode),
            Payload::Text(text) => Err(GatewayError::UnexpectedText(text)),
        }
    }
}

/// Errors that can occur when talking to the API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {status}, message: {body}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,

        /// Raw response body.
        body: String,
    },

    /// A JSON body could not be parsed or did not have the expected shape.
    #[error("invalid JSON response")]
    Decode(#[source] serde_json::Error),

    /// JSON was expected but the server sent something else.
    #[error("expected a JSON response, got: {0}")]
    UnexpectedText(String),
}

impl GatewayError {
    /// HTTP status of a failed request, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Sends requests to the bookshop API.
#[automock]
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send a request to `path` (relative to the API base) with an optional JSON body.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Payload, GatewayError>;
}

/// [`Gateway`] backed by `reqwest`, with a cookie store for session credentials.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base: String,
    http: Client,
}

impl HttpGateway {
    /// Create a gateway rooted at `base`, e.g. `http://localhost:8080/api`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base: &str) -> Result<Self, GatewayError> {
        let http = Client::builder().cookie_store(true).build()?;

        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Payload, GatewayError> {
        let url = self.url(path);

        debug!(%method, %url, "sending request");

        let mut request = self
            .http
            .request(method.into(), &url)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON);

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.inspect_err(|error| {
            warn!(%method, %url, %error, "request failed");
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let text = response.text().await?;

        if !status.is_success() {
            warn!(%method, %url, status = status.as_u16(), body = %text, "request rejected");

            return Err(GatewayError::RequestFailed {
                status: status.as_u16(),
                body: text,
            });
        }

        decode(content_type.as_deref(), text)
    }
}

/// Decode a successful response body according to its content type.
fn decode(content_type: Option<&str>, body: String) -> Result<Payload, GatewayError> {
    let is_json = content_type.is_some_and(|value| value.contains(JSON));

    if !is_json {
        return Ok(Payload::Text(body));
    }

    serde_json::from_str(&body)
        .map(Payload::Json)
        .map_err(GatewayError::Decode)
}
