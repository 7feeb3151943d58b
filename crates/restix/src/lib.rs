//! # Restix
//!
//! Thin HTTP client capability used by the Telegram Bot API client.
//!
//! Everything above this crate talks to the network only through the [HttpClient]
//! trait, so API clients can be exercised against an in-memory implementation
//! in tests and against [Restix] (backed by `reqwest`) in production.

use std::{fmt::Display, future::Future, time::Duration};

use reqwest::multipart::{Form, Part};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(reqwest::Error);

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HttpClient error: {}", &self.0)
    }
}

/// Request urls carry credentials (e.g. `/bot<token>/`), so they are
/// dropped from the error before it can be displayed.
impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self(value.without_url())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// File uploaded as one field of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Description of a single request.
///
/// Parameters are sent as an url-encoded form, or as a multipart form
/// if the request carries a file. A request with neither has no body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub params: Vec<(String, String)>,
    pub file: Option<FilePart>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Vec::new(),
            file: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn file(mut self, file: FilePart) -> Self {
        self.file = Some(file);
        self
    }

    /// Value of the first parameter with the given name
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a finished request.
/// The body is kept as text, so callers decide whether it must be JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_str(&self.body)
    }
}

pub trait HttpClient {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

#[derive(Clone, Default)]
pub struct Restix(reqwest::Client);

impl Restix {
    pub fn builder() -> RestixBuilder {
        RestixBuilder::new()
    }

    /// Client tuned for chat platform APIs: compressed responses,
    /// no redirects and short timeouts.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .gzip(true)
            .deflate(true)
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(3))
            .build()?;
        Ok(Self::builder().client(client).build())
    }
}

#[derive(Default)]
pub struct RestixBuilder {
    client: Option<reqwest::Client>,
}

impl RestixBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Restix {
        Restix(self.client.unwrap_or_default())
    }
}

impl Restix {
    fn to_reqwest(&self, request: HttpRequest) -> reqwest::Result<reqwest::Request> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.0.request(method, &request.url);
        if let Some(file) = request.file {
            let mut form = Form::new();
            for (key, value) in request.params {
                form = form.text(key, value);
            }
            let part = Part::bytes(file.bytes).file_name(file.file_name);
            builder = builder.multipart(form.part(file.field, part));
        } else if !request.params.is_empty() {
            builder = builder.form(&request.params);
        }
        builder.build()
    }
}

impl HttpClient for Restix {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request = self.to_reqwest(request)?;
        let response = self.0.execute(request).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        log::trace!("HttpClient response status: {status}");
        Ok(HttpResponse { status, body })
    }
}
