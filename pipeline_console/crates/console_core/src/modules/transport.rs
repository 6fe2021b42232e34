use crate::modules::config::ConsoleConfig;
use crate::modules::error::{ConsoleError, FetchError};
use crate::modules::protocol::ApiErrorBody;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Graylog rejects state-changing requests without this header.
const REQUESTED_BY_HEADER: &str = "X-Requested-By";
const REQUESTED_BY: &str = "pipeline-console";
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one request against a path relative to the server base URL and
    /// returns the parsed JSON body (`Value::Null` for an empty body).
    async fn fetch(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, FetchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn fetch(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, FetchError> {
        (**self).fetch(method, path, body).await
    }
}

pub async fn get_json<R: DeserializeOwned>(
    transport: &(impl Transport + ?Sized),
    path: &str,
) -> Result<R, ConsoleError> {
    let value = transport.fetch(Method::Get, path, None).await?;
    decode(path, value)
}

pub async fn post_json<B: Serialize, R: DeserializeOwned>(
    transport: &(impl Transport + ?Sized),
    path: &str,
    body: &B,
) -> Result<R, ConsoleError> {
    let body = serde_json::to_value(body).map_err(ConsoleError::Encode)?;
    let value = transport.fetch(Method::Post, path, Some(body)).await?;
    decode(path, value)
}

fn decode<R: DeserializeOwned>(path: &str, value: Value) -> Result<R, ConsoleError> {
    serde_json::from_value(value).map_err(|source| ConsoleError::Decode {
        endpoint: path.to_string(),
        source,
    })
}

pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<(String, String)>,
}

impl RestClient {
    pub fn new(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(FetchError::from)?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            credentials: config.credentials(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn qualify_url(&self, path: &str) -> Result<Url, FetchError> {
        qualify_url(&self.base_url, path)
    }
}

/// Prefixes a relative path with the deployment base URL. Absolute URLs pass
/// through unchanged.
pub fn qualify_url(base: &Url, path: &str) -> Result<Url, FetchError> {
    let joined = if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    };
    Url::parse(&joined).map_err(|source| FetchError::Url { url: joined, source })
}

#[async_trait]
impl Transport for RestClient {
    async fn fetch(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, FetchError> {
        let url = self.qualify_url(path)?;
        debug!(?method, %url, "fetch");

        let mut req = match method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url).header(REQUESTED_BY_HEADER, REQUESTED_BY),
        };
        req = req.header(ACCEPT, "application/json");
        if let Some((user, pass)) = &self.credentials {
            req = req.basic_auth(user, Some(pass));
        }
        if let Some(body) = &body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            debug!(%status, "fetch failed");
            return Err(FetchError::BadStatus {
                status,
                message: error_message(&text),
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| FetchError::InvalidBody(e.to_string()))
    }
}

fn error_message(body: &str) -> String {
    if let Ok(api) = serde_json::from_str::<ApiErrorBody>(body) {
        return api.message;
    }
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    out.push('…');
    out
}
