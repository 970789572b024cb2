//! Thin authenticated JSON client shared by the REST connectors.

use super::catalog::argument_text;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, Url};
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// How a connector presents its credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AuthScheme {
    /// `Authorization: Bearer <key>`.
    Bearer,
    /// HTTP basic auth with the key as user name and a blank password.
    BasicKey,
    /// `Authorization: token <key>`.
    Token,
}

/// How non-path arguments travel on write requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BodyEncoding {
    Json,
    Form,
}

/// HTTP verb used by a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum HttpVerb {
    Get,
    Post,
}

#[derive(Debug, Error)]
pub(super) enum ApiError {
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("missing path argument '{0}'")]
    MissingPathArgument(String),

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

/// Authenticated session against one API base URL.
#[derive(Debug, Clone)]
pub(super) struct ApiSession {
    client: Client,
    base: Url,
    scheme: AuthScheme,
    secret: String,
    encoding: BodyEncoding,
}

impl ApiSession {
    pub(super) fn new(
        base_url: &str,
        scheme: AuthScheme,
        secret: &str,
        encoding: BodyEncoding,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base =
            Url::parse(base_url).map_err(|_| ApiError::InvalidBaseUrl(base_url.to_owned()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_owned()));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("devhub/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base,
            scheme,
            secret: secret.to_owned(),
            encoding,
        })
    }

    /// Expands `{name}` placeholders in `template` from `params`, consuming
    /// them, and returns the resulting URL.
    pub(super) fn endpoint(
        &self,
        template: &str,
        params: &mut Map<String, Value>,
    ) -> Result<Url, ApiError> {
        let mut segments = Vec::new();
        for segment in template.split('/').filter(|segment| !segment.is_empty()) {
            let Some(name) = segment
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
            else {
                segments.push(segment.to_owned());
                continue;
            };
            let value = params
                .remove(name)
                .ok_or_else(|| ApiError::MissingPathArgument(name.to_owned()))?;
            segments.push(argument_text(&value));
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(&segments);
        Ok(url)
    }

    /// Sends one request and decodes the JSON response.
    pub(super) async fn send(
        &self,
        verb: HttpVerb,
        url: Url,
        params: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        let pairs: Vec<(&str, String)> = params
            .iter()
            .map(|(key, value)| (key.as_str(), argument_text(value)))
            .collect();

        let mut request = match verb {
            HttpVerb::Get => self.client.request(Method::GET, url).query(&pairs),
            HttpVerb::Post => {
                let builder = self.client.request(Method::POST, url);
                match self.encoding {
                    BodyEncoding::Json => builder.json(params),
                    BodyEncoding::Form => builder.form(&pairs),
                }
            }
        };
        request = request.header(ACCEPT, "application/json");
        request = match self.scheme {
            AuthScheme::Bearer => request.bearer_auth(&self.secret),
            AuthScheme::BasicKey => request.basic_auth(&self.secret, Some("")),
            AuthScheme::Token => request.header(AUTHORIZATION, format!("token {}", self.secret)),
        };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(&text).unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_owned()
                }),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text)))
    }

    /// Issues the credential verification request.
    pub(super) async fn verify(&self, check_path: &str) -> Result<Value, ApiError> {
        let mut params = Map::new();
        let url = self.endpoint(check_path, &mut params)?;
        self.send(HttpVerb::Get, url, &params).await
    }
}

/// Extracts a human-readable message from common API error bodies.
fn error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    let candidates = [
        parsed.pointer("/error/message"),
        parsed.get("message"),
        parsed.get("error"),
        parsed.pointer("/errors/0/detail"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(Value::as_str)
        .map(str::to_owned)
}
