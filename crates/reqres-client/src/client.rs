// crates/reqres-client/src/client.rs
// ============================================================================
// Module: HTTP Client Wrapper
// Description: Single-attempt JSON HTTP calls against the configured service.
// Purpose: Return status plus body, and keep transport failures distinct.
// Dependencies: reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! [`ApiClient`] resolves request paths against the configured base URL and
//! issues exactly one attempt per call, bounded by the configured timeout.
//! Any HTTP status is returned as a [`ResponseRecord`]; only a call that could
//! not complete (connect failure, timeout, truncated body) is an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::audit::HarnessAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::RequestAuditEvent;
use crate::audit::RequestAuditEventParams;
use crate::audit::sink_from_config;
use crate::config::ClientConfig;
use crate::response::ResponseRecord;

// ============================================================================
// SECTION: Methods
// ============================================================================

/// HTTP methods used by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Returns the canonical method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Converts to the reqwest method type.
    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when a call cannot produce a response record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Request path is not a rooted relative path.
    #[error("invalid request path '{path}': {reason}")]
    InvalidPath {
        /// Offending path.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// Underlying HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    Build(String),
    /// The call did not complete.
    #[error("{method} {url} did not complete: {message}")]
    Transport {
        /// Method of the failed call.
        method: HttpMethod,
        /// Fully resolved URL.
        url: String,
        /// True when the per-call timeout elapsed.
        timed_out: bool,
        /// Transport diagnostic.
        message: String,
    },
}

impl ClientError {
    /// Returns true when the service could not be reached or did not answer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns true when the per-call timeout elapsed.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                timed_out: true,
                ..
            }
        )
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP client bound to one base URL.
#[derive(Clone)]
pub struct ApiClient {
    /// Base URL without a trailing slash.
    base_url: String,
    /// Underlying HTTP client (carries the timeout).
    client: Client,
    /// Per-call timeout the client was built with.
    timeout: Duration,
    /// Audit sink for per-call events.
    audit: Arc<dyn HarnessAuditSink>,
}

impl ApiClient {
    /// Builds a client from configuration with auditing disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] when the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            client: build_http_client(config.timeout)?,
            timeout: config.timeout,
            audit: Arc::new(NoopAuditSink),
        })
    }

    /// Returns a copy with its own connection pool.
    ///
    /// Used when a call must run on a different runtime than the one that
    /// owns the original pool.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] when the HTTP client cannot be built.
    pub fn detached(&self) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: self.base_url.clone(),
            client: build_http_client(self.timeout)?,
            timeout: self.timeout,
            audit: Arc::clone(&self.audit),
        })
    }

    /// Builds a client from configuration with its configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Build`] when the HTTP client or audit sink
    /// cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let sink = sink_from_config(&config.audit)
            .map_err(|err| ClientError::Build(format!("audit sink: {err}")))?;
        Ok(Self::new(config)?.with_audit(sink))
    }

    /// Attaches an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn HarnessAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the audit sink shared with collaborators.
    #[must_use]
    pub fn audit(&self) -> Arc<dyn HarnessAuditSink> {
        Arc::clone(&self.audit)
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves a request path against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidPath`] when the path is not rooted, is
    /// absolute, or contains whitespace.
    pub fn url_for(&self, path: &str) -> Result<String, ClientError> {
        if !path.starts_with('/') {
            return Err(ClientError::InvalidPath {
                path: path.to_string(),
                reason: "path must start with '/'",
            });
        }
        if path.starts_with("//") || path.contains("://") {
            return Err(ClientError::InvalidPath {
                path: path.to_string(),
                reason: "path must be relative to the base url",
            });
        }
        if path.chars().any(char::is_whitespace) {
            return Err(ClientError::InvalidPath {
                path: path.to_string(),
                reason: "path must not contain whitespace",
            });
        }
        Ok(format!("{}{path}", self.base_url))
    }

    /// Issues a `GET`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn get(&self, path: &str) -> Result<ResponseRecord, ClientError> {
        self.send(HttpMethod::Get, path, None).await
    }

    /// Issues a `POST` with a JSON payload.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn post(&self, path: &str, payload: &Value) -> Result<ResponseRecord, ClientError> {
        self.send(HttpMethod::Post, path, Some(payload)).await
    }

    /// Issues a `PUT` with a JSON payload.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn put(&self, path: &str, payload: &Value) -> Result<ResponseRecord, ClientError> {
        self.send(HttpMethod::Put, path, Some(payload)).await
    }

    /// Issues a `DELETE`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn delete(&self, path: &str) -> Result<ResponseRecord, ClientError> {
        self.send(HttpMethod::Delete, path, None).await
    }

    /// Issues one request and returns the status and classified body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidPath`] for malformed paths and
    /// [`ClientError::Transport`] when the call does not complete. HTTP error
    /// statuses are never errors.
    pub async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<&Value>,
    ) -> Result<ResponseRecord, ClientError> {
        let url = self.url_for(path)?;
        let mut request = self.client.request(method.to_reqwest(), &url);
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        let started = Instant::now();
        let result = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>(ResponseRecord::from_parts(status, &bytes))
        }
        .await;
        let elapsed_ms = started.elapsed().as_millis();

        match result {
            Ok(record) => {
                self.audit.record_request(&RequestAuditEvent::new(RequestAuditEventParams {
                    method,
                    path: path.to_string(),
                    status: Some(record.status),
                    error: None,
                    timed_out: false,
                    elapsed_ms,
                }));
                Ok(record)
            }
            Err(err) => {
                let timed_out = err.is_timeout();
                let message = err.to_string();
                self.audit.record_request(&RequestAuditEvent::new(RequestAuditEventParams {
                    method,
                    path: path.to_string(),
                    status: None,
                    error: Some(message.clone()),
                    timed_out,
                    elapsed_ms,
                }));
                Err(ClientError::Transport {
                    method,
                    url,
                    timed_out,
                    message,
                })
            }
        }
    }
}

/// Builds the underlying HTTP client with a per-call timeout.
fn build_http_client(timeout: Duration) -> Result<Client, ClientError> {
    Client::builder().timeout(timeout).build().map_err(|err| ClientError::Build(err.to_string()))
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("ApiClient").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
