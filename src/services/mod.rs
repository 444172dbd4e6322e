// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Remote collaborators: AI inference, identity and access control, and the
//! background task runner that keeps their calls off the UI thread.

pub mod access;
pub mod identity;
pub mod inference;
pub mod lazy;
pub mod tasks;

use crate::config::Timeouts;
use reqwest::blocking::Client;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was not sent because an input was missing or invalid.
    #[error("{0}")]
    InvalidInput(String),

    /// The HTTP request failed before a response arrived.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("service returned status {status}")]
    Status { status: u16, body: String },

    /// The service reported a failure in the response body.
    #[error("service error: {0}")]
    Remote(String),

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Parse(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ServiceError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}

/// Blocking JSON transport shared by the HTTP clients.
#[derive(Debug, Clone)]
pub(crate) struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    pub(crate) fn new(base_url: &str, timeouts: Timeouts) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ServiceError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the body of a 2xx response.
    pub(crate) fn send(
        &self,
        method: Method,
        path: &str,
        bearer: Option<&str>,
        body: Option<&serde_json::Value>,
    ) -> Result<String, ServiceError> {
        let mut request = self.http.request(method, self.url(path));
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .map_err(|e| ServiceError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| ServiceError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

/// Decode a JSON response body, surfacing an `{"error": ...}` payload as
/// [`ServiceError::Remote`].
pub(crate) fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ServiceError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ServiceError::Parse(e.to_string()))?;
    if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
        return Err(ServiceError::Remote(error.to_string()));
    }
    serde_json::from_value(value).map_err(|e| ServiceError::Parse(e.to_string()))
}
