/*============================================================
  Bundlescope
  Module: bundlescope::error
  ------------------------------------------------------------
  Purpose:
    Centralise error types: the process-level taxonomy used by
    startup and shutdown, and the lookup boundary error that is
    rendered as an HTTP response.

  Security / Safety Notes:
    Lookup errors only ever carry caller-safe messages; causes
    of transport failures stay in the operator log.

  Dependencies:
    thiserror for error definitions, axum for response mapping.
============================================================*/

use std::process::ExitCode;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Result alias for Bundlescope operations.
pub type Result<T> = std::result::Result<T, BundlescopeError>;

/// Message returned when the caller omits the package name.
pub const MISSING_PACKAGE_MESSAGE: &str = "Package name is required";

/// Message returned whenever upstream data could not be obtained.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch package data";

/// High-level error domains surfaced by the server process.
#[derive(Debug, Error)]
pub enum BundlescopeError {
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Network: {0}")]
    Network(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error("Runtime: {0}")]
    Runtime(String),
}

impl BundlescopeError {
    /// Map error category to a deterministic exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            BundlescopeError::Config(_) => ExitCode::from(20),
            BundlescopeError::Network(_) => ExitCode::from(30),
            BundlescopeError::Filesystem(_) => ExitCode::from(40),
            BundlescopeError::Runtime(_) => ExitCode::from(50),
        }
    }
}

/// Failure of a single package lookup, carrying the HTTP status the
/// proxy answers with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {message}")]
pub struct LookupError {
    status: StatusCode,
    message: String,
}

impl LookupError {
    /// The caller did not supply a usable package name.
    pub fn missing_package() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: MISSING_PACKAGE_MESSAGE.to_string(),
        }
    }

    /// Upstream answered with a non-success status. Statuses outside the
    /// 4xx/5xx range collapse to 502.
    pub fn upstream(status: StatusCode, message: Option<String>) -> Self {
        let status = if status.is_client_error() || status.is_server_error() {
            status
        } else {
            StatusCode::BAD_GATEWAY
        };
        Self {
            status,
            message: message
                .filter(|msg| !msg.trim().is_empty())
                .unwrap_or_else(|| FETCH_FAILED_MESSAGE.to_string()),
        }
    }

    /// Network failure or malformed upstream payload.
    pub fn transport() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: FETCH_FAILED_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_keeps_error_statuses() {
        let err = LookupError::upstream(StatusCode::NOT_FOUND, Some("Package not found".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Package not found");
    }

    #[test]
    fn upstream_falls_back_to_generic_message() {
        let err = LookupError::upstream(StatusCode::SERVICE_UNAVAILABLE, None);
        assert_eq!(err.message(), FETCH_FAILED_MESSAGE);

        let err = LookupError::upstream(StatusCode::SERVICE_UNAVAILABLE, Some("  ".into()));
        assert_eq!(err.message(), FETCH_FAILED_MESSAGE);
    }

    #[test]
    fn upstream_non_error_status_becomes_bad_gateway() {
        let err = LookupError::upstream(StatusCode::FOUND, None);
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn lookup_error_renders_json_body() {
        let response = LookupError::missing_package().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "error": "Package name is required" }));
    }
}
