/*============================================================
  Bundlescope
  Module: bundlescope::bundlephobia
  ------------------------------------------------------------
  Purpose:
    Query the bundle-size service for a single package and
    decode its size report.

  Security / Safety Notes:
    Performs read-only HTTPS GET requests. No credentials are
    transmitted.

  Dependencies:
    reqwest for HTTP, serde for response parsing, urlencoding
    for the query parameter.

  Revision History:
    2026-10-16  Implemented single-shot size client.
============================================================*/

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use urlencoding::encode;

use crate::config::UpstreamConfig;
use crate::error::{BundlescopeError, Result};
use crate::package_info::{PackageBundleInfo, UpstreamPackage};

/// Why a size lookup did not produce a report.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The service answered with a non-success status.
    #[error("upstream responded {status}")]
    Upstream {
        status: StatusCode,
        message: Option<String>,
    },
    /// The request failed or the report could not be decoded.
    #[error("{0}")]
    Transport(String),
}

/// Client for the bundle-size service.
#[derive(Clone, Debug)]
pub struct SizeClient {
    client: reqwest::Client,
    base_url: String,
}

impl SizeClient {
    /// Construct a new client from configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|err| BundlescopeError::Network(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn size_url(&self, package: &str) -> String {
        format!("{}/api/size?package={}", self.base_url, encode(package))
    }

    /// Issue exactly one request for `package` and decode the report.
    pub async fn fetch(&self, package: &str) -> std::result::Result<PackageBundleInfo, FetchError> {
        let url = self.size_url(package);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(format!("request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable error body only costs us the message.
            let body = response.bytes().await.unwrap_or_default();
            return Err(FetchError::Upstream {
                status,
                message: error_message(&body),
            });
        }

        let body = response.bytes().await.map_err(|err| {
            FetchError::Transport(format!("reading size report from {url} failed: {err}"))
        })?;
        let report: UpstreamPackage = serde_json::from_slice(&body).map_err(|err| {
            FetchError::Transport(format!("malformed size report for {package}: {err}"))
        })?;
        Ok(report.into_bundle_info())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Text(String),
    Detailed { message: String },
}

/// Best-effort extraction of the service's `error` field.
fn error_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    let message = match parsed.error? {
        ErrorDetail::Text(text) => text,
        ErrorDetail::Detailed { message } => message,
    };
    Some(message).filter(|msg| !msg.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SizeClient {
        SizeClient::new(&UpstreamConfig {
            base_url: format!("{}/", server.uri()),
            ..UpstreamConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn size_url_percent_encodes_scoped_names() {
        let client = SizeClient::new(&UpstreamConfig::default()).unwrap();
        assert_eq!(
            client.size_url("@babel/core"),
            "https://bundlephobia.com/api/size?package=%40babel%2Fcore"
        );
        assert_eq!(
            client.size_url("react@18.2.0"),
            "https://bundlephobia.com/api/size?package=react%4018.2.0"
        );
    }

    #[test]
    fn error_message_variants() {
        assert_eq!(
            error_message(br#"{"error":"Package not found"}"#).as_deref(),
            Some("Package not found")
        );
        assert_eq!(
            error_message(br#"{"error":{"code":"PackageNotFoundError","message":"nope"}}"#)
                .as_deref(),
            Some("nope")
        );
        assert_eq!(error_message(br#"{"other":1}"#), None);
        assert_eq!(error_message(br#"{"error":""}"#), None);
        assert_eq!(error_message(b"<html>bad gateway</html>"), None);
    }

    #[tokio::test]
    async fn fetch_decodes_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/size"))
            .and(query_param("package", "@scope/pkg"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "@scope/pkg",
                "version": "2.0.0",
                "size": 2048,
                "gzip": 900,
                "dependencyCount": 3,
                "hasJSModule": true,
                "hasJSNext": false,
                "hasSideEffects": false,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let info = client_for(&server).fetch("@scope/pkg").await.unwrap();
        assert_eq!(info.version, "2.0.0");
        assert_eq!(info.size, 2048);
        assert_eq!(info.scoped, Some(true));
    }

    #[tokio::test]
    async fn fetch_reports_upstream_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/size"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "error": "Package not found" })),
            )
            .mount(&server)
            .await;

        match client_for(&server).fetch("nope").await {
            Err(FetchError::Upstream { status, message }) => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message.as_deref(), Some("Package not found"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_rejects_malformed_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/size"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch("left-pad").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
