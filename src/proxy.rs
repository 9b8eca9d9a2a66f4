/*============================================================
  Bundlescope
  Module: bundlescope::proxy
  ------------------------------------------------------------
  Purpose:
    The lookup boundary: validate the requested package name,
    fetch its size report, and turn every failure into a
    status-coded LookupError.

  Security / Safety Notes:
    Transport causes are logged and replaced by a generic
    message before leaving this module.

  Revision History:
    2026-10-16  Authored lookup proxy.
============================================================*/

use crate::bundlephobia::{FetchError, SizeClient};
use crate::error::LookupError;
use crate::logger::Logger;
use crate::package_info::PackageBundleInfo;

/// Look up bundle-size data for `package`. Blank or missing names are
/// rejected before any request is made.
pub async fn get_bundle_info(
    client: &SizeClient,
    logger: &Logger,
    package: Option<&str>,
) -> Result<PackageBundleInfo, LookupError> {
    let name = package
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(LookupError::missing_package)?;

    match client.fetch(name).await {
        Ok(info) => {
            logger.debug(
                "LOOKUP",
                format!("{}@{} size={} gzip={}", info.name, info.version, info.size, info.gzip),
            );
            Ok(info)
        }
        Err(FetchError::Upstream { status, message }) => {
            logger.warn(
                "UPSTREAM",
                format!(
                    "{name}: upstream answered {status} ({})",
                    message.as_deref().unwrap_or("no message")
                ),
            );
            Err(LookupError::upstream(status, message))
        }
        Err(FetchError::Transport(cause)) => {
            logger.error("UPSTREAM", format!("Error fetching package data: {cause}"));
            Err(LookupError::transport())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::UpstreamConfig;
    use crate::error::{FETCH_FAILED_MESSAGE, MISSING_PACKAGE_MESSAGE};

    fn client_with_base(base_url: String) -> SizeClient {
        SizeClient::new(&UpstreamConfig {
            base_url,
            ..UpstreamConfig::default()
        })
        .unwrap()
    }

    fn quiet_logger() -> Logger {
        Logger::new(None, false).unwrap()
    }

    #[tokio::test]
    async fn blank_names_never_reach_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let client = client_with_base(server.uri());
        let logger = quiet_logger();

        for input in [None, Some(""), Some("   \t")] {
            let err = get_bundle_info(&client, &logger, input).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
            assert_eq!(err.message(), MISSING_PACKAGE_MESSAGE);
        }
    }

    #[tokio::test]
    async fn left_pad_is_projected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/size"))
            .and(query_param("package", "left-pad"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "left-pad",
                "version": "1.3.0",
                "size": 500,
                "gzip": 300,
                "dependencyCount": 0,
                "hasJSModule": false,
                "hasJSNext": false,
                "hasSideEffects": false,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let info = get_bundle_info(
            &client_with_base(server.uri()),
            &quiet_logger(),
            Some("  left-pad "),
        )
        .await
        .unwrap();
        assert_eq!(info.name, "left-pad");
        assert_eq!(info.size, 500);
        assert_eq!(info.gzip, 300);
        assert_eq!(info.repository, None);
    }

    #[tokio::test]
    async fn upstream_status_and_message_propagate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/size"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "error": "Package not found" })),
            )
            .mount(&server)
            .await;

        let err = get_bundle_info(&client_with_base(server.uri()), &quiet_logger(), Some("nope"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Package not found");
    }

    #[tokio::test]
    async fn unparseable_error_body_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = get_bundle_info(&client_with_base(server.uri()), &quiet_logger(), Some("react"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.message(), FETCH_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn network_failure_becomes_generic_500() {
        // Bind then drop a listener so the port refuses connections.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("proxy.log");
        let logger = Logger::new(Some(log_path.clone()), false).unwrap();

        let err = get_bundle_info(&client_with_base(format!("http://{addr}")), &logger, Some("react"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), FETCH_FAILED_MESSAGE);

        let log = std::fs::read_to_string(log_path).unwrap();
        assert!(log.contains("[ERROR] [UPSTREAM] Error fetching package data"));
    }
}
