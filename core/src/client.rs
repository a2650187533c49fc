//! Entry point of the resource client façade.
//!
//! # Design
//! `TestHubClient` holds the base URL and an injected `Transport`, and keeps
//! no other state between calls. Each resource is reached through a borrowed
//! façade (`configs()`, `scenarios()`, `test_cases()`). Every façade operation
//! is split into a pure `build_*` method that produces an `HttpRequest` and an
//! async method that dispatches it, so the request an operation produces can
//! be inspected without a network.
//!
//! Transport failures are returned to the caller exactly as the transport
//! reported them; nothing is retried or translated.

use serde_json::Value;
use tracing::debug;

use crate::api::{ConfigsApi, ScenariosApi, TestCasesApi};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{parse_response, HttpRequest};
use crate::transport::{Transport, UreqTransport};

/// Client for the testhub backend.
#[derive(Debug, Clone)]
pub struct TestHubClient<T> {
    base_url: String,
    transport: T,
}

impl<T> TestHubClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Configuration entries and the global settings singleton.
    pub fn configs(&self) -> ConfigsApi<'_, T> {
        ConfigsApi::new(self)
    }

    pub fn scenarios(&self) -> ScenariosApi<'_, T> {
        ScenariosApi::new(self)
    }

    pub fn test_cases(&self) -> TestCasesApi<'_, T> {
        TestCasesApi::new(self)
    }

    /// Absolute URL for an endpoint path such as `/configs/settings`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl TestHubClient<UreqTransport> {
    /// Client over a `ureq` transport configured from `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url, UreqTransport::new(config.timeout()))
    }
}

impl<T: Transport> TestHubClient<T> {
    /// Send a request and decode the JSON response.
    pub async fn dispatch(&self, request: HttpRequest) -> Result<Value, ApiError> {
        debug!(method = %request.method, url = %request.url(), "dispatching request");
        let response = self.transport.send(request).await.inspect_err(|e| {
            debug!(error = %e, "transport failed");
        })?;
        debug!(status = response.status, "response received");
        parse_response(response)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use crate::error::ApiError;
    use crate::http::{HttpRequest, HttpResponse};
    use crate::transport::Transport;

    /// Records every request and answers each with the same canned reply.
    pub(crate) struct RecordingTransport {
        pub(crate) requests: Mutex<Vec<HttpRequest>>,
        reply: Result<HttpResponse, ApiError>,
    }

    impl RecordingTransport {
        pub(crate) fn replying(status: u16, body: &str) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                reply: Ok(HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.to_string(),
                }),
            }
        }

        pub(crate) fn failing(err: ApiError) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                reply: Err(err),
            }
        }

        pub(crate) fn last(&self) -> HttpRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for RecordingTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.lock().unwrap().push(request);
            self.reply.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::RecordingTransport;
    use super::*;
    use crate::http::HttpMethod;

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TestHubClient::new("http://localhost:8000/api/", ());
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.endpoint("/configs/"), "http://localhost:8000/api/configs/");
    }

    #[tokio::test]
    async fn dispatch_decodes_success() {
        let client = TestHubClient::new("http://h/api", RecordingTransport::replying(200, r#"{"ok":true}"#));
        let value = client
            .dispatch(HttpRequest::new(HttpMethod::Get, "http://h/api/x".into()))
            .await
            .unwrap();
        assert_eq!(value, json!({"ok": true}));
        assert_eq!(client.transport().last().path, "http://h/api/x");
    }

    #[tokio::test]
    async fn dispatch_passes_transport_error_through() {
        let err = ApiError::Transport("connection refused".to_string());
        let client = TestHubClient::new("http://h/api", RecordingTransport::failing(err.clone()));
        let got = client
            .dispatch(HttpRequest::new(HttpMethod::Get, "http://h/api/x".into()))
            .await
            .unwrap_err();
        assert_eq!(got, err);
    }

    #[tokio::test]
    async fn dispatch_rejects_non_success_status() {
        let client = TestHubClient::new("http://h/api", RecordingTransport::replying(400, r#"{"detail":"no cases"}"#));
        let err = client
            .dispatch(HttpRequest::new(HttpMethod::Post, "http://h/api/x".into()))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 400,
                body: r#"{"detail":"no cases"}"#.to_string()
            }
        );
    }

    #[test]
    fn from_config_uses_configured_base_url() {
        let config = ClientConfig {
            base_url: "http://backend:9000/api/".to_string(),
            timeout_secs: 5,
        };
        let client = TestHubClient::from_config(&config);
        assert_eq!(client.base_url(), "http://backend:9000/api");
    }
}
