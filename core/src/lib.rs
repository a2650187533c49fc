//! Resource client for the testhub test-management service.
//!
//! # Overview
//! Exposes one operation per backend capability for configuration entries,
//! test scenarios and test cases. Each operation maps its arguments onto a
//! method, path, query and body, hands the request to an injected
//! `Transport`, and returns the outcome unchanged.
//!
//! # Design
//! - `TestHubClient` is stateless apart from `base_url` and its transport.
//! - Each operation is split into `build_*` (produces the request) and an
//!   async method (dispatches it), so the I/O boundary is explicit.
//! - Payloads are any `Serialize` value and are forwarded untouched; typed
//!   DTOs in `types` are a convenience, not a requirement.
//! - No retries, caching or cancellation: failures come back to the caller
//!   as the transport reported them.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod routes;
pub mod transport;
pub mod types;

pub use api::{ConfigsApi, ScenariosApi, TestCasesApi};
pub use client::TestHubClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{parse_response, HttpMethod, HttpRequest, HttpResponse};
pub use query::QueryParams;
pub use transport::{Transport, UreqTransport};
pub use types::{GenerationStrategy, ResourceId};
