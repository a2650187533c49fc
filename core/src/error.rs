//! Error types for the testhub API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `Http` with the raw status
//! code and body for debugging. `Transport` covers everything that kept a
//! response from arriving at all.
//!
//! The type is `Clone + PartialEq` so a transport failure can be handed back
//! to the caller exactly as the transport produced it.

use thiserror::Error;

/// Errors returned by `TestHubClient` operations and their helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout,
    /// unreadable body).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server returned 404; the requested resource does not exist.
    #[error("resource not found: {body}")]
    NotFound { body: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A payload or query could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized as JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Client configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
