//! HTTP request and response descriptors.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The façade
//! builds `HttpRequest` values without touching the network; a `Transport`
//! executes them and returns an `HttpResponse`. Keeping the descriptor as data
//! makes every operation's method, path, query and body directly assertable.
//!
//! Bodies are held as `serde_json::Value` so the payload a caller passed in
//! can be compared structurally with what goes on the wire. The transport is
//! responsible for rendering it.

use std::fmt;

use serde_json::Value;

use crate::error::ApiError;
use crate::query::QueryParams;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// `path` is the absolute URL without a query string. Built by the
/// `build_*` methods of the resource façades.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: QueryParams,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    /// A request with no query and no body.
    pub fn new(method: HttpMethod, path: String) -> Self {
        Self {
            method,
            path,
            query: QueryParams::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Attach a JSON body and the matching content-type header.
    pub fn with_json(mut self, body: Value) -> Self {
        self.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        self.body = Some(body);
        self
    }

    /// Full request URL including the encoded query string.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query.encode())
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Interpret a response the way a browser HTTP client does: any 2xx resolves
/// with the decoded JSON body, everything else rejects.
pub fn parse_response(response: HttpResponse) -> Result<Value, ApiError> {
    match response.status {
        200..=299 => {
            if response.body.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
        }
        404 => Err(ApiError::NotFound {
            body: response.body,
        }),
        status => Err(ApiError::Http {
            status,
            body: response.body,
        }),
    }
}
