//! Request-side types: HTTP methods and the per-request descriptor.

use crate::matching::parse_query_string;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// HTTP method for route registration and matching
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

/// One incoming request as seen by route handlers.
///
/// Constructed per dispatched request and discarded once the response is
/// produced. The body is JSON-decoded when the Content-Type header indicates
/// JSON; otherwise only `raw_body` is populated.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Ordered wildcard values extracted from the path
    pub path_args: Vec<String>,
    pub method: HttpMethod,
    /// URL as received, including any query string
    pub raw_url: String,
    /// Path portion of the URL
    pub path: String,
    /// Parsed query parameters
    pub query: HashMap<String, String>,
    /// Body as received
    pub raw_body: Option<String>,
    /// JSON-decoded body
    pub body: Option<Value>,
    pub headers: HashMap<String, String>,
}

impl HttpRequest {
    pub fn new(
        path_args: Vec<String>,
        method: HttpMethod,
        raw_url: &str,
        body: Option<&str>,
        headers: HashMap<String, String>,
    ) -> Self {
        let path = raw_url.split('?').next().unwrap_or("").to_string();
        let query = raw_url
            .split('?')
            .nth(1)
            .map(parse_query_string)
            .unwrap_or_default();
        let decoded = if has_json_content_type(&headers) {
            body.and_then(|b| serde_json::from_str(b).ok())
        } else {
            None
        };

        Self {
            path_args,
            method,
            raw_url: raw_url.to_string(),
            path,
            query,
            raw_body: body.map(str::to_string),
            body: decoded,
            headers,
        }
    }

    /// Look up a single query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

fn has_json_content_type(headers: &HashMap<String, String>) -> bool {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value == "application/json" || value.starts_with("application/json;"))
        .unwrap_or(false)
}
