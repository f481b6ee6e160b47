//! Response-side types: error payloads, status descriptors, transport responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// HTTP-error payload a handler can return.
///
/// Not a Rust error: not-found and friends are ordinary dispatch outcomes,
/// serialized as `{"code": <int>, "message": <string>}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpError {
    pub code: u16,
    pub message: String,
}

impl HttpError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(404, "Not Found")
    }

    pub fn bad_request() -> Self {
        Self::new(400, "Bad Request")
    }
}

/// `{code, message}` descriptor of the simulated HTTP outcome.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResponseInfo {
    pub code: u16,
    pub message: String,
}

impl ResponseInfo {
    pub fn ok() -> Self {
        Self {
            code: 200,
            message: "OK".to_string(),
        }
    }
}

impl From<&HttpError> for ResponseInfo {
    fn from(error: &HttpError) -> Self {
        Self {
            code: error.code,
            message: error.message.clone(),
        }
    }
}

/// Final transport response: status code, serialized JSON body, headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
}

impl MockResponse {
    /// Decode the body for assertions; `Null` when the body is not JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    /// Split into the transport's `(status, body, headers)` tuple.
    pub fn into_parts(self) -> (u16, String, HashMap<String, String>) {
        (self.status, self.body, self.headers)
    }
}

/// Handler outcome: `Ok(None)` is the not-found signal.
pub type RouteResult = Result<Option<Value>, HttpError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn test_http_error_wire_shape() {
        let error = HttpError::not_found();
        assert_eq!(json!(error), json!({ "code": 404, "message": "Not Found" }));
    }

    #[rstest]
    #[case(HttpError::not_found(), 404, "Not Found")]
    #[case(HttpError::bad_request(), 400, "Bad Request")]
    #[case(HttpError::new(418, "teapot"), 418, "teapot")]
    fn test_http_error_constructors(
        #[case] error: HttpError,
        #[case] code: u16,
        #[case] message: &str,
    ) {
        assert_eq!(error.code, code);
        assert_eq!(error.message, message);
    }

    #[rstest]
    fn test_response_info_from_error() {
        let info = ResponseInfo::from(&HttpError::new(403, "Forbidden"));
        assert_eq!(info.code, 403);
        assert_eq!(info.message, "Forbidden");
    }

    #[rstest]
    fn test_mock_response_json_and_parts() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let response = MockResponse {
            status: 200,
            body: r#"{"id":1}"#.to_string(),
            headers,
        };
        assert_eq!(response.json(), json!({ "id": 1 }));

        let (status, body, headers) = response.into_parts();
        assert_eq!(status, 200);
        assert_eq!(body, r#"{"id":1}"#);
        assert_eq!(
            headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }
}
