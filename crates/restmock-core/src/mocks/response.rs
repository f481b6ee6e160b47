//! Response envelope composition.

use crate::types::options::{DebugMode, MockOptions};
use crate::types::request::HttpRequest;
use crate::types::response::{HttpError, MockResponse, ResponseInfo, RouteResult};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Wrap a handler result into the final transport response.
///
/// `Ok(None)` becomes a 404; an explicit [`HttpError`] keeps its code. With
/// `http_response_info_label` configured the status descriptor nests under
/// that key, and error bodies carry the descriptor there instead of at the
/// payload root.
pub fn build_response(
    result: RouteResult,
    options: &MockOptions,
    request: &HttpRequest,
) -> MockResponse {
    let (info, mut data) = match result {
        Ok(Some(payload)) => (ResponseInfo::ok(), payload),
        Ok(None) => error_parts(HttpError::not_found(), options),
        Err(error) => error_parts(error, options),
    };

    if let Some(label) = &options.http_response_info_label {
        // a non-object payload has nowhere to carry the descriptor and is
        // emitted as-is
        if let Some(obj) = data.as_object_mut() {
            obj.insert(label.clone(), json!(info));
        }
    }

    let body = data.to_string();
    run_debug_hook(options, request, &info, &data);

    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    MockResponse {
        status: info.code,
        body,
        headers,
    }
}

fn error_parts(error: HttpError, options: &MockOptions) -> (ResponseInfo, Value) {
    let info = ResponseInfo::from(&error);
    let data = if options.http_response_info_label.is_some() {
        json!({})
    } else {
        json!(error)
    };
    (info, data)
}

fn run_debug_hook(
    options: &MockOptions,
    request: &HttpRequest,
    info: &ResponseInfo,
    data: &Value,
) {
    match &options.debug {
        DebugMode::Off => {}
        DebugMode::Log => tracing::debug!(
            method = ?request.method,
            url = %request.raw_url,
            status = info.code,
            body = %data,
            "mock response"
        ),
        DebugMode::Hook(hook) => hook(request, info, data),
    }
}
