//! Transport registration contract and the in-memory test backend.
//!
//! Mocks do not touch any ambient global: every route is registered
//! explicitly through a [`TransportRegistry`] handed in at construction.
//! [`MockBackend`] is the crate's own transport double for driving mocks
//! directly from tests.

use crate::matching::UrlPattern;
use crate::types::request::{HttpMethod, HttpRequest};
use crate::types::response::MockResponse;
use std::collections::HashMap;

/// Fully built route handler as held by a transport.
pub type ResponseFn = Box<dyn FnMut(&HttpRequest) -> MockResponse>;

/// Registration side of the mock transport contract.
///
/// The transport is responsible for recognizing which registered pattern
/// matches an outgoing call, invoking the handler with the request, and
/// delivering the response back to the caller.
pub trait TransportRegistry {
    fn when(&mut self, method: HttpMethod, pattern: UrlPattern, handler: ResponseFn);
}

struct Registration {
    method: HttpMethod,
    pattern: UrlPattern,
    handler: ResponseFn,
}

/// In-memory transport double.
///
/// Registrations are matched in registration order; the first match wins.
#[derive(Default)]
pub struct MockBackend {
    routes: Vec<Registration>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Number of registered routes.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Dispatch one request; `None` when no registration matches.
    pub fn handle(
        &mut self,
        method: HttpMethod,
        raw_url: &str,
        body: Option<&str>,
        headers: &HashMap<String, String>,
    ) -> Option<MockResponse> {
        for registration in &mut self.routes {
            if registration.method != method {
                continue;
            }
            let Some(path_args) = registration.pattern.extract(raw_url) else {
                continue;
            };
            let request = HttpRequest::new(path_args, method, raw_url, body, headers.clone());
            return Some((registration.handler)(&request));
        }
        None
    }
}

impl TransportRegistry for MockBackend {
    fn when(&mut self, method: HttpMethod, pattern: UrlPattern, handler: ResponseFn) {
        self.routes.push(Registration {
            method,
            pattern,
            handler,
        });
    }
}
