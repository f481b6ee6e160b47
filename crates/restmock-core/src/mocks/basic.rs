//! Free-form mock endpoints with explicit route registration.

use crate::error::MockError;
use crate::matching::UrlPattern;
use crate::mocks::response::build_response;
use crate::transport::TransportRegistry;
use crate::types::options::{DebugFn, DebugMode, MockOptions, OptionsPatch};
use crate::types::request::{HttpMethod, HttpRequest};
use crate::types::response::RouteResult;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Handler for one registered route.
pub type RouteFn = Box<dyn FnMut(&HttpRequest) -> RouteResult>;

struct MockState {
    base_template: String,
    options: MockOptions,
}

/// A mounted mock endpoint family with free-form routes.
///
/// `BasicMock` owns the validated base template and the options record;
/// routes registered through it get the full envelope treatment (404
/// substitution, labels, debug hook) with the options as they are at request
/// time. [`ResourceMock`](crate::mocks::ResourceMock) composes one of these
/// for its CRUD routes.
///
/// Cloning yields another handle onto the same state.
#[derive(Clone)]
pub struct BasicMock {
    state: Rc<RefCell<MockState>>,
}

impl BasicMock {
    /// Create a mock rooted at `base_url` (may be empty).
    pub fn new(base_url: &str, options: MockOptions) -> Result<Self, MockError> {
        // grammar check only; per-route patterns are compiled on registration
        UrlPattern::compile(base_url)?;
        Ok(Self {
            state: Rc::new(RefCell::new(MockState {
                base_template: base_url.to_string(),
                options,
            })),
        })
    }

    /// Register a route at `base_url + suffix`.
    ///
    /// The suffix obeys the template grammar and may be empty. The handler
    /// result passes through the envelope builder, so `Ok(None)` turns into
    /// a 404 response.
    pub fn route(
        &self,
        registry: &mut dyn TransportRegistry,
        method: HttpMethod,
        suffix: &str,
        mut handler: RouteFn,
    ) -> Result<(), MockError> {
        let full_template = format!("{}{}", self.state.borrow().base_template, suffix);
        let pattern = UrlPattern::compile(&full_template)?;

        let state = Rc::clone(&self.state);
        registry.when(
            method,
            pattern,
            Box::new(move |request| {
                let result = handler(request);
                build_response(result, &state.borrow().options, request)
            }),
        );
        Ok(())
    }

    /// Merge a typed partial options record; returns self for chaining.
    pub fn set_options(&self, patch: OptionsPatch) -> &Self {
        self.state.borrow_mut().options.apply(patch);
        self
    }

    /// Merge options from external JSON input, rejecting unknown keys.
    pub fn set_options_value(&self, value: &Value) -> Result<&Self, MockError> {
        let patch = OptionsPatch::from_value(value)?;
        Ok(self.set_options(patch))
    }

    /// Install a custom debug hook.
    pub fn set_debug_hook(&self, hook: Rc<DebugFn>) -> &Self {
        self.state.borrow_mut().options.debug = DebugMode::Hook(hook);
        self
    }

    /// The validated base template.
    pub fn base_template(&self) -> String {
        self.state.borrow().base_template.clone()
    }

    /// Snapshot of the current options.
    pub fn options(&self) -> MockOptions {
        self.state.borrow().options.clone()
    }
}
