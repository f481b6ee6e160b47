//! In-memory mock REST backend for exercising CRUD flows in test suites.
//!
//! A [`ResourceMock`] mounts a resource family (`/books`, `/stores/?/foods`)
//! onto an injected transport registry and serves index/show/create/update/
//! delete against a JSON storage tree, so application code under test can
//! issue realistic HTTP traffic without a server. [`BasicMock`] is the lower
//! layer for custom routes sharing the same envelope and option handling.
//!
//! ```
//! use restmock_core::{DataSource, HttpMethod, MockBackend, MockOptions, ResourceMock};
//! use serde_json::json;
//! use std::collections::HashMap;
//!
//! let mut backend = MockBackend::new();
//! let data = DataSource::from(json!({ "1": { "id": 1, "title": "Dune" } }));
//! ResourceMock::create(&mut backend, "/books", data, MockOptions::default())?;
//!
//! let response = backend
//!     .handle(HttpMethod::Get, "/books/1", None, &HashMap::new())
//!     .unwrap();
//! assert_eq!(response.status, 200);
//! assert_eq!(response.json()["title"], "Dune");
//! # Ok::<(), restmock_core::MockError>(())
//! ```

pub mod error;
pub mod matching;
pub mod mocks;
pub mod storage;
pub mod transport;
pub mod types;

pub use error::MockError;
pub use matching::UrlPattern;
pub use mocks::{build_response, create_resource_mock, BasicMock, ResourceMock, RouteFn};
pub use storage::DataSource;
pub use transport::{MockBackend, ResponseFn, TransportRegistry};
pub use types::options::{DebugFn, DebugMode, LabelSetting, MockOptions, OptionsPatch};
pub use types::request::{HttpMethod, HttpRequest};
pub use types::response::{HttpError, MockResponse, ResponseInfo, RouteResult};
