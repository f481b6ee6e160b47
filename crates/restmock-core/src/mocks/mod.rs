//! Mock surfaces: base routing and the CRUD resource layer on top of it.

mod basic;
mod resource;
mod response;

pub use basic::{BasicMock, RouteFn};
pub use resource::{create_resource_mock, ResourceMock};
pub use response::build_response;
