//! Shared request, response, and configuration types.

pub mod options;
pub mod request;
pub mod response;
