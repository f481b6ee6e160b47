//! Error types for mock construction and configuration.

use thiserror::Error;

/// Programmer errors surfaced synchronously at the point of misuse.
///
/// Resource-not-found conditions are not represented here: a missing storage
/// path is an ordinary dispatch outcome that the envelope builder turns into
/// a 404 response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MockError {
    /// URL template falls outside the `(/segment)*` grammar
    #[error("invalid url template: \"{template}\"")]
    InvalidTemplate { template: String },
    /// Option key outside the recognized set
    #[error("unknown option key: {key}")]
    UnknownOption { key: String },
    /// Option value of the wrong shape (labels accept `false` or a string)
    #[error("invalid option value: {reason}")]
    InvalidOptionValue { reason: String },
}
