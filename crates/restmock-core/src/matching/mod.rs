//! URL template compilation and query-string parsing.

mod pattern;
mod query;

pub use pattern::UrlPattern;
pub use query::parse_query_string;
