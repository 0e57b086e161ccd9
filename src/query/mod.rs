//! Free-text query parsing: classification of query words into typed
//! search parameters.

pub mod datetime;
pub mod param;
pub mod parser;

pub use param::{Bound, SearchQueryParam};
pub use parser::SearchQuery;
