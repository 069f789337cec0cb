//! Errors raised while translating JSON:API query parameters.
//!
//! Failures of the ORM collaborator (connection, execution) are not wrapped
//! here; they reach the caller in the collaborator's own error type.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A filter qualifier does not name any mapped resource.
    #[error("configuration error: filter targets unknown resource `{0}`")]
    UnknownResourceFilter(String),

    /// The resource a query selects from has no mapping.
    #[error("configuration error: no mapping registered for resource type `{0}`")]
    UnmappedResource(String),

    #[error("configuration error: resource type `{0}` is mapped more than once")]
    DuplicateMapping(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid filter key `{0}`: resource and field names must not be empty")]
    InvalidFilterKey(String),

    #[error("invalid page[{param}] value `{value}`: expected a non-negative integer")]
    InvalidPageParam { param: &'static str, value: String },

    #[error("invalid query string: {0}")]
    InvalidQueryString(String),
}

impl Error {
    /// Whether the mapping layer could not resolve a resource or was set up wrongly.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::UnknownResourceFilter(_)
                | Error::UnmappedResource(_)
                | Error::DuplicateMapping(_)
                | Error::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
