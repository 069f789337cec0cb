//! JSON:API error documents (pure data, no HTTP framework dependencies).
//!
//! ```json
//! {"errors":[{"status":"400","code":"invalid_filter_key","title":"Invalid Filter Key",
//!             "detail":"...","source":{"parameter":"filter[user.]"}}]}
//! ```

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Error;

/// JSON:API carries the status as a string, e.g. `"400"`.
#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(status.as_str())
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    StatusCode::from_bytes(raw.as_bytes()).map_err(serde::de::Error::custom)
}

/// Which request parameter caused the error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
    pub parameter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct ErrorObject {
    #[serde(
        serialize_with = "serialize_status",
        deserialize_with = "deserialize_status"
    )]
    pub status: StatusCode,
    /// Machine-readable error code.
    pub code: String,
    pub title: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
}

impl ErrorObject {
    fn new(status: StatusCode, code: &str, title: &str, detail: String) -> Self {
        Self {
            status,
            code: code.to_owned(),
            title: title.to_owned(),
            detail,
            source: None,
        }
    }

    fn parameter(mut self, parameter: impl Into<String>) -> Self {
        self.source = Some(ErrorSource {
            parameter: parameter.into(),
        });
        self
    }
}

/// Top-level `{"errors": [...]}` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

impl ErrorDocument {
    /// Status of the first error, used as the response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.errors
            .first()
            .map_or(StatusCode::INTERNAL_SERVER_ERROR, |e| e.status)
    }
}

impl From<&Error> for ErrorObject {
    fn from(err: &Error) -> Self {
        let detail = err.to_string();
        match err {
            Error::UnknownResourceFilter(_) => ErrorObject::new(
                StatusCode::BAD_REQUEST,
                "unknown_resource_filter",
                "Unknown Filter Resource",
                detail,
            )
            .parameter("filter"),
            Error::InvalidFilterKey(key) => ErrorObject::new(
                StatusCode::BAD_REQUEST,
                "invalid_filter_key",
                "Invalid Filter Key",
                detail,
            )
            .parameter(format!("filter[{key}]")),
            Error::InvalidPageParam { param, .. } => ErrorObject::new(
                StatusCode::BAD_REQUEST,
                "invalid_page_param",
                "Invalid Page Parameter",
                detail,
            )
            .parameter(format!("page[{param}]")),
            Error::InvalidQueryString(_) => ErrorObject::new(
                StatusCode::BAD_REQUEST,
                "invalid_query_string",
                "Invalid Query String",
                detail,
            ),
            // Server-side setup problems: keep the detail out of client responses
            Error::UnmappedResource(_) | Error::DuplicateMapping(_) | Error::Config(_) => {
                ErrorObject::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration_error",
                    "Configuration Error",
                    "The resource mapping is not configured correctly".to_owned(),
                )
            }
        }
    }
}

impl From<Error> for ErrorDocument {
    fn from(err: Error) -> Self {
        ErrorDocument {
            errors: vec![ErrorObject::from(&err)],
        }
    }
}
