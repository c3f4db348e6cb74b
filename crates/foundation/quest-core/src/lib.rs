//! # Item Quest Core
//!
//! Foundation types shared by every Item Quest crate: the action kinds that
//! earn quest credit, request/response traces, custom field values, the
//! item and dashboard data model, and the presentation sink the runtime
//! renders through.
//!
//! ```text
//! command ──► field merge ──► request ──► trace ──► response ──► quest
//!                                            │           │          │
//!                                            └───────────┴──────────┴──► sink
//! ```

pub mod field;
pub mod item;
pub mod sink;
pub mod types;

pub use field::{parse_js_number, CustomField, FieldType, FieldValue};
pub use item::{display_value, ChartSeries, DashboardSnapshot, Item, TableRow, BASE_ITEM_KEYS};
pub use sink::{NullSink, PresentationSink};
pub use types::{ActionKind, HttpMethod, QuestProgress, RequestTrace, ResponseTrace};

/// Result type for Item Quest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Item Quest
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input rejected before any state was touched
    #[error("Validation error: {0}")]
    Validation(String),

    /// The API answered with a non-2xx status
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a transport failure
    pub fn network<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Network(err.into())
    }

    /// HTTP status carried by a request error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_displays_server_detail() {
        let err = Error::Request {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_network_error_keeps_message() {
        let err = Error::network("connection refused");
        assert_eq!(err.to_string(), "Network error: connection refused");
        assert_eq!(err.status(), None);
    }
}
