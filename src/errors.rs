// 🚨 Error Types
// Mapping, validation and fetch failures, each scoped to one record or call

use thiserror::Error;

use crate::records::ObjectType;

/// Failure inside a vendor field mapping (vendor entity → field map).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid amount for `{field}`: {value:?}")]
    InvalidAmount { field: &'static str, value: String },

    #[error("could not encode `{field}`: {message}")]
    Encode { field: &'static str, message: String },
}

/// Failure while building a normalized record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Only surfaced under `FallbackPolicy::Strict`
    #[error("{vendor} {object} mapping failed: {source}")]
    Mapping {
        vendor: &'static str,
        object: ObjectType,
        #[source]
        source: MappingError,
    },

    #[error("invalid {object}: {message}")]
    Validation { object: ObjectType, message: String },

    /// Element of a collection failed; `index` is its position in the source
    #[error("{object} #{index}: {source}")]
    Element {
        object: ObjectType,
        index: usize,
        #[source]
        source: Box<RecordError>,
    },
}

impl RecordError {
    pub fn validation(object: ObjectType, message: impl Into<String>) -> Self {
        RecordError::Validation {
            object,
            message: message.into(),
        }
    }

    /// Wrap this error with the position of the failing collection element
    pub fn at(self, object: ObjectType, index: usize) -> Self {
        RecordError::Element {
            object,
            index,
            source: Box::new(self),
        }
    }
}

/// Failure of `fetch_orders`.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Invalid argument: the session is not signed in
    #[error("session must be authenticated")]
    Unauthenticated,

    #[error("failed to retrieve order history: {0:#}")]
    Vendor(anyhow::Error),

    #[error(transparent)]
    Record(#[from] RecordError),
}
