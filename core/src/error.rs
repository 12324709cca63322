//! Error types for the Payant client.
//!
//! # Design
//! `ValidationError` covers every pre-flight rejection and names the field
//! that failed, so callers can branch on the kind and report the field.
//! `ApiError` is what every public operation returns: a validation failure,
//! a configuration problem, or whatever went wrong on the wire. Transport
//! errors from `ureq` are carried as-is.

use thiserror::Error;

/// A rule rejected caller input before any request was built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A single mandatory value was not supplied.
    #[error("required value missing: {field}")]
    RequiredValueMissing { field: &'static str },

    /// One or more keys of a required set are absent from the input.
    #[error("missing required values: {}", .missing.join(", "))]
    RequiredValuesMissing { missing: Vec<&'static str> },

    /// A mandatory scalar is absent or empty.
    #[error("{field} is null")]
    IsNull { field: &'static str },

    /// A value is outside its allowed domain.
    #[error("invalid {field}: {value:?} (allowed: {expected})")]
    IsInvalid {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// An identifier or reference code is absent or empty.
    #[error("null or invalid {field}")]
    IsNullOrInvalid { field: &'static str },

    /// `fee_bearer` is neither `account` nor `client`.
    #[error("invalid fee bearer {0:?}: use either 'account' or 'client'")]
    InvalidFeeBearer(String),
}

impl ValidationError {
    /// True for domain violations, including the fee-bearer specialization.
    pub fn is_invalid(&self) -> bool {
        matches!(
            self,
            ValidationError::IsInvalid { .. } | ValidationError::InvalidFeeBearer(_)
        )
    }
}

/// Errors returned by every Payant operation.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] ureq::Error),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// The validation failure behind this error, if that is what it is.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ApiError::Validation(err) => Some(err),
            _ => None,
        }
    }
}
