//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::num::ParseIntError`]
    #[error(transparent)]
    ParseIntError(#[from] std::num::ParseIntError),

    /// Transparent wrapper for [`std::num::ParseFloatError`]
    #[error(transparent)]
    ParseFloatError(#[from] std::num::ParseFloatError),

    /// Transparent wrapper for [`base64::DecodeError`]
    #[error(transparent)]
    Base64Error(#[from] base64::DecodeError),

    /// Transparent wrapper for [`uuid::Error`]
    #[error(transparent)]
    UuidError(#[from] uuid::Error),

    /// Attribute type outside the closed type vocabulary
    #[error("unsupported attribute data type")]
    UnsupportedType(#[from] UnsupportedTypeError),

    /// Text does not form a valid boolean
    #[error("invalid boolean value {0:?}")]
    InvalidBool(String),

    /// Wrong number of components for a vector or matrix value
    #[error("a value of {expected} components was expected, got {found}")]
    ComponentCountMismatch {
        /// Component count required by the attribute type
        expected: usize,
        /// Component count found in the text
        found: usize,
    },
}

/// Error type to provide further information when a type lookup fails
#[derive(Error, Diagnostic, Debug)]
pub enum UnsupportedTypeError {
    /// unknown type name
    #[error("unknown type name {0:?}")]
    Name(String),

    /// numeric id above the maximum defined id
    #[error("type id {0} exceeds the maximum defined id")]
    Id(u32),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
