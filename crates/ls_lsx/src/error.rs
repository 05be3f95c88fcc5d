//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`quick_xml::Error`]
    #[error(transparent)]
    XmlError(#[from] quick_xml::Error),

    /// Transparent wrapper for [`quick_xml::events::attributes::AttrError`]
    #[error(transparent)]
    XmlAttrError(#[from] quick_xml::events::attributes::AttrError),

    /// Transparent wrapper for [`ls_resource::error::Error`]
    #[error(transparent)]
    ResourceError(#[from] ls_resource::error::Error),

    /// Transparent wrapper for [`std::num::ParseIntError`]
    #[error(transparent)]
    ParseIntError(#[from] std::num::ParseIntError),

    /// Document root is not a `save` element
    #[error("expected a save element at the document root")]
    UnexpectedRoot,

    /// Region opened while another region is still open
    #[error("regions cannot nest")]
    NestedRegion,

    /// Node element found outside any region
    #[error("node element outside a region")]
    NodeOutsideRegion,

    /// Attribute element found outside any node
    #[error("attribute element outside a node")]
    AttributeOutsideNode,

    /// Region closed while node elements are still open
    #[error("region closed with {0} node element(s) still open")]
    UnbalancedRegion(usize),

    /// Element name outside the format vocabulary
    #[error("unknown element {0:?}")]
    UnknownElement(String),

    /// A field the format requires is missing
    #[error("missing required field {0:?}")]
    MissingRequiredField(&'static str),

    /// Declared argument count disagrees with the arguments present
    #[error("declared {declared} argument(s), found {found}")]
    ArgumentCountMismatch {
        /// Count declared on the attribute element
        declared: usize,
        /// Number of argument elements actually present
        found: usize,
    },

    /// Document version requires a newer dialect than requested
    #[error("major version {major} documents cannot be written as v3")]
    IncompatibleDowngrade {
        /// Major format version of the document
        major: u32,
    },

    /// Localized string arguments nested beyond the supported depth
    #[error("localized string arguments nested deeper than {0} levels")]
    RecursionLimit(usize),

    /// Document ended in the middle of an element
    #[error("unexpected end of document")]
    UnexpectedEof,

    /// A parse failure located at a byte offset in the input
    #[error("parse error at byte {position}")]
    Parse {
        /// Byte offset in the input where reading stopped
        position: u64,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
