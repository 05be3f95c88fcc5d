//! Localized string types embedded in resource documents.
//!

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A handle-addressed localization entry.
///
/// Current documents carry the resolved text inline in `value`; legacy
/// documents store only a localization table `version` stamp and resolve the
/// text at load time. One of the two is always present.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TranslatedString {
    /// Handle addressing this entry in the localization tables
    pub handle: String,

    /// Inline fallback text, when the document carried one
    pub value: Option<String>,

    /// Localization table version stamp used instead of inline text
    pub version: Option<u16>,
}

impl TranslatedString {
    /// Create an entry with inline text.
    pub fn new(handle: impl Into<String>, value: impl Into<String>) -> TranslatedString {
        TranslatedString {
            handle: handle.into(),
            value: Some(value.into()),
            version: None,
        }
    }
}

/// A localization template supporting keyed argument substitution.
///
/// Each argument's substitution is itself a full localized template, so the
/// structure nests recursively to the depth of the document.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TranslatedFSString {
    /// Handle addressing this entry in the localization tables
    pub handle: String,

    /// Template text
    pub value: String,

    /// Ordered substitution arguments
    pub arguments: Vec<TranslatedFSStringArgument>,
}

impl TranslatedFSString {
    /// Create a template with no arguments.
    pub fn new(handle: impl Into<String>, value: impl Into<String>) -> TranslatedFSString {
        TranslatedFSString {
            handle: handle.into(),
            value: value.into(),
            arguments: Vec::new(),
        }
    }
}

/// One keyed substitution inside a [`TranslatedFSString`]
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TranslatedFSStringArgument {
    /// Placeholder key this argument substitutes
    pub key: String,

    /// Raw substitution text
    pub value: String,

    /// Localized template producing the substitution
    pub string: TranslatedFSString,
}
