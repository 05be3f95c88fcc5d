//! Shared types for the LSX codec
//!

/// Dialect of the LSX format.
///
/// The two dialects share the document structure and differ only in how an
/// attribute's type is declared: v3 documents carry the numeric type id, v4
/// documents the symbolic type name.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LsxVersion {
    /// Numeric attribute type ids
    #[default]
    V3,
    /// Symbolic attribute type names
    V4,
}

impl LsxVersion {
    /// Dialect implied by a document's major format version.
    pub fn from_major_version(major: u32) -> LsxVersion {
        if major >= 4 {
            LsxVersion::V4
        } else {
            LsxVersion::V3
        }
    }
}
