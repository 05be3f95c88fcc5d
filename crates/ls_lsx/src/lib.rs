//! # LSX Format Documentation
//!
//! This crate provides utilities to read and write the **LSX** format used by
//! the games *Divinity: Original Sin* and *Baldur's Gate 3*. LSX is an XML
//! encoding of the resource document tree from [`ls_resource`] and is the
//! editable text sibling of the binary resource formats. LSX files are
//! typically identified with the `.lsx` extension.
//!
//! ## Document Structure
//!
//! An LSX document is a single `save` element containing version metadata
//! followed by one or more regions:
//!
//! | Element        | Parent         | Description                                                |
//! |----------------|----------------|------------------------------------------------------------|
//! | `save`         | —              | Document root                                              |
//! | `header`       | `save`         | Optional, carries the creation `time` stamp                |
//! | `version`      | `save`         | `major`/`minor`/`revision`/`build` format version          |
//! | `region`       | `save`         | Named entry point, `id` is the region name                 |
//! | `node`         | `region`/`children` | Tree node, `id` is the node name                      |
//! | `attribute`    | `node`         | Typed leaf value: `id`, `type` and a value encoding        |
//! | `children`     | `node`         | Wrapper around a node's child nodes                        |
//!
//! The first `node` inside a `region` is the region's root; the two elements
//! describe one object. Child nodes always sit inside a `children` wrapper,
//! which is only present when the node has children.
//!
//! ## Dialects
//!
//! The `major` version on the `version` element selects the dialect
//! ([`LsxVersion`]): documents with a major version below 4 declare
//! attribute types by numeric id (`type="4"`), documents at 4 or above by
//! symbolic name (`type="int32"`). The document structure is otherwise
//! identical. A document with a major version of 4 or above cannot be
//! written in the v3 dialect.
//!
//! ## Attribute Encoding
//!
//! Most attributes are a single self-closing element whose `value` attribute
//! carries the canonical text encoding of the typed value. The two localized
//! string kinds differ:
//!
//! - `TranslatedString` adds a `handle` attribute and either an inline
//!   `value` or a legacy localization table `version` stamp.
//! - `TranslatedFSString` adds `handle` and an `arguments` count, followed by
//!   an `arguments` element body whose `argument` entries each nest a full
//!   `string` template recursively.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.lsx`
//! - **Encoding**: UTF-8 XML
//!

pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use read::LsxReader;
pub use types::LsxVersion;
pub use write::{LsxWriter, LsxWriterOptions};
