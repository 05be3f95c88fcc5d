//! # Resource Document Model
//!
//! This crate provides the in-memory tree model shared by every resource
//! document codec for the *Divinity* and *Baldur's Gate* games: level object
//! collections, globals, mod metadata and save-game state all use the same
//! structure regardless of which on-disk encoding carried them.
//!
//! ## Structure
//!
//! A [`Resource`] is the root object. It carries document version metadata
//! and an ordered set of [`Region`]s, each of which is a named entry point
//! into a tree of [`Node`]s. Nodes are stored in a flat [`NodeArena`] and
//! addressed by [`NodeId`], so a child's back-reference to its parent is a
//! plain index with no ownership cycle.
//!
//! Every node has a name, an ordered map of typed attributes, and children
//! grouped by tag name. Group order and the order of siblings within a group
//! both follow document order and are preserved by all codecs.
//!
//! ## Attributes
//!
//! Attribute values come from a closed vocabulary of roughly thirty kinds
//! ([`AttributeType`]): integers of several widths, floats, fixed-size
//! vectors and matrices, booleans, six string kinds, UUIDs, opaque byte
//! buffers, and two localized string kinds. [`AttributeValue`] is a sum type
//! over that vocabulary, so the value shape always matches the declared
//! type. Each kind owns a canonical, lossless text encoding used by the
//! text codec.
//!
//! ## Localized strings
//!
//! [`TranslatedString`] is a handle-addressed localization entry with
//! optional inline fallback text; legacy documents store a localization
//! table version stamp instead of the text. [`TranslatedFSString`] extends
//! this with ordered keyed arguments whose substitutions are themselves
//! localized templates, recursively.

pub mod attribute;
pub mod error;
pub mod localization;
pub mod types;

pub use attribute::{AttributeType, AttributeValue};
pub use localization::{TranslatedFSString, TranslatedFSStringArgument, TranslatedString};
pub use types::{Metadata, Node, NodeArena, NodeId, Region, Resource};
