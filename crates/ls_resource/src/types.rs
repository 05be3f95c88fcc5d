//! The resource document tree: arena, nodes, regions and metadata.
//!

use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::attribute::AttributeValue;

/// Document version metadata carried by the root of a resource.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Metadata {
    /// Creation timestamp, informational only
    pub timestamp: u64,
    /// Major format version, drives codec dialect selection
    pub major_version: u32,
    /// Minor format version
    pub minor_version: u32,
    /// Revision number
    pub revision: u32,
    /// Build number
    pub build_number: u32,
}

impl Default for Metadata {
    fn default() -> Metadata {
        Metadata {
            timestamp: 0,
            major_version: 3,
            minor_version: 0,
            revision: 0,
            build_number: 0,
        }
    }
}

/// Index of a [`Node`] inside its [`NodeArena`].
///
/// Ids are only meaningful for the arena that issued them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(usize);

/// One named tree node with typed attributes and name-grouped children.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// Tag name of this node
    pub name: String,

    /// Attributes keyed by name, in document order
    pub attributes: IndexMap<String, AttributeValue>,

    parent: Option<NodeId>,

    children: IndexMap<String, Vec<NodeId>>,
}

impl Node {
    /// Create a detached node with no attributes or children.
    pub fn new(name: impl Into<String>) -> Node {
        Node {
            name: name.into(),
            ..Node::default()
        }
    }

    /// Parent of this node, `None` for region roots and detached nodes
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children grouped by tag name; groups and members keep document order
    pub fn children(&self) -> &IndexMap<String, Vec<NodeId>> {
        &self.children
    }

    /// Total number of direct children across all groups
    pub fn child_count(&self) -> usize {
        self.children.values().map(Vec::len).sum()
    }
}

/// Flat storage for every [`Node`] of a [`Resource`].
///
/// Nodes never move once inserted, so a [`NodeId`] stays valid for the
/// lifetime of the arena.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    /// Insert a detached node and return its id.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Borrow the node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` was issued by a different arena.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Mutably borrow the node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` was issued by a different arena.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Attach `child` under `parent`, appending to the child's name group.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        let name = self.nodes[child.0].name.clone();
        self.nodes[parent.0]
            .children
            .entry(name)
            .or_default()
            .push(child);
    }

    /// Number of nodes below `id`, the node itself excluded.
    pub fn descendant_count(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            for group in self.node(current).children.values() {
                count += group.len();
                pending.extend_from_slice(group);
            }
        }
        count
    }

    /// Number of nodes stored in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the arena holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A named entry point into the node tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Region {
    /// Region name, unique within the document
    pub name: String,
    /// Root node of this region's tree
    pub root: NodeId,
}

/// A complete resource document: metadata plus an ordered set of regions
/// over a shared node arena.
///
/// # Examples
///
/// ```
/// use ls_resource::{AttributeValue, Node, Resource};
///
/// let mut resource = Resource::new();
/// let root = resource.add_region("Templates", Node::new("Templates"));
/// let child = resource.append_child(root, Node::new("GameObjects"));
/// resource
///     .node_mut(child)
///     .attributes
///     .insert("Name".into(), AttributeValue::FixedString("Chest".into()));
///
/// assert_eq!(resource.node(root).child_count(), 1);
/// assert_eq!(resource.node(child).parent(), Some(root));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Resource {
    /// Document version metadata
    pub metadata: Metadata,

    /// Regions keyed by name, in document order
    pub regions: IndexMap<String, Region>,

    /// Storage for every node of every region
    pub arena: NodeArena,
}

impl Resource {
    /// Create an empty resource with default metadata.
    pub fn new() -> Resource {
        Resource::default()
    }

    /// Register a new region rooted at `root` and return the root's id.
    pub fn add_region(&mut self, name: impl Into<String>, root: Node) -> NodeId {
        let name = name.into();
        let id = self.arena.insert(root);
        self.regions.insert(
            name.clone(),
            Region {
                name,
                root: id,
            },
        );
        id
    }

    /// Borrow the node behind `id`, see [`NodeArena::node`].
    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.node(id)
    }

    /// Mutably borrow the node behind `id`, see [`NodeArena::node_mut`].
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.arena.node_mut(id)
    }

    /// Insert `child` into the arena and attach it under `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: Node) -> NodeId {
        let id = self.arena.insert(child);
        self.arena.append_child(parent, id);
        id
    }
}
