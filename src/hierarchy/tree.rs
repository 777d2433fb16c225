use serde::{
    Serialize, Serializer,
    ser::SerializeStruct,
};

use crate::domain::Identifier;

/// Handle to a node of a [`DocumentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Decoded attribute values of one node, in the order the spec object
/// stores them.
///
/// Serializes as a map whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(String, String)>);

impl Fields {
    /// Sets a field. A name that is already present keeps its position and
    /// takes the new value.
    pub fn insert(&mut self, name: String, value: String) {
        match self.0.iter().position(|(existing, _)| *existing == name) {
            Some(position) => self.0[position].1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Looks up a field value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Field names and values, in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the node has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// One spec object placed in a rebuilt document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNode {
    /// Long name of the spec object's type.
    pub node_type: String,
    /// Level recorded in the specification's hierarchy.
    pub level: usize,
    /// Decoded attribute values, keyed by attribute long name.
    pub fields: Fields,
    children: Vec<NodeId>,
}

impl DocumentNode {
    pub(crate) const fn new(
        node_type: String,
        level: usize,
        fields: Fields,
    ) -> Self {
        Self {
            node_type,
            level,
            fields,
            children: Vec::new(),
        }
    }

    /// Handles of the nodes nested directly under this one.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A specification rebuilt as a nested tree.
///
/// Nodes live in an arena and refer to their children by [`NodeId`]. The
/// top-level nodes are the children of the specification itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTree {
    identifier: Identifier,
    name: Option<String>,
    nodes: Vec<DocumentNode>,
    roots: Vec<NodeId>,
}

impl DocumentTree {
    pub(crate) const fn new(identifier: Identifier, name: Option<String>) -> Self {
        Self {
            identifier,
            name,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Adds a node as the last child of `parent`, or as a top-level node.
    pub(crate) fn attach(&mut self, parent: Option<NodeId>, node: DocumentNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        match parent {
            Some(NodeId(parent)) => self.nodes[parent].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Identifier of the specification this tree was built from.
    #[must_use]
    pub const fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Long name of the specification, if it has one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The top-level nodes, in document order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Looks up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&DocumentNode> {
        self.nodes.get(id.0)
    }

    /// Walks the tree depth-first in pre-order.
    ///
    /// Each node is yielded with its depth below the specification, starting
    /// at 1 for top-level nodes.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &DocumentNode)> + '_ {
        let mut pending: Vec<(NodeId, usize)> = self.roots.iter().rev().map(|&id| (id, 1)).collect();
        std::iter::from_fn(move || {
            let (NodeId(index), depth) = pending.pop()?;
            let node = &self.nodes[index];
            pending.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
            Some((depth, node))
        })
    }

    /// Flattens the tree back into `(node_type, depth)` pairs, in pre-order.
    #[must_use]
    pub fn flatten(&self) -> Vec<(&str, usize)> {
        self.iter()
            .map(|(depth, node)| (node.node_type.as_str(), depth))
            .collect()
    }
}

impl Serialize for DocumentTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Specification", 2)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field(
            "nodes",
            &Siblings {
                tree: self,
                ids: &self.roots,
            },
        )?;
        state.end()
    }
}

struct Siblings<'a> {
    tree: &'a DocumentTree,
    ids: &'a [NodeId],
}

impl Serialize for Siblings<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.ids.iter().map(|&NodeId(index)| NodeView {
            tree: self.tree,
            node: &self.tree.nodes[index],
        }))
    }
}

struct NodeView<'a> {
    tree: &'a DocumentTree,
    node: &'a DocumentNode,
}

impl Serialize for NodeView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Node", 4)?;
        state.serialize_field("node_type", &self.node.node_type)?;
        state.serialize_field("level", &self.node.level)?;
        state.serialize_field("fields", &self.node.fields)?;
        state.serialize_field(
            "nodes",
            &Siblings {
                tree: self.tree,
                ids: &self.node.children,
            },
        )?;
        state.end()
    }
}
