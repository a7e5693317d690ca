//! Allocation graph model and its projection from the API payload
//!
//! The allocation-data endpoint returns a generic `{nodes, edges}` document.
//! This module turns it into a typed directed graph in which every node and
//! edge carries a category, and every category maps to a fixed style.
//!
//! Construction goes through [`GraphBuilder`], which enforces the two graph
//! invariants: node ids are unique, and edges only connect known nodes.

use crate::envelope::open_envelope;
use crate::error::{MalformedGraphError, ProjectionError};
use crate::style::{
    Color, EdgeStyle, NodeStyle, HAS_PERMISSION_COLOR, HAS_ROLE_COLOR, OTHER_COLOR, OTHER_SIZE,
    PERMISSION_COLOR, PERMISSION_SIZE, ROLE_COLOR, ROLE_SIZE, USER_COLOR, USER_SIZE,
};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Kind of entity a node represents
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// An account
    User,
    /// A role users are assigned to
    Role,
    /// A permission granted to roles
    Permission,
    /// Any `type` the API sent that is not one of the above
    Other(String),
}

impl NodeCategory {
    /// Map the payload's `type` field to a category
    #[must_use]
    pub fn from_type(raw: &str) -> Self {
        match raw {
            "user" => Self::User,
            "role" => Self::Role,
            "permission" => Self::Permission,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire name of the category
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Role => "role",
            Self::Permission => "permission",
            Self::Other(raw) => raw,
        }
    }

    /// Fixed color and size for this category
    #[must_use]
    pub fn style(&self) -> NodeStyle {
        let (color, size) = match self {
            Self::User => (USER_COLOR, USER_SIZE),
            Self::Role => (ROLE_COLOR, ROLE_SIZE),
            Self::Permission => (PERMISSION_COLOR, PERMISSION_SIZE),
            Self::Other(_) => (OTHER_COLOR, OTHER_SIZE),
        };
        NodeStyle { color, size }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of relation an edge represents
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeCategory {
    /// user -> role
    HasRole,
    /// role -> permission
    HasPermission,
    /// Any other `type` string
    Other(String),
}

impl EdgeCategory {
    /// Map the payload's `type` field to a category
    #[must_use]
    pub fn from_type(raw: &str) -> Self {
        match raw {
            "has-role" => Self::HasRole,
            "has-permission" => Self::HasPermission,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire name of the category
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::HasRole => "has-role",
            Self::HasPermission => "has-permission",
            Self::Other(raw) => raw,
        }
    }

    /// Fixed color for this category
    #[must_use]
    pub fn style(&self) -> EdgeStyle {
        let color: Color = match self {
            Self::HasRole => HAS_ROLE_COLOR,
            Self::HasPermission => HAS_PERMISSION_COLOR,
            Self::Other(_) => OTHER_COLOR,
        };
        EdgeStyle { color }
    }
}

impl fmt::Display for EdgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user, role or permission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Unique id, e.g. `user-1`
    pub id: String,
    /// Display label
    pub label: String,
    /// Entity kind
    pub category: NodeCategory,
}

impl Node {
    /// Create a node
    pub fn new(id: impl Into<String>, label: impl Into<String>, category: NodeCategory) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category,
        }
    }

    /// Style derived from the category
    #[inline]
    #[must_use]
    pub fn style(&self) -> NodeStyle {
        self.category.style()
    }
}

/// A directed relation between two node ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Relation kind
    pub category: EdgeCategory,
}

impl Edge {
    /// Create an edge
    pub fn new(source: impl Into<String>, target: impl Into<String>, category: EdgeCategory) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            category,
        }
    }

    /// Style derived from the category
    #[inline]
    #[must_use]
    pub fn style(&self) -> EdgeStyle {
        self.category.style()
    }
}

/// Typed allocation graph
///
/// Nodes and edges keep the order in which the payload listed them.
#[derive(Debug, Clone, Default)]
pub struct AllocationGraph {
    graph: DiGraph<Node, Edge>,
    index: HashMap<String, NodeIndex>,
}

impl AllocationGraph {
    /// Start building a graph
    #[inline]
    #[must_use]
    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// `true` when there are no nodes
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Nodes in payload order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Edges in payload order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    /// Edges as `(source position, target position, edge)`, positions
    /// indexing into [`nodes`](Self::nodes)
    pub fn links(&self) -> impl Iterator<Item = (usize, usize, &Edge)> {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), e.weight()))
    }

    /// Look up a node by id
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    /// `true` if a node with this id exists
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Count nodes of one category
    #[must_use]
    pub fn count_category(&self, category: &NodeCategory) -> usize {
        self.nodes().filter(|n| &n.category == category).count()
    }

    /// Borrow the underlying petgraph graph
    #[inline]
    #[must_use]
    pub fn as_petgraph(&self) -> &DiGraph<Node, Edge> {
        &self.graph
    }
}

/// Incremental, validating constructor for [`AllocationGraph`]
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: DiGraph<Node, Edge>,
    index: HashMap<String, NodeIndex>,
}

impl GraphBuilder {
    /// Pre-size for a known payload
    #[must_use]
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            index: HashMap::with_capacity(nodes),
        }
    }

    /// Add a node; ids must be unique
    pub fn add_node(&mut self, node: Node) -> Result<&mut Self, MalformedGraphError> {
        if self.index.contains_key(&node.id) {
            return Err(MalformedGraphError::DuplicateNode(node.id));
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        Ok(self)
    }

    /// Add an edge; both endpoints must already be present
    pub fn add_edge(&mut self, edge: Edge) -> Result<&mut Self, MalformedGraphError> {
        let lookup = |id: &str| {
            self.index
                .get(id)
                .copied()
                .ok_or_else(|| MalformedGraphError::DanglingEdge {
                    source_id: edge.source.clone(),
                    target_id: edge.target.clone(),
                    missing: id.to_string(),
                })
        };
        let from = lookup(&edge.source)?;
        let to = lookup(&edge.target)?;
        self.graph.add_edge(from, to, edge);
        Ok(self)
    }

    /// Finish construction
    #[must_use]
    pub fn build(self) -> AllocationGraph {
        AllocationGraph {
            graph: self.graph,
            index: self.index,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawGraph {
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    #[serde(deserialize_with = "string_or_number")]
    source: String,
    #[serde(deserialize_with = "string_or_number")]
    target: String,
    #[serde(rename = "type")]
    kind: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Project an allocation-data response into an [`AllocationGraph`]
///
/// Fails with `NoData` when `EC != 0` or `DT` is missing, and with
/// `MalformedGraph` when the payload breaks the graph contract.
pub fn project_graph(payload: &Value) -> Result<AllocationGraph, ProjectionError> {
    let data = open_envelope(payload)?;
    let raw = RawGraph::deserialize(data).map_err(|e| MalformedGraphError::Shape(e.to_string()))?;

    let mut builder = GraphBuilder::with_capacity(raw.nodes.len(), raw.edges.len());
    for node in raw.nodes {
        let category = NodeCategory::from_type(&node.kind);
        if let NodeCategory::Other(kind) = &category {
            tracing::warn!("node {} has unrecognized type '{}'", node.id, kind);
        }
        let label = node.label.unwrap_or_else(|| node.id.clone());
        builder.add_node(Node::new(node.id, label, category))?;
    }
    for edge in raw.edges {
        let category = EdgeCategory::from_type(&edge.kind);
        if let EdgeCategory::Other(kind) = &category {
            tracing::warn!(
                "edge {} -> {} has unrecognized type '{}'",
                edge.source,
                edge.target,
                kind
            );
        }
        builder.add_edge(Edge::new(edge.source, edge.target, category))?;
    }

    let graph = builder.build();
    tracing::debug!(
        "Projected allocation graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_rejects_duplicate_ids() {
        let mut builder = AllocationGraph::builder();
        builder
            .add_node(Node::new("u1", "Alice", NodeCategory::User))
            .unwrap();
        let err = builder
            .add_node(Node::new("u1", "Alicia", NodeCategory::User))
            .unwrap_err();
        assert_eq!(err, MalformedGraphError::DuplicateNode("u1".into()));
    }

    #[test]
    fn builder_rejects_dangling_edges() {
        let mut builder = AllocationGraph::builder();
        builder
            .add_node(Node::new("u1", "Alice", NodeCategory::User))
            .unwrap();
        let err = builder
            .add_edge(Edge::new("u1", "r9", EdgeCategory::HasRole))
            .unwrap_err();
        assert!(matches!(
            err,
            MalformedGraphError::DanglingEdge { ref missing, .. } if missing == "r9"
        ));
    }

    #[test]
    fn links_use_node_positions() {
        let mut builder = AllocationGraph::builder();
        builder
            .add_node(Node::new("u1", "Alice", NodeCategory::User))
            .unwrap()
            .add_node(Node::new("r1", "Admin", NodeCategory::Role))
            .unwrap()
            .add_edge(Edge::new("u1", "r1", EdgeCategory::HasRole))
            .unwrap();
        let graph = builder.build();

        let links: Vec<_> = graph.links().map(|(s, t, _)| (s, t)).collect();
        assert_eq!(links, vec![(0, 1)]);
    }

    #[test]
    fn numeric_ids_are_accepted() {
        let payload = json!({
            "EC": 0,
            "DT": {
                "nodes": [
                    {"id": 1, "label": "Alice", "type": "user"},
                    {"id": 2, "label": "Admin", "type": "role"}
                ],
                "edges": [{"source": 1, "target": 2, "type": "has-role"}]
            }
        });
        let graph = project_graph(&payload).unwrap();
        assert!(graph.contains("1"));
        assert!(graph.contains("2"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn category_names_roundtrip() {
        for raw in ["user", "role", "permission", "group"] {
            assert_eq!(NodeCategory::from_type(raw).as_str(), raw);
        }
        for raw in ["has-role", "has-permission", "owns"] {
            assert_eq!(EdgeCategory::from_type(raw).as_str(), raw);
        }
    }
}
