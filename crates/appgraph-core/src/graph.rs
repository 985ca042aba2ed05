//! Immutable graph snapshot produced by one extraction

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::model::*;

/// Provenance recorded alongside a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub creator: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl GraphMetadata {
    pub fn new(creator: impl Into<String>, description: impl Into<String>) -> Self {
        GraphMetadata {
            creator: creator.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

impl Default for GraphMetadata {
    fn default() -> Self {
        GraphMetadata::new("appgraph", "")
    }
}

/// The dependency graph: ordered nodes and edges plus metadata.
///
/// Node and edge order is discovery order and is preserved by writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    id: String,
    name: String,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    metadata: GraphMetadata,
    directed: bool,
}

impl Graph {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        metadata: GraphMetadata,
    ) -> Self {
        Graph {
            id: id.into(),
            name: name.into(),
            nodes,
            edges,
            metadata,
            directed: true,
        }
    }

    /// Build a graph whose id is derived from its name.
    pub fn named(
        name: impl Into<String>,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        metadata: GraphMetadata,
    ) -> Self {
        let name = name.into();
        Graph::new(crate::naming::graph_id_for(&name), name, nodes, edges, metadata)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }

    pub fn directed(&self) -> bool {
        self.directed
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get a node by ID.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    /// Get all nodes of a specific type.
    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(move |n| n.node_type() == node_type)
    }

    /// Get all edges of a specific type.
    pub fn edges_of_type(&self, edge_type: EdgeType) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.edge_type() == edge_type)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &BindingNode> + '_ {
        self.nodes.iter().filter_map(Node::as_binding)
    }

    pub fn components(&self) -> impl Iterator<Item = &ComponentNode> + '_ {
        self.nodes.iter().filter_map(Node::as_component)
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleNode> + '_ {
        self.nodes.iter().filter_map(Node::as_module)
    }

    pub fn missing_bindings(&self) -> impl Iterator<Item = &MissingBindingNode> + '_ {
        self.nodes.iter().filter_map(Node::as_missing_binding)
    }

    /// Find the binding node for a request key.
    pub fn binding_for_key(&self, key: &str) -> Option<&BindingNode> {
        self.bindings().find(|b| b.key == key)
    }

    /// Check the structural invariants every extracted graph must hold.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id()) {
                return Err(GraphError::DuplicateNodeId(node.id().clone()));
            }
        }

        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !ids.contains(endpoint) {
                    return Err(GraphError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
        }

        let mut keys = HashSet::new();
        let mut per_module: HashMap<&str, u32> = HashMap::new();
        for binding in self.bindings() {
            if !keys.insert(binding.key.as_str()) {
                return Err(GraphError::DuplicateBindingKey(binding.key.clone()));
            }
            if let Some(module) = &binding.contributing_module {
                *per_module.entry(module.as_str()).or_insert(0) += 1;
            }
        }

        for module in self.modules() {
            let actual = per_module
                .get(module.qualified_name.as_str())
                .copied()
                .unwrap_or(0);
            if actual != module.binding_count {
                return Err(GraphError::ModuleBindingCount {
                    module: module.qualified_name.clone(),
                    declared: module.binding_count,
                    actual,
                });
            }
        }

        Ok(())
    }
}
