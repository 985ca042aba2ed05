//! Summary statistics and dependency-cycle detection

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use crate::graph::Graph;
use crate::model::{EdgeKind, EdgeType, NodeId, NodeType};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub nodes_by_type: BTreeMap<NodeType, usize>,
    pub edges_by_type: BTreeMap<EdgeType, usize>,
    pub entry_points: usize,
    pub missing_bindings: usize,
    /// Each cycle lists the node ids of one strongly connected component of
    /// the binding-to-binding dependency subgraph.
    pub dependency_cycles: Vec<Vec<NodeId>>,
}

impl GraphStats {
    pub fn from_graph(graph: &Graph) -> Self {
        let mut stats = GraphStats {
            total_nodes: graph.node_count(),
            total_edges: graph.edge_count(),
            ..Default::default()
        };

        for node in graph.nodes() {
            *stats.nodes_by_type.entry(node.node_type()).or_insert(0) += 1;
        }
        for edge in graph.edges() {
            *stats.edges_by_type.entry(edge.edge_type()).or_insert(0) += 1;
        }

        stats.entry_points = graph.bindings().filter(|b| b.is_entry_point).count();
        stats.missing_bindings = graph.missing_bindings().count();
        stats.dependency_cycles = dependency_cycles(graph);
        stats
    }

    pub fn nodes_of(&self, node_type: NodeType) -> usize {
        self.nodes_by_type.get(&node_type).copied().unwrap_or(0)
    }

    pub fn edges_of(&self, edge_type: EdgeType) -> usize {
        self.edges_by_type.get(&edge_type).copied().unwrap_or(0)
    }

    pub fn has_cycles(&self) -> bool {
        !self.dependency_cycles.is_empty()
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes ({} components, {} bindings, {} modules, {} missing), {} edges ({} dependencies), {} entry points, {} cycles",
            self.total_nodes,
            self.nodes_of(NodeType::Component),
            self.nodes_of(NodeType::Binding),
            self.nodes_of(NodeType::Module),
            self.nodes_of(NodeType::MissingBinding),
            self.total_edges,
            self.edges_of(EdgeType::Dependency),
            self.entry_points,
            self.dependency_cycles.len()
        )
    }
}

/// Strongly connected components of size > 1 (or self-loops) among
/// non-entry-point dependency edges. Edges with unknown endpoints are ignored.
pub fn dependency_cycles(graph: &Graph) -> Vec<Vec<NodeId>> {
    let mut inner: DiGraph<NodeId, ()> = DiGraph::new();
    let mut index: HashMap<&NodeId, NodeIndex> = HashMap::new();
    for node in graph.nodes() {
        index.insert(node.id(), inner.add_node(node.id().clone()));
    }

    let mut self_loops = Vec::new();
    for edge in graph.edges() {
        if edge.kind != (EdgeKind::Dependency { is_entry_point: false }) {
            continue;
        }
        let (Some(&source), Some(&target)) = (index.get(&edge.source), index.get(&edge.target))
        else {
            continue;
        };
        if source == target {
            self_loops.push(edge.source.clone());
        }
        inner.add_edge(source, target, ());
    }

    let mut cycles: Vec<Vec<NodeId>> = tarjan_scc(&inner)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| {
            let mut ids: Vec<NodeId> = component.into_iter().map(|idx| inner[idx].clone()).collect();
            ids.sort();
            ids
        })
        .collect();
    self_loops.sort();
    self_loops.dedup();
    cycles.extend(self_loops.into_iter().map(|id| vec![id]));
    cycles.sort();
    cycles
}
