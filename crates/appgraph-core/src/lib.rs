//! AppGraph Core — dependency graph model, identity mapping, validation and statistics

pub mod error;
pub mod graph;
pub mod identity;
pub mod model;
pub mod naming;
pub mod stats;


#[cfg(test)]
pub mod test_utils;

pub use error::GraphError;
pub use graph::{Graph, GraphMetadata};
pub use identity::{EntityKind, IdentityMapper};
pub use model::{
    AttributeDefinition, AttributeType, Attributes, BindingKind, BindingNode, ComponentNode, Edge,
    EdgeId, EdgeKind, EdgeType, MissingBindingNode, ModuleNode, Node, NodeId, NodeType,
};
pub use naming::{graph_id_for, simple_name, simplify_key};
pub use stats::{GraphStats, dependency_cycles};
