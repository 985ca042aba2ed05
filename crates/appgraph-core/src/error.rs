//! Invariant violations reported by graph validation

use crate::model::{EdgeId, NodeId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("node id {0} is used by more than one node")]
    DuplicateNodeId(NodeId),

    #[error("edge {edge} references unknown node {node}")]
    DanglingEdge { edge: EdgeId, node: NodeId },

    #[error("binding key {0} appears on more than one binding node")]
    DuplicateBindingKey(String),

    #[error("module {module} declares {declared} bindings but {actual} bindings name it")]
    ModuleBindingCount {
        module: String,
        declared: u32,
        actual: u32,
    },
}
