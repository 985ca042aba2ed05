//! Stable id assignment for one extraction pass

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::model::{EdgeId, ModuleNode, NodeId};

/// Which lookup table a semantic key belongs to. A component path and a
/// binding key with the same spelling must never share a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Component,
    /// Bindings and missing bindings share the request-key space.
    Binding,
    Module,
}

#[derive(Debug, Default)]
struct ModuleTally {
    binding_count: u32,
    installed_in: BTreeSet<String>,
}

/// Maps semantic keys to node ids and allocates edge ids.
///
/// Scoped to a single extraction: create one per graph and drop it afterwards.
#[derive(Debug, Default)]
pub struct IdentityMapper {
    next_node: usize,
    next_edge: usize,
    components: HashMap<String, NodeId>,
    bindings: HashMap<String, NodeId>,
    modules: HashMap<String, NodeId>,
    /// Module keys in first-seen order.
    module_order: Vec<String>,
    module_tallies: HashMap<String, ModuleTally>,
}

impl IdentityMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `key`, allocating the next `n<counter>` on first sight.
    pub fn node_id_for(&mut self, kind: EntityKind, key: &str) -> NodeId {
        if let Some(id) = self.table(kind).get(key) {
            return id.clone();
        }
        let id = NodeId(format!("n{}", self.next_node));
        self.next_node += 1;
        self.table_mut(kind).insert(key.to_string(), id.clone());
        id
    }

    /// Look up an id without allocating.
    pub fn lookup(&self, kind: EntityKind, key: &str) -> Option<NodeId> {
        self.table(kind).get(key).cloned()
    }

    /// Always allocates a fresh `e<counter>`.
    pub fn next_edge_id(&mut self) -> EdgeId {
        let id = EdgeId(format!("e{}", self.next_edge));
        self.next_edge += 1;
        id
    }

    /// Attribute one binding to `module`, optionally noting the component
    /// that installs it.
    pub fn record_module_binding(&mut self, module: &str, component_path: Option<&str>) {
        if !self.module_tallies.contains_key(module) {
            self.module_order.push(module.to_string());
        }
        let tally = self.module_tallies.entry(module.to_string()).or_default();
        tally.binding_count += 1;
        if let Some(path) = component_path {
            tally.installed_in.insert(path.to_string());
        }
    }

    /// Modules seen so far, in first-seen order.
    pub fn tracked_modules(&self) -> &[String] {
        &self.module_order
    }

    pub fn module_binding_count(&self, module: &str) -> u32 {
        self.module_tallies
            .get(module)
            .map_or(0, |t| t.binding_count)
    }

    /// Components observed installing `module`, sorted.
    pub fn module_components(&self, module: &str) -> Vec<String> {
        self.module_tallies
            .get(module)
            .map(|t| t.installed_in.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// One node per tracked module, carrying the accumulated aggregates.
    pub fn synthesize_module_nodes(&mut self) -> Vec<ModuleNode> {
        let modules = self.module_order.clone();
        modules
            .into_iter()
            .map(|module| {
                let id = self.node_id_for(EntityKind::Module, &module);
                let binding_count = self.module_binding_count(&module);
                debug!(%module, %id, binding_count, "synthesized module node");
                ModuleNode {
                    id,
                    label: module.clone(),
                    attributes: Default::default(),
                    binding_count,
                    installed_in_components: self.module_components(&module),
                    qualified_name: module,
                    // Not recoverable from binding metadata alone.
                    is_abstract: false,
                    includes: Vec::new(),
                }
            })
            .collect()
    }

    fn table(&self, kind: EntityKind) -> &HashMap<String, NodeId> {
        match kind {
            EntityKind::Component => &self.components,
            EntityKind::Binding => &self.bindings,
            EntityKind::Module => &self.modules,
        }
    }

    fn table_mut(&mut self, kind: EntityKind) -> &mut HashMap<String, NodeId> {
        match kind {
            EntityKind::Component => &mut self.components,
            EntityKind::Binding => &mut self.bindings,
            EntityKind::Module => &mut self.modules,
        }
    }
}
