//! Binding graph → Graph extraction
//!
//! Passes run in a fixed order: components, entry points, bindings, missing
//! bindings, dependencies, hierarchy, modules, then the derived edge sets.
//! Later passes read ids and module tallies recorded by earlier ones.

use std::collections::{HashMap, HashSet};

use appgraph_core::{
    BindingKind, BindingNode, ComponentNode, Edge, EdgeKind, EntityKind, Graph, GraphMetadata,
    IdentityMapper, MissingBindingNode, Node, NodeId, simplify_key,
};
use tracing::{debug, info};

use super::model::{BindingGraph, RequestSource};
use crate::derive::push_module_inclusion_edges;

pub const CREATOR: &str = "appgraph-binding-graph";

/// A binding that made it into the graph, kept for the derived edge passes.
struct PlacedBinding<'a> {
    id: NodeId,
    key: &'a str,
    scope: Option<&'a str>,
    module: Option<&'a str>,
}

/// Map a framework binding kind name onto [`BindingKind`].
///
/// Unrecognised names map to `Provision`.
pub fn map_binding_kind(native: &str) -> BindingKind {
    match native {
        "INJECTION" => BindingKind::Injection,
        "PROVISION" => BindingKind::Provision,
        "DELEGATE" => BindingKind::Delegate,
        "COMPONENT" | "COMPONENT_PROVISION" => BindingKind::ComponentProvision,
        "COMPONENT_DEPENDENCY" => BindingKind::ComponentDependency,
        "COMPONENT_PRODUCTION" | "PRODUCTION" => BindingKind::Production,
        "MULTIBOUND_SET" => BindingKind::MultiboundSet,
        "MULTIBOUND_MAP" => BindingKind::MultiboundMap,
        "OPTIONAL" => BindingKind::Optional,
        "MEMBERS_INJECTOR" | "MEMBERS_INJECTION" => BindingKind::MembersInjector,
        "ASSISTED_INJECTION" => BindingKind::AssistedInjection,
        "ASSISTED_FACTORY" => BindingKind::AssistedFactory,
        "BOUND_INSTANCE" => BindingKind::BoundInstance,
        "SUBCOMPONENT_CREATOR" => BindingKind::SubcomponentCreator,
        other => {
            debug!(kind = other, "unknown binding kind, treating as PROVISION");
            BindingKind::Provision
        }
    }
}

/// Build one graph from a binding graph. Never fails; endpoints that cannot be
/// resolved are left out.
pub fn extract(source: &dyn BindingGraph) -> Graph {
    let mut mapper = IdentityMapper::new();
    let mut nodes: Vec<Node> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();

    let root_path = source.root_component().path.to_string();
    let root_id = mapper.node_id_for(EntityKind::Component, &root_path);

    // Components
    let mut scope_owner: HashMap<&str, NodeId> = HashMap::new();
    let mut seen_components: HashSet<String> = HashSet::new();
    for component in source.component_nodes() {
        let path = component.path.to_string();
        if !seen_components.insert(path.clone()) {
            debug!(%path, "component listed twice, keeping the first");
            continue;
        }
        let id = mapper.node_id_for(EntityKind::Component, &path);
        for scope in &component.scopes {
            scope_owner.entry(scope.as_str()).or_insert_with(|| id.clone());
        }
        nodes.push(
            ComponentNode {
                id,
                label: path.clone(),
                attributes: Default::default(),
                qualified_name: component.path.current().to_string(),
                is_subcomponent: component.is_subcomponent,
                scopes: component.scopes.clone(),
                component_path: path,
            }
            .into(),
        );
    }

    // Entry points
    let entry_point_keys: HashSet<&str> = source
        .entry_point_edges()
        .map(|edge| edge.target_key.as_str())
        .collect();

    // Bindings
    let mut placed: Vec<PlacedBinding<'_>> = Vec::new();
    for binding in source.bindings() {
        if mapper.lookup(EntityKind::Binding, &binding.key).is_some() {
            debug!(key = %binding.key, "duplicate binding key, keeping the first");
            continue;
        }
        let id = mapper.node_id_for(EntityKind::Binding, &binding.key);
        let kind = map_binding_kind(&binding.kind);
        let component_path = binding
            .component_path
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| root_path.clone());

        if let Some(module) = &binding.contributing_module {
            mapper.record_module_binding(module, Some(component_path.as_str()));
        }
        placed.push(PlacedBinding {
            id: id.clone(),
            key: &binding.key,
            scope: binding.scope.as_deref(),
            module: binding.contributing_module.as_deref(),
        });

        nodes.push(
            BindingNode {
                id,
                label: binding.key.clone(),
                attributes: Default::default(),
                key: binding.key.clone(),
                binding_kind: kind,
                scope: binding.scope.clone(),
                contributing_module: binding.contributing_module.clone(),
                is_multibinding: kind.is_multibinding(),
                component_path: Some(component_path),
                is_entry_point: entry_point_keys.contains(binding.key.as_str()),
            }
            .into(),
        );
    }

    // Missing bindings
    for missing in source.missing_bindings() {
        if mapper.lookup(EntityKind::Binding, &missing.key).is_some() {
            continue;
        }
        let id = mapper.node_id_for(EntityKind::Binding, &missing.key);
        nodes.push(
            MissingBindingNode {
                id,
                label: format!("[MISSING] {}", simplify_key(&missing.key)),
                attributes: Default::default(),
                key: missing.key.clone(),
            }
            .into(),
        );
    }

    // Dependencies
    for dependency in source.dependency_edges() {
        let source_id = match &dependency.source {
            RequestSource::Binding(key) => mapper.lookup(EntityKind::Binding, key),
            RequestSource::Component(path) => {
                mapper.lookup(EntityKind::Component, &path.to_string())
            }
        };
        let target_id = mapper.lookup(EntityKind::Binding, &dependency.target_key);
        let (Some(source_id), Some(target_id)) = (source_id, target_id) else {
            debug!(
                source = ?dependency.source,
                target = %dependency.target_key,
                "dependency endpoint not in graph, skipping edge"
            );
            continue;
        };
        edges.push(Edge::new(
            mapper.next_edge_id(),
            source_id,
            target_id,
            EdgeKind::Dependency {
                is_entry_point: dependency.is_entry_point(),
            },
        ));
    }

    // Component hierarchy
    for component in source.component_nodes() {
        let Some(parent) = component.path.parent() else {
            continue;
        };
        let parent_id = mapper.lookup(EntityKind::Component, &parent.to_string());
        let child_id = mapper.lookup(EntityKind::Component, &component.path.to_string());
        if let (Some(parent_id), Some(child_id)) = (parent_id, child_id) {
            edges.push(Edge::new(
                mapper.next_edge_id(),
                parent_id,
                child_id,
                EdgeKind::ComponentHierarchy,
            ));
        }
    }

    // Modules
    let modules = mapper.synthesize_module_nodes();
    let module_ids: HashMap<String, NodeId> = modules
        .iter()
        .map(|m| (m.qualified_name.clone(), m.id.clone()))
        .collect();
    nodes.extend(modules.into_iter().map(Node::from));

    for binding in &placed {
        if let Some(module_id) = binding.module.and_then(|m| module_ids.get(m)) {
            edges.push(Edge::new(
                mapper.next_edge_id(),
                binding.id.clone(),
                module_id.clone(),
                EdgeKind::BindingToModule,
            ));
        }
    }

    push_module_inclusion_edges(&mut mapper, &module_ids, &mut edges);

    // Component → entry-point binding
    let mut exposed: HashSet<(NodeId, NodeId)> = HashSet::new();
    for edge in source.entry_point_edges() {
        let Some(binding_id) = placed
            .iter()
            .find(|binding| binding.key == edge.target_key)
            .map(|binding| binding.id.clone())
        else {
            continue;
        };
        let component_id = match &edge.source {
            RequestSource::Component(path) => mapper.lookup(EntityKind::Component, &path.to_string()),
            RequestSource::Binding(_) => None,
        }
        .unwrap_or_else(|| root_id.clone());

        if exposed.insert((component_id.clone(), binding_id.clone())) {
            edges.push(Edge::new(
                mapper.next_edge_id(),
                component_id,
                binding_id,
                EdgeKind::ComponentToBinding,
            ));
        }
    }

    // Ownership: scope match, else root.
    for binding in &placed {
        let owner = binding
            .scope
            .and_then(|s| scope_owner.get(s))
            .cloned()
            .unwrap_or_else(|| root_id.clone());
        edges.push(Edge::new(
            mapper.next_edge_id(),
            owner,
            binding.id.clone(),
            EdgeKind::BindingOwnership,
        ));
    }

    let graph = Graph::named(
        root_path.clone(),
        nodes,
        edges,
        GraphMetadata::new(CREATOR, format!("Dependency graph for {root_path}")),
    );
    info!(
        graph = graph.name(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "extracted binding graph"
    );
    graph
}
