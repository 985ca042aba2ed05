//! Metro metadata → Graph extraction

use std::collections::{HashMap, HashSet};

use appgraph_core::{
    Attributes, BindingKind, BindingNode, ComponentNode, Edge, EdgeKind, EntityKind, Graph,
    GraphMetadata, IdentityMapper, MissingBindingNode, Node, NodeId, simple_name, simplify_key,
};
use tracing::{debug, info};

use super::model::{MetroBinding, MetroGraphMetadata};
use crate::derive::push_module_inclusion_edges;
use crate::error::SourceError;

pub const CREATOR: &str = "appgraph-metro-source";

/// Scope recorded on scoped bindings when the graph declares none.
const FALLBACK_SCOPE: &str = "Scoped";

/// Map a Metro binding onto [`BindingKind`]. A multibinding contribution
/// wins over the declared kind.
pub fn map_binding_kind(binding: &MetroBinding) -> BindingKind {
    if let Some(multibinding) = &binding.multibinding {
        return if multibinding.map_key.is_some() {
            BindingKind::MultiboundMap
        } else {
            BindingKind::MultiboundSet
        };
    }
    match binding.binding_kind.as_str() {
        "ConstructorInjected" => BindingKind::Injection,
        "Provided" => BindingKind::Provision,
        "Bound" | "Alias" => BindingKind::Delegate,
        "BoundInstance" => BindingKind::BoundInstance,
        "IntoSet" => BindingKind::MultiboundSet,
        "IntoMap" => BindingKind::MultiboundMap,
        "Assisted" => BindingKind::AssistedInjection,
        "AssistedFactory" => BindingKind::AssistedFactory,
        "GraphAccessor" => BindingKind::ComponentProvision,
        "Optional" => BindingKind::Optional,
        other => {
            debug!(kind = other, key = %binding.key, "unknown Metro binding kind, treating as PROVISION");
            BindingKind::Provision
        }
    }
}

/// Module name from a source location: `AppGraph.kt:36:1` → `AppGraph`.
pub fn module_from_origin(origin: &str) -> Option<String> {
    let file = origin.split(':').next().unwrap_or(origin);
    let stem = file.split('.').next().unwrap_or(file).trim();
    (!stem.is_empty()).then(|| stem.to_string())
}

pub fn extract_from_json(json: &str) -> Result<Graph, SourceError> {
    let metadata: MetroGraphMetadata = serde_json::from_str(json)?;
    Ok(extract(&metadata))
}

/// Build one graph from a parsed report. Never fails; entry points naming
/// unknown keys are left out.
pub fn extract(metadata: &MetroGraphMetadata) -> Graph {
    let mut mapper = IdentityMapper::new();
    let mut nodes: Vec<Node> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();

    let graph_key = metadata.graph.as_str();
    let root_id = mapper.node_id_for(EntityKind::Component, graph_key);
    nodes.push(
        ComponentNode {
            id: root_id.clone(),
            label: simple_name(graph_key),
            attributes: Default::default(),
            qualified_name: graph_key.to_string(),
            is_subcomponent: !metadata.extensions.accessors.is_empty(),
            scopes: metadata.scopes.clone(),
            component_path: graph_key.to_string(),
        }
        .into(),
    );

    let entry_point_keys: HashSet<&str> = metadata
        .roots
        .accessors
        .iter()
        .map(|a| a.key.as_str())
        .chain(metadata.roots.injectors.iter().map(|i| i.key.as_str()))
        .collect();
    let scope_name = metadata
        .scopes
        .first()
        .map(String::as_str)
        .unwrap_or(FALLBACK_SCOPE);

    // Bindings
    let mut placed: Vec<(NodeId, &MetroBinding, Option<String>)> = Vec::new();
    for binding in &metadata.bindings {
        if mapper.lookup(EntityKind::Binding, &binding.key).is_some() {
            debug!(key = %binding.key, "duplicate binding key, keeping the first");
            continue;
        }
        let id = mapper.node_id_for(EntityKind::Binding, &binding.key);
        let kind = map_binding_kind(binding);
        let module = binding.origin.as_deref().and_then(module_from_origin);
        if let Some(module) = &module {
            mapper.record_module_binding(module, Some(graph_key));
        }

        nodes.push(
            BindingNode {
                id: id.clone(),
                label: simplify_key(&binding.key),
                attributes: binding_attributes(binding),
                key: binding.key.clone(),
                binding_kind: kind,
                scope: binding.is_scoped.then(|| scope_name.to_string()),
                contributing_module: module.clone(),
                is_multibinding: kind.is_multibinding(),
                component_path: Some(graph_key.to_string()),
                is_entry_point: entry_point_keys.contains(binding.key.as_str()),
            }
            .into(),
        );
        placed.push((id, binding, module));
    }

    // Requested keys nothing binds
    for (_, binding, _) in &placed {
        for dependency in &binding.dependencies {
            if mapper.lookup(EntityKind::Binding, &dependency.key).is_some() {
                continue;
            }
            debug!(key = %dependency.key, requested_by = %binding.key, "missing binding");
            let id = mapper.node_id_for(EntityKind::Binding, &dependency.key);
            nodes.push(
                MissingBindingNode {
                    id,
                    label: format!("[MISSING] {}", simplify_key(&dependency.key)),
                    attributes: Default::default(),
                    key: dependency.key.clone(),
                }
                .into(),
            );
        }
    }

    // Dependencies; every target is now a binding or a missing binding.
    for (source_id, binding, _) in &placed {
        for dependency in &binding.dependencies {
            let Some(target_id) = mapper.lookup(EntityKind::Binding, &dependency.key) else {
                continue;
            };
            let mut attributes = Attributes::new();
            if dependency.has_default {
                attributes.insert("hasDefault".into(), "true".into());
            }
            if dependency.is_assisted {
                attributes.insert("isAssisted".into(), "true".into());
            }
            edges.push(
                Edge::new(
                    mapper.next_edge_id(),
                    source_id.clone(),
                    target_id,
                    EdgeKind::Dependency { is_entry_point: false },
                )
                .with_attributes(attributes),
            );
        }
    }

    // Entry points
    let roots = metadata
        .roots
        .accessors
        .iter()
        .map(|accessor| {
            let mut attributes = Attributes::new();
            if accessor.is_deferrable {
                attributes.insert("deferrable".into(), "true".into());
            }
            (accessor.key.as_str(), attributes)
        })
        .chain(metadata.roots.injectors.iter().map(|injector| {
            let attributes = Attributes::from([("type".to_string(), "injector".to_string())]);
            (injector.key.as_str(), attributes)
        }));
    for (key, attributes) in roots {
        let Some(target_id) = mapper.lookup(EntityKind::Binding, key) else {
            debug!(%key, "entry point has no binding, skipping edge");
            continue;
        };
        edges.push(
            Edge::new(
                mapper.next_edge_id(),
                root_id.clone(),
                target_id,
                EdgeKind::Dependency { is_entry_point: true },
            )
            .with_attributes(attributes),
        );
    }

    // Modules
    let modules = mapper.synthesize_module_nodes();
    let module_ids: HashMap<String, NodeId> = modules
        .iter()
        .map(|m| (m.qualified_name.clone(), m.id.clone()))
        .collect();
    nodes.extend(modules.into_iter().map(Node::from));

    for (binding_id, _, module) in &placed {
        if let Some(module_id) = module.as_ref().and_then(|m| module_ids.get(m)) {
            edges.push(Edge::new(
                mapper.next_edge_id(),
                binding_id.clone(),
                module_id.clone(),
                EdgeKind::BindingToModule,
            ));
        }
    }

    push_module_inclusion_edges(&mut mapper, &module_ids, &mut edges);

    // A Metro graph is a single component, so it owns every binding.
    for (binding_id, _, _) in &placed {
        edges.push(Edge::new(
            mapper.next_edge_id(),
            root_id.clone(),
            binding_id.clone(),
            EdgeKind::BindingOwnership,
        ));
    }

    let graph = Graph::named(
        graph_key,
        nodes,
        edges,
        GraphMetadata::new(CREATOR, format!("Metro dependency graph for {graph_key}")),
    );
    info!(
        graph = graph.name(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "extracted Metro graph"
    );
    graph
}

fn binding_attributes(binding: &MetroBinding) -> Attributes {
    let mut attributes = Attributes::new();
    if binding.is_synthetic {
        attributes.insert("synthetic".into(), "true".into());
    }
    let optional = [
        ("nameHint", &binding.name_hint),
        ("declaration", &binding.declaration),
        ("aliasTarget", &binding.alias_target),
        ("optionalWrapper", &binding.optional_wrapper),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            attributes.insert(name.to_string(), value.clone());
        }
    }
    attributes
}
