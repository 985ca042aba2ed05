//! Graph builders shared by the unit tests

use chrono::{TimeZone, Utc};

use crate::graph::{Graph, GraphMetadata};
use crate::model::*;

/// Metadata with a fixed timestamp so output is reproducible.
pub fn fixed_metadata() -> GraphMetadata {
    GraphMetadata::new("test-creator", "Test description")
        .with_created_at(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
}

pub fn component(id: &str, path: &str, scopes: &[&str]) -> Node {
    Node::Component(ComponentNode {
        id: NodeId::from(id),
        label: path.to_string(),
        attributes: Attributes::new(),
        qualified_name: path.to_string(),
        is_subcomponent: false,
        scopes: scopes.iter().map(|s| s.to_string()).collect(),
        component_path: path.to_string(),
    })
}

pub fn binding(id: &str, key: &str, kind: BindingKind) -> BindingNode {
    BindingNode {
        id: NodeId::from(id),
        label: key.to_string(),
        attributes: Attributes::new(),
        key: key.to_string(),
        binding_kind: kind,
        scope: None,
        contributing_module: None,
        is_multibinding: kind.is_multibinding(),
        component_path: None,
        is_entry_point: false,
    }
}

pub fn module(id: &str, name: &str, binding_count: u32) -> Node {
    Node::Module(ModuleNode {
        id: NodeId::from(id),
        label: name.to_string(),
        attributes: Attributes::new(),
        qualified_name: name.to_string(),
        is_abstract: false,
        includes: Vec::new(),
        installed_in_components: Vec::new(),
        binding_count,
    })
}

pub fn missing(id: &str, key: &str) -> Node {
    Node::MissingBinding(MissingBindingNode {
        id: NodeId::from(id),
        label: format!("[MISSING] {key}"),
        attributes: Attributes::new(),
        key: key.to_string(),
    })
}

pub fn edge(id: &str, source: &str, target: &str, kind: EdgeKind) -> Edge {
    Edge::new(EdgeId::from(id), NodeId::from(source), NodeId::from(target), kind)
}

pub fn dependency(id: &str, source: &str, target: &str) -> Edge {
    edge(id, source, target, EdgeKind::Dependency { is_entry_point: false })
}

/// `App` component exposing `Service`, which depends on `Repo` (from
/// `AppModule`) and on an unbound `Config`.
pub fn sample_graph() -> Graph {
    let mut service = binding("n1", "app.Service", BindingKind::Injection);
    service.is_entry_point = true;
    let mut repo = binding("n2", "app.Repo", BindingKind::Provision);
    repo.contributing_module = Some("app.AppModule".to_string());

    Graph::named(
        "app.App",
        vec![
            component("n0", "app.App", &["Singleton"]),
            service.into(),
            repo.into(),
            missing("n3", "app.Config"),
            module("n4", "app.AppModule", 1),
        ],
        vec![
            edge("e0", "n0", "n1", EdgeKind::Dependency { is_entry_point: true }),
            dependency("e1", "n1", "n2"),
            dependency("e2", "n1", "n3"),
            edge("e3", "n2", "n4", EdgeKind::BindingToModule),
            edge("e4", "n0", "n4", EdgeKind::ModuleInclusion),
        ],
        fixed_metadata(),
    )
}
