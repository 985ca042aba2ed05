//! Abstract view of a compile-time DI binding graph

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Position in the component tree, root first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentPath(pub Vec<String>);

impl ComponentPath {
    pub fn new(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ComponentPath(segments.into_iter().map(Into::into).collect())
    }

    /// The enclosing component, or `None` for a root.
    pub fn parent(&self) -> Option<ComponentPath> {
        match self.0.len() {
            0 | 1 => None,
            n => Some(ComponentPath(self.0[..n - 1].to_vec())),
        }
    }

    /// Qualified name of the innermost component.
    pub fn current(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }
}

impl fmt::Display for ComponentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" → "))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    pub path: ComponentPath,
    #[serde(default)]
    pub is_subcomponent: bool,
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingDescriptor {
    pub key: String,
    /// The framework's own kind name, e.g. `MEMBERS_INJECTION`.
    pub kind: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub contributing_module: Option<String>,
    /// Installing component, when the framework reports one.
    #[serde(default)]
    pub component_path: Option<ComponentPath>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingBindingDescriptor {
    pub key: String,
}

/// Who issued a dependency request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestSource {
    /// A binding requesting one of its dependencies.
    Binding(String),
    /// A component entry point.
    Component(ComponentPath),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdgeDescriptor {
    pub source: RequestSource,
    /// Key of the binding or missing binding that satisfies the request.
    pub target_key: String,
}

impl DependencyEdgeDescriptor {
    pub fn is_entry_point(&self) -> bool {
        matches!(self.source, RequestSource::Component(_))
    }
}

/// A live dependency graph as exposed by a DI framework.
pub trait BindingGraph {
    fn root_component(&self) -> &ComponentDescriptor;

    /// Every component including the root, parents before children.
    fn component_nodes(&self) -> Box<dyn Iterator<Item = &ComponentDescriptor> + '_>;

    fn bindings(&self) -> Box<dyn Iterator<Item = &BindingDescriptor> + '_>;

    fn missing_bindings(&self) -> Box<dyn Iterator<Item = &MissingBindingDescriptor> + '_>;

    fn dependency_edges(&self) -> Box<dyn Iterator<Item = &DependencyEdgeDescriptor> + '_>;

    fn entry_point_edges(&self) -> Box<dyn Iterator<Item = &DependencyEdgeDescriptor> + '_> {
        Box::new(self.dependency_edges().filter(|edge| edge.is_entry_point()))
    }

    /// Graphs validated for a single module rather than a full component.
    fn is_module_binding_graph(&self) -> bool {
        false
    }
}

/// A binding graph exported to JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingGraphSnapshot {
    pub root: ComponentDescriptor,
    #[serde(default)]
    pub subcomponents: Vec<ComponentDescriptor>,
    #[serde(default)]
    pub bindings: Vec<BindingDescriptor>,
    #[serde(default)]
    pub missing_bindings: Vec<MissingBindingDescriptor>,
    #[serde(default)]
    pub dependencies: Vec<DependencyEdgeDescriptor>,
    #[serde(default)]
    pub module_binding_graph: bool,
}

impl BindingGraphSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let mut snapshot: BindingGraphSnapshot = serde_json::from_str(json)?;
        snapshot.check()?;
        // Every listed subcomponent sits below the root, flagged or not.
        for component in &mut snapshot.subcomponents {
            component.is_subcomponent = true;
        }
        Ok(snapshot)
    }

    fn check(&self) -> Result<(), SourceError> {
        if !self.root.path.is_root() {
            return Err(SourceError::InvalidSnapshot(format!(
                "root component path must have exactly one segment, got `{}`",
                self.root.path
            )));
        }
        for component in &self.subcomponents {
            if component.path.0.first() != self.root.path.0.first() || component.path.is_root() {
                return Err(SourceError::InvalidSnapshot(format!(
                    "component `{}` is not nested under root `{}`",
                    component.path, self.root.path
                )));
            }
        }
        Ok(())
    }
}

impl BindingGraph for BindingGraphSnapshot {
    fn root_component(&self) -> &ComponentDescriptor {
        &self.root
    }

    fn component_nodes(&self) -> Box<dyn Iterator<Item = &ComponentDescriptor> + '_> {
        Box::new(std::iter::once(&self.root).chain(self.subcomponents.iter()))
    }

    fn bindings(&self) -> Box<dyn Iterator<Item = &BindingDescriptor> + '_> {
        Box::new(self.bindings.iter())
    }

    fn missing_bindings(&self) -> Box<dyn Iterator<Item = &MissingBindingDescriptor> + '_> {
        Box::new(self.missing_bindings.iter())
    }

    fn dependency_edges(&self) -> Box<dyn Iterator<Item = &DependencyEdgeDescriptor> + '_> {
        Box::new(self.dependencies.iter())
    }

    fn is_module_binding_graph(&self) -> bool {
        self.module_binding_graph
    }
}
