//! Serde model of Metro's graph metadata report
//!
//! Reports live at `<reports>/<sourceSet>/graph-metadata/graph-<Name>.json`.
//! Unknown keys are ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetroGraphMetadata {
    pub graph: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub aggregation_scopes: Vec<String>,
    #[serde(default)]
    pub roots: MetroRoots,
    #[serde(default)]
    pub extensions: MetroExtensions,
    #[serde(default)]
    pub bindings: Vec<MetroBinding>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetroRoots {
    #[serde(default)]
    pub accessors: Vec<MetroAccessor>,
    #[serde(default)]
    pub injectors: Vec<MetroInjector>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetroAccessor {
    pub key: String,
    #[serde(default)]
    pub is_deferrable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetroInjector {
    pub key: String,
}

/// Graph extension surface. A graph with extension accessors is itself an
/// extension of another graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetroExtensions {
    #[serde(default)]
    pub accessors: Vec<MetroAccessor>,
    #[serde(default)]
    pub factory_accessors: Vec<MetroAccessor>,
    #[serde(default)]
    pub factories_implemented: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetroBinding {
    pub key: String,
    pub binding_kind: String,
    #[serde(default)]
    pub is_scoped: bool,
    #[serde(default)]
    pub name_hint: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<MetroDependency>,
    #[serde(default)]
    pub is_synthetic: bool,
    /// Source location, e.g. `AppGraph.kt:36:1`.
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub declaration: Option<String>,
    #[serde(default)]
    pub multibinding: Option<MetroMultibinding>,
    #[serde(default)]
    pub optional_wrapper: Option<String>,
    #[serde(default)]
    pub alias_target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetroDependency {
    pub key: String,
    #[serde(default)]
    pub has_default: bool,
    #[serde(default)]
    pub is_assisted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetroMultibinding {
    #[serde(default)]
    pub contribution_type: Option<String>,
    #[serde(default)]
    pub map_key: Option<String>,
}
