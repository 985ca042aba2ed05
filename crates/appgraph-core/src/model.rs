//! Core data structures for the dependency graph

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Free-form string attributes carried by nodes and edges.
pub type Attributes = BTreeMap<String, String>;

/// Opaque node identifier, unique within one graph (`n0`, `n1`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId(value.to_string())
    }
}

/// Opaque edge identifier (`e0`, `e1`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        EdgeId(value.to_string())
    }
}

/// Discriminates what kind of entity a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Component,
    Binding,
    Module,
    MissingBinding,
}

impl NodeType {
    pub const ALL: [NodeType; 4] = [
        NodeType::Component,
        NodeType::Binding,
        NodeType::Module,
        NodeType::MissingBinding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Component => "COMPONENT",
            NodeType::Binding => "BINDING",
            NodeType::Module => "MODULE",
            NodeType::MissingBinding => "MISSING_BINDING",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a binding satisfies its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BindingKind {
    /// Constructor annotated for injection.
    Injection,
    /// Factory method on a module.
    Provision,
    /// Alias of one key to another.
    Delegate,
    /// The component itself, or one of its provision methods.
    ComponentProvision,
    /// A component dependency.
    ComponentDependency,
    MultiboundSet,
    MultiboundMap,
    Optional,
    MembersInjector,
    AssistedInjection,
    AssistedFactory,
    /// An instance bound on a component builder/factory.
    BoundInstance,
    SubcomponentCreator,
    /// Asynchronous producer.
    Production,
}

impl BindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BindingKind::Injection => "INJECTION",
            BindingKind::Provision => "PROVISION",
            BindingKind::Delegate => "DELEGATE",
            BindingKind::ComponentProvision => "COMPONENT_PROVISION",
            BindingKind::ComponentDependency => "COMPONENT_DEPENDENCY",
            BindingKind::MultiboundSet => "MULTIBOUND_SET",
            BindingKind::MultiboundMap => "MULTIBOUND_MAP",
            BindingKind::Optional => "OPTIONAL",
            BindingKind::MembersInjector => "MEMBERS_INJECTOR",
            BindingKind::AssistedInjection => "ASSISTED_INJECTION",
            BindingKind::AssistedFactory => "ASSISTED_FACTORY",
            BindingKind::BoundInstance => "BOUND_INSTANCE",
            BindingKind::SubcomponentCreator => "SUBCOMPONENT_CREATOR",
            BindingKind::Production => "PRODUCTION",
        }
    }

    pub fn is_multibinding(&self) -> bool {
        matches!(self, BindingKind::MultiboundSet | BindingKind::MultiboundMap)
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Nodes ───────────────────────────────────────────────

/// A component or subcomponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentNode {
    pub id: NodeId,
    pub label: String,
    #[serde(default)]
    pub attributes: Attributes,
    pub qualified_name: String,
    pub is_subcomponent: bool,
    pub scopes: Vec<String>,
    /// Position in the component tree, e.g. `app.AppComponent → app.LoginComponent`.
    pub component_path: String,
}

/// A binding for one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingNode {
    pub id: NodeId,
    pub label: String,
    #[serde(default)]
    pub attributes: Attributes,
    /// Request key; unique among the bindings of one graph.
    pub key: String,
    pub binding_kind: BindingKind,
    pub scope: Option<String>,
    pub contributing_module: Option<String>,
    pub is_multibinding: bool,
    /// Component that installs this binding.
    pub component_path: Option<String>,
    #[serde(default)]
    pub is_entry_point: bool,
}

/// A module that contributes bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleNode {
    pub id: NodeId,
    pub label: String,
    #[serde(default)]
    pub attributes: Attributes,
    pub qualified_name: String,
    pub is_abstract: bool,
    pub includes: Vec<String>,
    pub installed_in_components: Vec<String>,
    pub binding_count: u32,
}

/// A requested key that nothing binds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingBindingNode {
    pub id: NodeId,
    pub label: String,
    #[serde(default)]
    pub attributes: Attributes,
    pub key: String,
}

/// A single node in the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Node {
    Component(ComponentNode),
    Binding(BindingNode),
    Module(ModuleNode),
    MissingBinding(MissingBindingNode),
}

impl Node {
    pub fn id(&self) -> &NodeId {
        match self {
            Node::Component(n) => &n.id,
            Node::Binding(n) => &n.id,
            Node::Module(n) => &n.id,
            Node::MissingBinding(n) => &n.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Node::Component(n) => &n.label,
            Node::Binding(n) => &n.label,
            Node::Module(n) => &n.label,
            Node::MissingBinding(n) => &n.label,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Component(_) => NodeType::Component,
            Node::Binding(_) => NodeType::Binding,
            Node::Module(_) => NodeType::Module,
            Node::MissingBinding(_) => NodeType::MissingBinding,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        match self {
            Node::Component(n) => &n.attributes,
            Node::Binding(n) => &n.attributes,
            Node::Module(n) => &n.attributes,
            Node::MissingBinding(n) => &n.attributes,
        }
    }

    pub fn as_binding(&self) -> Option<&BindingNode> {
        match self {
            Node::Binding(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&ComponentNode> {
        match self {
            Node::Component(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_module(&self) -> Option<&ModuleNode> {
        match self {
            Node::Module(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_missing_binding(&self) -> Option<&MissingBindingNode> {
        match self {
            Node::MissingBinding(n) => Some(n),
            _ => None,
        }
    }
}

impl From<ComponentNode> for Node {
    fn from(node: ComponentNode) -> Self {
        Node::Component(node)
    }
}

impl From<BindingNode> for Node {
    fn from(node: BindingNode) -> Self {
        Node::Binding(node)
    }
}

impl From<ModuleNode> for Node {
    fn from(node: ModuleNode) -> Self {
        Node::Module(node)
    }
}

impl From<MissingBindingNode> for Node {
    fn from(node: MissingBindingNode) -> Self {
        Node::MissingBinding(node)
    }
}

// ── Edges ───────────────────────────────────────────────

/// Tag for the relationship an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    Dependency,
    ComponentHierarchy,
    ModuleInclusion,
    BindingToModule,
    ComponentToBinding,
    BindingOwnership,
}

impl EdgeType {
    pub const ALL: [EdgeType; 6] = [
        EdgeType::Dependency,
        EdgeType::ComponentHierarchy,
        EdgeType::ModuleInclusion,
        EdgeType::BindingToModule,
        EdgeType::ComponentToBinding,
        EdgeType::BindingOwnership,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Dependency => "DEPENDENCY",
            EdgeType::ComponentHierarchy => "COMPONENT_HIERARCHY",
            EdgeType::ModuleInclusion => "MODULE_INCLUSION",
            EdgeType::BindingToModule => "BINDING_TO_MODULE",
            EdgeType::ComponentToBinding => "COMPONENT_TO_BINDING",
            EdgeType::BindingOwnership => "BINDING_OWNERSHIP",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What relationship this edge represents, with per-variant data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    /// Source binding requires target binding or missing binding. With
    /// `is_entry_point` the source is a component exposing the target.
    Dependency { is_entry_point: bool },
    /// Parent component → child subcomponent.
    ComponentHierarchy,
    /// Component → module it installs.
    ModuleInclusion,
    /// Binding → its contributing module.
    BindingToModule,
    /// Component → entry-point binding it exposes.
    ComponentToBinding,
    /// Owning component → binding it installs.
    BindingOwnership,
}

impl EdgeKind {
    pub fn edge_type(&self) -> EdgeType {
        match self {
            EdgeKind::Dependency { .. } => EdgeType::Dependency,
            EdgeKind::ComponentHierarchy => EdgeType::ComponentHierarchy,
            EdgeKind::ModuleInclusion => EdgeType::ModuleInclusion,
            EdgeKind::BindingToModule => EdgeType::BindingToModule,
            EdgeKind::ComponentToBinding => EdgeType::ComponentToBinding,
            EdgeKind::BindingOwnership => EdgeType::BindingOwnership,
        }
    }
}

/// A directed edge in the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Edge {
    pub fn new(id: EdgeId, source: NodeId, target: NodeId, kind: EdgeKind) -> Self {
        Edge {
            id,
            source,
            target,
            kind,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn edge_type(&self) -> EdgeType {
        self.kind.edge_type()
    }

    /// `Some` only for dependency edges.
    pub fn is_entry_point(&self) -> Option<bool> {
        match self.kind {
            EdgeKind::Dependency { is_entry_point } => Some(is_entry_point),
            _ => None,
        }
    }
}

// ── Attribute schema ────────────────────────────────────

/// Value type of a declared attribute column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Integer,
    Float,
    Double,
    Boolean,
    Date,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Integer => "integer",
            AttributeType::Float => "float",
            AttributeType::Double => "double",
            AttributeType::Boolean => "boolean",
            AttributeType::Date => "date",
        }
    }
}

/// A declared attribute column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub id: String,
    pub title: String,
    pub attr_type: AttributeType,
    pub default_value: Option<String>,
}

impl AttributeDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>, attr_type: AttributeType) -> Self {
        AttributeDefinition {
            id: id.into(),
            title: title.into(),
            attr_type,
            default_value: None,
        }
    }

    /// Value readers assume when a node or edge carries no `attvalue` for
    /// this column.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}
