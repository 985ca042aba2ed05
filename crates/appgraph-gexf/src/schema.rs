//! Attribute columns declared in the GEXF `<attributes>` blocks

use std::collections::BTreeSet;

use appgraph_core::{AttributeDefinition, AttributeType, Graph};

/// Flags are `false` wherever a node or edge does not state them.
fn column(id: &str, title: &str, attr_type: AttributeType) -> AttributeDefinition {
    let column = AttributeDefinition::new(id, title, attr_type);
    match attr_type {
        AttributeType::Boolean => column.with_default("false"),
        _ => column,
    }
}

/// Node columns, in declaration order.
pub fn node_attributes() -> Vec<AttributeDefinition> {
    use AttributeType::*;
    [
        ("nodeType", "Node Type", String),
        ("bindingKind", "Binding Kind", String),
        ("scope", "Scope", String),
        ("qualifiedName", "Qualified Name", String),
        ("isMultibinding", "Is Multibinding", Boolean),
        ("contributingModule", "Contributing Module", String),
        ("componentPath", "Component Path", String),
        ("isEntryPoint", "Is Entry Point", Boolean),
        ("isSubcomponent", "Is Subcomponent", Boolean),
        ("bindingCount", "Binding Count", Integer),
        ("installedInComponents", "Installed In Components", String),
    ]
    .into_iter()
    .map(|(id, title, attr_type)| column(id, title, attr_type))
    .collect()
}

/// Edge columns, in declaration order.
pub fn edge_attributes() -> Vec<AttributeDefinition> {
    vec![
        column("edgeType", "Edge Type", AttributeType::String),
        column("isEntryPoint", "Is Entry Point", AttributeType::Boolean),
    ]
}

/// The attribute columns for one graph: fixed columns followed by every free-form
/// attribute key (sorted) that does not shadow a fixed column.
#[derive(Debug, Clone)]
pub struct Schema {
    pub node: Vec<AttributeDefinition>,
    pub edge: Vec<AttributeDefinition>,
}

impl Schema {
    pub fn for_graph(graph: &Graph) -> Self {
        let node_keys = graph.nodes().iter().flat_map(|n| n.attributes().keys());
        let edge_keys = graph.edges().iter().flat_map(|e| e.attributes.keys());
        Schema {
            node: with_custom_columns(node_attributes(), node_keys),
            edge: with_custom_columns(edge_attributes(), edge_keys),
        }
    }
}

/// True when `key` names a column of `fixed`.
pub fn is_fixed(fixed: &[AttributeDefinition], key: &str) -> bool {
    fixed.iter().any(|def| def.id == key)
}

fn with_custom_columns<'a>(
    mut columns: Vec<AttributeDefinition>,
    keys: impl Iterator<Item = &'a String>,
) -> Vec<AttributeDefinition> {
    let custom: BTreeSet<&String> = keys.filter(|key| !is_fixed(&columns, key)).collect();
    columns.extend(
        custom
            .into_iter()
            .map(|key| AttributeDefinition::new(key.as_str(), key.as_str(), AttributeType::String)),
    );
    columns
}
