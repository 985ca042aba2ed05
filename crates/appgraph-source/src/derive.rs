//! Edge sets derived from module tallies, shared by every extractor

use std::collections::HashMap;

use appgraph_core::{Edge, EdgeKind, EntityKind, IdentityMapper, NodeId};
use tracing::debug;

/// One edge from each installing component to each module it installs.
pub(crate) fn push_module_inclusion_edges(
    mapper: &mut IdentityMapper,
    module_ids: &HashMap<String, NodeId>,
    edges: &mut Vec<Edge>,
) {
    let modules = mapper.tracked_modules().to_vec();
    for module in modules {
        let Some(module_id) = module_ids.get(&module) else {
            continue;
        };
        for component in mapper.module_components(&module) {
            let Some(component_id) = mapper.lookup(EntityKind::Component, &component) else {
                debug!(%component, %module, "installing component not in graph");
                continue;
            };
            edges.push(Edge::new(
                mapper.next_edge_id(),
                component_id,
                module_id.clone(),
                EdgeKind::ModuleInclusion,
            ));
        }
    }
}
