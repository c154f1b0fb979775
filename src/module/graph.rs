//! Request chain resolution
//!
//! Walks the requirement graph depth-first from the root module and records,
//! on every dependency reached, each chain of modules that led to it. There
//! is no visited set: a dependency reachable through several parents is
//! expanded once per path, so every distinct chain is recorded. Cycles are
//! cut when a dependency's recorded chains already pass through itself.

use crate::build_info::{BuildContext, Dependency};
use std::collections::BTreeMap;
use tracing::debug;

/// Dependencies keyed by their `path:version` graph identifier
pub type DependencyMap = BTreeMap<String, Dependency>;

/// Parent identifier to the identifiers it directly requires, in order
pub type RequirementGraph = BTreeMap<String, Vec<String>>;

/// Populate `requested_by` on every dependency reachable from `root_id`.
///
/// Takes ownership of the map for the duration of the walk and hands it
/// back. Children missing from the map (no cached archive) are skipped
/// along with everything only reachable through them. Dependencies never
/// reached keep an empty `requested_by`.
pub fn resolve(
    ctx: &BuildContext,
    root_id: &str,
    mut dependencies: DependencyMap,
    graph: &RequirementGraph,
) -> DependencyMap {
    let root_chains = vec![Vec::new()];
    populate_requested_by(ctx, root_id, &root_chains, &mut dependencies, graph);
    dependencies
}

fn populate_requested_by(
    ctx: &BuildContext,
    parent_id: &str,
    parent_chains: &[Vec<String>],
    dependencies: &mut DependencyMap,
    graph: &RequirementGraph,
) {
    let Some(children) = graph.get(parent_id) else {
        return;
    };

    for child_id in children {
        let Some(child) = dependencies.get_mut(child_id) else {
            continue;
        };

        for chain in parent_chains {
            let mut requested_by = Vec::with_capacity(chain.len() + 1);
            requested_by.push(parent_id.to_string());
            requested_by.extend(chain.iter().cloned());
            if !child.requested_by.contains(&requested_by) {
                child.requested_by.push(requested_by);
            }
        }

        if child.node_has_loop(child_id) {
            debug!(parent: ctx.span(), "Dependency loop through {}, not descending", child_id);
            continue;
        }

        let child_chains = child.requested_by.clone();
        populate_requested_by(ctx, child_id, &child_chains, dependencies, graph);
    }
}

/// Flatten the map into the dependency list of a module
pub fn into_list(dependencies: DependencyMap) -> Vec<Dependency> {
    dependencies.into_values().collect()
}
