//! Influence aggregation: direct and transitive recruit counts.

use tracing::{debug, instrument};

use crate::domain::forest::Forest;

/// Recompute `direct_children` and `total_descendants` for every node.
///
/// Post-order over an explicit work stack, so arbitrarily long referral
/// chains cannot exhaust the call stack. Linear in the number of nodes.
#[instrument(level = "debug", skip_all, fields(nodes = forest.len()))]
pub fn aggregate(forest: &mut Forest) {
    let mut stack: Vec<_> = forest.roots.iter().rev().map(|&root| (root, false)).collect();

    while let Some((idx, visited)) = stack.pop() {
        let Some(node) = forest.arena.get(idx) else {
            continue;
        };

        if !visited {
            stack.push((idx, true));
            stack.extend(node.children.iter().rev().map(|&child| (child, false)));
            continue;
        }

        // all children are final at this point
        let direct = node.children.len();
        let total: usize = node
            .children
            .iter()
            .filter_map(|&child| forest.arena.get(child))
            .map(|child| 1 + child.total_descendants)
            .sum();

        if let Some(node) = forest.arena.get_mut(idx) {
            node.direct_children = direct;
            node.total_descendants = total;
        }
    }

    debug!(
        "aggregated {} roots, {} nodes",
        forest.roots.len(),
        forest.arena.len()
    );
}
