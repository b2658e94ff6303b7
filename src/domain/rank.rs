//! Ranking: influence-descending order at every level of the forest.

use std::cmp::Reverse;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::forest::{AggregationNode, Forest};

/// Sort roots and every child list by `total_descendants`, descending.
///
/// The sort is stable: siblings with equal counts keep the order the
/// builder produced (input order), so unchanged input renders identically.
/// Expects an aggregated forest.
#[instrument(level = "debug", skip_all, fields(nodes = forest.len()))]
pub fn rank(mut forest: Forest) -> Forest {
    let Forest { arena, roots, .. } = &mut forest;
    sort_by_influence(arena, roots);

    let indices: Vec<Index> = arena.iter().map(|(idx, _)| idx).collect();
    for idx in indices {
        let mut children = match arena.get_mut(idx) {
            Some(node) if node.children.len() > 1 => std::mem::take(&mut node.children),
            _ => continue,
        };
        sort_by_influence(arena, &mut children);
        if let Some(node) = arena.get_mut(idx) {
            node.children = children;
        }
    }

    forest
}

fn sort_by_influence(arena: &Arena<AggregationNode>, nodes: &mut [Index]) {
    nodes.sort_by_key(|&idx| Reverse(arena.get(idx).map_or(0, |n| n.total_descendants)));
}
