//! Forest builder: turns parent pointers into owned child lists.

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::entities::ConstituentRecord;
use crate::domain::error::Anomaly;
use crate::domain::forest::{AggregationNode, Forest};
use crate::domain::registry::NodeRegistry;

/// Attaches registry nodes to their referrers.
pub struct ForestBuilder;

impl ForestBuilder {
    /// Assemble the forest from the registry built over the same `records`.
    ///
    /// Rows are processed in input order. A row is attached under its
    /// referrer only when the referrer is known, is not the row itself, and
    /// is not already a descendant of the row. Everything else becomes a
    /// root, in input order. Counts are left at zero for the aggregator.
    #[instrument(level = "debug", skip_all, fields(nodes = registry.len()))]
    pub fn build(registry: NodeRegistry, records: &[ConstituentRecord]) -> Forest {
        let NodeRegistry {
            mut arena,
            index,
            slots,
            mut report,
        } = registry;
        let mut trees = TreeSets::new(arena.capacity());
        let mut roots = Vec::new();

        for (record, slot) in records.iter().zip(slots.iter()) {
            let Some(child) = *slot else {
                continue;
            };

            let Some(referrer) = record.referrer_id() else {
                roots.push(child);
                continue;
            };
            let id = arena[child].id.clone();

            let Some(&parent) = index.get(referrer) else {
                report.record(Anomaly::UnresolvedReferrer {
                    id,
                    referrer: referrer.clone(),
                });
                roots.push(child);
                continue;
            };

            if parent == child {
                report.record(Anomaly::SelfReferral { id });
                roots.push(child);
                continue;
            }

            // `child` has no parent yet, so it heads its own tree: the
            // referrer descends from it exactly when both share a tree.
            if !trees.union(slot_of(parent), slot_of(child)) {
                report.record(Anomaly::CycleDetected {
                    id,
                    referrer: referrer.clone(),
                });
                roots.push(child);
                continue;
            }

            attach(&mut arena, parent, child);
        }

        debug!("built forest: {} nodes, {} roots", arena.len(), roots.len());
        Forest {
            arena,
            roots,
            index,
            report,
        }
    }
}

fn slot_of(idx: Index) -> usize {
    idx.into_raw_parts().0
}

fn attach(arena: &mut Arena<AggregationNode>, parent: Index, child: Index) {
    if let Some(node) = arena.get_mut(child) {
        node.parent = Some(parent);
    }
    if let Some(node) = arena.get_mut(parent) {
        node.children.push(child);
        node.direct_children += 1;
    }
}

/// Disjoint sets over arena slots, one set per tree under construction.
///
/// Union by size with path halving keeps the membership test near
/// constant, so long referral chains do not turn the build quadratic.
struct TreeSets {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl TreeSets {
    fn new(slots: usize) -> Self {
        Self {
            parent: (0..slots).collect(),
            size: vec![1; slots],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets of `a` and `b`; false if they were already one set.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        true
    }
}
