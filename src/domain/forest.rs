//! The built forest: arena-backed nodes, traversal and read-only queries.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::instrument;

use crate::domain::entities::{RecordId, Status};
use crate::domain::error::{BuildReport, DomainError, DomainResult};

/// Forest node for one constituent, valid for the lifetime of one build.
#[derive(Debug, Clone)]
pub struct AggregationNode {
    pub id: RecordId,
    pub name: String,
    pub status: Status,
    /// Index of the referrer in the arena, None for roots
    pub parent: Option<Index>,
    /// Recruits, exclusively owned by this node
    pub children: Vec<Index>,
    pub direct_children: usize,
    pub total_descendants: usize,
}

impl AggregationNode {
    pub fn new(id: RecordId, name: String, status: Status) -> Self {
        Self {
            id,
            name,
            status,
            parent: None,
            children: Vec::new(),
            direct_children: 0,
            total_descendants: 0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Size of the subtree headed by this node, the node included.
    pub fn subtree_size(&self) -> usize {
        self.total_descendants + 1
    }
}

impl fmt::Display for AggregationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Ordered set of disjoint referral trees.
///
/// Nodes live in a generational arena; roots and child lists hold arena
/// indices. A forest is read-only once it leaves the engine.
#[derive(Debug, Default)]
pub struct Forest {
    pub(crate) arena: Arena<AggregationNode>,
    pub(crate) roots: Vec<Index>,
    pub(crate) index: HashMap<RecordId, Index>,
    pub(crate) report: BuildReport,
}

/// Summary figures for one forest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForestStats {
    pub constituents: usize,
    pub roots: usize,
    pub leaves: usize,
    pub max_depth: usize,
    /// Root heading the biggest tree and that tree's size
    pub largest_tree: Option<(RecordId, usize)>,
    /// Head count per status, every status listed
    pub by_status: BTreeMap<Status, usize>,
}

impl Forest {
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    pub fn root_indices(&self) -> &[Index] {
        &self.roots
    }

    pub fn roots(&self) -> impl Iterator<Item = &AggregationNode> + '_ {
        self.roots.iter().filter_map(|&idx| self.arena.get(idx))
    }

    pub fn node(&self, idx: Index) -> Option<&AggregationNode> {
        self.arena.get(idx)
    }

    pub fn index_of(&self, id: &RecordId) -> Option<Index> {
        self.index.get(id).copied()
    }

    pub fn get(&self, id: &RecordId) -> Option<&AggregationNode> {
        self.index_of(id).and_then(|idx| self.arena.get(idx))
    }

    pub fn children(&self, idx: Index) -> impl Iterator<Item = &AggregationNode> + '_ {
        self.arena
            .get(idx)
            .into_iter()
            .flat_map(|node| node.children.iter())
            .filter_map(|&child| self.arena.get(child))
    }

    /// Pre-order walk over all trees, roots in forest order.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }

    /// Post-order walk over all trees: every node after its recruits.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Number of levels of the deepest tree, 0 for an empty forest.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter().map(|(_, depth, _)| depth + 1).max().unwrap_or(0)
    }

    /// Constituents who recruited nobody, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<&AggregationNode> {
        self.iter()
            .map(|(_, _, node)| node)
            .filter(|node| node.is_leaf())
            .collect()
    }

    /// Referral chain from `id` up to the root of its tree.
    ///
    /// The first element is the constituent itself, the last is its root.
    #[instrument(level = "debug", skip(self))]
    pub fn chain(&self, id: &RecordId) -> DomainResult<Vec<&AggregationNode>> {
        let start = self
            .index_of(id)
            .ok_or_else(|| DomainError::UnknownIdentity(id.clone()))?;
        let mut chain = Vec::new();
        let mut cursor = Some(start);
        while let Some(idx) = cursor {
            let Some(node) = self.arena.get(idx) else {
                break;
            };
            chain.push(node);
            cursor = node.parent;
        }
        Ok(chain)
    }

    /// Constituents with at least one recruit, most influential first.
    /// Equal counts keep pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn top_recruiters(&self, limit: usize) -> Vec<&AggregationNode> {
        self.iter()
            .map(|(_, _, node)| node)
            .filter(|node| node.total_descendants > 0)
            .sorted_by_key(|node| Reverse(node.total_descendants))
            .take(limit)
            .collect()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn stats(&self) -> ForestStats {
        let mut stats = ForestStats {
            constituents: self.len(),
            roots: self.roots.len(),
            by_status: Status::ALL.iter().map(|&status| (status, 0)).collect(),
            ..ForestStats::default()
        };
        for (_, depth, node) in self.iter() {
            stats.max_depth = stats.max_depth.max(depth + 1);
            if node.is_leaf() {
                stats.leaves += 1;
            }
            *stats.by_status.entry(node.status).or_default() += 1;
        }
        // first root on ties, ranked or not
        stats.largest_tree = self
            .roots()
            .min_by_key(|root| Reverse(root.subtree_size()))
            .map(|root| (root.id.clone(), root.subtree_size()));
        stats
    }
}

/// Depth-first pre-order iterator yielding `(index, depth, node)`; roots have depth 0.
pub struct PreOrderIterator<'a> {
    forest: &'a Forest,
    stack: Vec<(Index, usize)>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        let stack = forest.roots.iter().rev().map(|&root| (root, 0)).collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, usize, &'a AggregationNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, depth)) = self.stack.pop() {
            if let Some(node) = self.forest.arena.get(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((current_idx, depth, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    forest: &'a Forest,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        let stack = forest.roots.iter().rev().map(|&root| (root, false)).collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a AggregationNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.forest.arena.get(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
