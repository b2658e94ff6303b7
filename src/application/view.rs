//! Presentation adapter over a ranked forest
//!
//! Expand/collapse is per-session view state. It lives in a side table keyed
//! by identity, so it survives rebuilds and never touches engine nodes.

use std::collections::HashMap;

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{AggregationNode, Forest, RecordId, Status};

/// Per-node expanded flags; nodes without an entry use the default.
#[derive(Debug, Clone)]
pub struct ExpansionState {
    default_expanded: bool,
    overrides: HashMap<RecordId, bool>,
}

impl Default for ExpansionState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ExpansionState {
    pub fn new(default_expanded: bool) -> Self {
        Self {
            default_expanded,
            overrides: HashMap::new(),
        }
    }

    pub fn is_expanded(&self, id: &RecordId) -> bool {
        self.overrides
            .get(id)
            .copied()
            .unwrap_or(self.default_expanded)
    }

    pub fn set(&mut self, id: RecordId, expanded: bool) {
        if expanded == self.default_expanded {
            self.overrides.remove(&id);
        } else {
            self.overrides.insert(id, expanded);
        }
    }

    /// Flip the flag for `id`, returning the new state.
    pub fn toggle(&mut self, id: &RecordId) -> bool {
        let expanded = !self.is_expanded(id);
        self.set(id.clone(), expanded);
        expanded
    }

    pub fn expand_all(&mut self) {
        self.default_expanded = true;
        self.overrides.clear();
    }

    pub fn collapse_all(&mut self) {
        self.default_expanded = false;
        self.overrides.clear();
    }

    /// Forget flags for identities absent from `forest`.
    pub fn prune(&mut self, forest: &Forest) {
        self.overrides.retain(|id, _| forest.index_of(id).is_some());
    }

    pub fn overrides(&self) -> usize {
        self.overrides.len()
    }
}

/// Rendering knobs for the genealogy tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Nodes with more descendants than this get the influence badge
    pub badge_threshold: usize,
    /// Levels to draw, None for all
    pub max_depth: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            badge_threshold: 3,
            max_depth: None,
        }
    }
}

/// One line of the flattened, collapse-aware tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: RecordId,
    pub name: String,
    pub status: Status,
    pub depth: usize,
    pub direct_children: usize,
    pub total_descendants: usize,
    pub expanded: bool,
    pub influential: bool,
}

/// Flatten the forest in display order, skipping descendants of collapsed nodes.
#[instrument(level = "debug", skip_all)]
pub fn visible_rows(forest: &Forest, state: &ExpansionState, badge_threshold: usize) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<(Index, usize)> = forest
        .root_indices()
        .iter()
        .rev()
        .map(|&root| (root, 0))
        .collect();

    while let Some((idx, depth)) = stack.pop() {
        let Some(node) = forest.node(idx) else {
            continue;
        };
        let expanded = state.is_expanded(&node.id);
        if expanded {
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }
        rows.push(VisibleRow {
            id: node.id.clone(),
            name: node.name.clone(),
            status: node.status,
            depth,
            direct_children: node.direct_children,
            total_descendants: node.total_descendants,
            expanded,
            influential: node.total_descendants > badge_threshold,
        });
    }
    rows
}

/// Text shown for a node in the terminal tree.
pub fn label(node: &AggregationNode, options: &RenderOptions) -> String {
    let mut label = format!("{} [{}]", node.name, node.status);
    if node.total_descendants > 0 {
        label.push_str(&format!(
            " +{} ({} direct)",
            node.total_descendants, node.direct_children
        ));
    }
    if node.total_descendants > options.badge_threshold {
        label.push_str(" ★");
    }
    label
}

/// One terminal tree per root, honoring collapse flags and the depth limit.
///
/// Collapsed or depth-cut nodes with recruits show how many are hidden.
#[instrument(level = "debug", skip_all)]
pub fn render_forest(forest: &Forest, state: &ExpansionState, options: &RenderOptions) -> Vec<Tree<String>> {
    forest
        .root_indices()
        .iter()
        .filter_map(|&root| render_node(forest, root, 1, state, options))
        .collect()
}

fn render_node(
    forest: &Forest,
    idx: Index,
    level: usize,
    state: &ExpansionState,
    options: &RenderOptions,
) -> Option<Tree<String>> {
    let node = forest.node(idx)?;
    let mut text = label(node, options);

    let within_depth = options.max_depth.map_or(true, |max| level < max);
    if node.is_leaf() {
        return Some(Tree::new(text));
    }
    if !state.is_expanded(&node.id) || !within_depth {
        text.push_str(&format!(" … {} hidden", node.total_descendants));
        return Some(Tree::new(text));
    }

    let leaves = node
        .children
        .iter()
        .filter_map(|&child| render_node(forest, child, level + 1, state, options));
    Some(Tree::new(text).with_leaves(leaves))
}
