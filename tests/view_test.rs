//! Tests for the presentation adapter

use genealogy::application::{render_forest, visible_rows, ExpansionState, RenderOptions};
use genealogy::domain::{build_forest, Forest, RecordId};
use genealogy::util::testing::person;
use rstest::{fixture, rstest};

/// a -> [b -> [d -> [e]], c]; f -> [g]
#[fixture]
fn forest() -> Forest {
    build_forest(&[
        person("a", None),
        person("b", Some("a")),
        person("c", Some("a")),
        person("d", Some("b")),
        person("e", Some("d")),
        person("f", None),
        person("g", Some("f")),
    ])
}

fn visible_ids(forest: &Forest, state: &ExpansionState) -> Vec<String> {
    visible_rows(forest, state, 3)
        .into_iter()
        .map(|row| row.id.to_string())
        .collect()
}

#[rstest]
fn given_expanded_forest_when_flattening_then_all_rows_in_order(forest: Forest) {
    let rows = visible_rows(&forest, &ExpansionState::default(), 3);

    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "d", "e", "c", "f", "g"]);
    assert_eq!(rows[0].depth, 0);
    assert_eq!(rows[3].depth, 3);
    assert!(rows[0].influential, "a has 4 recruits");
    assert!(!rows[1].influential, "b has 2 recruits");
    assert_eq!(rows[0].direct_children, 2);
}

#[rstest]
fn given_collapsed_node_when_flattening_then_descendants_hidden(forest: Forest) {
    let mut state = ExpansionState::default();
    state.set(RecordId::new("b"), false);

    assert_eq!(visible_ids(&forest, &state), vec!["a", "b", "c", "f", "g"]);
}

#[rstest]
fn given_collapse_all_when_flattening_then_only_roots(forest: Forest) {
    let mut state = ExpansionState::default();
    state.collapse_all();
    assert_eq!(visible_ids(&forest, &state), vec!["a", "f"]);

    state.toggle(&RecordId::new("a"));
    assert_eq!(visible_ids(&forest, &state), vec!["a", "b", "c", "f"]);
}

#[rstest]
fn given_collapsed_defaults_when_expanding_all_then_every_row_visible(forest: Forest) {
    let mut state = ExpansionState::new(false);
    state.set(RecordId::new("a"), true);

    state.expand_all();

    assert_eq!(state.overrides(), 0);
    assert_eq!(visible_ids(&forest, &state).len(), forest.len());
}

#[rstest]
fn given_state_when_rebuilding_forest_then_flags_survive(forest: Forest) {
    let mut state = ExpansionState::default();
    state.set(RecordId::new("b"), false);

    let rebuilt = build_forest(&[
        person("a", None),
        person("b", Some("a")),
        person("d", Some("b")),
        person("x", Some("b")),
    ]);

    assert_eq!(visible_ids(&rebuilt, &state), vec!["a", "b"]);
    assert_eq!(visible_ids(&forest, &state), vec!["a", "b", "c", "f", "g"]);
}

#[rstest]
fn given_stale_flags_when_pruning_then_only_known_ids_kept(forest: Forest) {
    let mut state = ExpansionState::default();
    state.set(RecordId::new("b"), false);
    state.set(RecordId::new("gone"), false);

    state.prune(&forest);

    assert_eq!(state.overrides(), 1);
    assert!(!state.is_expanded(&RecordId::new("b")));
}

#[rstest]
fn given_forest_when_rendering_then_labels_show_influence(forest: Forest) {
    let trees = render_forest(&forest, &ExpansionState::default(), &RenderOptions::default());

    assert_eq!(trees.len(), 2);
    assert_eq!(trees[0].root, "A [pending] +4 (2 direct) ★");
    assert_eq!(trees[0].leaves[0].root, "B [pending] +2 (1 direct)");
    assert_eq!(trees[0].leaves[1].root, "C [pending]");
    assert_eq!(trees[1].root, "F [pending] +1 (1 direct)");
}

#[rstest]
fn given_collapsed_node_when_rendering_then_shows_hidden_count(forest: Forest) {
    let mut state = ExpansionState::default();
    state.set(RecordId::new("b"), false);

    let trees = render_forest(&forest, &state, &RenderOptions::default());

    let b = &trees[0].leaves[0];
    assert_eq!(b.root, "B [pending] +2 (1 direct) … 2 hidden");
    assert!(b.leaves.is_empty());
}

#[rstest]
fn given_depth_limit_when_rendering_then_cuts_below_limit(forest: Forest) {
    let options = RenderOptions {
        max_depth: Some(2),
        ..RenderOptions::default()
    };

    let trees = render_forest(&forest, &ExpansionState::default(), &options);

    let b = &trees[0].leaves[0];
    assert!(b.root.ends_with("… 2 hidden"));
    assert!(b.leaves.is_empty());
    assert_eq!(trees[0].leaves[1].root, "C [pending]");
}

#[rstest]
#[case(4, false)]
#[case(3, true)]
fn given_badge_threshold_when_rendering_then_badge_strictly_above(
    forest: Forest,
    #[case] threshold: usize,
    #[case] badged: bool,
) {
    let options = RenderOptions {
        badge_threshold: threshold,
        ..RenderOptions::default()
    };

    let trees = render_forest(&forest, &ExpansionState::default(), &options);

    assert_eq!(trees[0].root.ends_with('★'), badged);
}

#[test]
fn given_empty_forest_when_rendering_then_nothing() {
    let forest = build_forest(&[]);
    assert!(render_forest(&forest, &ExpansionState::default(), &RenderOptions::default()).is_empty());
    assert!(visible_rows(&forest, &ExpansionState::default(), 3).is_empty());
}
