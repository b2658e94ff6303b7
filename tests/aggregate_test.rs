//! Tests for the influence aggregator

use genealogy::domain::{aggregate, ConstituentRecord, Forest, ForestBuilder, NodeRegistry, RecordId};
use genealogy::util::testing::person;

fn aggregated(records: &[ConstituentRecord]) -> Forest {
    let mut forest = ForestBuilder::build(NodeRegistry::index(records), records);
    aggregate(&mut forest);
    forest
}

fn total(forest: &Forest, id: &str) -> usize {
    forest.get(&RecordId::new(id)).unwrap().total_descendants
}

#[test]
fn given_three_level_chain_when_aggregating_then_counts_transitive_recruits() {
    let forest = aggregated(&[person("a", None), person("b", Some("a")), person("c", Some("b"))]);

    assert_eq!(total(&forest, "a"), 2);
    assert_eq!(total(&forest, "b"), 1);
    assert_eq!(total(&forest, "c"), 0);
}

#[test]
fn given_branching_tree_when_aggregating_then_sums_children() {
    // r has p and q; p has x and y; y has z
    let forest = aggregated(&[
        person("r", None),
        person("p", Some("r")),
        person("q", Some("r")),
        person("x", Some("p")),
        person("y", Some("p")),
        person("z", Some("y")),
    ]);

    assert_eq!(total(&forest, "r"), 5);
    assert_eq!(total(&forest, "p"), 3);
    assert_eq!(total(&forest, "y"), 1);
    assert_eq!(total(&forest, "q"), 0);
    assert_eq!(forest.get(&RecordId::new("r")).unwrap().direct_children, 2);
    assert_eq!(forest.get(&RecordId::new("p")).unwrap().direct_children, 2);
}

#[test]
fn given_empty_forest_when_aggregating_then_no_op() {
    let forest = aggregated(&[]);
    assert!(forest.is_empty());
    assert_eq!(forest.root_indices().len(), 0);
}

#[test]
fn given_aggregated_forest_when_aggregating_again_then_counts_unchanged() {
    let records = [person("a", None), person("b", Some("a")), person("c", Some("a"))];
    let mut forest = aggregated(&records);

    aggregate(&mut forest);

    assert_eq!(total(&forest, "a"), 2);
    assert_eq!(forest.get(&RecordId::new("a")).unwrap().direct_children, 2);
}

#[test]
fn given_very_deep_chain_when_aggregating_then_no_stack_overflow() {
    let depth = 200_000;
    let mut records = vec![person("n0", None)];
    records.extend((1..depth).map(|i| {
        let id = format!("n{i}");
        let parent = format!("n{}", i - 1);
        person(&id, Some(&parent))
    }));

    let forest = aggregated(&records);

    assert_eq!(total(&forest, "n0"), depth - 1);
    assert_eq!(total(&forest, &format!("n{}", depth - 1)), 0);
}

#[test]
fn given_orphan_chain_when_aggregating_then_orphan_heads_its_tree() {
    let forest = aggregated(&[person("d", Some("missing")), person("e", Some("d"))]);

    assert_eq!(total(&forest, "d"), 1);
    assert_eq!(total(&forest, "e"), 0);
    assert_eq!(forest.get(&RecordId::new("d")).unwrap().direct_children, 1);
}
