//! Tests for ForestBuilder

use genealogy::domain::{Anomaly, Forest, ForestBuilder, NodeRegistry, RecordId};
use genealogy::util::testing::{init_test_setup, person};
use genealogy::domain::ConstituentRecord;

fn build(records: &[ConstituentRecord]) -> Forest {
    ForestBuilder::build(NodeRegistry::index(records), records)
}

fn root_ids(forest: &Forest) -> Vec<&str> {
    forest.roots().map(|n| n.id.as_str()).collect()
}

fn child_ids<'a>(forest: &'a Forest, id: &str) -> Vec<&'a str> {
    let idx = forest.index_of(&RecordId::new(id)).unwrap();
    forest.children(idx).map(|n| n.id.as_str()).collect()
}

#[test]
fn given_chain_when_building_then_links_each_to_referrer() {
    init_test_setup();
    let records = vec![person("a", None), person("b", Some("a")), person("c", Some("b"))];

    let forest = build(&records);

    assert_eq!(root_ids(&forest), vec!["a"]);
    assert_eq!(child_ids(&forest, "a"), vec!["b"]);
    assert_eq!(child_ids(&forest, "b"), vec!["c"]);
    assert_eq!(forest.get(&RecordId::new("a")).unwrap().direct_children, 1);
    assert!(forest.report().is_clean());
}

#[test]
fn given_child_listed_before_referrer_when_building_then_still_attached() {
    let records = vec![person("b", Some("a")), person("a", None)];

    let forest = build(&records);

    assert_eq!(root_ids(&forest), vec!["a"]);
    assert_eq!(child_ids(&forest, "a"), vec!["b"]);
}

#[test]
fn given_unknown_referrer_when_building_then_becomes_root() {
    let records = vec![person("d", Some("ghost")), person("e", Some("d"))];

    let forest = build(&records);

    assert_eq!(root_ids(&forest), vec!["d"]);
    assert_eq!(child_ids(&forest, "d"), vec!["e"]);
    assert_eq!(
        forest.report().anomalies,
        vec![Anomaly::UnresolvedReferrer {
            id: RecordId::new("d"),
            referrer: RecordId::new("ghost"),
        }]
    );
}

#[test]
fn given_self_referral_when_building_then_becomes_root() {
    let records = vec![person("x", Some("x"))];

    let forest = build(&records);

    assert_eq!(root_ids(&forest), vec!["x"]);
    assert!(child_ids(&forest, "x").is_empty());
    assert_eq!(forest.report().self_referrals(), 1);
}

#[test]
fn given_two_cycle_when_building_then_later_row_demoted_to_root() {
    let records = vec![person("a", Some("b")), person("b", Some("a"))];

    let forest = build(&records);

    assert_eq!(root_ids(&forest), vec!["b"]);
    assert_eq!(child_ids(&forest, "b"), vec!["a"]);
    assert_eq!(
        forest.report().anomalies,
        vec![Anomaly::CycleDetected {
            id: RecordId::new("b"),
            referrer: RecordId::new("a"),
        }]
    );
}

#[test]
fn given_three_cycle_when_building_then_broken_at_closing_row() {
    // a <- c, b <- a, c <- b
    let records = vec![person("a", Some("c")), person("b", Some("a")), person("c", Some("b"))];

    let forest = build(&records);

    assert_eq!(root_ids(&forest), vec!["c"]);
    assert_eq!(child_ids(&forest, "c"), vec!["a"]);
    assert_eq!(child_ids(&forest, "a"), vec!["b"]);
    assert_eq!(forest.report().cycles(), 1);
}

#[test]
fn given_diamond_when_building_then_not_a_cycle() {
    let records = vec![person("r", None), person("p", Some("r")), person("q", Some("r"))];

    let forest = build(&records);

    assert_eq!(child_ids(&forest, "r"), vec!["p", "q"]);
    assert_eq!(forest.get(&RecordId::new("r")).unwrap().direct_children, 2);
    assert_eq!(forest.report().cycles(), 0);
}

#[test]
fn given_referrer_with_duplicate_rows_when_building_then_attaches_to_first() {
    let records = vec![person("a", None), person("a", None), person("b", Some("a"))];

    let forest = build(&records);

    assert_eq!(forest.len(), 2);
    assert_eq!(root_ids(&forest), vec!["a"]);
    assert_eq!(child_ids(&forest, "a"), vec!["b"]);
}

#[test]
fn given_roots_when_building_then_kept_in_input_order() {
    let records = vec![person("z", None), person("m", Some("nobody")), person("a", None)];

    let forest = build(&records);

    assert_eq!(root_ids(&forest), vec!["z", "m", "a"]);
}

#[test]
fn given_dirty_rows_when_querying_report_then_anomalies_grouped_by_constituent() {
    let records = vec![
        person("a", Some("b")),
        person("b", Some("a")),
        ConstituentRecord {
            name: None,
            ..person("c", Some("b"))
        },
    ];

    let forest = build(&records);
    let report = forest.report();

    let about_b: Vec<&Anomaly> = report.about(&RecordId::new("b")).collect();
    assert_eq!(about_b.len(), 1);
    assert!(about_b[0].promoted_to_root());
    assert_eq!(about_b[0].id(), &RecordId::new("b"));

    let about_c: Vec<&Anomaly> = report.about(&RecordId::new("c")).collect();
    assert_eq!(about_c.len(), 1);
    assert!(!about_c[0].promoted_to_root());
    assert_eq!(report.about(&RecordId::new("a")).count(), 0);
}
