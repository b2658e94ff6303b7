//! The full build pipeline: index, attach, aggregate, rank.

use tracing::{info, instrument};

use crate::domain::aggregate::aggregate;
use crate::domain::builder::ForestBuilder;
use crate::domain::entities::ConstituentRecord;
use crate::domain::forest::Forest;
use crate::domain::rank::rank;
use crate::domain::registry::NodeRegistry;

/// Build a ranked, aggregated forest from one snapshot of rows.
///
/// Pure and synchronous. Every call owns its registry and arena, nothing
/// is shared with earlier builds. Empty input yields an empty forest.
#[instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn build_forest(records: &[ConstituentRecord]) -> Forest {
    let registry = NodeRegistry::index(records);
    let mut forest = ForestBuilder::build(registry, records);
    aggregate(&mut forest);
    let forest = rank(forest);

    info!(
        "forest: {} constituents in {} trees, {} anomalies",
        forest.len(),
        forest.root_indices().len(),
        forest.report().anomalies.len()
    );
    forest
}
