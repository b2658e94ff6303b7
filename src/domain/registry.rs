//! Node registry: one arena node per constituent row, keyed by identity.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::entities::{ConstituentRecord, RecordId, Status, UNNAMED_PLACEHOLDER};
use crate::domain::error::{Anomaly, BuildReport};
use crate::domain::forest::AggregationNode;

/// Identity-keyed node storage for one build.
///
/// `slots[row]` tells which node the row at `row` produced, None for a
/// duplicate row that was skipped.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    pub(crate) arena: Arena<AggregationNode>,
    pub(crate) index: HashMap<RecordId, Index>,
    pub(crate) slots: Vec<Option<Index>>,
    pub(crate) report: BuildReport,
}

impl NodeRegistry {
    /// Build one node per record, with empty child lists and zero counts.
    ///
    /// Never fails: rows missing a name, status or identity get
    /// placeholders, and a repeated identity keeps its first row.
    #[instrument(level = "debug", skip(records), fields(records = records.len()))]
    pub fn index(records: &[ConstituentRecord]) -> Self {
        let mut registry = Self {
            arena: Arena::with_capacity(records.len()),
            index: HashMap::with_capacity(records.len()),
            slots: Vec::with_capacity(records.len()),
            report: BuildReport::default(),
        };

        for (row, record) in records.iter().enumerate() {
            let id = record.identity(row);
            if id.is_placeholder() {
                registry.report.record(Anomaly::MalformedRow {
                    row,
                    id: id.clone(),
                    field: "id",
                });
            }

            if registry.contains(&id) {
                registry
                    .report
                    .record(Anomaly::DuplicateIdentity { row, id });
                registry.slots.push(None);
                continue;
            }

            let name = match record.name.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => {
                    registry.report.record(Anomaly::MalformedRow {
                        row,
                        id: id.clone(),
                        field: "name",
                    });
                    UNNAMED_PLACEHOLDER.to_string()
                }
            };
            let status = record.status.unwrap_or_else(|| {
                registry.report.record(Anomaly::MalformedRow {
                    row,
                    id: id.clone(),
                    field: "status",
                });
                Status::Unknown
            });

            let idx = registry
                .arena
                .insert(AggregationNode::new(id.clone(), name, status));
            registry.index.insert(id, idx);
            registry.slots.push(Some(idx));
        }

        debug!(
            "indexed {} nodes from {} rows",
            registry.arena.len(),
            records.len()
        );
        registry
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&AggregationNode> {
        self.index.get(id).and_then(|&idx| self.arena.get(idx))
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.index.contains_key(id)
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }
}
