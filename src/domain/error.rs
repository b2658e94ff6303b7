//! Domain-level errors and recoverable build anomalies (no external dependencies)

use thiserror::Error;

use crate::domain::entities::RecordId;

/// Domain errors represent failed queries against a built forest.
/// Building itself never fails, see [`Anomaly`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown constituent: {0}")]
    UnknownIdentity(RecordId),
}

/// Result type for domain queries.
pub type DomainResult<T> = Result<T, DomainError>;

/// Inconsistent input recovered locally while building a forest.
///
/// Every variant degrades to "keep the row, treat it as a root" or
/// "keep the row, use a placeholder"; none aborts the build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    #[error("row {row} ({id}): missing {field}, using placeholder")]
    MalformedRow {
        row: usize,
        id: RecordId,
        field: &'static str,
    },

    #[error("row {row}: duplicate identity {id}, keeping first occurrence")]
    DuplicateIdentity { row: usize, id: RecordId },

    #[error("{id}: referrer {referrer} not found, promoted to root")]
    UnresolvedReferrer { id: RecordId, referrer: RecordId },

    #[error("{id}: refers to itself, promoted to root")]
    SelfReferral { id: RecordId },

    #[error("{id}: referrer {referrer} would close a cycle, promoted to root")]
    CycleDetected { id: RecordId, referrer: RecordId },
}

impl Anomaly {
    /// Identity of the row the anomaly was recorded for.
    pub fn id(&self) -> &RecordId {
        match self {
            Anomaly::MalformedRow { id, .. }
            | Anomaly::DuplicateIdentity { id, .. }
            | Anomaly::UnresolvedReferrer { id, .. }
            | Anomaly::SelfReferral { id }
            | Anomaly::CycleDetected { id, .. } => id,
        }
    }

    /// True for anomalies that turned a referred row into a root.
    pub fn promoted_to_root(&self) -> bool {
        matches!(
            self,
            Anomaly::UnresolvedReferrer { .. }
                | Anomaly::SelfReferral { .. }
                | Anomaly::CycleDetected { .. }
        )
    }
}

/// Anomalies collected over one build, in detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub anomalies: Vec<Anomaly>,
}

impl BuildReport {
    pub fn record(&mut self, anomaly: Anomaly) {
        tracing::warn!("{}", anomaly);
        self.anomalies.push(anomaly);
    }

    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }

    pub fn malformed(&self) -> usize {
        self.count(|a| matches!(a, Anomaly::MalformedRow { .. }))
    }

    pub fn duplicates(&self) -> usize {
        self.count(|a| matches!(a, Anomaly::DuplicateIdentity { .. }))
    }

    pub fn unresolved(&self) -> usize {
        self.count(|a| matches!(a, Anomaly::UnresolvedReferrer { .. }))
    }

    pub fn self_referrals(&self) -> usize {
        self.count(|a| matches!(a, Anomaly::SelfReferral { .. }))
    }

    /// Anomalies recorded for the constituent `id`, in detection order.
    pub fn about<'a, 'b>(&'a self, id: &'b RecordId) -> impl Iterator<Item = &'a Anomaly> + 'b
    where
        'a: 'b,
    {
        self.anomalies.iter().filter(move |a| a.id() == id)
    }

    pub fn cycles(&self) -> usize {
        self.count(|a| matches!(a, Anomaly::CycleDetected { .. }))
    }

    fn count(&self, pred: impl Fn(&Anomaly) -> bool) -> usize {
        self.anomalies.iter().filter(|a| pred(a)).count()
    }
}
