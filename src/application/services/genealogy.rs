//! Genealogy service
//!
//! Fetch-then-build orchestration: one snapshot in, one ranked forest out.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{build_forest, Forest};
use crate::infrastructure::traits::RecordSource;

/// Service turning a record source into referral forests.
pub struct GenealogyService {
    source: Arc<dyn RecordSource>,
}

impl GenealogyService {
    /// Create a new genealogy service.
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Name of the underlying record source.
    pub fn source_name(&self) -> String {
        self.source.describe()
    }

    /// Fetch a fresh snapshot and build its forest.
    ///
    /// A failed fetch is an error; an empty snapshot is an empty forest.
    /// Each call is an independent build, callers holding a stale forest
    /// simply drop it.
    #[instrument(level = "debug", skip(self))]
    pub fn build(&self) -> ApplicationResult<Forest> {
        let records = self.source.fetch().from_source(self.source.describe())?;
        debug!("build: {} rows from {}", records.len(), self.source.describe());
        Ok(build_forest(&records))
    }
}
