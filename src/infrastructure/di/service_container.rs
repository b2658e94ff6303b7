//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::GenealogyService;
use crate::config::Settings;
use crate::infrastructure::source::JsonSnapshotSource;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, RecordSource};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding application settings and I/O boundaries.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Explicit record source; when None the configured snapshot is used
    source: Option<Arc<dyn RecordSource>>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), None)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        source: Option<Arc<dyn RecordSource>>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            source,
        }
    }

    /// Genealogy service over the explicit source or the configured snapshot.
    pub fn genealogy(&self) -> InfraResult<GenealogyService> {
        let source: Arc<dyn RecordSource> = match (&self.source, &self.settings.snapshot) {
            (Some(source), _) => Arc::clone(source),
            (None, Some(path)) => {
                if !self.fs.is_file(path) {
                    return Err(InfraError::SnapshotNotFound(path.clone()));
                }
                Arc::new(JsonSnapshotSource::new(path.clone(), Arc::clone(&self.fs)))
            }
            (None, None) => return Err(InfraError::NoSnapshot),
        };
        debug!("genealogy source: {}", source.describe());
        Ok(GenealogyService::new(source))
    }
}
