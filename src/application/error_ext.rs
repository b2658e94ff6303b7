//! Error conversion helpers for I/O results crossing into the application layer

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Mark the error as a failed fetch from the named record source.
    ///
    /// ```ignore
    /// let records = source.fetch().from_source(source.describe())?;
    /// ```
    fn from_source(self, source_name: impl Into<String>) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn from_source(self, source_name: impl Into<String>) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::SourceUnavailable {
            source_name: source_name.into(),
            source,
        })
    }
}
