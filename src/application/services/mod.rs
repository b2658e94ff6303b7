//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (RecordSource, FileSystem)
//! but are themselves concrete structs, not traits.

mod genealogy;

pub use genealogy::GenealogyService;
