//! Domain layer: the referral-graph engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod aggregate;
pub mod builder;
pub mod engine;
pub mod entities;
pub mod error;
pub mod forest;
pub mod rank;
pub mod registry;

pub use aggregate::aggregate;
pub use builder::ForestBuilder;
pub use engine::build_forest;
pub use entities::*;
pub use error::{Anomaly, BuildReport, DomainError, DomainResult};
pub use forest::{AggregationNode, Forest, ForestStats};
pub use rank::rank;
pub use registry::NodeRegistry;
