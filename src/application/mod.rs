//! Application layer: services and presentation
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod services;
pub mod view;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use view::{render_forest, visible_rows, ExpansionState, RenderOptions, VisibleRow};
