//! Referral genealogy engine.
//!
//! Rebuilds the forest of "who recruited whom" from flat constituent rows,
//! counts every person's direct and transitive recruits, and ranks the
//! result by influence. The engine lives in [`domain`]; [`application`]
//! adds fetch-then-build orchestration and presentation state.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
