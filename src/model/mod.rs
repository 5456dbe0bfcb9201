//! Constraint model.
//!
//! [`Model`] owns the backend, allocates decision and auxiliary variables,
//! and queues postings as deferred interactions that are flushed once, in
//! order, before search runs. [`ModelConfig`] holds the default domains of
//! auxiliary variables.

mod config;
#[allow(clippy::module_inception)]
mod model;

pub use config::ModelConfig;
pub use model::{Interaction, Model};
