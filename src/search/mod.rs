//! Search over posted constraints.
//!
//! Search belongs to the propagation engine; this module only defines the
//! seam ([`Solver`]) and a reference exhaustive search used to check that
//! compiled postings mean what the expressions say.
//!
//! # Key Types
//!
//! - [`Solver`]: runs search over a backend
//! - [`SimpleSolver`]: depth-first enumeration over a [`RecordingBackend`](crate::backend::RecordingBackend)
//! - [`Solution`], [`Value`], [`SolveResult`], [`SolverStatus`]

mod config;
mod eval;
mod solver;
mod types;

pub use config::SolverConfig;
pub use eval::holds;
pub use solver::{SimpleSolver, Solver};
pub use types::{SolveResult, Solution, SolverStatus, Value};
