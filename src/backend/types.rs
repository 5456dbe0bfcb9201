//! The backend interface consumed by the compiler.

use super::posting::Posting;
use crate::error::BackendError;
use crate::var::{Domain, Var};
use std::collections::BTreeSet;

/// A constraint engine that owns variable state and accepts postings.
///
/// The compiler never inspects domains or retracts postings: it only
/// allocates fresh variables and appends primitive constraints. Implementors
/// can wrap a real propagation engine or, like
/// [`RecordingBackend`](super::RecordingBackend), just record what they get.
pub trait Backend {
    /// Allocates a fresh boolean variable.
    fn fresh_bool(&mut self) -> Var;

    /// Allocates a fresh integer variable with domain `[min, max]`.
    fn fresh_int(&mut self, min: i64, max: i64) -> Var;

    /// Allocates a fresh set variable with bounds `glb ⊆ s ⊆ lub`.
    fn fresh_set(&mut self, glb: BTreeSet<i64>, lub: BTreeSet<i64>) -> Var;

    /// Accepts one primitive posting.
    fn post(&mut self, posting: Posting) -> Result<(), BackendError>;

    /// Allocates a variable from a [`Domain`] description.
    fn fresh(&mut self, domain: Domain) -> Var {
        match domain {
            Domain::Bool => self.fresh_bool(),
            Domain::Int { min, max } => self.fresh_int(min, max),
            Domain::Set { glb, lub } => self.fresh_set(glb, lub),
        }
    }
}
