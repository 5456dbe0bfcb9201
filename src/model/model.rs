//! Model: backend ownership, allocation and deferred interactions.

use super::config::ModelConfig;
use crate::backend::{Backend, Posting};
use crate::constraints::ConstraintReceiver;
use crate::error::{BackendError, Result};
use crate::operand::{Operand, VarEnum};
use crate::search::{SolveResult, Solver, SolverConfig};
use crate::var::{Domain, Var, VarKind};
use std::collections::{BTreeSet, VecDeque};

/// A deferred backend interaction, executed once when the model is flushed.
pub type Interaction<B> = Box<dyn FnOnce(&mut B) -> std::result::Result<(), BackendError>>;

/// A constraint model over a backend engine.
///
/// The model is the explicit context every declaration is threaded through:
/// it allocates variables immediately and queues postings as interactions
/// that run, in FIFO order, when [`flush`](Self::flush) is called (which
/// [`solve`](Self::solve) does before searching).
///
/// # Examples
///
/// ```
/// use u_cpexpr::backend::RecordingBackend;
/// use u_cpexpr::model::Model;
/// use u_cpexpr::operand::Operand;
///
/// let mut model = Model::new(RecordingBackend::new());
/// let a = model.bool_var();
/// let b = model.bool_var();
/// let either = Operand::from(a).or(b).unwrap();
/// model.must(either).be_true().unwrap();
/// assert_eq!(model.pending(), 1);
/// model.flush().unwrap();
/// assert_eq!(model.backend().postings().len(), 1);
/// ```
pub struct Model<B: Backend> {
    config: ModelConfig,
    backend: B,
    queue: VecDeque<Interaction<B>>,
    aux_vars: usize,
    executed: usize,
}

impl<B: Backend> Model<B> {
    /// Creates a model with the default configuration.
    pub fn new(backend: B) -> Self {
        Self {
            config: ModelConfig::default(),
            backend,
            queue: VecDeque::new(),
            aux_vars: 0,
            executed: 0,
        }
    }

    /// Creates a model with a validated configuration.
    pub fn with_config(backend: B, config: ModelConfig) -> std::result::Result<Self, String> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(backend)
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consumes the model. Queued interactions that were never flushed are dropped.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Allocates a boolean decision variable.
    pub fn bool_var(&mut self) -> Var {
        self.backend.fresh_bool()
    }

    /// Allocates an integer decision variable with domain `[min, max]`.
    pub fn int_var(&mut self, min: i64, max: i64) -> Var {
        self.backend.fresh_int(min, max)
    }

    /// Allocates a set decision variable with bounds `glb ⊆ s ⊆ lub`.
    pub fn set_var(
        &mut self,
        glb: impl IntoIterator<Item = i64>,
        lub: impl IntoIterator<Item = i64>,
    ) -> Var {
        self.backend
            .fresh_set(glb.into_iter().collect(), lub.into_iter().collect())
    }

    /// Allocates `n` boolean variables wrapped as an enumeration.
    pub fn bool_vars(&mut self, n: usize) -> VarEnum {
        let vars: Vec<Var> = (0..n).map(|_| self.bool_var()).collect();
        VarEnum::with_kind(VarKind::Bool, vars)
    }

    /// Allocates `n` integer variables with domain `[min, max]`.
    pub fn int_vars(&mut self, n: usize, min: i64, max: i64) -> VarEnum {
        let vars: Vec<Var> = (0..n).map(|_| self.int_var(min, max)).collect();
        VarEnum::with_kind(VarKind::Int, vars)
    }

    /// Allocates `n` set variables with identical bounds.
    pub fn set_vars(&mut self, n: usize, glb: &BTreeSet<i64>, lub: &BTreeSet<i64>) -> VarEnum {
        let vars: Vec<Var> = (0..n)
            .map(|_| self.backend.fresh_set(glb.clone(), lub.clone()))
            .collect();
        VarEnum::with_kind(VarKind::Set, vars)
    }

    /// Allocates an auxiliary variable of `kind` with the configured default domain.
    pub fn fresh(&mut self, kind: VarKind) -> Var {
        self.aux_vars += 1;
        let domain = match kind {
            VarKind::Bool => Domain::Bool,
            VarKind::Int => Domain::int(self.config.aux_int_min, self.config.aux_int_max),
            VarKind::Set => Domain::set(
                [],
                self.config.aux_set_lub_min..=self.config.aux_set_lub_max,
            ),
        };
        self.backend.fresh(domain)
    }

    /// Number of auxiliary variables allocated by the compiler so far.
    pub fn aux_count(&self) -> usize {
        self.aux_vars
    }

    /// Queues an interaction to run on the next flush.
    pub fn add_interaction<F>(&mut self, interaction: F)
    where
        F: FnOnce(&mut B) -> std::result::Result<(), BackendError> + 'static,
    {
        self.queue.push_back(Box::new(interaction));
    }

    /// Queues a single posting.
    pub(crate) fn enqueue_posting(&mut self, posting: Posting) {
        log::debug!(
            "[{}] queue {} (negate={}, reify={:?})",
            self.config.name,
            posting.primitive.name(),
            posting.negate,
            posting.reify
        );
        self.add_interaction(move |backend| backend.post(posting));
    }

    /// Number of queued interactions.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Total number of interactions executed by flushes.
    pub fn executed(&self) -> usize {
        self.executed
    }

    /// Runs every queued interaction once, in FIFO order.
    ///
    /// Stops at the first backend failure; interactions after the failing
    /// one stay queued. Returns the number of interactions executed.
    pub fn flush(&mut self) -> Result<usize> {
        let mut count = 0;
        while let Some(interaction) = self.queue.pop_front() {
            interaction(&mut self.backend)?;
            count += 1;
            self.executed += 1;
        }
        if count > 0 {
            log::debug!("[{}] flushed {count} interactions", self.config.name);
        }
        Ok(count)
    }

    /// Flushes pending interactions and runs `solver` on the backend.
    pub fn solve<S: Solver<B>>(
        &mut self,
        solver: &S,
        config: &SolverConfig,
    ) -> Result<SolveResult> {
        self.flush()?;
        Ok(solver.solve(&self.backend, config))
    }

    /// Starts a constraint declaration on `operand`.
    pub fn must(&mut self, operand: impl Into<Operand>) -> ConstraintReceiver<'_, B> {
        ConstraintReceiver::new(self, operand.into(), false)
    }

    /// Starts a negated constraint declaration on `operand`.
    pub fn must_not(&mut self, operand: impl Into<Operand>) -> ConstraintReceiver<'_, B> {
        ConstraintReceiver::new(self, operand.into(), true)
    }
}
