//! Solver interface and the reference depth-first search.

use super::config::SolverConfig;
use super::eval;
use super::types::{SolveResult, SolverStatus, Solution, Value};
use crate::backend::{Backend, Posting, RecordingBackend};
use crate::var::Domain;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::time::Instant;

/// Trait for solver implementations.
///
/// A solver runs search over whatever a backend has accepted. Real
/// propagation engines provide their own; [`SimpleSolver`] works on the
/// postings recorded by a [`RecordingBackend`].
pub trait Solver<B: Backend> {
    /// Searches for solutions of everything posted to `backend`.
    fn solve(&self, backend: &B, config: &SolverConfig) -> SolveResult;
}

/// Exhaustive depth-first search for testing.
///
/// Assigns variables in allocation order and checks each posting as soon as
/// the last variable it mentions is assigned. No propagation.
///
/// # Limitations
///
/// - Every domain is enumerated explicitly; domains larger than
///   `max_domain_size` make the model invalid
/// - Set domains are enumerated as subsets of `lub \ glb`
pub struct SimpleSolver;

impl SimpleSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimpleSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver<RecordingBackend> for SimpleSolver {
    fn solve(&self, backend: &RecordingBackend, config: &SolverConfig) -> SolveResult {
        if let Err(e) = config.validate() {
            log::warn!("invalid solver configuration: {e}");
            return SolveResult::empty(SolverStatus::ModelInvalid);
        }
        let start = Instant::now();

        let mut candidates = match candidate_values(backend.domains(), config.max_domain_size) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("model rejected by search: {e}");
                return SolveResult::empty(SolverStatus::ModelInvalid);
            }
        };
        if let Some(seed) = config.seed {
            let mut rng = StdRng::seed_from_u64(seed);
            for values in &mut candidates {
                values.shuffle(&mut rng);
            }
        }

        // Each posting is checked at the depth of the last variable it mentions.
        let n = candidates.len();
        let mut watch: Vec<Vec<&Posting>> = vec![Vec::new(); n];
        let mut ground = Vec::new();
        for posting in backend.postings() {
            match posting.vars().map(|v| v.id() as usize).max() {
                Some(last) => watch[last].push(posting),
                None => ground.push(posting),
            }
        }
        if ground.iter().any(|p| eval::holds(p, &[]) != Some(true)) {
            log::debug!("a posting without variables is violated");
            return SolveResult::empty(SolverStatus::Infeasible);
        }

        let mut search = Search {
            candidates,
            watch,
            assignment: vec![None; n],
            solutions: Vec::new(),
            nodes: 0,
            config,
            start,
            limit_hit: false,
        };
        let exhausted = search.dfs(0);

        let status = match (search.solutions.is_empty(), search.limit_hit, exhausted) {
            (true, true, _) => SolverStatus::Timeout,
            (true, false, _) => SolverStatus::Infeasible,
            (false, false, true) => SolverStatus::Complete,
            (false, _, _) => SolverStatus::Feasible,
        };
        let solve_time_ms = start.elapsed().as_millis() as i64;
        log::debug!(
            "search finished: {status:?}, {} solutions, {} nodes, {solve_time_ms} ms",
            search.solutions.len(),
            search.nodes
        );
        SolveResult {
            status,
            solutions: search.solutions,
            nodes: search.nodes,
            solve_time_ms,
        }
    }
}

struct Search<'a> {
    candidates: Vec<Vec<Value>>,
    watch: Vec<Vec<&'a Posting>>,
    assignment: Vec<Option<Value>>,
    solutions: Vec<Solution>,
    nodes: u64,
    config: &'a SolverConfig,
    start: Instant,
    limit_hit: bool,
}

impl Search<'_> {
    /// Returns `false` once search has to stop.
    fn dfs(&mut self, depth: usize) -> bool {
        if depth == self.assignment.len() {
            let values = self.assignment.iter().flatten().cloned().collect();
            self.solutions.push(Solution::new(values));
            log::trace!("solution #{} at node {}", self.solutions.len(), self.nodes);
            let max = self.config.max_solutions;
            return max == 0 || self.solutions.len() < max;
        }
        for k in 0..self.candidates[depth].len() {
            if self.out_of_budget() {
                self.limit_hit = true;
                self.assignment[depth] = None;
                return false;
            }
            self.nodes += 1;
            self.assignment[depth] = Some(self.candidates[depth][k].clone());
            let consistent = self.watch[depth]
                .iter()
                .all(|p| eval::holds(p, &self.assignment) == Some(true));
            if consistent && !self.dfs(depth + 1) {
                self.assignment[depth] = None;
                return false;
            }
        }
        self.assignment[depth] = None;
        true
    }

    fn out_of_budget(&self) -> bool {
        if self.nodes >= self.config.node_limit {
            return true;
        }
        self.nodes % 1024 == 0
            && self.start.elapsed().as_millis() as i64 >= self.config.time_limit_ms
    }
}

/// Explicit value lists for every domain, in ascending order.
fn candidate_values(domains: &[Domain], max_size: usize) -> Result<Vec<Vec<Value>>, String> {
    domains
        .iter()
        .enumerate()
        .map(|(id, domain)| match domain {
            Domain::Bool => Ok(vec![Value::Bool(false), Value::Bool(true)]),
            Domain::Int { min, max } => {
                let size = domain.size().unwrap_or(0);
                if size > max_size as u128 {
                    return Err(format!("variable {id} has {size} values"));
                }
                Ok((*min..=*max).map(Value::Int).collect())
            }
            Domain::Set { glb, lub } => {
                if !glb.is_subset(lub) {
                    return Ok(Vec::new());
                }
                let free: Vec<i64> = lub.difference(glb).copied().collect();
                if free.len() >= usize::BITS as usize - 1 || (1usize << free.len()) > max_size {
                    return Err(format!(
                        "set variable {id} has 2^{} candidate values",
                        free.len()
                    ));
                }
                Ok((0..1usize << free.len())
                    .map(|mask| {
                        let mut s: BTreeSet<i64> = glb.clone();
                        s.extend(
                            free.iter()
                                .enumerate()
                                .filter(|(bit, _)| mask & (1 << bit) != 0)
                                .map(|(_, e)| *e),
                        );
                        Value::Set(s)
                    })
                    .collect())
            }
        })
        .collect()
}
