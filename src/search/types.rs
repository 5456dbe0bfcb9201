//! Solutions and solver status.

use crate::var::Var;
use std::collections::BTreeSet;
use std::fmt;

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Every solution was enumerated.
    Complete,
    /// At least one solution found; search stopped early.
    Feasible,
    /// No assignment satisfies the postings.
    Infeasible,
    /// Model is invalid or too large for the solver.
    ModelInvalid,
    /// Solver exceeded its time or node limit.
    Timeout,
}

/// Value of a variable in a solution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Bool(bool),
    Int(i64),
    Set(BTreeSet<i64>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&BTreeSet<i64>> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view: booleans read as 0/1.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Int(i) => Some(*i),
            Value::Set(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Set(s) => {
                let items: Vec<String> = s.iter().map(i64::to_string).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
        }
    }
}

/// A complete assignment, indexed by variable id.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    values: Vec<Value>,
}

impl Solution {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn value(&self, var: Var) -> Option<&Value> {
        self.values.get(var.id() as usize)
    }

    pub fn bool(&self, var: Var) -> Option<bool> {
        self.value(var).and_then(Value::as_bool)
    }

    pub fn int(&self, var: Var) -> Option<i64> {
        self.value(var).and_then(Value::as_int)
    }

    pub fn set(&self, var: Var) -> Option<&BTreeSet<i64>> {
        self.value(var).and_then(Value::as_set)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Outcome of a solver run.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Solver status.
    pub status: SolverStatus,
    /// Solutions in the order they were found.
    pub solutions: Vec<Solution>,
    /// Search nodes explored.
    pub nodes: u64,
    /// Solve time in milliseconds.
    pub solve_time_ms: i64,
}

impl SolveResult {
    /// Creates a result with no solutions.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            solutions: Vec::new(),
            nodes: 0,
            solve_time_ms: 0,
        }
    }

    /// Whether at least one solution was found.
    pub fn is_solution_found(&self) -> bool {
        !self.solutions.is_empty()
    }

    /// The first solution found.
    pub fn first(&self) -> Option<&Solution> {
        self.solutions.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::var::VarKind;

    #[test]
    fn test_solution_lookup() {
        let solution = Solution::new(vec![Value::Bool(true), Value::Int(4)]);
        let b = Var::new(0, VarKind::Bool);
        let i = Var::new(1, VarKind::Int);
        assert_eq!(solution.bool(b), Some(true));
        assert_eq!(solution.int(i), Some(4));
        assert_eq!(solution.int(b), None);
        assert!(solution.value(Var::new(5, VarKind::Int)).is_none());
    }

    #[test]
    fn test_value_display() {
        let s = Value::Set([1, 3].into_iter().collect());
        assert_eq!(s.to_string(), "{1, 3}");
        assert_eq!(Value::Bool(true).to_int(), Some(1));
    }

    #[test]
    fn test_empty_result() {
        let result = SolveResult::empty(SolverStatus::Infeasible);
        assert!(!result.is_solution_found());
        assert!(result.first().is_none());
    }
}
