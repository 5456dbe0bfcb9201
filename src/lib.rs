//! Declarative constraint-expression compiler.
//!
//! Builds nested expressions over typed decision variables (boolean,
//! integer, set, and enumerations thereof) and compiles them, lazily, into
//! the smallest sufficient set of primitive postings against an external
//! propagation engine:
//!
//! - **Operands**: variables, enumerations, constants and deferred composite
//!   expressions, each with a kind fixed at construction.
//! - **Fusion**: a composite expression consumed by "equal to `v`" posts its
//!   own primitive with `v` in the result slot instead of allocating an
//!   auxiliary variable. Nested conjunctions and disjunctions flatten into a
//!   single n-ary posting.
//! - **Negation and reification** compose uniformly across kinds; structural
//!   constraints (channel, set operations, distinct, tuples) reject them.
//! - **Deferred posting**: allocation is immediate, postings are queued on
//!   the [`Model`](model::Model) and flushed once, in order, before search.
//!
//! # Architecture
//!
//! The propagation engine sits behind the [`Backend`](backend::Backend)
//! trait. [`RecordingBackend`](backend::RecordingBackend) records postings
//! in memory and [`SimpleSolver`](search::SimpleSolver) enumerates their
//! solutions, which is enough to check what an expression compiles to.
//!
//! # Examples
//!
//! ```
//! use u_cpexpr::backend::RecordingBackend;
//! use u_cpexpr::model::Model;
//! use u_cpexpr::operand::Operand;
//! use u_cpexpr::search::{SimpleSolver, SolverConfig};
//!
//! let mut model = Model::new(RecordingBackend::new());
//! let b1 = model.bool_var();
//! let b2 = model.bool_var();
//! let b3 = model.bool_var();
//!
//! let expr = Operand::from(b1).and(b2).unwrap().or(b3).unwrap();
//! model.must(expr).be_true().unwrap();
//! model.must(b1).be_false().unwrap();
//!
//! let result = model.solve(&SimpleSolver::new(), &SolverConfig::default()).unwrap();
//! assert_eq!(result.first().unwrap().bool(b3), Some(true));
//! ```

pub mod backend;
pub mod constraints;
pub mod error;
pub mod model;
pub mod operand;
pub mod search;
pub mod var;

pub use error::{ExprError, Result};
