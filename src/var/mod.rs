//! Decision variable handles.
//!
//! Variables are owned by the backend engine. The compiler only passes
//! [`Var`] handles around; [`Domain`] describes what to allocate.

mod variables;

pub use variables::{Domain, Var, VarKind};
