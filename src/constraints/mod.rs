//! Constraint receivers and leaf translators.
//!
//! A declaration is `must`/`must_not` on an operand followed by exactly one
//! relation method on the returned [`ConstraintReceiver`]. The receiver's
//! methods are split by operand kind across the files of this module; each
//! one validates kinds and options, then queues its postings on the model.
//!
//! # Key Types
//!
//! - [`ConstraintReceiver`]: operand + negation flag + [`ConstraintOptions`]
//! - [`SetOperation`]: `a ∪ b`, `a ∩ b`, ... awaiting one set relation
//! - [`SetElements`]: the members of a set, related to an integer as a whole

mod boolean;
mod channel;
mod elements;
mod enumeration;
mod int;
mod operation;
mod options;
mod receiver;
mod set;

pub use elements::{SetElements, SetElementsReceiver};
pub use operation::{SetOperation, SetOperationReceiver};
pub use options::ConstraintOptions;
pub use receiver::ConstraintReceiver;
