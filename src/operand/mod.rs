//! Operands: the nodes of a constraint expression tree.
//!
//! # Key Types
//!
//! - [`Operand`]: tagged union over bare variables, enumerations, composite
//!   stubs and constants
//! - [`Stub`]: a deferred composite expression that either fuses into its
//!   enclosing relation or materializes into an auxiliary variable
//! - [`VarEnum`]: adapter giving an ordered collection of variables aggregate
//!   operand capability
//! - [`SelectedSet`]: `sets[selector]`, reduced by union or intersection

mod enumeration;
mod selected;
mod stub;
mod types;

pub use enumeration::VarEnum;
pub use selected::SelectedSet;
pub use stub::{Connective, Stub};
pub(crate) use types::expect_kind;
pub use types::{Constant, Operand, OperandKind};
