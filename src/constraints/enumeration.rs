//! Whole-enumeration constraints: one n-ary posting per call.

use super::receiver::{reject_constant_enum, ConstraintReceiver};
use crate::backend::{Arg, Backend, Primitive};
use crate::error::{ExprError, Result};
use crate::operand::OperandKind;

impl<B: Backend> ConstraintReceiver<'_, B> {
    /// Every element of the integer enumeration takes a different value.
    pub fn distinct(self) -> Result<()> {
        self.require(OperandKind::IntEnum, "distinct", "int enum")?;
        self.post_aggregate(Primitive::Distinct, Vec::new())
    }

    /// The integer enumeration is non-decreasing in wrap order.
    pub fn sorted(self) -> Result<()> {
        self.require(OperandKind::IntEnum, "sorted", "int enum")?;
        self.post_aggregate(Primitive::Sorted, Vec::new())
    }

    /// The enumeration, read as a tuple, is one of `tuples`.
    ///
    /// Boolean elements are compared as 0/1. Every tuple must have one entry
    /// per element.
    pub fn in_tuples(self, tuples: Vec<Vec<i64>>) -> Result<()> {
        let kind = self.operand.kind();
        if !matches!(kind, OperandKind::IntEnum | OperandKind::BoolEnum) {
            return Err(ExprError::kind_mismatch(
                "in_tuples",
                "int or bool enum",
                kind,
            ));
        }
        reject_constant_enum(&self.operand)?;
        let arity = self.operand.len()?;
        if let Some(bad) = tuples.iter().find(|t| t.len() != arity) {
            return Err(ExprError::invalid_option(
                "tuples",
                format!("tuple of length {} for {arity} variables", bad.len()),
            ));
        }
        self.post_aggregate(Primitive::Extensional, vec![Arg::Tuples(tuples)])
    }
}
