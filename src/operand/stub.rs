//! Short-circuit composite expressions.
//!
//! A [`Stub`] stands for the value of `connective(operands)` without
//! allocating anything. It is finalized in one of two ways:
//!
//! - **fusion**: the enclosing relation is "equal to `rhs`", so the stub posts
//!   its own primitive with `rhs` in the result slot;
//! - **materialization**: anything else, so the stub allocates an auxiliary
//!   variable, posts `aux == connective(operands)` and behaves as that
//!   variable from then on.

use super::types::Operand;
use crate::backend::{Arg, Backend, Posting, Primitive, Priority, Relation, Strength};
use crate::error::{ExprError, Result};
use crate::model::Model;
use crate::operand::OperandKind;
use crate::var::{Var, VarKind};
use std::cell::OnceCell;

/// Connective of a composite expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    /// n-ary conjunction.
    And,
    /// n-ary disjunction.
    Or,
    Xor,
    Implies,
    /// Sum of an integer enumeration.
    Sum,
    /// Maximum of an integer enumeration.
    Max,
    /// Minimum of an integer enumeration.
    Min,
    /// `enum[index]`.
    Element,
    /// Number of elements of an integer enumeration equal to a value.
    Count,
    /// Union of the sets of a set enumeration picked out by a selector set.
    SelectedUnion,
    /// Intersection of the sets of a set enumeration picked out by a selector set.
    SelectedIntersection,
}

impl Connective {
    pub fn name(&self) -> &'static str {
        match self {
            Connective::And => "and",
            Connective::Or => "or",
            Connective::Xor => "xor",
            Connective::Implies => "implies",
            Connective::Sum => "sum",
            Connective::Max => "max",
            Connective::Min => "min",
            Connective::Element => "element",
            Connective::Count => "count",
            Connective::SelectedUnion => "selected union",
            Connective::SelectedIntersection => "selected intersection",
        }
    }

    /// The primitive this connective posts.
    pub fn primitive(&self) -> Primitive {
        match self {
            Connective::And => Primitive::BoolAnd,
            Connective::Or => Primitive::BoolOr,
            Connective::Xor => Primitive::BoolXor,
            Connective::Implies => Primitive::BoolImp,
            Connective::Sum => Primitive::Linear,
            Connective::Max => Primitive::Max,
            Connective::Min => Primitive::Min,
            Connective::Element => Primitive::Element,
            Connective::Count => Primitive::Count,
            Connective::SelectedUnion => Primitive::SelectedUnion,
            Connective::SelectedIntersection => Primitive::SelectedIntersection,
        }
    }

    /// Associative connectives whose nested occurrences flatten into one posting.
    pub fn is_flattening(&self) -> bool {
        matches!(self, Connective::And | Connective::Or)
    }
}

/// A deferred composite expression.
///
/// Operand layout per connective:
///
/// | Connective | Operands |
/// |---|---|
/// | `And`, `Or` | two or more bool operands |
/// | `Xor`, `Implies` | `[lhs, rhs]` |
/// | `Sum`, `Max`, `Min` | `[int enum]` |
/// | `Element` | `[enum or constant ints, int index]` |
/// | `Count` | `[int enum, int value]` |
/// | `SelectedUnion`, `SelectedIntersection` | `[set enum, set selector]` |
#[derive(Debug)]
pub struct Stub {
    connective: Connective,
    operands: Vec<Operand>,
    kind: VarKind,
    materialized: OnceCell<Var>,
}

impl Stub {
    pub(crate) fn new(connective: Connective, operands: Vec<Operand>, kind: VarKind) -> Self {
        Self {
            connective,
            operands,
            kind,
            materialized: OnceCell::new(),
        }
    }

    pub fn connective(&self) -> Connective {
        self.connective
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    /// Kind of the value the stub stands for.
    pub fn kind(&self) -> VarKind {
        self.kind
    }

    /// The auxiliary variable, if the stub has been materialized.
    pub fn materialized(&self) -> Option<Var> {
        self.materialized.get().copied()
    }

    /// Returns a variable bound to the stub's value, allocating and posting
    /// it on the first call only.
    pub fn force_materialize<B: Backend>(&self, model: &mut Model<B>) -> Result<Var> {
        if let Some(var) = self.materialized.get() {
            return Ok(*var);
        }
        let args = self.resolve_operands(model)?;
        let var = model.fresh(self.kind);
        log::debug!("materialize {} stub into {var}", self.connective.name());
        let _ = self.materialized.set(var);
        let posting = self.posting(args, Arg::Var(var));
        model.enqueue_posting(posting);
        Ok(var)
    }

    /// Posts `connective(operands) == result` as a single primitive.
    ///
    /// With `result = None` a fresh variable takes the result slot. Returns
    /// the argument that ended up in the result slot.
    pub fn constrain_equal<B: Backend>(
        &self,
        model: &mut Model<B>,
        result: Option<Arg>,
        negate: bool,
        strength: Strength,
        priority: Option<Priority>,
    ) -> Result<Arg> {
        if let Some(kind) = result.as_ref().and_then(Arg::scalar_kind) {
            if kind != self.kind {
                return Err(ExprError::kind_mismatch(
                    self.connective.name(),
                    "result of the expression's kind",
                    OperandKind::scalar(kind),
                ));
            }
        }
        let args = self.resolve_operands(model)?;
        let result = match result {
            Some(arg) => arg,
            None => Arg::Var(model.fresh(self.kind)),
        };
        log::debug!(
            "fuse {} stub (negate={negate}) into one posting",
            self.connective.name()
        );
        let posting = self
            .posting(args, result.clone())
            .with_negate(negate)
            .with_strength(strength)
            .with_priority(priority);
        model.enqueue_posting(posting);
        Ok(result)
    }

    /// Resolves operands to backend arguments, materializing nested stubs.
    ///
    /// Nested unmaterialized stubs with the same flattening connective are
    /// inlined so the whole chain becomes one n-ary posting.
    fn resolve_operands<B: Backend>(&self, model: &mut Model<B>) -> Result<Vec<Arg>> {
        let mut args = Vec::with_capacity(self.operands.len());
        if self.connective.is_flattening() {
            self.collect_flattened(model, &mut args)?;
        } else {
            for operand in &self.operands {
                args.push(operand.to_backend_handle(model)?);
            }
        }
        Ok(args)
    }

    fn collect_flattened<B: Backend>(&self, model: &mut Model<B>, out: &mut Vec<Arg>) -> Result<()> {
        for operand in &self.operands {
            match operand {
                Operand::Stub(inner)
                    if inner.connective == self.connective && inner.materialized().is_none() =>
                {
                    inner.collect_flattened(model, out)?;
                }
                other => out.push(other.to_backend_handle(model)?),
            }
        }
        Ok(())
    }

    fn posting(&self, mut args: Vec<Arg>, result: Arg) -> Posting {
        let primitive = self.connective.primitive();
        args.push(result);
        let posting = Posting::new(primitive, args);
        match self.connective {
            Connective::And | Connective::Or | Connective::Xor | Connective::Implies => posting,
            _ => posting.with_relation(Relation::Eq),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;

    fn model() -> Model<RecordingBackend> {
        Model::new(RecordingBackend::new())
    }

    #[test]
    fn test_materialize_is_idempotent() {
        let mut m = model();
        let a = m.bool_var();
        let b = m.bool_var();
        let stub = Stub::new(
            Connective::And,
            vec![Operand::Var(a), Operand::Var(b)],
            VarKind::Bool,
        );
        let v1 = stub.force_materialize(&mut m).unwrap();
        let v2 = stub.force_materialize(&mut m).unwrap();
        assert_eq!(v1, v2);
        assert_eq!(m.aux_count(), 1);
        assert_eq!(m.pending(), 1);
    }

    #[test]
    fn test_constrain_equal_with_fresh_result() {
        let mut m = model();
        let a = m.bool_var();
        let b = m.bool_var();
        let stub = Stub::new(
            Connective::Xor,
            vec![Operand::Var(a), Operand::Var(b)],
            VarKind::Bool,
        );
        let result = stub
            .constrain_equal(&mut m, None, false, Strength::Default, None)
            .unwrap();
        assert!(result.as_var().is_some());
        assert_eq!(m.aux_count(), 1);
        m.flush().unwrap();
        let posting = &m.backend().postings()[0];
        assert_eq!(posting.primitive, Primitive::BoolXor);
        assert_eq!(posting.args.len(), 3);
        assert_eq!(posting.args[2], result);
    }

    #[test]
    fn test_constrain_equal_rejects_wrong_result_kind() {
        let mut m = model();
        let a = m.bool_var();
        let b = m.bool_var();
        let stub = Stub::new(
            Connective::Or,
            vec![Operand::Var(a), Operand::Var(b)],
            VarKind::Bool,
        );
        let err = stub
            .constrain_equal(&mut m, Some(Arg::Int(3)), false, Strength::Default, None)
            .unwrap_err();
        assert!(matches!(err, ExprError::KindMismatch { .. }));
        assert_eq!(m.pending(), 0);
    }

    #[test]
    fn test_flattening_skips_materialized_inner() {
        let mut m = model();
        let a = m.bool_var();
        let b = m.bool_var();
        let c = m.bool_var();
        let inner = Operand::from(a).and(b).unwrap();
        let inner_var = inner.to_backend_handle(&mut m).unwrap();
        let outer = Operand::from(c).and(inner).unwrap();
        let Operand::Stub(stub) = outer else {
            panic!("expected stub")
        };
        stub.constrain_equal(&mut m, Some(Arg::Bool(true)), false, Strength::Default, None)
            .unwrap();
        m.flush().unwrap();
        let last = m.backend().postings().last().unwrap();
        assert_eq!(last.args, vec![Arg::Var(c), inner_var, Arg::Bool(true)]);
    }

    #[test]
    fn test_connective_primitives() {
        assert_eq!(Connective::Sum.primitive(), Primitive::Linear);
        assert!(Connective::Or.is_flattening());
        assert!(!Connective::Xor.is_flattening());
    }
}
