//! Constraint receivers: the finalizing half of a declaration.

use super::options::ConstraintOptions;
use crate::backend::{Arg, Backend, Posting, Primitive, Priority, Relation, Strength};
use crate::error::{ExprError, Result};
use crate::model::Model;
use crate::operand::{Operand, OperandKind};
use crate::var::Var;
use std::rc::Rc;

/// A pending declaration: an operand, a negation flag and options.
///
/// Created by `must`/`must_not`. Nothing reaches the model until one of the
/// relation methods is called; each relation method either queues its
/// postings or fails without queuing anything.
///
/// Relation methods are grouped by operand kind:
///
/// - any scalar: [`equal`](Self::equal), [`relate`](Self::relate)
/// - bool: [`be_true`](Self::be_true), [`be_false`](Self::be_false)
/// - int: [`less`](Self::less) and the other orderings
/// - set: [`subset`](Self::subset), [`superset`](Self::superset),
///   [`disjoint`](Self::disjoint)
/// - enumerations: [`distinct`](Self::distinct), [`sorted`](Self::sorted),
///   [`in_tuples`](Self::in_tuples)
/// - channel: [`channel`](Self::channel)
pub struct ConstraintReceiver<'m, B: Backend> {
    pub(super) model: &'m mut Model<B>,
    pub(super) operand: Operand,
    pub(super) negate: bool,
    pub(super) options: ConstraintOptions,
}

impl<'m, B: Backend> ConstraintReceiver<'m, B> {
    pub(crate) fn new(model: &'m mut Model<B>, operand: Operand, negate: bool) -> Self {
        Self {
            model,
            operand,
            negate,
            options: ConstraintOptions::default(),
        }
    }

    /// The left-hand operand.
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    pub fn is_negated(&self) -> bool {
        self.negate
    }

    pub fn options(&self) -> &ConstraintOptions {
        &self.options
    }

    /// Merges `options` into the receiver's options.
    pub fn with_options(mut self, options: ConstraintOptions) -> Self {
        self.options = self.options.merge(options);
        self
    }

    pub fn strength(mut self, strength: Strength) -> Self {
        self.options.strength = Some(strength);
        self
    }

    pub fn reify(mut self, target: impl Into<Operand>) -> Self {
        self.options.reify = Some(target.into());
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.options.offset = Some(offset);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.options.priority = Some(priority);
        self
    }

    /// `lhs == rhs` for bool, int or set operands.
    ///
    /// A composite left-hand side fuses with `rhs` into a single posting; a
    /// plain left-hand side against a composite right-hand side is commuted
    /// and fused the same way.
    pub fn equal(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Eq, rhs)
    }

    /// `lhs relation rhs` for scalar operands of one kind.
    pub fn relate(self, relation: Relation, rhs: impl Into<Operand>) -> Result<()> {
        let rhs = rhs.into();
        self.check_relation(relation, &rhs)?;
        self.finalize_relation(relation, rhs)
    }

    fn check_relation(&self, relation: Relation, rhs: &Operand) -> Result<()> {
        let lhs_kind = self.operand.kind();
        let allowed = match lhs_kind {
            OperandKind::Bool => matches!(relation, Relation::Eq | Relation::Nq),
            OperandKind::Int => relation.is_arithmetic(),
            OperandKind::Set => relation.is_set_relation(),
            other => {
                return Err(ExprError::kind_mismatch(
                    "relation",
                    "bool, int or set operand",
                    other,
                ))
            }
        };
        if !allowed {
            let expected = if relation.is_arithmetic() {
                "int operands"
            } else {
                "set operands"
            };
            return Err(ExprError::kind_mismatch("relation", expected, lhs_kind));
        }
        if rhs.kind() != lhs_kind {
            return Err(ExprError::kind_mismatch(
                "relation",
                "right-hand side of the same kind",
                rhs.kind(),
            ));
        }
        Ok(())
    }

    /// Runs the fusion policy and queues the resulting postings.
    pub(super) fn finalize_relation(mut self, relation: Relation, rhs: Operand) -> Result<()> {
        self.reject_offset()?;
        let reify = self.take_reify()?;
        let ConstraintReceiver {
            model,
            operand: lhs,
            negate,
            options,
        } = self;

        if relation == Relation::Eq && reify.is_none() {
            let fused = match (&lhs, &rhs) {
                // one expression on both sides: materialize it once below
                (Operand::Stub(a), Operand::Stub(b)) if Rc::ptr_eq(a, b) => None,
                (Operand::Stub(stub), other) if stub.materialized().is_none() => {
                    Some((stub, other))
                }
                (other, Operand::Stub(stub)) if stub.materialized().is_none() => {
                    Some((stub, other))
                }
                _ => None,
            };
            if let Some((stub, other)) = fused {
                let result = other.to_backend_handle(model)?;
                stub.constrain_equal(
                    model,
                    Some(result),
                    negate,
                    options.resolved_strength(),
                    options.priority,
                )?;
                return Ok(());
            }
        }

        let lhs = lhs.to_backend_handle(model)?;
        let rhs = rhs.to_backend_handle(model)?;
        let posting = Posting::new(Primitive::Rel, vec![lhs, rhs])
            .with_relation(relation)
            .with_negate(negate)
            .with_strength(options.resolved_strength())
            .with_reify(reify)
            .with_priority(options.priority);
        model.enqueue_posting(posting);
        Ok(())
    }

    /// Fails unless the left-hand operand is of `kind`.
    pub(super) fn require(
        &self,
        kind: OperandKind,
        context: &'static str,
        expected: &'static str,
    ) -> Result<()> {
        crate::operand::expect_kind(&self.operand, kind, context, expected)?;
        reject_constant_enum(&self.operand)
    }

    /// Rejects negation and reification the primitive has no form for.
    pub(super) fn check_support(&self, primitive: Primitive) -> Result<()> {
        if self.negate && !primitive.supports_negation() {
            return Err(ExprError::UnsupportedNegation(primitive.name()));
        }
        if self.options.reify.is_some() && !primitive.supports_reification() {
            return Err(ExprError::UnsupportedConstraint(primitive.name()));
        }
        Ok(())
    }

    pub(super) fn reject_offset(&self) -> Result<()> {
        match self.options.offset {
            Some(_) => Err(ExprError::invalid_option(
                "offset",
                "only the bool enum / int channel takes an offset",
            )),
            None => Ok(()),
        }
    }

    /// Takes the reification target out of the options, resolved to a variable.
    pub(super) fn take_reify(&mut self) -> Result<Option<Var>> {
        match self.options.reify.take() {
            Some(target) => resolve_reify(self.model, target).map(Some),
            None => Ok(None),
        }
    }

    /// Queues a single posting over the left-hand enumeration plus `extra` args.
    pub(super) fn post_aggregate(mut self, primitive: Primitive, extra: Vec<Arg>) -> Result<()> {
        self.check_support(primitive)?;
        self.reject_offset()?;
        let reify = self.take_reify()?;
        let mut args = vec![self.operand.to_backend_handle(self.model)?];
        args.extend(extra);
        let posting = Posting::new(primitive, args)
            .with_negate(self.negate)
            .with_strength(self.options.resolved_strength())
            .with_reify(reify)
            .with_priority(self.options.priority);
        self.model.enqueue_posting(posting);
        Ok(())
    }
}

/// Resolves a reification target to a boolean variable.
///
/// Composite targets are materialized here.
pub(super) fn resolve_reify<B: Backend>(model: &mut Model<B>, target: Operand) -> Result<Var> {
    if target.kind() != OperandKind::Bool {
        return Err(ExprError::invalid_option(
            "reify",
            format!("expected a bool variable or expression, got {}", target.kind()),
        ));
    }
    if let Operand::Const(_) = target {
        return Err(ExprError::invalid_option(
            "reify",
            "a constant cannot be a reification target",
        ));
    }
    match target.to_backend_handle(model)? {
        Arg::Var(var) => Ok(var),
        _ => Err(ExprError::invalid_option(
            "reify",
            "target did not resolve to a variable",
        )),
    }
}

/// Constant enumerations can be indexed but never constrained.
pub(super) fn reject_constant_enum(operand: &Operand) -> Result<()> {
    match operand {
        Operand::Const(c) if c.kind().is_enumeration() => Err(ExprError::UnsupportedCapability {
            kind: c.kind(),
            capability: "constraint receiver",
        }),
        _ => Ok(()),
    }
}
