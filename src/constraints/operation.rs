//! Set-algebra expressions.
//!
//! `a ∪ b`, `a ∩ b`, ... are not operands: the backend's set-operation
//! primitive takes the operator as a parameter, so the expression waits for
//! exactly one relation against a third set and posts
//! `SetOp(op)[a, b, rhs]` with that relation.

use super::options::ConstraintOptions;
use crate::backend::{Backend, Posting, Primitive, Priority, Relation, SetOp, Strength};
use crate::error::{ExprError, Result};
use crate::model::Model;
use crate::operand::{expect_kind, Operand, OperandKind};

/// `lhs op rhs` over two set operands.
#[derive(Debug, Clone)]
pub struct SetOperation {
    lhs: Operand,
    op: SetOp,
    rhs: Operand,
}

impl SetOperation {
    pub(crate) fn new(lhs: Operand, op: SetOp, rhs: Operand) -> Result<Self> {
        expect_kind(&lhs, OperandKind::Set, "set operation", "set operands")?;
        expect_kind(&rhs, OperandKind::Set, "set operation", "set operands")?;
        Ok(Self { lhs, op, rhs })
    }

    pub fn op(&self) -> SetOp {
        self.op
    }

    pub fn operands(&self) -> (&Operand, &Operand) {
        (&self.lhs, &self.rhs)
    }

    pub fn must<'m, B: Backend>(self, model: &'m mut Model<B>) -> SetOperationReceiver<'m, B> {
        SetOperationReceiver::new(model, self, false)
    }

    /// Always fails at the relation call: set operations have no negated form.
    pub fn must_not<'m, B: Backend>(self, model: &'m mut Model<B>) -> SetOperationReceiver<'m, B> {
        SetOperationReceiver::new(model, self, true)
    }
}

/// Receiver for a [`SetOperation`].
pub struct SetOperationReceiver<'m, B: Backend> {
    model: &'m mut Model<B>,
    operation: SetOperation,
    negate: bool,
    options: ConstraintOptions,
}

impl<'m, B: Backend> SetOperationReceiver<'m, B> {
    fn new(model: &'m mut Model<B>, operation: SetOperation, negate: bool) -> Self {
        Self {
            model,
            operation,
            negate,
            options: ConstraintOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ConstraintOptions) -> Self {
        self.options = self.options.merge(options);
        self
    }

    pub fn strength(mut self, strength: Strength) -> Self {
        self.options.strength = Some(strength);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.options.priority = Some(priority);
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

    /// `lhs op rhs == target`.
    pub fn equal(self, target: impl Into<Operand>) -> Result<()> {
        self.post(Relation::Eq, target.into())
    }

    /// `lhs op rhs ⊆ target`.
    pub fn subset(self, target: impl Into<Operand>) -> Result<()> {
        self.post(Relation::Subset, target.into())
    }

    /// `lhs op rhs ⊇ target`.
    pub fn superset(self, target: impl Into<Operand>) -> Result<()> {
        self.post(Relation::Superset, target.into())
    }

    /// `(lhs op rhs) ∩ target = ∅`.
    pub fn disjoint(self, target: impl Into<Operand>) -> Result<()> {
        self.post(Relation::Disjoint, target.into())
    }

    fn post(self, relation: Relation, target: Operand) -> Result<()> {
        let primitive = Primitive::SetOp(self.operation.op);
        if self.negate {
            return Err(ExprError::UnsupportedNegation(primitive.name()));
        }
        if self.options.reify.is_some() {
            return Err(ExprError::UnsupportedConstraint(primitive.name()));
        }
        if self.options.offset.is_some() {
            return Err(ExprError::invalid_option(
                "offset",
                "set operations take no offset",
            ));
        }
        expect_kind(&target, OperandKind::Set, "set operation", "set operand")?;

        let args = vec![
            self.operation.lhs.to_backend_handle(self.model)?,
            self.operation.rhs.to_backend_handle(self.model)?,
            target.to_backend_handle(self.model)?,
        ];
        let posting = Posting::new(primitive, args)
            .with_relation(relation)
            .with_strength(self.options.resolved_strength())
            .with_priority(self.options.priority);
        self.model.enqueue_posting(posting);
        Ok(())
    }
}
