//! Relations over every element of a set.
//!
//! `s.elements().must().less(x)` holds when each member of `s` is less than
//! `x`; the empty set satisfies every such relation. Unlike set operations
//! these accept negation ("not every element") and reification.

use super::options::ConstraintOptions;
use super::receiver::resolve_reify;
use crate::backend::{Backend, Posting, Primitive, Priority, Relation, Strength};
use crate::error::{ExprError, Result};
use crate::model::Model;
use crate::operand::{expect_kind, Operand, OperandKind};

/// The elements of a set operand.
#[derive(Debug, Clone)]
pub struct SetElements {
    set: Operand,
}

impl SetElements {
    pub(crate) fn new(set: Operand) -> Result<Self> {
        expect_kind(&set, OperandKind::Set, "set elements", "set operand")?;
        Ok(Self { set })
    }

    pub fn set(&self) -> &Operand {
        &self.set
    }

    pub fn must<'m, B: Backend>(self, model: &'m mut Model<B>) -> SetElementsReceiver<'m, B> {
        SetElementsReceiver::new(model, self, false)
    }

    pub fn must_not<'m, B: Backend>(self, model: &'m mut Model<B>) -> SetElementsReceiver<'m, B> {
        SetElementsReceiver::new(model, self, true)
    }
}

/// Receiver for a [`SetElements`] declaration.
pub struct SetElementsReceiver<'m, B: Backend> {
    model: &'m mut Model<B>,
    elements: SetElements,
    negate: bool,
    options: ConstraintOptions,
}

impl<'m, B: Backend> SetElementsReceiver<'m, B> {
    fn new(model: &'m mut Model<B>, elements: SetElements, negate: bool) -> Self {
        Self {
            model,
            elements,
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

    pub fn equal(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Eq, rhs)
    }

    pub fn not_equal(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Nq, rhs)
    }

    pub fn less(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Lt, rhs)
    }

    pub fn less_or_equal(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Le, rhs)
    }

    pub fn greater(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Gt, rhs)
    }

    pub fn greater_or_equal(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Ge, rhs)
    }

    /// Every element `e` satisfies `e relation rhs`.
    pub fn relate(self, relation: Relation, rhs: impl Into<Operand>) -> Result<()> {
        let rhs = rhs.into();
        if !relation.is_arithmetic() {
            return Err(ExprError::invalid_option(
                "relation",
                format!("{relation:?} does not compare integers"),
            ));
        }
        expect_kind(&rhs, OperandKind::Int, "set elements", "int operand")?;
        if self.options.offset.is_some() {
            return Err(ExprError::invalid_option(
                "offset",
                "only the bool enum / int channel takes an offset",
            ));
        }
        let Self {
            model,
            elements,
            negate,
            options,
        } = self;
        let reify = match options.reify.clone() {
            Some(target) => Some(resolve_reify(model, target)?),
            None => None,
        };
        let args = vec![
            elements.set.to_backend_handle(model)?,
            rhs.to_backend_handle(model)?,
        ];
        let posting = Posting::new(Primitive::SetElements, args)
            .with_relation(relation)
            .with_negate(negate)
            .with_strength(options.resolved_strength())
            .with_reify(reify)
            .with_priority(options.priority);
        model.enqueue_posting(posting);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Arg, RecordingBackend};

    fn model() -> Model<RecordingBackend> {
        Model::new(RecordingBackend::new())
    }

    #[test]
    fn test_upper_bound_posting() {
        let mut m = model();
        let s = m.set_var([], 0..6);
        let x = m.int_var(0, 6);
        Operand::from(s)
            .elements()
            .unwrap()
            .must(&mut m)
            .less(x)
            .unwrap();
        m.flush().unwrap();
        let p = &m.backend().postings()[0];
        assert_eq!(p.primitive, Primitive::SetElements);
        assert_eq!(p.relation, Some(Relation::Lt));
        assert_eq!(p.args, vec![Arg::Var(s), Arg::Var(x)]);
        assert!(!p.negate);
    }

    #[test]
    fn test_negated_and_reified() {
        let mut m = model();
        let s = m.set_var([], 0..6);
        let r = m.bool_var();
        Operand::from(s)
            .elements()
            .unwrap()
            .must_not(&mut m)
            .reify(r)
            .greater_or_equal(2i64)
            .unwrap();
        m.flush().unwrap();
        let p = &m.backend().postings()[0];
        assert!(p.negate);
        assert_eq!(p.reify, Some(r));
        assert_eq!(p.args[1], Arg::Int(2));
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut m = model();
        let s = m.set_var([], 0..6);
        let x = m.int_var(0, 6);
        let b = m.bool_var();
        assert!(matches!(
            Operand::from(x).elements(),
            Err(ExprError::KindMismatch { found: OperandKind::Int, .. })
        ));
        let elements = Operand::from(s).elements().unwrap();
        assert!(matches!(
            elements.clone().must(&mut m).equal(b),
            Err(ExprError::KindMismatch { found: OperandKind::Bool, .. })
        ));
        assert!(matches!(
            elements.clone().must(&mut m).relate(Relation::Subset, x),
            Err(ExprError::InvalidOption { option: "relation", .. })
        ));
        assert!(matches!(
            elements.must(&mut m).reify(x).less(x),
            Err(ExprError::InvalidOption { option: "reify", .. })
        ));
        assert_eq!(m.pending(), 0);
    }
}
