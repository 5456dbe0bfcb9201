//! Boolean relations.

use super::receiver::ConstraintReceiver;
use crate::backend::{Backend, Relation};
use crate::error::Result;
use crate::operand::{Operand, OperandKind};

impl<B: Backend> ConstraintReceiver<'_, B> {
    /// The boolean operand must be true.
    ///
    /// On a composite operand this posts the connective's primitive once,
    /// with the constant `true` in its result slot.
    pub fn be_true(self) -> Result<()> {
        self.require(OperandKind::Bool, "be_true", "bool operand")?;
        self.finalize_relation(Relation::Eq, Operand::from(true))
    }

    /// The boolean operand must be false.
    pub fn be_false(self) -> Result<()> {
        self.require(OperandKind::Bool, "be_false", "bool operand")?;
        self.finalize_relation(Relation::Eq, Operand::from(false))
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::{Arg, Primitive, RecordingBackend, Relation};
    use crate::error::ExprError;
    use crate::model::Model;
    use crate::operand::Operand;

    #[test]
    fn test_single_variable_true() {
        let mut m = Model::new(RecordingBackend::new());
        let b = m.bool_var();
        m.must(b).be_true().unwrap();
        m.flush().unwrap();
        let p = &m.backend().postings()[0];
        assert_eq!(p.primitive, Primitive::Rel);
        assert_eq!(p.args, vec![Arg::Var(b), Arg::Bool(true)]);
        assert_eq!(p.relation, Some(Relation::Eq));
        assert!(!p.negate);
    }

    #[test]
    fn test_negated_false() {
        let mut m = Model::new(RecordingBackend::new());
        let b = m.bool_var();
        m.must_not(b).be_false().unwrap();
        m.flush().unwrap();
        let p = &m.backend().postings()[0];
        assert_eq!(p.args[1], Arg::Bool(false));
        assert!(p.negate);
    }

    #[test]
    fn test_disjunction_fuses_with_constant() {
        let mut m = Model::new(RecordingBackend::new());
        let a = m.bool_var();
        let b = m.bool_var();
        m.must(Operand::from(a).or(b).unwrap()).be_true().unwrap();
        m.flush().unwrap();
        assert_eq!(m.aux_count(), 0);
        let p = &m.backend().postings()[0];
        assert_eq!(p.primitive, Primitive::BoolOr);
        assert_eq!(p.args, vec![Arg::Var(a), Arg::Var(b), Arg::Bool(true)]);
    }

    #[test]
    fn test_be_true_on_int_fails() {
        let mut m = Model::new(RecordingBackend::new());
        let x = m.int_var(0, 1);
        assert!(matches!(
            m.must(x).be_true(),
            Err(ExprError::KindMismatch { .. })
        ));
    }
}
