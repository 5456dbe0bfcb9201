//! Set relations.

use super::receiver::ConstraintReceiver;
use crate::backend::{Backend, Relation};
use crate::error::Result;
use crate::operand::Operand;

impl<B: Backend> ConstraintReceiver<'_, B> {
    /// `lhs ⊆ rhs`.
    pub fn subset(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Subset, rhs)
    }

    /// `lhs ⊇ rhs`.
    pub fn superset(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Superset, rhs)
    }

    /// `lhs ∩ rhs = ∅`.
    pub fn disjoint(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Disjoint, rhs)
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::{Arg, RecordingBackend, Relation};
    use crate::error::ExprError;
    use crate::model::Model;
    use std::collections::BTreeSet;

    #[test]
    fn test_subset_of_constant() {
        let mut m = Model::new(RecordingBackend::new());
        let s = m.set_var([], 0..5);
        let bound: BTreeSet<i64> = [1, 2].into_iter().collect();
        m.must(s).subset(bound.clone()).unwrap();
        m.flush().unwrap();
        let p = &m.backend().postings()[0];
        assert_eq!(p.relation, Some(Relation::Subset));
        assert_eq!(p.args[1], Arg::Set(bound));
    }

    #[test]
    fn test_subset_on_int_is_kind_mismatch() {
        let mut m = Model::new(RecordingBackend::new());
        let x = m.int_var(0, 5);
        let y = m.int_var(0, 5);
        assert!(matches!(
            m.must(x).subset(y),
            Err(ExprError::KindMismatch { .. })
        ));
    }
}
