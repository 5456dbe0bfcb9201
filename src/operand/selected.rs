//! `sets[selector]`: the members of a set enumeration picked out by a set of
//! indices.

use super::enumeration::VarEnum;
use super::stub::{Connective, Stub};
use super::types::{expect_kind, Operand, OperandKind};
use crate::error::{ExprError, Result};
use crate::var::VarKind;

/// A set enumeration indexed by a set operand.
///
/// Not an operand on its own: [`union`](Self::union) and
/// [`intersection`](Self::intersection) turn it into a set expression that
/// fuses or materializes like any other composite. An index outside
/// `0..sets.len()` makes the expression unsatisfiable, and the intersection
/// of an empty selection is the empty set.
#[derive(Debug, Clone)]
pub struct SelectedSet {
    sets: VarEnum,
    selector: Operand,
}

impl SelectedSet {
    pub(crate) fn new(sets: VarEnum, selector: Operand) -> Result<Self> {
        if sets.kind() != VarKind::Set {
            return Err(ExprError::kind_mismatch(
                "selected set",
                "set enum",
                sets.operand_kind(),
            ));
        }
        expect_kind(&selector, OperandKind::Set, "selected set", "set selector")?;
        Ok(Self { sets, selector })
    }

    pub fn sets(&self) -> &VarEnum {
        &self.sets
    }

    pub fn selector(&self) -> &Operand {
        &self.selector
    }

    /// Expression standing for the union of the selected sets.
    pub fn union(&self) -> Operand {
        self.combine(Connective::SelectedUnion)
    }

    /// Expression standing for the intersection of the selected sets.
    pub fn intersection(&self) -> Operand {
        self.combine(Connective::SelectedIntersection)
    }

    fn combine(&self, connective: Connective) -> Operand {
        let operands = vec![Operand::Enum(self.sets.clone()), self.selector.clone()];
        Stub::new(connective, operands, VarKind::Set).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Arg, Primitive, RecordingBackend, Relation};
    use crate::model::Model;
    use std::collections::BTreeSet;

    fn model() -> Model<RecordingBackend> {
        Model::new(RecordingBackend::new())
    }

    #[test]
    fn test_union_fuses_with_target() {
        let mut m = model();
        let sets = m.set_vars(3, &BTreeSet::new(), &(0..4).collect());
        let selector = m.set_var([], 0..3);
        let target = m.set_var([], 0..4);
        let union = sets.select(selector).unwrap().union();
        assert_eq!(union.kind(), OperandKind::Set);
        m.must(union).equal(target).unwrap();
        m.flush().unwrap();
        let p = &m.backend().postings()[0];
        assert_eq!(p.primitive, Primitive::SelectedUnion);
        assert_eq!(p.relation, Some(Relation::Eq));
        assert_eq!(
            p.args,
            vec![
                Arg::Vars(sets.vars().to_vec()),
                Arg::Var(selector),
                Arg::Var(target)
            ]
        );
        assert_eq!(m.aux_count(), 0);
    }

    #[test]
    fn test_intersection_materializes_under_subset() {
        let mut m = model();
        let sets = m.set_vars(2, &BTreeSet::new(), &(0..3).collect());
        let selector = m.set_var([], 0..2);
        let target = m.set_var([], 0..3);
        let inter = sets.select(selector).unwrap().intersection();
        m.must(inter).subset(target).unwrap();
        assert_eq!(m.aux_count(), 1);
        m.flush().unwrap();
        assert_eq!(m.backend().count(Primitive::SelectedIntersection), 1);
        assert_eq!(m.backend().count(Primitive::Rel), 1);
    }

    #[test]
    fn test_kinds_are_checked() {
        let mut m = model();
        let ints = m.int_vars(2, 0, 3);
        let sets = m.set_vars(2, &BTreeSet::new(), &(0..3).collect());
        let selector = m.set_var([], 0..2);
        let index = m.int_var(0, 1);
        assert!(matches!(
            ints.select(selector),
            Err(ExprError::KindMismatch { found: OperandKind::IntEnum, .. })
        ));
        assert!(matches!(
            sets.select(index),
            Err(ExprError::KindMismatch { found: OperandKind::Int, .. })
        ));
    }
}
