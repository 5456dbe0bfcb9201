//! Channel constraints.
//!
//! | Left | Right | Form |
//! |---|---|---|
//! | bool enum | int | `bs[i] <=> y == i + offset` |
//! | bool enum | set | `bs[i] <=> i in s` |
//! | int enum | int enum | `xs[i] == j <=> ys[j] == i` |
//! | int enum | set enum | `xs[i] == j <=> i in ss[j]` |
//!
//! Either side may be the receiver's operand; the pair is normalized before
//! posting.

use super::receiver::{reject_constant_enum, ConstraintReceiver};
use crate::backend::{Arg, Backend, ChannelForm, Posting, Primitive};
use crate::error::{ExprError, Result};
use crate::operand::{Operand, OperandKind};

fn channel_form(lhs: OperandKind, rhs: OperandKind) -> Option<(ChannelForm, bool)> {
    use OperandKind::*;
    match (lhs, rhs) {
        (BoolEnum, Int) => Some((ChannelForm::BoolInt, false)),
        (Int, BoolEnum) => Some((ChannelForm::BoolInt, true)),
        (BoolEnum, Set) => Some((ChannelForm::BoolSet, false)),
        (Set, BoolEnum) => Some((ChannelForm::BoolSet, true)),
        (IntEnum, IntEnum) => Some((ChannelForm::IntInt, false)),
        (IntEnum, SetEnum) => Some((ChannelForm::IntSet, false)),
        (SetEnum, IntEnum) => Some((ChannelForm::IntSet, true)),
        _ => None,
    }
}

impl<B: Backend> ConstraintReceiver<'_, B> {
    /// Links the operand to `rhs` by position; see the module table.
    ///
    /// Rejects negation and reification. `offset` applies to the bool enum /
    /// int form only.
    pub fn channel(mut self, rhs: impl Into<Operand>) -> Result<()> {
        let rhs = rhs.into();
        let Some((form, swapped)) = channel_form(self.operand.kind(), rhs.kind()) else {
            return Err(ExprError::kind_mismatch(
                "channel",
                "bool enum with int or set, int enum with int or set enum",
                rhs.kind(),
            ));
        };
        reject_constant_enum(&self.operand)?;
        reject_constant_enum(&rhs)?;
        let primitive = Primitive::Channel(form);
        self.check_support(primitive)?;
        if form != ChannelForm::BoolInt {
            self.reject_offset()?;
        }
        let offset = self.options.offset.take().unwrap_or(0);

        let lhs = self.operand.to_backend_handle(self.model)?;
        let rhs = rhs.to_backend_handle(self.model)?;
        let (first, second) = if swapped { (rhs, lhs) } else { (lhs, rhs) };
        let mut args = vec![first, second];
        if form == ChannelForm::BoolInt {
            args.push(Arg::Int(offset));
        }
        let posting = Posting::new(primitive, args)
            .with_strength(self.options.resolved_strength())
            .with_priority(self.options.priority);
        self.model.enqueue_posting(posting);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;
    use crate::model::Model;
    use std::collections::BTreeSet;

    #[test]
    fn test_bool_int_channel_with_offset() {
        let mut m = Model::new(RecordingBackend::new());
        let bs = m.bool_vars(3);
        let y = m.int_var(1, 3);
        bs.must(&mut m).offset(1).channel(y).unwrap();
        m.flush().unwrap();
        let p = &m.backend().postings()[0];
        assert_eq!(p.primitive, Primitive::Channel(ChannelForm::BoolInt));
        assert_eq!(
            p.args,
            vec![Arg::Vars(bs.vars().to_vec()), Arg::Var(y), Arg::Int(1)]
        );
    }

    #[test]
    fn test_channel_is_symmetric() {
        let mut m = Model::new(RecordingBackend::new());
        let bs = m.bool_vars(3);
        let y = m.int_var(0, 2);
        m.must(y).channel(&bs).unwrap();
        bs.must(&mut m).channel(y).unwrap();
        m.flush().unwrap();
        let postings = m.backend().postings();
        assert_eq!(postings[0].args, postings[1].args);
    }

    #[test]
    fn test_int_set_channel_swapped() {
        let mut m = Model::new(RecordingBackend::new());
        let xs = m.int_vars(2, 0, 1);
        let lub: BTreeSet<i64> = (0..2).collect();
        let ss = m.set_vars(2, &BTreeSet::new(), &lub);
        ss.must(&mut m).channel(&xs).unwrap();
        m.flush().unwrap();
        let p = &m.backend().postings()[0];
        assert_eq!(p.primitive, Primitive::Channel(ChannelForm::IntSet));
        assert_eq!(p.args[0], Arg::Vars(xs.vars().to_vec()));
    }

    #[test]
    fn test_negated_channel_rejected() {
        let mut m = Model::new(RecordingBackend::new());
        let xs = m.int_vars(2, 0, 1);
        let ys = m.int_vars(2, 0, 1);
        xs.must(&mut m).channel(&ys).unwrap();
        let err = xs.must_not(&mut m).channel(&ys).unwrap_err();
        assert!(matches!(err, ExprError::UnsupportedNegation("channel")));
        assert_eq!(m.pending(), 1);
    }

    #[test]
    fn test_reified_channel_rejected() {
        let mut m = Model::new(RecordingBackend::new());
        let bs = m.bool_vars(2);
        let s = m.set_var([], 0..2);
        let r = m.bool_var();
        let err = bs.must(&mut m).reify(r).channel(s).unwrap_err();
        assert!(matches!(err, ExprError::UnsupportedConstraint("channel")));
    }

    #[test]
    fn test_offset_outside_bool_int_rejected() {
        let mut m = Model::new(RecordingBackend::new());
        let xs = m.int_vars(2, 0, 1);
        let ys = m.int_vars(2, 0, 1);
        let err = xs.must(&mut m).offset(1).channel(&ys).unwrap_err();
        assert!(matches!(err, ExprError::InvalidOption { option: "offset", .. }));
    }

    #[test]
    fn test_unsupported_pair() {
        let mut m = Model::new(RecordingBackend::new());
        let bs = m.bool_vars(2);
        let b = m.bool_var();
        assert!(matches!(
            bs.must(&mut m).channel(b),
            Err(ExprError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_constant_ints_cannot_channel() {
        let mut m = Model::new(RecordingBackend::new());
        let xs = m.int_vars(2, 0, 1);
        let err = xs.must(&mut m).channel(vec![1i64, 0]).unwrap_err();
        assert!(matches!(err, ExprError::UnsupportedCapability { .. }));
        assert_eq!(m.pending(), 0);
    }
}
