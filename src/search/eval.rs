//! Truth of a posting under a (partial) assignment.

use super::types::Value;
use crate::backend::{Arg, ChannelForm, Posting, Primitive, Relation, SetOp};
use std::collections::BTreeSet;

/// Evaluates `posting` against `assignment` (indexed by variable id).
///
/// Returns `None` while any variable the posting mentions is unassigned, or
/// if the arguments do not fit the primitive.
pub fn holds(posting: &Posting, assignment: &[Option<Value>]) -> Option<bool> {
    let holds = base(posting, assignment)? ^ posting.negate;
    match posting.reify {
        Some(r) => {
            let r = assignment.get(r.id() as usize)?.as_ref()?.as_bool()?;
            Some(r == holds)
        }
        None => Some(holds),
    }
}

fn scalar(arg: &Arg, assignment: &[Option<Value>]) -> Option<Value> {
    match arg {
        Arg::Var(v) => assignment.get(v.id() as usize)?.clone(),
        Arg::Bool(b) => Some(Value::Bool(*b)),
        Arg::Int(i) => Some(Value::Int(*i)),
        Arg::Set(s) => Some(Value::Set(s.clone())),
        Arg::Vars(_) | Arg::Ints(_) | Arg::Tuples(_) => None,
    }
}

fn array(arg: &Arg, assignment: &[Option<Value>]) -> Option<Vec<Value>> {
    match arg {
        Arg::Vars(vs) => vs
            .iter()
            .map(|v| assignment.get(v.id() as usize)?.clone())
            .collect(),
        Arg::Ints(xs) => Some(xs.iter().copied().map(Value::Int).collect()),
        _ => None,
    }
}

fn bools(values: &[Value]) -> Option<Vec<bool>> {
    values.iter().map(Value::as_bool).collect()
}

fn ints(values: &[Value]) -> Option<Vec<i64>> {
    values.iter().map(Value::as_int).collect()
}

fn sets(values: &[Value]) -> Option<Vec<BTreeSet<i64>>> {
    values.iter().map(|v| v.as_set().cloned()).collect()
}

/// `lhs relation rhs` for two values of one kind.
fn relate(relation: Relation, lhs: &Value, rhs: &Value) -> Option<bool> {
    match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => match relation {
            Relation::Eq => Some(a == b),
            Relation::Nq => Some(a != b),
            _ => None,
        },
        (Value::Int(a), Value::Int(b)) if relation.is_arithmetic() => {
            Some(relation.compare(*a, *b))
        }
        (Value::Set(a), Value::Set(b)) => match relation {
            Relation::Eq => Some(a == b),
            Relation::Nq => Some(a != b),
            Relation::Subset => Some(a.is_subset(b)),
            Relation::Superset => Some(a.is_superset(b)),
            Relation::Disjoint => Some(a.is_disjoint(b)),
            _ => None,
        },
        _ => None,
    }
}

fn base(posting: &Posting, assignment: &[Option<Value>]) -> Option<bool> {
    let args = posting.args.as_slice();
    let relation = posting.relation;
    let scalar_at = |i: usize| scalar(args.get(i)?, assignment);
    let array_at = |i: usize| array(args.get(i)?, assignment);

    match posting.primitive {
        Primitive::BoolAnd | Primitive::BoolOr => {
            let (result, operands) = args.split_last()?;
            let result = scalar(result, assignment)?.as_bool()?;
            let operands: Vec<bool> = operands
                .iter()
                .map(|a| scalar(a, assignment)?.as_bool())
                .collect::<Option<_>>()?;
            let value = if posting.primitive == Primitive::BoolAnd {
                operands.iter().all(|b| *b)
            } else {
                operands.iter().any(|b| *b)
            };
            Some(value == result)
        }
        Primitive::BoolXor | Primitive::BoolImp => {
            let a = scalar_at(0)?.as_bool()?;
            let b = scalar_at(1)?.as_bool()?;
            let result = scalar_at(2)?.as_bool()?;
            let value = if posting.primitive == Primitive::BoolXor {
                a ^ b
            } else {
                !a || b
            };
            Some(value == result)
        }
        Primitive::Rel => relate(relation?, &scalar_at(0)?, &scalar_at(1)?),
        Primitive::Linear | Primitive::Max | Primitive::Min => {
            let xs = ints(&array_at(0)?)?;
            let rhs = scalar_at(1)?;
            let value = match posting.primitive {
                Primitive::Linear => {
                    match xs.iter().try_fold(0i64, |acc, x| acc.checked_add(*x)) {
                        Some(total) => total,
                        None => return Some(false),
                    }
                }
                Primitive::Max => match xs.iter().max() {
                    Some(m) => *m,
                    None => return Some(false),
                },
                _ => match xs.iter().min() {
                    Some(m) => *m,
                    None => return Some(false),
                },
            };
            relate(relation?, &Value::Int(value), &rhs)
        }
        Primitive::Element => {
            let xs = array_at(0)?;
            let index = scalar_at(1)?.as_int()?;
            let rhs = scalar_at(2)?;
            match usize::try_from(index).ok().and_then(|i| xs.get(i)) {
                Some(x) => relate(relation?, x, &rhs),
                None => Some(false),
            }
        }
        Primitive::Count => {
            let xs = ints(&array_at(0)?)?;
            let value = scalar_at(1)?.as_int()?;
            let rhs = scalar_at(2)?;
            let n = xs.iter().filter(|x| **x == value).count() as i64;
            relate(relation?, &Value::Int(n), &rhs)
        }
        Primitive::Distinct => {
            let xs = ints(&array_at(0)?)?;
            let unique: BTreeSet<i64> = xs.iter().copied().collect();
            Some(unique.len() == xs.len())
        }
        Primitive::Sorted => {
            let xs = ints(&array_at(0)?)?;
            Some(xs.windows(2).all(|w| w[0] <= w[1]))
        }
        Primitive::Extensional => {
            let xs: Vec<i64> = array_at(0)?
                .iter()
                .map(Value::to_int)
                .collect::<Option<_>>()?;
            match args.get(1)? {
                Arg::Tuples(ts) => Some(ts.iter().any(|t| *t == xs)),
                _ => None,
            }
        }
        Primitive::Channel(form) => channel(form, args, assignment),
        Primitive::SetOp(op) => {
            let a = scalar_at(0)?;
            let b = scalar_at(1)?;
            let (a, b) = (a.as_set()?, b.as_set()?);
            let combined: BTreeSet<i64> = match op {
                SetOp::Union => a.union(b).copied().collect(),
                SetOp::DisjointUnion => {
                    if !a.is_disjoint(b) {
                        return Some(false);
                    }
                    a.union(b).copied().collect()
                }
                SetOp::Intersection => a.intersection(b).copied().collect(),
                SetOp::Minus => a.difference(b).copied().collect(),
            };
            relate(relation?, &Value::Set(combined), &scalar_at(2)?)
        }
        Primitive::SelectedUnion | Primitive::SelectedIntersection => {
            let all = sets(&array_at(0)?)?;
            let selector = scalar_at(1)?;
            let mut picked = Vec::new();
            for index in selector.as_set()? {
                match usize::try_from(*index).ok().and_then(|i| all.get(i)) {
                    Some(set) => picked.push(set),
                    None => return Some(false),
                }
            }
            let combined: BTreeSet<i64> = if posting.primitive == Primitive::SelectedUnion {
                picked.iter().flat_map(|set| set.iter().copied()).collect()
            } else {
                match picked.split_first() {
                    Some((first, rest)) => first
                        .iter()
                        .copied()
                        .filter(|e| rest.iter().all(|set| set.contains(e)))
                        .collect(),
                    None => BTreeSet::new(),
                }
            };
            relate(relation?, &Value::Set(combined), &scalar_at(2)?)
        }
        Primitive::SetElements => {
            let relation = relation?;
            if !relation.is_arithmetic() {
                return None;
            }
            let set = scalar_at(0)?;
            let bound = scalar_at(1)?.as_int()?;
            Some(set.as_set()?.iter().all(|e| relation.compare(*e, bound)))
        }
    }
}

fn channel(form: ChannelForm, args: &[Arg], assignment: &[Option<Value>]) -> Option<bool> {
    let first = array(args.first()?, assignment)?;
    match form {
        ChannelForm::BoolInt => {
            let bs = bools(&first)?;
            let y = scalar(args.get(1)?, assignment)?.as_int()?;
            let offset = match args.get(2)? {
                Arg::Int(o) => *o,
                _ => return None,
            };
            Some(
                bs.iter()
                    .enumerate()
                    .all(|(i, b)| *b == ((i as i64).checked_add(offset) == Some(y))),
            )
        }
        ChannelForm::BoolSet => {
            let bs = bools(&first)?;
            let s = scalar(args.get(1)?, assignment)?;
            let s = s.as_set()?;
            Some(
                bs.iter()
                    .enumerate()
                    .all(|(i, b)| *b == s.contains(&(i as i64))),
            )
        }
        ChannelForm::IntInt => {
            let xs = ints(&first)?;
            let ys = ints(&array(args.get(1)?, assignment)?)?;
            Some((0..xs.len()).all(|i| {
                (0..ys.len()).all(|j| (xs[i] == j as i64) == (ys[j] == i as i64))
            }))
        }
        ChannelForm::IntSet => {
            let xs = ints(&first)?;
            let ss = sets(&array(args.get(1)?, assignment)?)?;
            Some((0..xs.len()).all(|i| {
                (0..ss.len()).all(|j| (xs[i] == j as i64) == ss[j].contains(&(i as i64)))
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::var::{Var, VarKind};

    fn b(id: u32) -> Var {
        Var::new(id, VarKind::Bool)
    }

    fn i(id: u32) -> Var {
        Var::new(id, VarKind::Int)
    }

    #[test]
    fn test_unassigned_is_undecided() {
        let p = Posting::new(Primitive::Rel, vec![Arg::Var(b(0)), Arg::Bool(true)])
            .with_relation(Relation::Eq);
        assert_eq!(holds(&p, &[None]), None);
        assert_eq!(holds(&p, &[Some(Value::Bool(true))]), Some(true));
    }

    #[test]
    fn test_negate_and_reify() {
        let p = Posting::new(
            Primitive::BoolAnd,
            vec![Arg::Var(b(0)), Arg::Var(b(1)), Arg::Bool(true)],
        )
        .with_negate(true)
        .with_reify(Some(b(2)));
        let asg = |x, y, r| vec![Some(Value::Bool(x)), Some(Value::Bool(y)), Some(Value::Bool(r))];
        // r <=> !(x && y)
        assert_eq!(holds(&p, &asg(true, true, false)), Some(true));
        assert_eq!(holds(&p, &asg(true, false, true)), Some(true));
        assert_eq!(holds(&p, &asg(true, true, true)), Some(false));
    }

    #[test]
    fn test_linear_and_element() {
        let xs = vec![i(0), i(1), i(2)];
        let asg: Vec<Option<Value>> = [3, 1, 4].iter().map(|v| Some(Value::Int(*v))).collect();
        let sum = Posting::new(Primitive::Linear, vec![Arg::Vars(xs.clone()), Arg::Int(8)])
            .with_relation(Relation::Eq);
        assert_eq!(holds(&sum, &asg), Some(true));
        let elem = Posting::new(
            Primitive::Element,
            vec![Arg::Vars(xs.clone()), Arg::Int(5), Arg::Int(3)],
        )
        .with_relation(Relation::Eq);
        assert_eq!(holds(&elem, &asg), Some(false));
    }

    #[test]
    fn test_overflowing_sum_never_holds() {
        let xs = vec![i(0), i(1)];
        let asg = vec![Some(Value::Int(i64::MAX)), Some(Value::Int(1))];
        let sum = Posting::new(Primitive::Linear, vec![Arg::Vars(xs), Arg::Int(0)])
            .with_relation(Relation::Ge);
        assert_eq!(holds(&sum, &asg), Some(false));
        assert_eq!(holds(&sum.clone().with_negate(true), &asg), Some(true));
    }

    #[test]
    fn test_max_of_empty_never_holds() {
        let p = Posting::new(Primitive::Max, vec![Arg::Vars(vec![]), Arg::Int(0)])
            .with_relation(Relation::Le);
        assert_eq!(holds(&p, &[]), Some(false));
    }

    #[test]
    fn test_bool_int_channel() {
        let p = Posting::new(
            Primitive::Channel(ChannelForm::BoolInt),
            vec![Arg::Vars(vec![b(0), b(1)]), Arg::Var(i(2)), Arg::Int(1)],
        );
        let asg = vec![
            Some(Value::Bool(false)),
            Some(Value::Bool(true)),
            Some(Value::Int(2)),
        ];
        assert_eq!(holds(&p, &asg), Some(true));
    }

    #[test]
    fn test_bool_int_channel_offset_overflow() {
        let p = Posting::new(
            Primitive::Channel(ChannelForm::BoolInt),
            vec![Arg::Vars(vec![b(0), b(1)]), Arg::Var(i(2)), Arg::Int(i64::MAX)],
        );
        let asg = |x, y| {
            vec![
                Some(Value::Bool(x)),
                Some(Value::Bool(y)),
                Some(Value::Int(i64::MAX)),
            ]
        };
        assert_eq!(holds(&p, &asg(true, false)), Some(true));
        assert_eq!(holds(&p, &asg(true, true)), Some(false));
    }

    #[test]
    fn test_element_over_constants() {
        let p = Posting::new(
            Primitive::Element,
            vec![Arg::Ints(vec![4, 7, 9]), Arg::Var(i(0)), Arg::Int(7)],
        )
        .with_relation(Relation::Eq);
        assert_eq!(holds(&p, &[Some(Value::Int(1))]), Some(true));
        assert_eq!(holds(&p, &[Some(Value::Int(2))]), Some(false));
        assert_eq!(holds(&p, &[Some(Value::Int(3))]), Some(false));
    }

    #[test]
    fn test_selected_sets() {
        let s = |xs: &[i64]| Some(Value::Set(xs.iter().copied().collect()));
        let set_var = |id| Var::new(id, VarKind::Set);
        let sets = Arg::Vars(vec![set_var(0), set_var(1), set_var(2)]);
        let asg = vec![s(&[1, 2]), s(&[2, 3]), s(&[5]), s(&[0, 1])];
        let union = Posting::new(
            Primitive::SelectedUnion,
            vec![sets.clone(), Arg::Var(set_var(3)), Arg::Set([1, 2, 3].into())],
        )
        .with_relation(Relation::Eq);
        assert_eq!(holds(&union, &asg), Some(true));
        let inter = Posting::new(
            Primitive::SelectedIntersection,
            vec![sets.clone(), Arg::Var(set_var(3)), Arg::Set([2].into())],
        )
        .with_relation(Relation::Eq);
        assert_eq!(holds(&inter, &asg), Some(true));

        // out-of-range selector never holds
        let mut wide = asg.clone();
        wide[3] = s(&[0, 7]);
        assert_eq!(holds(&union, &wide), Some(false));
    }

    #[test]
    fn test_set_elements_bound() {
        let set = Var::new(0, VarKind::Set);
        let p = Posting::new(Primitive::SetElements, vec![Arg::Var(set), Arg::Int(4)])
            .with_relation(Relation::Lt);
        let value = |xs: &[i64]| vec![Some(Value::Set(xs.iter().copied().collect()))];
        assert_eq!(holds(&p, &value(&[1, 3])), Some(true));
        assert_eq!(holds(&p, &value(&[1, 4])), Some(false));
        assert_eq!(holds(&p, &value(&[])), Some(true));
        assert_eq!(holds(&p.with_negate(true), &value(&[])), Some(false));
    }

    #[test]
    fn test_disjoint_union() {
        let s = |xs: &[i64]| Arg::Set(xs.iter().copied().collect());
        let p = Posting::new(
            Primitive::SetOp(SetOp::DisjointUnion),
            vec![s(&[1]), s(&[1, 2]), s(&[1, 2])],
        )
        .with_relation(Relation::Eq);
        assert_eq!(holds(&p, &[]), Some(false));
    }
}
