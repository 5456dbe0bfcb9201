//! Round-trip properties: compiled postings agree with direct evaluation on
//! every leaf assignment.

use proptest::prelude::*;
use std::collections::BTreeSet;
use u_cpexpr::backend::RecordingBackend;
use u_cpexpr::model::{Model, ModelConfig};
use u_cpexpr::operand::Operand;
use u_cpexpr::search::{SimpleSolver, Solution, SolverConfig};
use u_cpexpr::var::Var;

#[derive(Debug, Clone, Copy)]
enum Conn {
    And,
    Or,
    Xor,
    Equal,
}

impl Conn {
    fn eval(self, a: bool, b: bool) -> bool {
        match self {
            Conn::And => a && b,
            Conn::Or => a || b,
            Conn::Xor => a ^ b,
            Conn::Equal => a == b,
        }
    }
}

fn conn() -> impl Strategy<Value = Conn> {
    prop_oneof![
        Just(Conn::And),
        Just(Conn::Or),
        Just(Conn::Xor),
        Just(Conn::Equal),
    ]
}

fn all_solutions(model: &mut Model<RecordingBackend>) -> Vec<Solution> {
    let config = SolverConfig::default().with_max_solutions(0);
    model
        .solve(&SimpleSolver::new(), &config)
        .unwrap()
        .solutions
}

/// Declares `C(a, b) == v` (or `a == b` for `Equal`) with the given polarity.
fn declare(m: &mut Model<RecordingBackend>, c: Conn, negate: bool, a: Var, b: Var, v: Var) {
    let receiver = |m: &mut Model<RecordingBackend>, op: Operand| {
        let receiver = if negate { op.must_not(m) } else { op.must(m) };
        receiver.equal(v).unwrap()
    };
    let a = Operand::from(a);
    match c {
        Conn::And => receiver(m, a.and(b).unwrap()),
        Conn::Or => receiver(m, a.or(b).unwrap()),
        Conn::Xor => receiver(m, a.xor(b).unwrap()),
        Conn::Equal => {
            if negate {
                a.must_not(m).equal(b).unwrap()
            } else {
                a.must(m).equal(b).unwrap()
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_negation_round_trip(c in conn(), negate in any::<bool>()) {
        let mut m = Model::new(RecordingBackend::new());
        let a = m.bool_var();
        let b = m.bool_var();
        let v = m.bool_var();
        declare(&mut m, c, negate, a, b, v);

        let mut found = BTreeSet::new();
        for sol in all_solutions(&mut m) {
            let (x, y, z) = (sol.bool(a).unwrap(), sol.bool(b).unwrap(), sol.bool(v).unwrap());
            found.insert((x, y, z));
        }
        let mut expected = BTreeSet::new();
        for x in [false, true] {
            for y in [false, true] {
                for z in [false, true] {
                    let base = match c {
                        Conn::Equal => c.eval(x, y),
                        _ => c.eval(x, y) == z,
                    };
                    if base != negate {
                        expected.insert((x, y, z));
                    }
                }
            }
        }
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn prop_reification_round_trip(c in conn(), negate in any::<bool>()) {
        let mut m = Model::new(RecordingBackend::new());
        let a = m.bool_var();
        let b = m.bool_var();
        let v = m.bool_var();
        let r = m.bool_var();
        let expr = match c {
            Conn::And => Operand::from(a).and(b).unwrap(),
            Conn::Or => Operand::from(a).or(b).unwrap(),
            Conn::Xor => Operand::from(a).xor(b).unwrap(),
            Conn::Equal => Operand::from(a),
        };
        let rhs = if let Conn::Equal = c { b } else { v };
        let receiver = if negate { expr.must_not(&mut m) } else { expr.must(&mut m) };
        receiver.reify(r).equal(rhs).unwrap();

        let solutions = all_solutions(&mut m);
        // every leaf assignment stays consistent
        prop_assert_eq!(solutions.len(), 8);
        for sol in solutions {
            let (x, y, z) = (sol.bool(a).unwrap(), sol.bool(b).unwrap(), sol.bool(v).unwrap());
            let holds = match c {
                Conn::Equal => c.eval(x, y),
                _ => c.eval(x, y) == z,
            };
            prop_assert_eq!(sol.bool(r).unwrap(), holds != negate);
        }
    }

    #[test]
    fn prop_sum_matches_direct(values in proptest::collection::vec(0i64..4, 1..4), target in 0i64..10) {
        let config = ModelConfig::default().with_aux_int_domain(0, 12);
        let mut m = Model::with_config(RecordingBackend::new(), config).unwrap();
        let xs = m.int_vars(values.len(), 0, 3);
        for (x, value) in xs.iter().zip(&values) {
            m.must(x).equal(*value).unwrap();
        }
        m.must(xs.sum().unwrap()).less_or_equal(target).unwrap();
        let feasible = !all_solutions(&mut m).is_empty();
        prop_assert_eq!(feasible, values.iter().sum::<i64>() <= target);
    }
}
