//! In-memory backend that records postings.

use super::posting::{Arg, ChannelForm, Posting, Primitive};
use super::types::Backend;
use crate::error::BackendError;
use crate::var::{Domain, Var, VarKind};
use std::collections::BTreeSet;

/// A backend that keeps every allocation and posting in memory.
///
/// Postings are checked against the primitive's signature (argument count,
/// kinds, known variables) and then appended. The recorded model can be
/// searched with [`SimpleSolver`](crate::search::SimpleSolver).
///
/// # Examples
///
/// ```
/// use u_cpexpr::backend::{Arg, Backend, Posting, Primitive, RecordingBackend, Relation};
///
/// let mut backend = RecordingBackend::new();
/// let b = backend.fresh_bool();
/// let posting = Posting::new(Primitive::Rel, vec![Arg::Var(b), Arg::Bool(true)])
///     .with_relation(Relation::Eq);
/// backend.post(posting).unwrap();
/// assert_eq!(backend.postings().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    domains: Vec<Domain>,
    postings: Vec<Posting>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// All postings accepted so far, in order.
    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    /// Number of postings using `primitive`.
    pub fn count(&self, primitive: Primitive) -> usize {
        self.postings
            .iter()
            .filter(|p| p.primitive == primitive)
            .count()
    }

    /// Allocation domain of `var`.
    pub fn domain(&self, var: Var) -> Option<&Domain> {
        self.domains.get(var.id() as usize)
    }

    /// All allocated domains, indexed by variable id.
    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    /// Number of allocated variables.
    pub fn var_count(&self) -> usize {
        self.domains.len()
    }

    fn allocate(&mut self, domain: Domain) -> Var {
        let var = Var::new(self.domains.len() as u32, domain.kind());
        self.domains.push(domain);
        var
    }

    fn check_var(&self, primitive: Primitive, var: Var) -> Result<(), BackendError> {
        match self.domain(var) {
            Some(d) if d.kind() == var.kind() => Ok(()),
            Some(_) => Err(BackendError::new(
                primitive,
                format!("variable {var} has a different kind in this backend"),
            )),
            None => Err(BackendError::new(primitive, format!("unknown variable {var}"))),
        }
    }

    fn check_signature(&self, posting: &Posting) -> Result<(), BackendError> {
        let p = posting.primitive;
        let args = &posting.args;
        let fail = |msg: &str| -> Result<(), BackendError> { Err(BackendError::new(p, msg)) };
        let scalar = |i: usize, kind: VarKind| {
            args.get(i).and_then(Arg::scalar_kind) == Some(kind)
        };
        let vars_of = |i: usize, kind: VarKind| match args.get(i) {
            Some(Arg::Vars(vs)) => vs.iter().all(|v| v.kind() == kind),
            _ => false,
        };

        let ok = match p {
            Primitive::BoolAnd | Primitive::BoolOr => {
                !args.is_empty() && (0..args.len()).all(|i| scalar(i, VarKind::Bool))
            }
            Primitive::BoolXor | Primitive::BoolImp => {
                args.len() == 3 && (0..3).all(|i| scalar(i, VarKind::Bool))
            }
            Primitive::Rel => {
                args.len() == 2
                    && args[0].scalar_kind().is_some()
                    && args[0].scalar_kind() == args[1].scalar_kind()
            }
            Primitive::Linear | Primitive::Max | Primitive::Min => {
                args.len() == 2 && vars_of(0, VarKind::Int) && scalar(1, VarKind::Int)
            }
            Primitive::Element => {
                args.len() == 3
                    && scalar(1, VarKind::Int)
                    && match &args[0] {
                        Arg::Vars(vs) => {
                            let kind = args[2].scalar_kind();
                            vs.iter().all(|v| Some(v.kind()) == kind)
                        }
                        Arg::Ints(_) => scalar(2, VarKind::Int),
                        _ => false,
                    }
            }
            Primitive::Count => {
                args.len() == 3
                    && vars_of(0, VarKind::Int)
                    && scalar(1, VarKind::Int)
                    && scalar(2, VarKind::Int)
            }
            Primitive::Distinct | Primitive::Sorted => args.len() == 1 && vars_of(0, VarKind::Int),
            Primitive::Extensional => match args.as_slice() {
                [Arg::Vars(vs), Arg::Tuples(ts)] => ts.iter().all(|t| t.len() == vs.len()),
                _ => false,
            },
            Primitive::Channel(ChannelForm::BoolInt) => {
                args.len() == 3
                    && vars_of(0, VarKind::Bool)
                    && scalar(1, VarKind::Int)
                    && matches!(args[2], Arg::Int(_))
            }
            Primitive::Channel(ChannelForm::BoolSet) => {
                args.len() == 2 && vars_of(0, VarKind::Bool) && scalar(1, VarKind::Set)
            }
            Primitive::Channel(ChannelForm::IntInt) => {
                args.len() == 2 && vars_of(0, VarKind::Int) && vars_of(1, VarKind::Int)
            }
            Primitive::Channel(ChannelForm::IntSet) => {
                args.len() == 2 && vars_of(0, VarKind::Int) && vars_of(1, VarKind::Set)
            }
            Primitive::SetOp(_) => args.len() == 3 && (0..3).all(|i| scalar(i, VarKind::Set)),
            Primitive::SelectedUnion | Primitive::SelectedIntersection => {
                args.len() == 3
                    && vars_of(0, VarKind::Set)
                    && scalar(1, VarKind::Set)
                    && scalar(2, VarKind::Set)
            }
            Primitive::SetElements => {
                args.len() == 2 && scalar(0, VarKind::Set) && scalar(1, VarKind::Int)
            }
        };
        if !ok {
            return fail("argument shape does not match the primitive");
        }

        let needs_relation = matches!(
            p,
            Primitive::Rel
                | Primitive::Linear
                | Primitive::Max
                | Primitive::Min
                | Primitive::Element
                | Primitive::Count
                | Primitive::SetOp(_)
                | Primitive::SelectedUnion
                | Primitive::SelectedIntersection
                | Primitive::SetElements
        );
        if needs_relation && posting.relation.is_none() {
            return fail("missing relation code");
        }
        if posting.negate && !p.supports_negation() {
            return fail("negation not available");
        }
        if let Some(r) = posting.reify {
            if !p.supports_reification() {
                return fail("reification not available");
            }
            if !r.is_bool() {
                return fail("reification target must be boolean");
            }
        }
        Ok(())
    }
}

impl Backend for RecordingBackend {
    fn fresh_bool(&mut self) -> Var {
        self.allocate(Domain::Bool)
    }

    fn fresh_int(&mut self, min: i64, max: i64) -> Var {
        self.allocate(Domain::Int { min, max })
    }

    fn fresh_set(&mut self, glb: BTreeSet<i64>, lub: BTreeSet<i64>) -> Var {
        self.allocate(Domain::Set { glb, lub })
    }

    fn post(&mut self, posting: Posting) -> Result<(), BackendError> {
        for var in posting.vars() {
            self.check_var(posting.primitive, var)?;
        }
        self.check_signature(&posting)?;
        log::trace!(
            "recording {} posting #{}",
            posting.primitive.name(),
            self.postings.len()
        );
        self.postings.push(posting);
        Ok(())
    }
}
