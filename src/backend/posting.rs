//! Posting records: the only thing the compiler ever sends to a backend.

use crate::var::{Var, VarKind};
use std::collections::BTreeSet;

/// Consistency level requested for a propagator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strength {
    /// Whatever the backend considers its default.
    #[default]
    Default,
    /// Bounds consistency.
    Bounds,
    /// Domain consistency.
    Domain,
    /// Value consistency.
    Value,
}

/// Propagation priority hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Priority {
    /// Prefer fast propagators.
    Speed,
    /// Prefer propagators with a small memory footprint.
    Memory,
}

/// Relation code carried by relational primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    Eq,
    Nq,
    Lt,
    Le,
    Gt,
    Ge,
    Subset,
    Superset,
    Disjoint,
}

impl Relation {
    /// Applies to integer (and boolean, for `Eq`/`Nq`) operands.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Relation::Eq | Relation::Nq | Relation::Lt | Relation::Le | Relation::Gt | Relation::Ge
        )
    }

    /// Applies to set operands.
    pub fn is_set_relation(&self) -> bool {
        matches!(
            self,
            Relation::Eq
                | Relation::Nq
                | Relation::Subset
                | Relation::Superset
                | Relation::Disjoint
        )
    }

    /// Compares two integers. Set-only relations never hold.
    pub fn compare(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            Relation::Eq => lhs == rhs,
            Relation::Nq => lhs != rhs,
            Relation::Lt => lhs < rhs,
            Relation::Le => lhs <= rhs,
            Relation::Gt => lhs > rhs,
            Relation::Ge => lhs >= rhs,
            _ => false,
        }
    }
}

/// Binary set operator of a set-operation primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetOp {
    Union,
    /// Union of two sets that must be disjoint.
    DisjointUnion,
    Intersection,
    Minus,
}

/// Operand shapes accepted by the channel primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelForm {
    /// `bs[i] <=> y == i + offset`.
    BoolInt,
    /// `bs[i] <=> i in s`.
    BoolSet,
    /// `xs[i] == j <=> ys[j] == i`.
    IntInt,
    /// `xs[i] == j <=> i in ss[j]`.
    IntSet,
}

/// Primitive constraint identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Primitive {
    BoolAnd,
    BoolOr,
    BoolXor,
    BoolImp,
    Rel,
    Linear,
    Max,
    Min,
    Element,
    Count,
    Distinct,
    Sorted,
    Extensional,
    Channel(ChannelForm),
    SetOp(SetOp),
    /// Union of the sets picked out by a selector set.
    SelectedUnion,
    /// Intersection of the sets picked out by a selector set.
    SelectedIntersection,
    /// Every element of a set stands in a relation to an integer.
    SetElements,
}

impl Primitive {
    /// Short name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::BoolAnd => "conjunction",
            Primitive::BoolOr => "disjunction",
            Primitive::BoolXor => "exclusive or",
            Primitive::BoolImp => "implication",
            Primitive::Rel => "relation",
            Primitive::Linear => "linear",
            Primitive::Max => "maximum",
            Primitive::Min => "minimum",
            Primitive::Element => "element",
            Primitive::Count => "count",
            Primitive::Distinct => "distinct",
            Primitive::Sorted => "sorted",
            Primitive::Extensional => "tuple",
            Primitive::Channel(_) => "channel",
            Primitive::SetOp(_) => "set operation",
            Primitive::SelectedUnion => "selected union",
            Primitive::SelectedIntersection => "selected intersection",
            Primitive::SetElements => "set elements",
        }
    }

    /// Whether the backend accepts this primitive with `negate` set.
    pub fn supports_negation(&self) -> bool {
        !matches!(
            self,
            Primitive::Channel(_) | Primitive::SetOp(_) | Primitive::Distinct | Primitive::Extensional
        )
    }

    /// Whether the backend accepts this primitive with a reification target.
    pub fn supports_reification(&self) -> bool {
        self.supports_negation()
    }
}

/// A single argument slot of a posting.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Arg {
    Var(Var),
    Vars(Vec<Var>),
    Bool(bool),
    Int(i64),
    Set(BTreeSet<i64>),
    /// Constant integer array.
    Ints(Vec<i64>),
    Tuples(Vec<Vec<i64>>),
}

impl Arg {
    /// Scalar kind of this argument, `None` for array-shaped arguments.
    pub fn scalar_kind(&self) -> Option<VarKind> {
        match self {
            Arg::Var(v) => Some(v.kind()),
            Arg::Bool(_) => Some(VarKind::Bool),
            Arg::Int(_) => Some(VarKind::Int),
            Arg::Set(_) => Some(VarKind::Set),
            Arg::Vars(_) | Arg::Ints(_) | Arg::Tuples(_) => None,
        }
    }

    /// Variables referenced by this argument.
    pub fn vars(&self) -> &[Var] {
        match self {
            Arg::Var(v) => std::slice::from_ref(v),
            Arg::Vars(vs) => vs,
            _ => &[],
        }
    }

    pub fn as_var(&self) -> Option<Var> {
        match self {
            Arg::Var(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<Var> for Arg {
    fn from(v: Var) -> Self {
        Arg::Var(v)
    }
}

/// A primitive constraint as sent to the backend.
///
/// Truth semantics: the primitive's base condition, XOR `negate`. Without
/// `reify` the posting requires that to hold; with `reify = r` it requires
/// `r` to equal it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Posting {
    /// Primitive identifier.
    pub primitive: Primitive,
    /// Argument slots, in the primitive's order.
    pub args: Vec<Arg>,
    /// Relation code for relational primitives.
    pub relation: Option<Relation>,
    /// Whether the base condition is negated.
    pub negate: bool,
    /// Consistency level.
    pub strength: Strength,
    /// Boolean variable bound to the truth of the posting.
    pub reify: Option<Var>,
    /// Propagation priority.
    pub priority: Option<Priority>,
}

impl Posting {
    /// Creates a plain, non-negated posting with default strength.
    pub fn new(primitive: Primitive, args: Vec<Arg>) -> Self {
        Self {
            primitive,
            args,
            relation: None,
            negate: false,
            strength: Strength::Default,
            reify: None,
            priority: None,
        }
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relation = Some(relation);
        self
    }

    pub fn with_negate(mut self, negate: bool) -> Self {
        self.negate = negate;
        self
    }

    pub fn with_strength(mut self, strength: Strength) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_reify(mut self, reify: Option<Var>) -> Self {
        self.reify = reify;
        self
    }

    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    /// All variables the posting mentions, including the reification target.
    pub fn vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.args
            .iter()
            .flat_map(|a| a.vars().iter().copied())
            .chain(self.reify)
    }
}
