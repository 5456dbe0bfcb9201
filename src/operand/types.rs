//! The operand tagged union.

use super::enumeration::VarEnum;
use super::stub::{Connective, Stub};
use crate::backend::{Arg, Backend, SetOp};
use crate::constraints::{ConstraintReceiver, SetElements, SetOperation};
use crate::error::{ExprError, Result};
use crate::model::Model;
use crate::search::{Solution, Value};
use crate::var::{Var, VarKind};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Kind of an operand, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandKind {
    Bool,
    Int,
    Set,
    BoolEnum,
    IntEnum,
    SetEnum,
}

impl OperandKind {
    /// Kind of a scalar operand holding values of `kind`.
    pub fn scalar(kind: VarKind) -> Self {
        match kind {
            VarKind::Bool => OperandKind::Bool,
            VarKind::Int => OperandKind::Int,
            VarKind::Set => OperandKind::Set,
        }
    }

    /// Kind of an enumeration whose elements are of `kind`.
    pub fn enumeration(kind: VarKind) -> Self {
        match kind {
            VarKind::Bool => OperandKind::BoolEnum,
            VarKind::Int => OperandKind::IntEnum,
            VarKind::Set => OperandKind::SetEnum,
        }
    }

    pub fn is_enumeration(&self) -> bool {
        matches!(
            self,
            OperandKind::BoolEnum | OperandKind::IntEnum | OperandKind::SetEnum
        )
    }
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperandKind::Bool => "bool",
            OperandKind::Int => "int",
            OperandKind::Set => "set",
            OperandKind::BoolEnum => "bool enum",
            OperandKind::IntEnum => "int enum",
            OperandKind::SetEnum => "set enum",
        };
        f.write_str(name)
    }
}

/// A constant literal used as an operand.
///
/// `Ints` is a constant integer enumeration: it can be indexed by
/// [`Operand::element`] but never receives constraints itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constant {
    Bool(bool),
    Int(i64),
    Set(BTreeSet<i64>),
    Ints(Vec<i64>),
}

impl Constant {
    pub fn kind(&self) -> OperandKind {
        match self {
            Constant::Bool(_) => OperandKind::Bool,
            Constant::Int(_) => OperandKind::Int,
            Constant::Set(_) => OperandKind::Set,
            Constant::Ints(_) => OperandKind::IntEnum,
        }
    }

    fn to_arg(&self) -> Arg {
        match self {
            Constant::Bool(b) => Arg::Bool(*b),
            Constant::Int(i) => Arg::Int(*i),
            Constant::Set(s) => Arg::Set(s.clone()),
            Constant::Ints(xs) => Arg::Ints(xs.clone()),
        }
    }

    fn to_value(&self) -> Option<Value> {
        match self {
            Constant::Bool(b) => Some(Value::Bool(*b)),
            Constant::Int(i) => Some(Value::Int(*i)),
            Constant::Set(s) => Some(Value::Set(s.clone())),
            Constant::Ints(_) => None,
        }
    }
}

/// A node of a constraint expression tree.
///
/// Cloning is cheap: enumerations and stubs are reference counted, so a
/// cloned stub shares its materialized variable with the original.
///
/// # Examples
///
/// ```
/// use u_cpexpr::backend::RecordingBackend;
/// use u_cpexpr::model::Model;
/// use u_cpexpr::operand::{Operand, OperandKind};
///
/// let mut model = Model::new(RecordingBackend::new());
/// let a = model.bool_var();
/// let x = model.int_var(0, 3);
///
/// let expr = Operand::from(a).and(true).unwrap();
/// assert_eq!(expr.kind(), OperandKind::Bool);
///
/// // Connectives check kinds at construction.
/// assert!(Operand::from(a).and(x).is_err());
/// ```
#[derive(Debug, Clone)]
pub enum Operand {
    /// A bare backend variable.
    Var(Var),
    /// An ordered enumeration of variables.
    Enum(VarEnum),
    /// A deferred composite expression.
    Stub(Rc<Stub>),
    /// A constant literal.
    Const(Constant),
}

impl Operand {
    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::Var(v) => OperandKind::scalar(v.kind()),
            Operand::Enum(e) => e.operand_kind(),
            Operand::Stub(s) => OperandKind::scalar(s.kind()),
            Operand::Const(c) => c.kind(),
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, Operand::Stub(_))
    }

    /// Canonical backend argument for this operand.
    ///
    /// Stubs are materialized (once) into an auxiliary variable.
    pub fn to_backend_handle<B: Backend>(&self, model: &mut Model<B>) -> Result<Arg> {
        match self {
            Operand::Var(v) => Ok(Arg::Var(*v)),
            Operand::Enum(e) => Ok(Arg::Vars(e.vars().to_vec())),
            Operand::Stub(s) => Ok(Arg::Var(s.force_materialize(model)?)),
            Operand::Const(c) => Ok(c.to_arg()),
        }
    }

    /// Packages the operand for a later relation call. Touches no backend state.
    pub fn declare<B: Backend>(self, model: &mut Model<B>, negate: bool) -> ConstraintReceiver<'_, B> {
        ConstraintReceiver::new(model, self, negate)
    }

    pub fn must<B: Backend>(self, model: &mut Model<B>) -> ConstraintReceiver<'_, B> {
        self.declare(model, false)
    }

    pub fn must_not<B: Backend>(self, model: &mut Model<B>) -> ConstraintReceiver<'_, B> {
        self.declare(model, true)
    }

    /// `self AND rhs`.
    pub fn and(self, rhs: impl Into<Operand>) -> Result<Operand> {
        self.bool_connective(Connective::And, rhs.into())
    }

    /// `self OR rhs`.
    pub fn or(self, rhs: impl Into<Operand>) -> Result<Operand> {
        self.bool_connective(Connective::Or, rhs.into())
    }

    /// `self XOR rhs`.
    pub fn xor(self, rhs: impl Into<Operand>) -> Result<Operand> {
        self.bool_connective(Connective::Xor, rhs.into())
    }

    /// `self => rhs`.
    pub fn implies(self, rhs: impl Into<Operand>) -> Result<Operand> {
        self.bool_connective(Connective::Implies, rhs.into())
    }

    fn bool_connective(self, connective: Connective, rhs: Operand) -> Result<Operand> {
        let context = connective.name();
        expect_kind(&self, OperandKind::Bool, context, "bool operands")?;
        expect_kind(&rhs, OperandKind::Bool, context, "bool operands")?;
        Ok(Stub::new(connective, vec![self, rhs], VarKind::Bool).into())
    }

    /// `self ∪ rhs`.
    pub fn union(self, rhs: impl Into<Operand>) -> Result<SetOperation> {
        SetOperation::new(self, SetOp::Union, rhs.into())
    }

    /// `self ∪ rhs` where the two sets must be disjoint.
    pub fn disjoint_union(self, rhs: impl Into<Operand>) -> Result<SetOperation> {
        SetOperation::new(self, SetOp::DisjointUnion, rhs.into())
    }

    /// `self ∩ rhs`.
    pub fn intersection(self, rhs: impl Into<Operand>) -> Result<SetOperation> {
        SetOperation::new(self, SetOp::Intersection, rhs.into())
    }

    /// `self \ rhs`.
    pub fn minus(self, rhs: impl Into<Operand>) -> Result<SetOperation> {
        SetOperation::new(self, SetOp::Minus, rhs.into())
    }

    /// Expression standing for `self[index]`.
    ///
    /// Accepts bool or int enumerations and constant integer enumerations.
    pub fn element(self, index: impl Into<Operand>) -> Result<Operand> {
        if let Operand::Enum(e) = &self {
            return e.element(index);
        }
        if !matches!(self, Operand::Const(Constant::Ints(_))) {
            return Err(ExprError::kind_mismatch(
                "element",
                "bool or int enum, or constant ints",
                self.kind(),
            ));
        }
        let index = index.into();
        expect_kind(&index, OperandKind::Int, "element", "int index")?;
        Ok(Stub::new(Connective::Element, vec![self, index], VarKind::Int).into())
    }

    /// The elements of a set operand, as the left-hand side of a relation
    /// that every element must satisfy.
    pub fn elements(self) -> Result<SetElements> {
        SetElements::new(self)
    }

    /// The underlying variable of a bare or already materialized operand.
    pub fn as_var(&self) -> Result<Var> {
        match self {
            Operand::Var(v) => Ok(*v),
            Operand::Stub(s) => s.materialized().ok_or(ExprError::UnsupportedCapability {
                kind: self.kind(),
                capability: "variable (expression not materialized)",
            }),
            _ => Err(self.unsupported("variable")),
        }
    }

    /// The underlying enumeration.
    pub fn as_enum(&self) -> Result<&VarEnum> {
        match self {
            Operand::Enum(e) => Ok(e),
            _ => Err(self.unsupported("enumeration")),
        }
    }

    /// Element `index` of an enumeration operand.
    pub fn get(&self, index: usize) -> Result<Option<Var>> {
        Ok(self.as_enum()?.get(index))
    }

    /// Length of an enumeration operand.
    pub fn len(&self) -> Result<usize> {
        match self {
            Operand::Const(Constant::Ints(xs)) => Ok(xs.len()),
            _ => Ok(self.as_enum()?.len()),
        }
    }

    /// Value of a scalar operand in a solution.
    pub fn value_in(&self, solution: &Solution) -> Result<Value> {
        if let Operand::Const(c) = self {
            return c.to_value().ok_or_else(|| self.unsupported("value"));
        }
        let var = self.as_var()?;
        solution
            .value(var)
            .cloned()
            .ok_or_else(|| self.unsupported("value (variable not in solution)"))
    }

    /// Values of an enumeration operand in a solution.
    pub fn values_in(&self, solution: &Solution) -> Result<Vec<Value>> {
        if let Operand::Const(Constant::Ints(xs)) = self {
            return Ok(xs.iter().copied().map(Value::Int).collect());
        }
        self.as_enum()?
            .iter()
            .map(|v| {
                solution
                    .value(v)
                    .cloned()
                    .ok_or_else(|| self.unsupported("value (variable not in solution)"))
            })
            .collect()
    }

    fn unsupported(&self, capability: &'static str) -> ExprError {
        ExprError::UnsupportedCapability {
            kind: self.kind(),
            capability,
        }
    }
}

/// Fails with `KindMismatch` unless `operand` is of `kind`.
pub(crate) fn expect_kind(
    operand: &Operand,
    kind: OperandKind,
    context: &'static str,
    expected: &'static str,
) -> Result<()> {
    if operand.kind() == kind {
        Ok(())
    } else {
        Err(ExprError::kind_mismatch(context, expected, operand.kind()))
    }
}

impl From<Var> for Operand {
    fn from(v: Var) -> Self {
        Operand::Var(v)
    }
}

impl From<VarEnum> for Operand {
    fn from(e: VarEnum) -> Self {
        Operand::Enum(e)
    }
}

impl From<&VarEnum> for Operand {
    fn from(e: &VarEnum) -> Self {
        Operand::Enum(e.clone())
    }
}

impl From<Stub> for Operand {
    fn from(s: Stub) -> Self {
        Operand::Stub(Rc::new(s))
    }
}

impl From<Constant> for Operand {
    fn from(c: Constant) -> Self {
        Operand::Const(c)
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::Const(Constant::Bool(b))
    }
}

impl From<i64> for Operand {
    fn from(i: i64) -> Self {
        Operand::Const(Constant::Int(i))
    }
}

impl From<BTreeSet<i64>> for Operand {
    fn from(s: BTreeSet<i64>) -> Self {
        Operand::Const(Constant::Set(s))
    }
}

impl From<Vec<i64>> for Operand {
    fn from(xs: Vec<i64>) -> Self {
        Operand::Const(Constant::Ints(xs))
    }
}
