//! Enumeration adapter.

use super::selected::SelectedSet;
use super::stub::{Connective, Stub};
use super::types::{expect_kind, Operand, OperandKind};
use crate::backend::Backend;
use crate::constraints::ConstraintReceiver;
use crate::error::{ExprError, Result};
use crate::model::Model;
use crate::var::{Var, VarKind};
use std::rc::Rc;

/// An ordered, frozen sequence of variables of one kind.
///
/// Wrapping copies the caller's variables at construction; the caller's
/// collection is never touched again. Order is significant: element, channel
/// and sort constraints index by position.
///
/// # Examples
///
/// ```
/// use u_cpexpr::backend::RecordingBackend;
/// use u_cpexpr::model::Model;
/// use u_cpexpr::operand::VarEnum;
/// use u_cpexpr::var::VarKind;
///
/// let mut model = Model::new(RecordingBackend::new());
/// let vars = vec![model.bool_var(), model.bool_var()];
/// let bools = VarEnum::new(VarKind::Bool, vars).unwrap();
/// model.must(bools.conjunction().unwrap()).be_true().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarEnum {
    kind: VarKind,
    vars: Rc<[Var]>,
}

impl VarEnum {
    /// Wraps `vars`, checking that every element is of `kind`.
    pub fn new(kind: VarKind, vars: impl IntoIterator<Item = Var>) -> Result<Self> {
        let vars: Vec<Var> = vars.into_iter().collect();
        if let Some(bad) = vars.iter().find(|v| v.kind() != kind) {
            return Err(ExprError::kind_mismatch(
                "enumeration",
                "elements of one kind",
                OperandKind::scalar(bad.kind()),
            ));
        }
        Ok(Self::with_kind(kind, vars))
    }

    pub(crate) fn with_kind(kind: VarKind, vars: Vec<Var>) -> Self {
        Self {
            kind,
            vars: vars.into(),
        }
    }

    /// Element kind.
    pub fn kind(&self) -> VarKind {
        self.kind
    }

    /// Operand kind of the enumeration as a whole.
    pub fn operand_kind(&self) -> OperandKind {
        OperandKind::enumeration(self.kind)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Var> {
        self.vars.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Var> + '_ {
        self.vars.iter().copied()
    }

    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    /// Starts an enumeration-scoped constraint declaration.
    pub fn must<'m, B: Backend>(&self, model: &'m mut Model<B>) -> ConstraintReceiver<'m, B> {
        ConstraintReceiver::new(model, self.into(), false)
    }

    /// Starts a negated enumeration-scoped constraint declaration.
    pub fn must_not<'m, B: Backend>(&self, model: &'m mut Model<B>) -> ConstraintReceiver<'m, B> {
        ConstraintReceiver::new(model, self.into(), true)
    }

    /// Expression standing for the conjunction of every element.
    pub fn conjunction(&self) -> Result<Operand> {
        self.bool_aggregate(Connective::And)
    }

    /// Expression standing for the disjunction of every element.
    pub fn disjunction(&self) -> Result<Operand> {
        self.bool_aggregate(Connective::Or)
    }

    /// Expression standing for the sum of every element.
    pub fn sum(&self) -> Result<Operand> {
        self.int_aggregate(Connective::Sum)
    }

    /// Expression standing for the largest element.
    pub fn max(&self) -> Result<Operand> {
        self.int_aggregate(Connective::Max)
    }

    /// Expression standing for the smallest element.
    pub fn min(&self) -> Result<Operand> {
        self.int_aggregate(Connective::Min)
    }

    /// Expression standing for the number of elements equal to `value`.
    pub fn count(&self, value: impl Into<Operand>) -> Result<Operand> {
        self.require(VarKind::Int, "count", "int enum")?;
        let value = value.into();
        expect_kind(&value, OperandKind::Int, "count", "int value")?;
        Ok(Stub::new(Connective::Count, vec![self.into(), value], VarKind::Int).into())
    }

    /// Expression standing for the element at position `index`.
    pub fn element(&self, index: impl Into<Operand>) -> Result<Operand> {
        if self.kind == VarKind::Set {
            return Err(ExprError::kind_mismatch(
                "element",
                "bool or int enum",
                self.operand_kind(),
            ));
        }
        let index = index.into();
        expect_kind(&index, OperandKind::Int, "element", "int index")?;
        Ok(Stub::new(Connective::Element, vec![self.into(), index], self.kind).into())
    }

    /// The sets at the positions listed by `selector`.
    pub fn select(&self, selector: impl Into<Operand>) -> Result<SelectedSet> {
        SelectedSet::new(self.clone(), selector.into())
    }

    fn bool_aggregate(&self, connective: Connective) -> Result<Operand> {
        self.require(VarKind::Bool, connective.name(), "bool enum")?;
        let operands = self.vars.iter().copied().map(Operand::Var).collect();
        Ok(Stub::new(connective, operands, VarKind::Bool).into())
    }

    fn int_aggregate(&self, connective: Connective) -> Result<Operand> {
        self.require(VarKind::Int, connective.name(), "int enum")?;
        Ok(Stub::new(connective, vec![self.into()], VarKind::Int).into())
    }

    fn require(&self, kind: VarKind, context: &'static str, expected: &'static str) -> Result<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(ExprError::kind_mismatch(context, expected, self.operand_kind()))
        }
    }
}

impl<'a> IntoIterator for &'a VarEnum {
    type Item = Var;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Var>>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter().copied()
    }
}
