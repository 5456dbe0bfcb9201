//! Integer ordering relations.

use super::receiver::ConstraintReceiver;
use crate::backend::{Backend, Relation};
use crate::error::Result;
use crate::operand::Operand;

impl<B: Backend> ConstraintReceiver<'_, B> {
    pub fn not_equal(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Nq, rhs)
    }

    pub fn less(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Lt, rhs)
    }

    pub fn less_or_equal(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Le, rhs)
    }

    pub fn greater(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Gt, rhs)
    }

    pub fn greater_or_equal(self, rhs: impl Into<Operand>) -> Result<()> {
        self.relate(Relation::Ge, rhs)
    }
}
