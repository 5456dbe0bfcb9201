//! Error types for expression construction and posting.

use crate::backend::Primitive;
use crate::operand::OperandKind;
use thiserror::Error;

/// Error reported by a [`Backend`](crate::backend::Backend) when it cannot
/// accept a posting or allocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{primitive:?} rejected: {message}")]
pub struct BackendError {
    /// Primitive that was being posted.
    pub primitive: Primitive,
    /// Backend diagnostic.
    pub message: String,
}

impl BackendError {
    pub fn new(primitive: Primitive, message: impl Into<String>) -> Self {
        Self {
            primitive,
            message: message.into(),
        }
    }
}

/// Errors raised while building or finalizing constraint expressions.
///
/// All variants except [`ExprError::Backend`] are raised synchronously at the
/// point of misuse, before anything is queued for the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// Operand kinds incompatible with a connective or relation.
    #[error("kind mismatch in {context}: expected {expected}, found {found}")]
    KindMismatch {
        /// Operation being built.
        context: &'static str,
        /// Human readable description of the accepted kinds.
        expected: &'static str,
        /// Kind that was supplied.
        found: OperandKind,
    },

    /// Negation requested on a constraint with no negated form.
    #[error("negated {0} constraint is not supported")]
    UnsupportedNegation(&'static str),

    /// Reification requested on a constraint with no reified form.
    #[error("{0} constraint does not support reification")]
    UnsupportedConstraint(&'static str),

    /// Option that does not apply to the relation, or has the wrong type.
    #[error("invalid option `{option}`: {reason}")]
    InvalidOption {
        /// Option name.
        option: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// Pass-through access to a capability the operand does not provide.
    #[error("{kind} operand does not provide `{capability}`")]
    UnsupportedCapability {
        /// Kind of the operand.
        kind: OperandKind,
        /// Requested capability.
        capability: &'static str,
    },

    /// The backend refused a posting while flushing.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ExprError {
    pub(crate) fn kind_mismatch(
        context: &'static str,
        expected: &'static str,
        found: OperandKind,
    ) -> Self {
        ExprError::KindMismatch {
            context,
            expected,
            found,
        }
    }

    pub(crate) fn invalid_option(option: &'static str, reason: impl Into<String>) -> Self {
        ExprError::InvalidOption {
            option,
            reason: reason.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T, E = ExprError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_kind_mismatch() {
        let err = ExprError::kind_mismatch("and", "bool operands", OperandKind::Int);
        assert_eq!(
            err.to_string(),
            "kind mismatch in and: expected bool operands, found int"
        );
    }

    #[test]
    fn test_backend_error_converts() {
        let err: ExprError = BackendError::new(Primitive::Distinct, "unknown variable").into();
        assert!(matches!(err, ExprError::Backend(_)));
        assert!(err.to_string().contains("unknown variable"));
    }

    #[test]
    fn test_display_negation() {
        let err = ExprError::UnsupportedNegation("channel");
        assert_eq!(err.to_string(), "negated channel constraint is not supported");
    }
}
