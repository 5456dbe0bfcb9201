//! Constraint options.

use crate::backend::{Priority, Strength};
use crate::operand::Operand;

/// Options accepted by relation methods.
///
/// | Field | Default | Applies to |
/// |---|---|---|
/// | `strength` | none ([`Strength::Domain`]) | every relation |
/// | `reify` | none | reifiable relations |
/// | `offset` | none (0) | bool enum / int channel only |
/// | `priority` | none | every relation |
///
/// # Examples
///
/// ```
/// use u_cpexpr::backend::{Priority, Strength};
/// use u_cpexpr::constraints::ConstraintOptions;
///
/// let options = ConstraintOptions::default()
///     .with_strength(Strength::Bounds)
///     .with_priority(Priority::Speed);
/// assert!(options.reify.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ConstraintOptions {
    /// Consistency level of the relation's propagator.
    pub strength: Option<Strength>,

    /// Boolean operand bound to the truth of the relation.
    pub reify: Option<Operand>,

    /// Index offset of a channel constraint.
    pub offset: Option<i64>,

    /// Propagation priority.
    pub priority: Option<Priority>,
}

impl Default for ConstraintOptions {
    fn default() -> Self {
        Self {
            strength: None,
            reify: None,
            offset: None,
            priority: None,
        }
    }
}

impl ConstraintOptions {
    pub fn with_strength(mut self, strength: Strength) -> Self {
        self.strength = Some(strength);
        self
    }

    /// Strength handed to the backend; [`Strength::Domain`] when unset.
    pub fn resolved_strength(&self) -> Strength {
        self.strength.unwrap_or(Strength::Domain)
    }

    pub fn with_reify(mut self, reify: impl Into<Operand>) -> Self {
        self.reify = Some(reify.into());
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Overlays every option set in `other` onto `self`.
    pub fn merge(mut self, other: ConstraintOptions) -> Self {
        if other.strength.is_some() {
            self.strength = other.strength;
        }
        if other.reify.is_some() {
            self.reify = other.reify;
        }
        if other.offset.is_some() {
            self.offset = other.offset;
        }
        if other.priority.is_some() {
            self.priority = other.priority;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConstraintOptions::default();
        assert!(options.strength.is_none());
        assert_eq!(options.resolved_strength(), Strength::Domain);
        assert!(options.reify.is_none());
        assert!(options.offset.is_none());
        assert!(options.priority.is_none());
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let base = ConstraintOptions::default().with_offset(2);
        let merged = base.merge(ConstraintOptions::default().with_priority(Priority::Memory));
        assert_eq!(merged.offset, Some(2));
        assert_eq!(merged.priority, Some(Priority::Memory));
    }

    #[test]
    fn test_merge_keeps_strength() {
        let base = ConstraintOptions::default().with_strength(Strength::Bounds);
        let merged = base.merge(ConstraintOptions::default().with_priority(Priority::Speed));
        assert_eq!(merged.resolved_strength(), Strength::Bounds);

        let merged = merged.merge(ConstraintOptions::default().with_strength(Strength::Value));
        assert_eq!(merged.resolved_strength(), Strength::Value);
    }
}
