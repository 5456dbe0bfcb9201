//! Variable handles and allocation domains.

use std::collections::BTreeSet;
use std::fmt;

/// The kind of a backend decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VarKind {
    /// Boolean (0/1) variable.
    Bool,
    /// Integer variable.
    Int,
    /// Set-of-integers variable.
    Set,
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKind::Bool => write!(f, "bool"),
            VarKind::Int => write!(f, "int"),
            VarKind::Set => write!(f, "set"),
        }
    }
}

/// A handle to a variable owned by the backend engine.
///
/// The handle is a plain identifier plus its kind. The domain lives in the
/// backend; nothing in the expression compiler inspects it.
///
/// # Examples
///
/// ```
/// use u_cpexpr::var::{Var, VarKind};
///
/// let v = Var::new(3, VarKind::Int);
/// assert_eq!(v.id(), 3);
/// assert!(v.is_int());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Var {
    id: u32,
    kind: VarKind,
}

impl Var {
    /// Creates a handle. Backends call this when allocating.
    pub fn new(id: u32, kind: VarKind) -> Self {
        Self { id, kind }
    }

    /// Backend identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Variable kind.
    pub fn kind(&self) -> VarKind {
        self.kind
    }

    pub fn is_bool(&self) -> bool {
        self.kind == VarKind::Bool
    }

    pub fn is_int(&self) -> bool {
        self.kind == VarKind::Int
    }

    pub fn is_set(&self) -> bool {
        self.kind == VarKind::Set
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            VarKind::Bool => 'b',
            VarKind::Int => 'i',
            VarKind::Set => 's',
        };
        write!(f, "{prefix}{}", self.id)
    }
}

/// The domain a variable is allocated with.
///
/// Only used at allocation time; handed to the backend unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Domain {
    /// `{false, true}`.
    Bool,
    /// Integer range `[min, max]`.
    Int {
        /// Minimum value.
        min: i64,
        /// Maximum value.
        max: i64,
    },
    /// Set bounds: every value must contain `glb` and be contained in `lub`.
    Set {
        /// Greatest lower bound (required elements).
        glb: BTreeSet<i64>,
        /// Least upper bound (possible elements).
        lub: BTreeSet<i64>,
    },
}

impl Domain {
    /// Integer range domain.
    pub fn int(min: i64, max: i64) -> Self {
        Domain::Int { min, max }
    }

    /// Set domain from explicit bounds.
    pub fn set(glb: impl IntoIterator<Item = i64>, lub: impl IntoIterator<Item = i64>) -> Self {
        Domain::Set {
            glb: glb.into_iter().collect(),
            lub: lub.into_iter().collect(),
        }
    }

    /// Kind of variable this domain allocates.
    pub fn kind(&self) -> VarKind {
        match self {
            Domain::Bool => VarKind::Bool,
            Domain::Int { .. } => VarKind::Int,
            Domain::Set { .. } => VarKind::Set,
        }
    }

    /// Whether the domain admits at least one value.
    pub fn is_empty(&self) -> bool {
        match self {
            Domain::Bool => false,
            Domain::Int { min, max } => min > max,
            Domain::Set { glb, lub } => !glb.is_subset(lub),
        }
    }

    /// Number of values for integer domains, `None` otherwise.
    ///
    /// Widened to `u128` so the full `i64` range is representable.
    pub fn size(&self) -> Option<u128> {
        match self {
            Domain::Int { min, max } if min <= max => {
                Some((i128::from(*max) - i128::from(*min) + 1) as u128)
            }
            Domain::Int { .. } => Some(0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_handle() {
        let v = Var::new(7, VarKind::Bool);
        assert_eq!(v.id(), 7);
        assert!(v.is_bool());
        assert!(!v.is_int());
        assert_eq!(v.to_string(), "b7");
    }

    #[test]
    fn test_var_ordering() {
        let mut vars = vec![
            Var::new(2, VarKind::Int),
            Var::new(0, VarKind::Set),
            Var::new(1, VarKind::Bool),
        ];
        vars.sort();
        let ids: Vec<u32> = vars.iter().map(Var::id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(VarKind::Bool < VarKind::Int);
    }

    #[test]
    fn test_int_domain() {
        let d = Domain::int(0, 10);
        assert_eq!(d.kind(), VarKind::Int);
        assert_eq!(d.size(), Some(11));
        assert!(!d.is_empty());
        assert!(Domain::int(3, 2).is_empty());
        assert_eq!(Domain::int(3, 2).size(), Some(0));
    }

    #[test]
    fn test_full_range_size() {
        let d = Domain::int(i64::MIN, i64::MAX);
        assert_eq!(d.size(), Some(1u128 << 64));
    }

    #[test]
    fn test_set_domain() {
        let d = Domain::set([1], 0..4);
        assert_eq!(d.kind(), VarKind::Set);
        assert!(!d.is_empty());
        assert!(d.size().is_none());

        let bad = Domain::set([9], 0..4);
        assert!(bad.is_empty());
    }
}
