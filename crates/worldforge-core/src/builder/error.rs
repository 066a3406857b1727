//! Builder error types.

use super::association::AssociationMismatch;
use crate::error::Error;
use std::fmt;
use thiserror::Error;

/// Scope in which a name must be unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameScope {
    /// Class names within an assembly.
    Assembly(String),
    /// Member names within a class (fully qualified class name).
    Class(String),
    /// Assembly names committed to the metadata store.
    Store,
}

impl fmt::Display for NameScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameScope::Assembly(name) => write!(f, "assembly {}", name),
            NameScope::Class(name) => write!(f, "class {}", name),
            NameScope::Store => write!(f, "metadata store"),
        }
    }
}

/// Errors raised by schema construction.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A class or member name collides within its scope.
    #[error("duplicate name {name} in {scope}")]
    DuplicateName {
        /// Where the name must be unique.
        scope: NameScope,
        /// The colliding name.
        name: String,
    },

    /// A target or base type resolves neither to an external type nor to a class.
    #[error("class {class} references unresolved type {target}")]
    UnresolvedReference {
        /// Class the reference was declared on.
        class: String,
        /// The unresolved target.
        target: String,
    },

    /// A data type name does not map to a supported scalar type.
    #[error("unsupported data type: {0}")]
    InvalidKind(String),

    /// Assigning the base type would close an inheritance cycle.
    #[error("inheritance cycle: {class} cannot derive from {base}")]
    CyclicInheritance {
        /// Class whose base was being set.
        class: String,
        /// Requested base type.
        base: String,
    },

    /// The two sides of a relation carry different association names.
    #[error("association name mismatch: {0}")]
    AssociationNameMismatch(AssociationMismatch),

    /// The metadata store failed.
    #[error("metadata store error: {0}")]
    Store(#[from] Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let duplicate = BuildError::DuplicateName {
            scope: NameScope::Class("Crm.Person".into()),
            name: "Name".into(),
        };
        assert_eq!(duplicate.to_string(), "duplicate name Name in class Crm.Person");

        let reopened = BuildError::DuplicateName {
            scope: NameScope::Store,
            name: "Crm".into(),
        };
        assert_eq!(reopened.to_string(), "duplicate name Crm in metadata store");

        let cyclic = BuildError::CyclicInheritance {
            class: "Crm.A".into(),
            base: "Crm.B".into(),
        };
        assert_eq!(cyclic.to_string(), "inheritance cycle: Crm.A cannot derive from Crm.B");
    }
}
