//! Error types for union value access.

use adhoc_shape::DefinitionError;
use adhoc_type::TypeRef;
use thiserror::Error;

/// A checked accessor or explicit cast hit an inactive slot.
///
/// The only error in this library whose occurrence depends on runtime
/// state. The message format is fixed: the union's declared type name and
/// the requested slot's declared-type display string, nullable annotations
/// included.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("'{union}' is not of type '{requested}'.")]
pub struct InvalidStateAccess {
    /// The union type name.
    pub union: String,
    /// Display string of the requested slot's declared type.
    pub requested: String,
}

#[cold]
pub(crate) fn invalid_state_access(union: &str, requested: &TypeRef) -> InvalidStateAccess {
    InvalidStateAccess {
        union: union.to_string(),
        requested: requested.to_string(),
    }
}

/// Either kind of union failure.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum UnionError {
    /// Definition-side misuse: unknown slot, wrong payload type.
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    /// The requested slot is not the active one.
    #[error(transparent)]
    Access(#[from] InvalidStateAccess),
}
