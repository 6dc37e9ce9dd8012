//! Definition-side errors.
//!
//! Everything here is raised before any union value of the offending shape
//! exists: shape assembly, factory misuse, and dispatch handler-set misuse
//! are all data-independent and surface deterministically. The one
//! runtime-state-dependent error lives in the value crate.

use thiserror::Error;

/// A shape, factory call, or dispatch handler set is malformed.
///
/// Fatal to the definition that produced it; never recoverable at runtime
/// and never dependent on which slot of a union value happens to be active.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum DefinitionError {
    /// A union needs at least two alternatives.
    #[error("union '{union}' must declare at least two slots, got {arity}")]
    ArityTooSmall { union: String, arity: usize },

    /// Two slots resolved to the same name.
    #[error("union '{union}' declares two slots named '{name}'")]
    DuplicateSlotName { union: String, name: String },

    /// Two slots of the same declared type resolved to the same name.
    #[error(
        "union '{union}' declares type '{declared}' more than once and both \
         occurrences resolve to slot name '{name}'; give each occurrence a \
         distinct explicit name"
    )]
    DuplicateTypeWithoutName {
        union: String,
        declared: String,
        name: String,
    },

    /// A factory, accessor, or handler named a slot the shape does not have.
    #[error("union '{union}' has no slot named '{name}'")]
    UnknownSlot { union: String, name: String },

    /// The supplied payload type does not match the slot's declared payload.
    #[error("slot '{name}' of union '{union}' stores {expected}, got {got}")]
    PayloadTypeMismatch {
        union: String,
        name: String,
        expected: String,
        got: &'static str,
    },

    /// Conversion from a payload type no slot stores.
    #[error("union '{union}' has no slot of type {got}")]
    NoSlotForType { union: String, got: &'static str },

    /// Conversion from a payload type claimed by two or more slots.
    #[error("conversion into union '{union}' from type {got} is ambiguous; use a named factory")]
    AmbiguousConversion { union: String, got: &'static str },

    /// A marker factory was used on a slot that carries a payload.
    #[error("slot '{name}' of union '{union}' is not a stateless slot; construct it with a payload")]
    NotStateless { union: String, name: String },

    /// A dispatch handler set supplied two handlers for one slot.
    #[error("dispatch over union '{union}' supplies two handlers for slot '{name}'")]
    DuplicateHandler { union: String, name: String },

    /// An exhaustive dispatch handler set left slots uncovered.
    #[error("exhaustive dispatch over union '{union}' is missing handlers for: {missing}")]
    MissingHandler { union: String, missing: String },

    /// A dispatch handler's payload type does not match its slot.
    #[error("handler for slot '{name}' of union '{union}' takes {got}, expected {expected}")]
    HandlerTypeMismatch {
        union: String,
        name: String,
        expected: String,
        got: &'static str,
    },
}

/// Arity below the minimum of two.
#[cold]
pub(crate) fn arity_too_small(union: &str, arity: usize) -> DefinitionError {
    DefinitionError::ArityTooSmall {
        union: union.to_string(),
        arity,
    }
}
