//! Declared-type descriptions for ad-hoc union slots.
//!
//! This crate contains the structural model of a slot's declared type:
//! - `Primitive` for the closed set of host primitives
//! - `TypeRef` for the full type tree (primitives, named/generic types,
//!   arrays with rank, nullable wrappings)
//! - `Nullability` for the storage class of a declared type
//!
//! Two renderings hang off every `TypeRef`:
//! - [`TypeRef::slot_name`] derives the canonical accessor name used by
//!   generated union surfaces (`int` → `Int32`, `int?` → `NullableOfInt32`,
//!   `List<int>` → `ListOfInt32`)
//! - the `Display` impl renders host syntax for diagnostics (`int`,
//!   `string?`, `int[,]`)
//!
//! Name derivation is a pure function of the tree; collisions between
//! distinct trees (`List<int>[]` vs `List<int[]>`) are possible and are the
//! shape layer's problem to reject.

mod primitive;
mod type_ref;

pub use primitive::Primitive;
pub use type_ref::{Nullability, TypeRef};
