//! Tagged union values: construction, access, equality, dispatch.
//!
//! This crate provides the runtime half of ad-hoc unions:
//! - `UnionValue`: the tagged container (discriminant + one erased cell)
//!   with its factories, conversions, discriminant predicates, checked
//!   accessors, and raw value accessor
//! - the equality engine (`PartialEq`/`Eq`/`Hash` driven by per-slot
//!   comparers)
//! - the dispatch engine (`Switch`/`SwitchWith`/`Partial`/`PartialWith`)
//! - `InvalidStateAccess` and the `UnionError` umbrella
//!
//! # Invariants
//!
//! - Exactly one slot is active in every constructed value.
//! - Values are immutable after construction; concurrent reads need no
//!   locking.
//! - Different active slots never compare equal, even when the payloads are
//!   runtime-equal (duplicate-type slots) or both defaults (stateless
//!   slots).
//! - Hashing uses the payload's comparer-driven hash alone; equal values
//!   hash equally, and cross-slot hash collisions are legal.

mod dispatch;
mod equality;
mod errors;
mod value;

pub use adhoc_shape::{
    CellValue, Comparer, DefinitionError, Nullability, PayloadVtable, Primitive, Shape,
    ShapeBuilder, Slot, SlotDef, TypeRef,
};
pub use dispatch::{Partial, PartialWith, Switch, SwitchWith};
pub use errors::{InvalidStateAccess, UnionError};
pub use value::UnionValue;
