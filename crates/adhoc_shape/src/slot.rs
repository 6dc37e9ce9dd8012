//! Slot descriptions and validated slots.
//!
//! `SlotDef` is what the declaring side supplies: a declared type, an
//! optional explicit name, the stateless flag, and a comparer. Building a
//! shape turns each `SlotDef` into a `Slot` with its index, resolved name,
//! and nullability class fixed.

use std::any::{self, Any, TypeId};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use adhoc_type::{Nullability, TypeRef};

use crate::comparer::{CellValue, Comparer};

/// Captured payload-type behavior for one slot.
///
/// Recorded when the slot is defined with a concrete payload type; the only
/// bridge from an erased cell back to typed behavior. Stateless slots also
/// capture a default-constructor thunk for the canonical default cell.
pub struct PayloadVtable {
    type_id: TypeId,
    type_name: &'static str,
    default: Option<fn() -> Arc<CellValue>>,
    debug: fn(&CellValue, &mut fmt::Formatter<'_>) -> fmt::Result,
}

impl PayloadVtable {
    fn of<T: fmt::Debug + Send + Sync + 'static>() -> Self {
        PayloadVtable {
            type_id: TypeId::of::<T>(),
            type_name: any::type_name::<T>(),
            default: None,
            debug: debug_cell::<T>,
        }
    }

    fn with_default<T: Default + fmt::Debug + Send + Sync + 'static>() -> Self {
        PayloadVtable {
            default: Some(default_cell::<T>),
            ..Self::of::<T>()
        }
    }

    /// Runtime type of the stored payload.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Rust name of the stored payload type, for diagnostics.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fresh canonical-default cell, if the slot captured one.
    pub fn default_cell(&self) -> Option<Arc<CellValue>> {
        self.default.map(|make| make())
    }

    /// Format a payload cell with the payload type's `Debug`.
    pub fn fmt_cell(&self, cell: &CellValue, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug)(cell, f)
    }
}

impl fmt::Debug for PayloadVtable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadVtable")
            .field("type_name", &self.type_name)
            .field("stateless_default", &self.default.is_some())
            .finish()
    }
}

fn default_cell<T: Default + Send + Sync + 'static>() -> Arc<CellValue> {
    Arc::new(T::default())
}

fn debug_cell<T: fmt::Debug + 'static>(cell: &CellValue, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match cell.downcast_ref::<T>() {
        Some(v) => write!(f, "{v:?}"),
        None => f.write_str("<payload>"),
    }
}

/// One alternative supplied to a [`ShapeBuilder`](crate::ShapeBuilder).
///
/// The payload type `T` is the Rust type stored in the cell. For a nullable
/// slot that is `Option<U>`; for a stateless slot the supplied payload is
/// discarded at construction and the cell always holds `T::default()`.
pub struct SlotDef {
    declared: TypeRef,
    name: Option<String>,
    stateless: bool,
    comparer: Comparer,
    vtable: PayloadVtable,
}

impl SlotDef {
    /// Payload slot with structural equality.
    pub fn of<T>(declared: TypeRef) -> Self
    where
        T: PartialEq + Hash + fmt::Debug + Send + Sync + 'static,
    {
        SlotDef {
            declared,
            name: None,
            stateless: false,
            comparer: Comparer::of::<T>(),
            vtable: PayloadVtable::of::<T>(),
        }
    }

    /// Payload slot with a custom comparer.
    ///
    /// The only constructor for payload types without `PartialEq`/`Hash`.
    pub fn with<T>(declared: TypeRef, comparer: Comparer) -> Self
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        SlotDef {
            declared,
            name: None,
            stateless: false,
            comparer,
            vtable: PayloadVtable::of::<T>(),
        }
    }

    /// Stateless (marker) slot: the cell always holds `T::default()`.
    pub fn stateless<T>(declared: TypeRef) -> Self
    where
        T: Default + PartialEq + Hash + fmt::Debug + Send + Sync + 'static,
    {
        SlotDef {
            declared,
            name: None,
            stateless: true,
            comparer: Comparer::of::<T>(),
            vtable: PayloadVtable::with_default::<T>(),
        }
    }

    /// Explicit name override.
    ///
    /// Required when name derivation collides, e.g. for duplicate-type
    /// slots.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replace the comparer, keeping everything else.
    #[must_use]
    pub fn comparer(mut self, comparer: Comparer) -> Self {
        self.comparer = comparer;
        self
    }

    pub(crate) fn into_slot(self, index: usize) -> Slot {
        let SlotDef {
            declared,
            name,
            stateless,
            comparer,
            vtable,
        } = self;
        let explicit_name = name.is_some();
        let name = name.unwrap_or_else(|| declared.slot_name());
        let nullability = declared.nullability();
        Slot {
            index,
            declared,
            name,
            explicit_name,
            nullability,
            stateless,
            comparer,
            vtable,
        }
    }
}

/// A validated slot inside a built [`Shape`](crate::Shape).
pub struct Slot {
    index: usize,
    declared: TypeRef,
    name: String,
    explicit_name: bool,
    nullability: Nullability,
    stateless: bool,
    comparer: Comparer,
    vtable: PayloadVtable,
}

impl Slot {
    /// Position of this slot in its shape.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The declared type.
    #[inline]
    pub fn declared(&self) -> &TypeRef {
        &self.declared
    }

    /// Derived-or-explicit slot name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the name was an explicit override.
    #[inline]
    pub fn has_explicit_name(&self) -> bool {
        self.explicit_name
    }

    /// Nullability class of the declared type.
    #[inline]
    pub fn nullability(&self) -> Nullability {
        self.nullability
    }

    /// Whether this is a stateless (marker) slot.
    #[inline]
    pub fn is_stateless(&self) -> bool {
        self.stateless
    }

    /// The slot's equality comparer.
    #[inline]
    pub fn comparer(&self) -> &Comparer {
        &self.comparer
    }

    /// The slot's captured payload vtable.
    #[inline]
    pub fn vtable(&self) -> &PayloadVtable {
        &self.vtable
    }

    /// Whether a payload of runtime type `T` can be stored in this slot.
    #[inline]
    pub fn stores<T: Any>(&self) -> bool {
        self.vtable.type_id == TypeId::of::<T>()
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("declared", &self.declared.to_string())
            .field("nullability", &self.nullability)
            .field("stateless", &self.stateless)
            .finish()
    }
}
