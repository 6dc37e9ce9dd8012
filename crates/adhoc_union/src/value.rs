//! The tagged union container and its construction and access paths.
//!
//! A `UnionValue` is one cell plus a discriminant: whichever slot is active,
//! the payload lives in a single erased `Arc` cell, and the slot's captured
//! vtable is the only bridge back to typed behavior. Construction goes
//! through factories only; after that the value is immutable.
//!
//! Nullable handling splits two states that look alike:
//! - `Option<UnionValue>::None`: no union at all, produced when a nullable
//!   *source* is converted and turns out null ([`UnionValue::from_nullable`])
//! - a union whose nullable slot holds `Option::<T>::None`: a real union
//!   carrying a null payload, reachable only through the direct factories

use std::any::{self, TypeId};
use std::fmt;
use std::sync::Arc;

use adhoc_shape::{CellValue, DefinitionError, Shape, Slot};

use crate::errors::{invalid_state_access, UnionError};

/// A value of an ad-hoc union: exactly one slot of its shape is active.
///
/// Cloning is cheap (the cell is shared). The by-value form is always a
/// valid union; the nullable reference form is `Option<UnionValue>`.
#[derive(Clone)]
pub struct UnionValue {
    pub(crate) shape: Arc<Shape>,
    pub(crate) active: usize,
    pub(crate) cell: Arc<CellValue>,
}

impl UnionValue {
    /// Named factory: construct the union with `slot` active.
    ///
    /// One of these per slot is the whole construction surface of a
    /// generated union type; for duplicate-type slots it is the only one.
    /// For a stateless slot the supplied payload is discarded and the cell
    /// holds the type's canonical default.
    pub fn new<T: Send + Sync + 'static>(
        shape: &Arc<Shape>,
        slot: &str,
        payload: T,
    ) -> Result<Self, DefinitionError> {
        let s = named_slot(shape, slot)?;
        check_payload::<T>(shape, s)?;
        Ok(Self::from_slot(shape, s.index(), payload))
    }

    /// Construct a stateless (marker) slot without supplying a payload.
    pub fn stateless(shape: &Arc<Shape>, slot: &str) -> Result<Self, DefinitionError> {
        let s = named_slot(shape, slot)?;
        let cell = s.vtable().default_cell().ok_or_else(|| {
            DefinitionError::NotStateless {
                union: shape.name().to_string(),
                name: s.name().to_string(),
            }
        })?;
        Ok(UnionValue {
            shape: Arc::clone(shape),
            active: s.index(),
            cell,
        })
    }

    /// Implicit-conversion analog: construct from a payload whose type is
    /// claimed by exactly one slot.
    ///
    /// Types claimed by two or more slots were flagged when the shape was
    /// built and are rejected here with `AmbiguousConversion`.
    pub fn from_value<T: Send + Sync + 'static>(
        shape: &Arc<Shape>,
        payload: T,
    ) -> Result<Self, DefinitionError> {
        let slot = shape.conversion_slot(TypeId::of::<T>(), any::type_name::<T>())?;
        Ok(Self::from_slot(shape, slot.index(), payload))
    }

    /// Nullable-source conversion with null propagation.
    ///
    /// A null source yields `Ok(None)`, no union at all, rather than a union
    /// holding a null payload. A non-null source yields a union whose
    /// nullable slot holds `Some(value)`.
    pub fn from_nullable<T: Send + Sync + 'static>(
        shape: &Arc<Shape>,
        source: Option<T>,
    ) -> Result<Option<Self>, DefinitionError> {
        let slot = shape.conversion_slot(
            TypeId::of::<Option<T>>(),
            any::type_name::<Option<T>>(),
        )?;
        match source {
            None => Ok(None),
            Some(v) => Ok(Some(Self::from_slot(shape, slot.index(), Some(v)))),
        }
    }

    fn from_slot<T: Send + Sync + 'static>(shape: &Arc<Shape>, index: usize, payload: T) -> Self {
        let slot = &shape.slots()[index];
        let cell: Arc<CellValue> = if slot.is_stateless() {
            // the supplied value is discarded; the cell holds the default
            slot.vtable()
                .default_cell()
                .unwrap_or_else(|| Arc::new(payload))
        } else {
            Arc::new(payload)
        };
        UnionValue {
            shape: Arc::clone(shape),
            active: index,
            cell,
        }
    }

    /// The shape this value was built against.
    #[inline]
    pub fn shape(&self) -> &Arc<Shape> {
        &self.shape
    }

    /// Index of the active slot.
    #[inline]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The active slot.
    #[inline]
    pub fn active_slot(&self) -> &Slot {
        // active is always a valid index
        &self.shape.slots()[self.active]
    }

    /// Discriminant predicate: is `slot` the active slot?
    ///
    /// Exactly one slot name answers `true` for any union value; unknown
    /// names are never active.
    pub fn is(&self, slot: &str) -> bool {
        self.shape
            .slot(slot)
            .is_some_and(|s| s.index() == self.active)
    }

    /// Checked accessor, and the explicit-cast analog.
    ///
    /// Returns the payload when `slot` is active (the canonical default for
    /// a stateless slot). An inactive slot fails with
    /// [`InvalidStateAccess`](crate::InvalidStateAccess); naming an unknown
    /// slot or requesting the wrong payload type is definition-side misuse.
    pub fn as_slot<T: Send + Sync + 'static>(&self, slot: &str) -> Result<&T, UnionError> {
        let s = named_slot(&self.shape, slot)?;
        check_payload::<T>(&self.shape, s)?;
        if s.index() != self.active {
            return Err(invalid_state_access(self.shape.name(), s.declared()).into());
        }
        match self.cell.downcast_ref::<T>() {
            Some(v) => Ok(v),
            None => Err(DefinitionError::PayloadTypeMismatch {
                union: self.shape.name().to_string(),
                name: s.name().to_string(),
                expected: s.declared().to_string(),
                got: any::type_name::<T>(),
            }
            .into()),
        }
    }

    /// The raw active payload as the erased representation.
    ///
    /// Carries the correct runtime type even for duplicate-type slots.
    #[inline]
    pub fn value(&self) -> &CellValue {
        &*self.cell
    }
}

fn named_slot<'s>(shape: &'s Arc<Shape>, name: &str) -> Result<&'s Slot, DefinitionError> {
    shape.slot(name).ok_or_else(|| DefinitionError::UnknownSlot {
        union: shape.name().to_string(),
        name: name.to_string(),
    })
}

fn check_payload<T: 'static>(shape: &Arc<Shape>, slot: &Slot) -> Result<(), DefinitionError> {
    if slot.stores::<T>() {
        Ok(())
    } else {
        Err(DefinitionError::PayloadTypeMismatch {
            union: shape.name().to_string(),
            name: slot.name().to_string(),
            expected: slot.declared().to_string(),
            got: any::type_name::<T>(),
        })
    }
}

impl fmt::Debug for UnionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.active_slot();
        write!(f, "{}::{}(", self.shape.name(), slot.name())?;
        slot.vtable().fmt_cell(&*self.cell, f)?;
        f.write_str(")")
    }
}

impl fmt::Display for UnionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.active_slot().vtable().fmt_cell(&*self.cell, f)
    }
}
