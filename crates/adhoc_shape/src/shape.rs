//! Union shapes: ordered, duplicate-checked slot collections.

use std::any::TypeId;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::errors::{arity_too_small, DefinitionError};
use crate::slot::{Slot, SlotDef};

/// Which slot, if any, accepts implicit conversion from a payload type.
#[derive(Copy, Clone, Debug)]
enum Conversion {
    Unique(usize),
    Ambiguous,
}

/// The immutable definition of one union type.
///
/// A shape is built once through [`ShapeBuilder`] and shared behind an
/// `Arc`; every union value of the type points back at it. All validation
/// happens at build time, so lookups here cannot fail for inputs the
/// generated surface produces.
pub struct Shape {
    name: String,
    slots: SmallVec<[Slot; 4]>,
    by_name: FxHashMap<String, usize>,
    conversions: FxHashMap<TypeId, Conversion>,
}

impl Shape {
    /// Start defining a shape for the union type `name`.
    pub fn builder(name: impl Into<String>) -> ShapeBuilder {
        ShapeBuilder {
            name: name.into(),
            defs: Vec::new(),
        }
    }

    /// The union type name, as used in error messages.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of slots.
    #[inline]
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// All slots, in declaration order.
    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Look up a slot by derived-or-explicit name.
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.by_name.get(name).map(|&i| &self.slots[i])
    }

    /// Look up a slot by index.
    pub fn slot_at(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Resolve the slot receiving implicit conversions from `payload`.
    ///
    /// Fails when no slot stores the type, or when two or more slots do;
    /// duplicate-type slots are constructible only through named factories.
    pub fn conversion_slot(
        &self,
        payload: TypeId,
        payload_name: &'static str,
    ) -> Result<&Slot, DefinitionError> {
        match self.conversions.get(&payload) {
            Some(Conversion::Unique(i)) => Ok(&self.slots[*i]),
            Some(Conversion::Ambiguous) => Err(DefinitionError::AmbiguousConversion {
                union: self.name.clone(),
                got: payload_name,
            }),
            None => Err(DefinitionError::NoSlotForType {
                union: self.name.clone(),
                got: payload_name,
            }),
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("name", &self.name)
            .field("slots", &self.slots)
            .finish()
    }
}

/// Accumulates slot definitions for one shape.
pub struct ShapeBuilder {
    name: String,
    defs: Vec<SlotDef>,
}

impl ShapeBuilder {
    /// Append one slot. Declaration order is slot-index order.
    #[must_use]
    pub fn slot(mut self, def: SlotDef) -> Self {
        self.defs.push(def);
        self
    }

    /// Validate and freeze the shape.
    ///
    /// Checks arity, resolves derived-or-explicit names, rejects name
    /// collisions, and records which payload types admit implicit
    /// conversion.
    #[tracing::instrument(level = "debug", skip_all, fields(union = %self.name, arity = self.defs.len()))]
    pub fn build(self) -> Result<Arc<Shape>, DefinitionError> {
        let ShapeBuilder { name: union, defs } = self;
        if defs.len() < 2 {
            return Err(arity_too_small(&union, defs.len()));
        }

        let mut slots: SmallVec<[Slot; 4]> = SmallVec::with_capacity(defs.len());
        let mut by_name = FxHashMap::default();
        let mut conversions = FxHashMap::default();

        for (index, def) in defs.into_iter().enumerate() {
            let slot = def.into_slot(index);

            match by_name.entry(slot.name().to_string()) {
                Entry::Occupied(prev) => {
                    let first: &Slot = &slots[*prev.get()];
                    return Err(if first.declared() == slot.declared() {
                        DefinitionError::DuplicateTypeWithoutName {
                            union,
                            declared: slot.declared().to_string(),
                            name: slot.name().to_string(),
                        }
                    } else {
                        DefinitionError::DuplicateSlotName {
                            union,
                            name: slot.name().to_string(),
                        }
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(index);
                }
            }

            match conversions.entry(slot.vtable().type_id()) {
                Entry::Occupied(mut entry) => {
                    entry.insert(Conversion::Ambiguous);
                }
                Entry::Vacant(entry) => {
                    entry.insert(Conversion::Unique(index));
                }
            }

            slots.push(slot);
        }

        tracing::debug!(union = %union, arity = slots.len(), "shape built");
        Ok(Arc::new(Shape {
            name: union,
            slots,
            by_name,
            conversions,
        }))
    }
}
