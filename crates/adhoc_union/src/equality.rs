//! Equality and hashing for union values.
//!
//! Equality is index-sensitive: two unions are equal iff they share a shape,
//! the same slot is active, and the payloads are equal under that slot's
//! comparer. Hashing is index-insensitive: only the payload's
//! comparer-driven hash is written, so unions with different active slots
//! may collide in hash while never comparing equal.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::value::UnionValue;

impl PartialEq for UnionValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shape, &other.shape)
            && self.active == other.active
            && self
                .active_slot()
                .comparer()
                .eq_cells(&*self.cell, &*other.cell)
    }
}

impl Eq for UnionValue {}

impl Hash for UnionValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // payload hash only; the discriminant does not participate
        state.write_u64(self.active_slot().comparer().hash_cell(&*self.cell));
    }
}
