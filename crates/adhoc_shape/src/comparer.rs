//! Erased per-slot equality comparers.
//!
//! A `Comparer` drives both `==` and hashing for union values whose active
//! slot it belongs to. The default is the payload type's own structural
//! equality; string slots can opt into ordinal or ordinal-ignore-case
//! semantics, and any slot can supply fully custom closures.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// The erased payload cell type.
pub type CellValue = dyn Any + Send + Sync;

type EqFn = Box<dyn Fn(&CellValue, &CellValue) -> bool + Send + Sync>;
type HashFn = Box<dyn Fn(&CellValue) -> u64 + Send + Sync>;

/// Equality comparer for one slot's payloads.
///
/// The hash closure must be consistent with the equality closure: payloads
/// that compare equal must hash equally. The built-in constructors all
/// satisfy this.
pub struct Comparer {
    eq: EqFn,
    hash: HashFn,
}

impl Comparer {
    /// Structural comparer: the payload type's own `PartialEq` and `Hash`.
    pub fn of<T: PartialEq + Hash + 'static>() -> Self {
        Comparer {
            eq: Box::new(|a, b| {
                match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
                    (Some(a), Some(b)) => a == b,
                    _ => false,
                }
            }),
            hash: Box::new(|v| v.downcast_ref::<T>().map_or(0, fx_hash)),
        }
    }

    /// Custom comparer from typed closures.
    pub fn with<T: 'static>(
        eq: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
        hash: impl Fn(&T) -> u64 + Send + Sync + 'static,
    ) -> Self {
        Comparer {
            eq: Box::new(move |a, b| {
                match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
                    (Some(a), Some(b)) => eq(a, b),
                    _ => false,
                }
            }),
            hash: Box::new(move |v| v.downcast_ref::<T>().map_or(0, &hash)),
        }
    }

    /// Case-sensitive string comparer.
    pub fn ordinal() -> Self {
        Self::of::<String>()
    }

    /// Case-insensitive string comparer.
    ///
    /// Lowercases for both equality and hashing, keeping equal strings on
    /// equal hashes.
    pub fn ordinal_ignore_case() -> Self {
        Self::with::<String>(
            |a, b| a.to_lowercase() == b.to_lowercase(),
            |v| fx_hash(&v.to_lowercase()),
        )
    }

    /// Compare two payload cells.
    #[inline]
    pub fn eq_cells(&self, a: &CellValue, b: &CellValue) -> bool {
        (self.eq)(a, b)
    }

    /// Hash one payload cell.
    #[inline]
    pub fn hash_cell(&self, v: &CellValue) -> u64 {
        (self.hash)(v)
    }
}

impl fmt::Debug for Comparer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparer(..)")
    }
}

fn fx_hash<T: Hash + ?Sized>(v: &T) -> u64 {
    let mut hasher = FxHasher::default();
    v.hash(&mut hasher);
    hasher.finish()
}
