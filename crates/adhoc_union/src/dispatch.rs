//! Exhaustive and partial dispatch over union values.
//!
//! Four surfaces, mirroring the generated call-site forms:
//! - [`Switch`]: exhaustive, one typed arm per slot
//! - [`SwitchWith`]: exhaustive with a threaded context value
//! - [`Partial`]: any subset of arms plus a mandatory default over the raw
//!   payload
//! - [`PartialWith`]: partial with a threaded context value
//!
//! The action forms (`switch*`) are the function forms with `()` results.
//! Every arm is checked against its slot's payload type when it is
//! registered, so running a handler set never fails on a downcast. What can
//! fail (unknown slots, duplicate arms, uncovered slots) is definition-side
//! misuse, reported as [`DefinitionError`] by `run`.
//!
//! Dispatch is pure: a synchronous function of the value and the handler
//! set, evaluated on the caller's thread.

use std::any::TypeId;

use adhoc_shape::{CellValue, DefinitionError, Slot};

use crate::value::UnionValue;

type Handler<'u, C, R> = Box<dyn Fn(&C, &CellValue) -> R + 'u>;

/// Arm storage shared by all four dispatch surfaces.
struct Arms<'u, C, R> {
    value: &'u UnionValue,
    arms: Vec<Option<Handler<'u, C, R>>>,
    error: Option<DefinitionError>,
}

impl<'u, C, R> Arms<'u, C, R> {
    fn new(value: &'u UnionValue) -> Self {
        let mut arms = Vec::new();
        arms.resize_with(value.shape().arity(), || None);
        Arms {
            value,
            arms,
            error: None,
        }
    }

    fn add<T: 'static>(&mut self, slot: &str, f: impl Fn(&C, &T) -> R + 'u) {
        if self.error.is_some() {
            return;
        }
        let shape = self.value.shape();
        let Some(s) = shape.slot(slot) else {
            self.error = Some(DefinitionError::UnknownSlot {
                union: shape.name().to_string(),
                name: slot.to_string(),
            });
            return;
        };
        if s.vtable().type_id() != TypeId::of::<T>() {
            self.error = Some(DefinitionError::HandlerTypeMismatch {
                union: shape.name().to_string(),
                name: s.name().to_string(),
                expected: s.declared().to_string(),
                got: std::any::type_name::<T>(),
            });
            return;
        }
        let index = s.index();
        if self.arms[index].is_some() {
            self.error = Some(DefinitionError::DuplicateHandler {
                union: shape.name().to_string(),
                name: s.name().to_string(),
            });
            return;
        }
        self.arms[index] = Some(Box::new(move |ctx, cell| {
            match cell.downcast_ref::<T>() {
                Some(v) => f(ctx, v),
                // the arm's payload type was checked at registration
                None => unreachable!("arm payload type checked at registration"),
            }
        }));
    }

    fn missing(&self) -> Option<DefinitionError> {
        let shape = self.value.shape();
        let missing: Vec<&str> = shape
            .slots()
            .iter()
            .filter(|s| self.arms[s.index()].is_none())
            .map(Slot::name)
            .collect();
        if missing.is_empty() {
            None
        } else {
            Some(DefinitionError::MissingHandler {
                union: shape.name().to_string(),
                missing: missing.join(", "),
            })
        }
    }

    fn run_exhaustive(self, ctx: &C) -> Result<R, DefinitionError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if let Some(err) = self.missing() {
            return Err(err);
        }
        let active = self.value.active_index();
        match self.arms.into_iter().nth(active).flatten() {
            Some(arm) => Ok(arm(ctx, self.value.value())),
            // exhaustiveness was just checked
            None => unreachable!("active slot has an arm after the exhaustiveness check"),
        }
    }

    fn run_partial(
        self,
        ctx: &C,
        default: impl FnOnce(&C, &CellValue) -> R,
    ) -> Result<R, DefinitionError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let active = self.value.active_index();
        match self.arms.into_iter().nth(active).flatten() {
            Some(arm) => Ok(arm(ctx, self.value.value())),
            None => Ok(default(ctx, self.value.value())),
        }
    }
}

/// Exhaustive dispatch without threaded context.
pub struct Switch<'u, R> {
    inner: Arms<'u, (), R>,
}

impl<'u, R> Switch<'u, R> {
    /// Register the arm for `slot`.
    #[must_use]
    pub fn arm<T: 'static>(mut self, slot: &str, f: impl Fn(&T) -> R + 'u) -> Self {
        self.inner.add::<T>(slot, move |_ctx, v| f(v));
        self
    }

    /// Invoke exactly the active slot's arm.
    ///
    /// Fails when the handler set does not cover every slot exactly once.
    pub fn run(self) -> Result<R, DefinitionError> {
        self.inner.run_exhaustive(&())
    }
}

/// Exhaustive dispatch with a threaded context value.
///
/// The context is passed unchanged to whichever arm fires, so call sites
/// can avoid capturing closures.
pub struct SwitchWith<'u, C, R> {
    inner: Arms<'u, C, R>,
}

impl<'u, C, R> SwitchWith<'u, C, R> {
    /// Register the arm for `slot`.
    #[must_use]
    pub fn arm<T: 'static>(mut self, slot: &str, f: impl Fn(&C, &T) -> R + 'u) -> Self {
        self.inner.add::<T>(slot, f);
        self
    }

    /// Invoke exactly the active slot's arm with the context.
    pub fn run(self, ctx: &C) -> Result<R, DefinitionError> {
        self.inner.run_exhaustive(ctx)
    }
}

/// Partial dispatch without threaded context.
pub struct Partial<'u, R> {
    inner: Arms<'u, (), R>,
    default: Box<dyn Fn(&CellValue) -> R + 'u>,
}

impl<'u, R> Partial<'u, R> {
    /// Register the arm for `slot`. Any subset of slots may be covered.
    #[must_use]
    pub fn arm<T: 'static>(mut self, slot: &str, f: impl Fn(&T) -> R + 'u) -> Self {
        self.inner.add::<T>(slot, move |_ctx, v| f(v));
        self
    }

    /// Invoke the active slot's arm, or the default over the raw payload.
    pub fn run(self) -> Result<R, DefinitionError> {
        let default = self.default;
        self.inner.run_partial(&(), |_ctx, raw| default(raw))
    }
}

/// Partial dispatch with a threaded context value.
pub struct PartialWith<'u, C, R> {
    inner: Arms<'u, C, R>,
    default: Box<dyn Fn(&C, &CellValue) -> R + 'u>,
}

impl<'u, C, R> PartialWith<'u, C, R> {
    /// Register the arm for `slot`. Any subset of slots may be covered.
    #[must_use]
    pub fn arm<T: 'static>(mut self, slot: &str, f: impl Fn(&C, &T) -> R + 'u) -> Self {
        self.inner.add::<T>(slot, f);
        self
    }

    /// Invoke the active slot's arm, or the default, with the context.
    pub fn run(self, ctx: &C) -> Result<R, DefinitionError> {
        let default = self.default;
        self.inner.run_partial(ctx, |c, raw| default(c, raw))
    }
}

impl UnionValue {
    /// Exhaustive value-returning dispatch.
    pub fn map<R>(&self) -> Switch<'_, R> {
        Switch {
            inner: Arms::new(self),
        }
    }

    /// Exhaustive side-effecting dispatch.
    pub fn switch(&self) -> Switch<'_, ()> {
        self.map()
    }

    /// Exhaustive value-returning dispatch with a threaded context.
    pub fn map_with<C, R>(&self) -> SwitchWith<'_, C, R> {
        SwitchWith {
            inner: Arms::new(self),
        }
    }

    /// Exhaustive side-effecting dispatch with a threaded context.
    pub fn switch_with<C>(&self) -> SwitchWith<'_, C, ()> {
        self.map_with()
    }

    /// Partial value-returning dispatch; `default` receives the raw payload.
    pub fn map_partially<'u, R>(
        &'u self,
        default: impl Fn(&CellValue) -> R + 'u,
    ) -> Partial<'u, R> {
        Partial {
            inner: Arms::new(self),
            default: Box::new(default),
        }
    }

    /// Partial side-effecting dispatch; `default` receives the raw payload.
    pub fn switch_partially<'u>(&'u self, default: impl Fn(&CellValue) + 'u) -> Partial<'u, ()> {
        self.map_partially(default)
    }

    /// Partial value-returning dispatch with a threaded context.
    pub fn map_partially_with<'u, C, R>(
        &'u self,
        default: impl Fn(&C, &CellValue) -> R + 'u,
    ) -> PartialWith<'u, C, R> {
        PartialWith {
            inner: Arms::new(self),
            default: Box::new(default),
        }
    }

    /// Partial side-effecting dispatch with a threaded context.
    pub fn switch_partially_with<'u, C>(
        &'u self,
        default: impl Fn(&C, &CellValue) + 'u,
    ) -> PartialWith<'u, C, ()> {
        self.map_partially_with(default)
    }
}
