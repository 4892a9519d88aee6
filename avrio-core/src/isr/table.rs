//! Interrupt handler registration
//!
//! Each interrupt vector has at most one handler. The table is filled at
//! startup, then the vector stubs of the port call [`VectorTable::invoke`].

use super::vector::Vector;

/// Errors when binding a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindError {
    /// The vector already has a handler
    AlreadyBound(Vector),
}

/// Code run when an interrupt fires
///
/// Runs in interrupt context with interrupts disabled: keep it short, touch
/// shared state only through interrupt-safe types.
pub trait InterruptHandler {
    fn on_interrupt(&self);
}

/// Binds one method of a target object to a vector
///
/// The method is called through a plain function pointer; no trait object
/// is involved on the target side.
pub struct MethodHandler<'a, H> {
    target: &'a H,
    method: fn(&H),
}

impl<'a, H> MethodHandler<'a, H> {
    pub const fn new(target: &'a H, method: fn(&H)) -> Self {
        Self { target, method }
    }
}

impl<H> InterruptHandler for MethodHandler<'_, H> {
    fn on_interrupt(&self) {
        (self.method)(self.target)
    }
}

/// Binds a free function to a vector
#[derive(Clone, Copy)]
pub struct FunctionHandler(pub fn());

impl InterruptHandler for FunctionHandler {
    fn on_interrupt(&self) {
        (self.0)()
    }
}

/// One optional handler per interrupt vector
pub struct VectorTable<'a> {
    slots: [Option<&'a dyn InterruptHandler>; Vector::COUNT],
}

impl<'a> VectorTable<'a> {
    /// Create a table with nothing bound
    pub const fn new() -> Self {
        Self {
            slots: [None; Vector::COUNT],
        }
    }

    /// Bind `handler` to `vector`
    pub fn bind(
        &mut self,
        vector: Vector,
        handler: &'a dyn InterruptHandler,
    ) -> Result<(), BindError> {
        let slot = &mut self.slots[vector.index()];
        if slot.is_some() {
            return Err(BindError::AlreadyBound(vector));
        }
        *slot = Some(handler);
        Ok(())
    }

    /// Bind several handlers, all or nothing
    ///
    /// Fails without binding anything if one of the vectors is already
    /// bound or appears twice in `bindings`.
    pub fn bind_all(
        &mut self,
        bindings: &[(Vector, &'a dyn InterruptHandler)],
    ) -> Result<(), BindError> {
        for (i, (vector, _)) in bindings.iter().enumerate() {
            if self.is_bound(*vector) || bindings[..i].iter().any(|(v, _)| v == vector) {
                return Err(BindError::AlreadyBound(*vector));
            }
        }
        for (vector, handler) in bindings {
            self.slots[vector.index()] = Some(*handler);
        }
        Ok(())
    }

    /// Remove the handler of `vector`, returning it
    pub fn unbind(&mut self, vector: Vector) -> Option<&'a dyn InterruptHandler> {
        self.slots[vector.index()].take()
    }

    pub fn is_bound(&self, vector: Vector) -> bool {
        self.slots[vector.index()].is_some()
    }

    /// Run the handler of `vector`
    ///
    /// Returns `false` if nothing is bound; such a spurious interrupt is
    /// otherwise ignored.
    pub fn invoke(&self, vector: Vector) -> bool {
        match self.slots[vector.index()] {
            Some(handler) => {
                handler.on_interrupt();
                true
            }
            None => false,
        }
    }

    /// Number of bound vectors
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VectorTable<'_> {
    fn default() -> Self {
        Self::new()
    }
}
