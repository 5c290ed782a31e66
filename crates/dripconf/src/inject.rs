//! Values that triggers inject after configuration has run
//!
//! A module can depend on something a trigger builds (a client, a set of
//! defaults) without knowing how configuration is loaded. It declares an
//! [`InjectionSlot`] that starts out holding a [`Placeholder`]; the trigger
//! overwrites the slot from its `configure` step. Reading the slot before
//! that fails loudly with [`Error::PrematureUse`] instead of handing out a
//! half-initialized value.
//!
//! ```
//! use dripconf::{InjectionSlot, Error};
//!
//! static POOL_SIZE: InjectionSlot<u32> = InjectionSlot::new("u32");
//!
//! assert!(matches!(POOL_SIZE.get(), Err(Error::PrematureUse { .. })));
//! POOL_SIZE.inject(8);
//! assert_eq!(*POOL_SIZE.get().unwrap(), 8);
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use crate::{Error, Result};

/// Stand-in for a value that has not been injected yet
///
/// It carries no payload, only an optional name of the type expected to
/// replace it. It is never turned into the real value; whatever holds it
/// gets overwritten instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placeholder {
    expected: Option<&'static str>,
}

impl Placeholder {
    pub const fn new() -> Self {
        Self { expected: None }
    }

    /// A placeholder that documents the type it stands in for.
    pub const fn expecting(type_name: &'static str) -> Self {
        Self {
            expected: Some(type_name),
        }
    }

    pub fn of<T: ?Sized>() -> Self {
        Self::expecting(std::any::type_name::<T>())
    }

    pub fn expected(&self) -> Option<&'static str> {
        self.expected
    }

    /// The error every use of this placeholder produces.
    pub fn premature_use(&self) -> Error {
        Error::PrematureUse {
            expected: self.expected,
        }
    }
}

/// Either a placeholder or the injected value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injected<T> {
    Pending(Placeholder),
    Ready(T),
}

impl<T> Default for Injected<T> {
    fn default() -> Self {
        Self::Pending(Placeholder::new())
    }
}

impl<T> Injected<T> {
    pub const fn pending(expected: &'static str) -> Self {
        Self::Pending(Placeholder::expecting(expected))
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    pub fn get(&self) -> Result<&T> {
        match self {
            Self::Ready(value) => Ok(value),
            Self::Pending(placeholder) => Err(placeholder.premature_use()),
        }
    }

    pub fn get_mut(&mut self) -> Result<&mut T> {
        match self {
            Self::Ready(value) => Ok(value),
            Self::Pending(placeholder) => Err(placeholder.premature_use()),
        }
    }

    pub fn into_inner(self) -> Result<T> {
        match self {
            Self::Ready(value) => Ok(value),
            Self::Pending(placeholder) => Err(placeholder.premature_use()),
        }
    }
}

impl<T> From<T> for Injected<T> {
    fn from(value: T) -> Self {
        Self::Ready(value)
    }
}

/// A shared binding point that a trigger overwrites
///
/// Usable as a `static`. Readers get an `Arc` snapshot of whatever the slot
/// held at the time of the call; injecting again replaces the binding for
/// later readers without touching snapshots already handed out.
#[derive(Debug)]
pub struct InjectionSlot<T> {
    state: RwLock<Injected<Arc<T>>>,
}

impl<T> InjectionSlot<T> {
    pub const fn new(expected: &'static str) -> Self {
        Self {
            state: RwLock::new(Injected::pending(expected)),
        }
    }

    /// Replace whatever the slot holds with `value`.
    pub fn inject(&self, value: T) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = Injected::Ready(Arc::new(value));
    }

    pub fn get(&self) -> Result<Arc<T>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.get().cloned()
    }

    pub fn is_placeholder(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_placeholder()
    }
}
