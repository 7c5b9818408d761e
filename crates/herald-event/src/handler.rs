#![forbid(unsafe_code)]

//! Subscriber-facing capability: add and remove listeners, never raise.
//!
//! # Invariants
//!
//! 1. A handler is bound to exactly one invoker for its whole life.
//! 2. Adding never deduplicates: each add creates a new entry at the front.
//! 3. Removing deletes **every** entry equal to `(listener, state)`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Dangling handler | invoker dropped | `try_*` return [`Misuse::InvokerDropped`]; `add*`/`remove*` apply the configured discipline |
//! | No match | remove of an unregistered pair | returns 0, not an error |
//! | Read on dangling handler | invoker dropped | `has_listeners()` is false, `listener_count()` is 0 |
//! | Reentrant drop | removed state touches the handler in `Drop` | runs after the registry borrow is released |

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::ops::{AddAssign, SubAssign};
use std::rc::{Rc, Weak};

use herald_core::{DispatchConfig, Misuse};
use tracing::debug;

use crate::invoker::Registry;
use crate::listener::{Entry, Listener};

/// Restricted view of an [`EventInvoker`](crate::EventInvoker).
///
/// Cloning a handler yields another view of the same registry.
pub struct EventHandler<P, S, St = ()> {
    registry: Weak<RefCell<Registry<P, S, St>>>,
    config: DispatchConfig,
}

// Manual Clone: shares the same registry, no bounds on P/S/St.
impl<P, S, St> Clone for EventHandler<P, S, St> {
    fn clone(&self) -> Self {
        Self {
            registry: Weak::clone(&self.registry),
            config: self.config,
        }
    }
}

impl<P, S, St> fmt::Debug for EventHandler<P, S, St> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("bound", &self.is_bound())
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

impl<P, S, St> EventHandler<P, S, St> {
    pub(crate) fn bind(
        registry: Weak<RefCell<Registry<P, S, St>>>,
        config: DispatchConfig,
    ) -> Self {
        Self { registry, config }
    }

    fn upgrade(&self, operation: &'static str) -> Result<Rc<RefCell<Registry<P, S, St>>>, Misuse> {
        self.registry
            .upgrade()
            .ok_or(Misuse::InvokerDropped { operation })
    }

    /// Whether the invoker this handler was bound to is still alive.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.registry.strong_count() > 0
    }

    /// Whether at least one listener is registered.
    ///
    /// Use it to skip building a payload nobody will see.
    #[must_use]
    pub fn has_listeners(&self) -> bool {
        self.listener_count() > 0
    }

    /// Number of registered entries (duplicates counted).
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry
            .upgrade()
            .map_or(0, |registry| registry.borrow().entries.len())
    }

    /// Register `listener` with `state` at the front of the dispatch order.
    ///
    /// # Errors
    ///
    /// [`Misuse::InvokerDropped`] if the invoker no longer exists.
    pub fn try_add_with_state(
        &self,
        listener: &Listener<P, S, St>,
        state: St,
    ) -> Result<(), Misuse> {
        let registry = self.upgrade("add")?;
        let mut registry = registry.borrow_mut();
        registry.entries.push_front(Rc::new(Entry {
            listener: listener.clone(),
            state,
        }));
        debug!(listeners = registry.entries.len(), "listener added");
        Ok(())
    }

    /// Register `listener` with `state`; misuse follows the configured
    /// discipline.
    ///
    /// # Panics
    ///
    /// Panics under strict discipline if the invoker was dropped.
    #[track_caller]
    pub fn add_with_state(&self, listener: &Listener<P, S, St>, state: St) {
        if let Err(misuse) = self.try_add_with_state(listener, state) {
            self.config.report(misuse);
        }
    }
}

impl<P, S, St: PartialEq> EventHandler<P, S, St> {
    /// Remove every entry equal to `(listener, state)`, returning how many
    /// were removed.
    ///
    /// # Errors
    ///
    /// [`Misuse::InvokerDropped`] if the invoker no longer exists.
    pub fn try_remove_with_state(
        &self,
        listener: &Listener<P, S, St>,
        state: &St,
    ) -> Result<usize, Misuse> {
        let shared = self.upgrade("remove")?;
        // Removed entries are dropped after the borrow ends: their state may
        // call back into this handler from `Drop`.
        let removed = {
            let mut registry = shared.borrow_mut();
            let (removed, kept): (VecDeque<_>, VecDeque<_>) = std::mem::take(&mut registry.entries)
                .into_iter()
                .partition(|entry| entry.matches(listener, state));
            registry.entries = kept;
            debug!(
                removed = removed.len(),
                listeners = registry.entries.len(),
                "listener removed"
            );
            removed
        };
        Ok(removed.len())
    }

    /// Remove every entry equal to `(listener, state)`; misuse follows the
    /// configured discipline and removes nothing.
    ///
    /// # Panics
    ///
    /// Panics under strict discipline if the invoker was dropped.
    #[track_caller]
    pub fn remove_with_state(&self, listener: &Listener<P, S, St>, state: &St) -> usize {
        match self.try_remove_with_state(listener, state) {
            Ok(removed) => removed,
            Err(misuse) => {
                self.config.report(misuse);
                0
            }
        }
    }
}

impl<P, S, St: Default> EventHandler<P, S, St> {
    /// Register `listener` with the default state.
    ///
    /// # Errors
    ///
    /// [`Misuse::InvokerDropped`] if the invoker no longer exists.
    pub fn try_add(&self, listener: &Listener<P, S, St>) -> Result<(), Misuse> {
        self.try_add_with_state(listener, St::default())
    }

    /// Register `listener` with the default state.
    ///
    /// # Panics
    ///
    /// Panics under strict discipline if the invoker was dropped.
    #[track_caller]
    pub fn add(&self, listener: &Listener<P, S, St>) {
        self.add_with_state(listener, St::default());
    }
}

impl<P, S, St: Default + PartialEq> EventHandler<P, S, St> {
    /// Remove every entry of `listener` registered with the default state.
    ///
    /// # Errors
    ///
    /// [`Misuse::InvokerDropped`] if the invoker no longer exists.
    pub fn try_remove(&self, listener: &Listener<P, S, St>) -> Result<usize, Misuse> {
        self.try_remove_with_state(listener, &St::default())
    }

    /// Remove every entry of `listener` registered with the default state.
    ///
    /// # Panics
    ///
    /// Panics under strict discipline if the invoker was dropped.
    #[track_caller]
    pub fn remove(&self, listener: &Listener<P, S, St>) -> usize {
        self.remove_with_state(listener, &St::default())
    }
}

impl<P, S, St: Default> AddAssign<&Listener<P, S, St>> for EventHandler<P, S, St> {
    #[track_caller]
    fn add_assign(&mut self, listener: &Listener<P, S, St>) {
        self.add(listener);
    }
}

impl<P, S, St: Default + PartialEq> SubAssign<&Listener<P, S, St>> for EventHandler<P, S, St> {
    #[track_caller]
    fn sub_assign(&mut self, listener: &Listener<P, S, St>) {
        self.remove(listener);
    }
}
