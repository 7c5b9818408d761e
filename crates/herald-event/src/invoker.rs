#![forbid(unsafe_code)]

//! Owning side of an event: the listener registry and `raise`.
//!
//! # Design
//!
//! [`EventInvoker`] owns the registry in reference-counted storage
//! (`Rc<RefCell<..>>`) and is the only type that can dispatch. The
//! [`EventHandler`] it hands out holds a `Weak` to the same storage and can
//! only add or remove entries.
//!
//! ```text
//! Publisher
//! ├── invoker: EventInvoker   (private) ──► Rc<RefCell<Registry>>
//! └── handler: EventHandler   (public)  ──► Weak<RefCell<Registry>>
//! ```
//!
//! # Invariants
//!
//! 1. Entries are inserted at the front; `raise` walks front to back, so the
//!    most recently added listener runs first.
//! 2. Each entry present when `raise` starts is invoked exactly once.
//! 3. No registry borrow is held while a listener runs.
//! 4. Dropping the invoker drops every entry; no listener runs afterwards.
//!
//! # Failure Modes
//!
//! - **Reentrant add/remove**: allowed. `raise` dispatches over a snapshot,
//!   so entries added during a raise wait for the next one, and entries
//!   removed during a raise still run in the current one.
//! - **Reentrant raise**: allowed; each nested raise takes its own snapshot.
//! - **Panicking listener**: the panic propagates to the caller of `raise`;
//!   the registry is left unchanged.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use herald_core::DispatchConfig;
use tracing::trace;

use crate::handler::EventHandler;
use crate::listener::Entry;

/// Shared listener storage behind an invoker and its handlers.
pub(crate) struct Registry<P, S, St> {
    /// Newest entry at the front.
    pub(crate) entries: VecDeque<Rc<Entry<P, S, St>>>,
}

impl<P, S, St> Registry<P, S, St> {
    fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Copy out the current entries so dispatch can run without a borrow.
    fn snapshot(&self) -> Vec<Rc<Entry<P, S, St>>> {
        self.entries.iter().cloned().collect()
    }
}

pub(crate) type SharedRegistry<P, S, St> = Rc<RefCell<Registry<P, S, St>>>;

/// Owner of an event's listener registry.
///
/// Keep the invoker private to the publishing type and expose
/// [`handler`](Self::handler) instead; only the invoker can
/// [`raise`](Self::raise).
///
/// Not `Clone`: each invoker is a distinct registry.
pub struct EventInvoker<P, S, St = ()> {
    registry: SharedRegistry<P, S, St>,
    config: DispatchConfig,
}

impl<P, S, St> fmt::Debug for EventInvoker<P, S, St> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventInvoker")
            .field("listener_count", &self.listener_count())
            .field("config", &self.config)
            .finish()
    }
}

impl<P, S, St> Default for EventInvoker<P, S, St> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, S, St> EventInvoker<P, S, St> {
    /// Create an invoker with the environment-derived configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    /// Create an invoker with an explicit configuration.
    ///
    /// Handlers obtained from this invoker inherit `config`.
    #[must_use]
    pub fn with_config(config: DispatchConfig) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::new())),
            config,
        }
    }

    /// The configuration captured at construction.
    #[must_use]
    pub fn config(&self) -> DispatchConfig {
        self.config
    }

    /// A handler bound to this invoker.
    ///
    /// Usually called once, when the publisher is built, to produce the
    /// publicly exposed capability. Every handler returned refers to the same
    /// registry.
    #[must_use]
    pub fn handler(&self) -> EventHandler<P, S, St> {
        EventHandler::bind(Rc::downgrade(&self.registry), self.config)
    }

    /// Invoke every registered listener once with `sender` and `payload`.
    ///
    /// Listeners run inline, newest first, each with the state it was
    /// registered with.
    pub fn raise(&self, sender: &S, payload: &P) {
        let snapshot = self.registry.borrow().snapshot();
        if snapshot.is_empty() {
            return;
        }
        trace!(listeners = snapshot.len(), "raising event");
        for entry in &snapshot {
            entry.listener.call(sender, payload, &entry.state);
        }
    }

    /// Number of registered entries (duplicates counted).
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.borrow().entries.is_empty()
    }

    /// Drop every registered entry.
    ///
    /// Entries are dropped after the registry is released, so a listener
    /// whose captures touch a handler on drop sees the empty registry.
    pub fn clear(&self) {
        let removed = std::mem::take(&mut self.registry.borrow_mut().entries);
        tracing::debug!(removed = removed.len(), "listeners cleared");
        drop(removed);
    }
}
