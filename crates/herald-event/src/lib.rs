#![forbid(unsafe_code)]

//! Typed event dispatch with a restricted subscriber capability.
//!
//! A publisher owns an [`EventInvoker`] privately and exposes the
//! [`EventHandler`] it produces. Subscribers can add and remove
//! [`Listener`]s through the handler; only the publisher can raise.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use herald_event::{EventHandler, EventInvoker, Listener};
//!
//! struct Counter {
//!     pub count_reached: EventHandler<u32, Counter>,
//!     count: Cell<u32>,
//!     invoker: EventInvoker<u32, Counter>,
//! }
//!
//! impl Counter {
//!     fn new() -> Self {
//!         let invoker = EventInvoker::new();
//!         Self {
//!             count_reached: invoker.handler(),
//!             count: Cell::new(0),
//!             invoker,
//!         }
//!     }
//!
//!     fn add_one(&self) {
//!         let count = self.count.get() + 1;
//!         self.count.set(count);
//!         if count >= 3 {
//!             self.invoker.raise(self, &count);
//!         }
//!     }
//! }
//!
//! let counter = Counter::new();
//! let reset: Listener<u32, Counter> = Listener::new(|counter: &Counter, _| counter.count.set(0));
//! counter.count_reached.add(&reset);
//!
//! for _ in 0..6 {
//!     counter.add_one();
//! }
//! assert_eq!(counter.count.get(), 0);
//! ```
//!
//! # Invariants
//!
//! 1. Dispatch order is newest first.
//! 2. Duplicate registrations are kept; removal deletes all matches.
//! 3. Dispatch runs over a snapshot, so listeners may mutate the registry.

mod handler;
mod invoker;
mod listener;

pub use handler::EventHandler;
pub use invoker::EventInvoker;
pub use listener::Listener;
