#![forbid(unsafe_code)]

//! herald: in-process, synchronous notification primitives.
//!
//! # Role in herald
//! This is the facade crate. It re-exports the two independent mechanisms
//! and their shared configuration so applications depend on one crate.
//!
//! | Mechanism | Types | Crate |
//! |-----------|-------|-------|
//! | Event dispatch | [`EventInvoker`], [`EventHandler`], [`Listener`] | `herald-event` |
//! | Observer/observable | [`Observable`], [`Observer`], [`Unsubscriber`], [`FnObserver`] | `herald-observe` |
//! | Misuse discipline | [`DispatchConfig`], [`Discipline`], [`Misuse`] | `herald-core` |
//!
//! Everything is single-threaded (`Rc`-based, `!Send`). Dispatch happens
//! inline on the caller's thread.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use herald::prelude::*;
//!
//! let invoker: EventInvoker<u32, ()> = EventInvoker::with_config(DispatchConfig::strict());
//! let hits = Rc::new(std::cell::Cell::new(0));
//! let on_hit = {
//!     let hits = Rc::clone(&hits);
//!     Listener::new(move |_: &(), n: &u32| hits.set(hits.get() + n))
//! };
//! invoker.handler().add(&on_hit);
//! invoker.raise(&(), &2);
//! assert_eq!(hits.get(), 2);
//!
//! let values: Observable<u32> = Observable::with_config(DispatchConfig::strict());
//! let seen = Rc::new(std::cell::Cell::new(0));
//! let observer = {
//!     let seen = Rc::clone(&seen);
//!     Rc::new(FnObserver::new(move |v: &u32| seen.set(*v)))
//! };
//! let token = values.subscribe(&observer);
//! values.notify_next(&7);
//! drop(token);
//! values.notify_next(&8);
//! assert_eq!(seen.get(), 7);
//! ```

pub use herald_core::{Discipline, DispatchConfig, Misuse};
pub use herald_event::{EventHandler, EventInvoker, Listener};
pub use herald_observe::{FnObserver, Observable, Observer, Unsubscriber};

/// Glob-importable set of the public types.
pub mod prelude {
    pub use crate::{
        Discipline, DispatchConfig, EventHandler, EventInvoker, FnObserver, Listener, Misuse,
        Observable, Observer, Unsubscriber,
    };
}
