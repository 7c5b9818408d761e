#![forbid(unsafe_code)]

//! Observer/observable notifications with scoped unsubscription.
//!
//! - [`Observer`]: the consumer trait (`on_next`, `on_error`, `on_complete`).
//! - [`Observable`]: the registry a subject owner embeds and notifies.
//! - [`Unsubscriber`]: RAII token ending one subscription on drop.
//! - [`FnObserver`]: an observer built from closures.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use herald_observe::{Observable, Observer};
//!
//! #[derive(Default)]
//! struct Latest(RefCell<Option<String>>);
//!
//! impl Observer<String> for Latest {
//!     fn on_next(&self, subject: &String) {
//!         *self.0.borrow_mut() = Some(subject.clone());
//!     }
//!     fn on_error(&self, _error: &(dyn std::error::Error + 'static)) {}
//!     fn on_complete(&self) {}
//! }
//!
//! let names: Observable<String> = Observable::new();
//! let latest = Rc::new(Latest::default());
//! {
//!     let _token = names.subscribe(&latest);
//!     names.notify_next(&"ada".to_string());
//! }
//! names.notify_next(&"grace".to_string());
//! assert_eq!(latest.0.borrow().as_deref(), Some("ada"));
//! ```
//!
//! # Subscription lifecycle
//!
//! ```text
//! Active ──notify_complete──► Completed   (terminal)
//!    │
//!    └──token drop / unsubscribe──► Unsubscribed   (terminal)
//! ```

mod observable;
mod observer;
mod unsubscriber;

pub use observable::Observable;
pub use observer::{FnObserver, Observer};
pub use unsubscriber::Unsubscriber;
