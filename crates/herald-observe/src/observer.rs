//! Consumer side: the [`Observer`] trait and a closure-backed implementation.

use std::error::Error;
use std::fmt;

/// Receiver of notifications from an [`Observable`](crate::Observable).
///
/// Methods take `&self`: observers are shared through `Rc` and keep their
/// own state behind interior mutability.
pub trait Observer<T> {
    /// The observed subject changed.
    fn on_next(&self, subject: &T);

    /// The observable hit an error handling the subject. The subscription
    /// stays active.
    fn on_error(&self, error: &(dyn Error + 'static));

    /// The observable will send no further notifications.
    fn on_complete(&self);
}

type NextFn<T> = Box<dyn Fn(&T)>;
type ErrorFn = Box<dyn Fn(&(dyn Error + 'static))>;
type CompleteFn = Box<dyn Fn()>;

/// An [`Observer`] assembled from closures.
///
/// Unset callbacks do nothing.
///
/// ```
/// use std::rc::Rc;
/// use herald_observe::{FnObserver, Observable};
///
/// let observable = Observable::new();
/// let printer = Rc::new(
///     FnObserver::new(|value: &i32| println!("next: {value}"))
///         .with_complete(|| println!("done")),
/// );
/// let _token = observable.subscribe(&printer);
/// observable.notify_next(&1);
/// observable.notify_complete();
/// ```
pub struct FnObserver<T> {
    on_next: NextFn<T>,
    on_error: ErrorFn,
    on_complete: CompleteFn,
}

impl<T> fmt::Debug for FnObserver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObserver").finish_non_exhaustive()
    }
}

impl<T: 'static> FnObserver<T> {
    /// Observer reacting to `on_next` only.
    #[must_use]
    pub fn new(on_next: impl Fn(&T) + 'static) -> Self {
        Self {
            on_next: Box::new(on_next),
            on_error: Box::new(|_: &(dyn Error + 'static)| {}),
            on_complete: Box::new(|| {}),
        }
    }

    /// Set the `on_error` callback.
    #[must_use]
    pub fn with_error(mut self, on_error: impl Fn(&(dyn Error + 'static)) + 'static) -> Self {
        self.on_error = Box::new(on_error);
        self
    }

    /// Set the `on_complete` callback.
    #[must_use]
    pub fn with_complete(mut self, on_complete: impl Fn() + 'static) -> Self {
        self.on_complete = Box::new(on_complete);
        self
    }
}

impl<T> Observer<T> for FnObserver<T> {
    fn on_next(&self, subject: &T) {
        (self.on_next)(subject);
    }

    fn on_error(&self, error: &(dyn Error + 'static)) {
        (self.on_error)(error);
    }

    fn on_complete(&self) {
        (self.on_complete)();
    }
}
