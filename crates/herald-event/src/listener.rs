#![forbid(unsafe_code)]

//! Listener callables and registry entries.
//!
//! A [`Listener`] is a shared handle to a callback. Its identity is the
//! allocation of the callback, so every clone of a listener is the same
//! listener, while two listeners built from identical closures are not.
//! Registry entries pair a listener with a state value; entry equality is
//! listener identity plus `St: PartialEq`.

use std::fmt;
use std::rc::Rc;

type ListenerFn<P, S, St> = dyn Fn(&S, &P, &St);

/// A callable notified with `(sender, payload, state)` on every raise.
///
/// `P` is the payload type, `S` the sender (publisher) type and `St` the
/// state registered alongside the listener.
pub struct Listener<P, S, St = ()> {
    callback: Rc<ListenerFn<P, S, St>>,
}

// Manual Clone: shares the same callback, no bounds on P/S/St.
impl<P, S, St> Clone for Listener<P, S, St> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<P, S, St> PartialEq for Listener<P, S, St> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<P, S, St> Eq for Listener<P, S, St> {}

impl<P, S, St> fmt::Debug for Listener<P, S, St> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("callback", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

impl<P: 'static, S: 'static, St: 'static> Listener<P, S, St> {
    /// Listener that ignores its registered state.
    #[must_use]
    pub fn new(callback: impl Fn(&S, &P) + 'static) -> Self {
        let callback: Rc<ListenerFn<P, S, St>> =
            Rc::new(move |sender: &S, payload: &P, _state: &St| callback(sender, payload));
        Self { callback }
    }

    /// Listener that receives the state it was registered with.
    #[must_use]
    pub fn with_state(callback: impl Fn(&S, &P, &St) + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }
}

impl<P, S, St> Listener<P, S, St> {
    #[inline]
    pub(crate) fn call(&self, sender: &S, payload: &P, state: &St) {
        (self.callback)(sender, payload, state);
    }
}

/// One registration: a listener and the state it was added with.
pub(crate) struct Entry<P, S, St> {
    pub(crate) listener: Listener<P, S, St>,
    pub(crate) state: St,
}

impl<P, S, St: PartialEq> Entry<P, S, St> {
    #[inline]
    pub(crate) fn matches(&self, listener: &Listener<P, S, St>, state: &St) -> bool {
        self.listener == *listener && self.state == *state
    }
}
