//! Scoped subscription token.
//!
//! An [`Unsubscriber`] ends its subscription exactly once: on
//! [`unsubscribe`](Unsubscriber::unsubscribe) or on drop, whichever comes
//! first. It is move-only, so there is never a second token for the same
//! subscription.

use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;

use tracing::debug;

use crate::observable::{ObservableInner, SubscriptionId};

/// Type-erased link from a token back to its observable.
trait Detach {
    /// Remove the subscription; `true` if an entry was removed.
    fn detach(&self) -> bool;

    fn is_attached(&self) -> bool;
}

struct Binding<T> {
    observable: Weak<RefCell<ObservableInner<T>>>,
    id: SubscriptionId,
}

impl<T> Detach for Binding<T> {
    fn detach(&self) -> bool {
        let Some(inner) = self.observable.upgrade() else {
            return false;
        };
        let removed = inner.borrow_mut().remove_subscription(self.id);
        if removed {
            debug!(id = self.id, "subscription released");
        }
        removed
    }

    fn is_attached(&self) -> bool {
        self.observable
            .upgrade()
            .is_some_and(|inner| inner.borrow().contains(self.id))
    }
}

/// Token owning one subscription to an [`Observable`](crate::Observable).
///
/// Keep it for as long as the subscription should stay active.
#[must_use = "dropping an Unsubscriber ends the subscription immediately"]
pub struct Unsubscriber {
    binding: Option<Box<dyn Detach>>,
}

impl fmt::Debug for Unsubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscriber")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Unsubscriber {
    pub(crate) fn bound<T: 'static>(
        observable: Weak<RefCell<ObservableInner<T>>>,
        id: SubscriptionId,
    ) -> Self {
        Self {
            binding: Some(Box::new(Binding { observable, id })),
        }
    }

    /// A token bound to nothing.
    pub(crate) fn inert() -> Self {
        Self { binding: None }
    }

    /// End the subscription now. Returns `true` if this call removed it.
    ///
    /// Later calls, and the eventual drop, do nothing. Also a no-op when the
    /// observable was dropped, completed, or already removed the observer
    /// directly.
    pub fn unsubscribe(&mut self) -> bool {
        self.binding.take().is_some_and(|binding| binding.detach())
    }

    /// Whether the subscription is still registered and its observer alive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.binding
            .as_ref()
            .is_some_and(|binding| binding.is_attached())
    }

    /// Give up the token without ending the subscription.
    ///
    /// The subscription then lasts until `Observable::unsubscribe`,
    /// completion, or the observable is dropped.
    pub fn forget(mut self) {
        self.binding = None;
    }
}

impl Drop for Unsubscriber {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
