#![forbid(unsafe_code)]

//! Observable registry with next, error and completion notifications.
//!
//! # Design
//!
//! [`Observable<T>`] keeps its registry in reference-counted storage
//! (`Rc<RefCell<..>>`). Observers are held as `Weak` references: the
//! observable never keeps an observer alive. Each subscription gets its own
//! id, and the [`Unsubscriber`] returned by `subscribe` holds a `Weak` to the
//! registry plus that id.
//!
//! ```text
//! Observable ──► Rc<RefCell<ObservableInner>>
//!                  └── [ (id 3, Weak<obs B>), (id 2, Weak<obs A>), (id 1, Weak<obs A>) ]
//!                          ▲                                        ▲
//! Unsubscriber(id 3) ──────┘          Unsubscriber(id 1) ───────────┘
//! ```
//!
//! # Invariants
//!
//! 1. New subscriptions go to the front; notifications walk front to back.
//! 2. A token removes only its own entry; `unsubscribe(observer)` removes
//!    every entry for that observer instance.
//! 3. `notify_complete` reaches every observer subscribed at call time, then
//!    leaves the registry empty and completed for good. While `on_complete`
//!    callbacks run the observable is still open: subscriptions stay
//!    registered and `notify_next`/`notify_error` are delivered.
//! 4. No registry borrow is held while an observer callback runs.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Notify after completion | `notify_*` once completed | [`Misuse::NotifyAfterComplete`] under the configured discipline |
//! | Nested completion | `notify_complete` from inside `on_complete` | [`Misuse::NotifyAfterComplete`] under the configured discipline |
//! | Late subscription | `subscribe` during or after completion | `on_complete` delivered immediately, inactive token returned |
//! | Dropped observer | observer `Rc` dropped while subscribed | skipped, entry pruned on next notification |
//! | Dropped observable | tokens outlive the observable | token release is a no-op |
//! | Reentrant subscribe/unsubscribe | from inside a callback | allowed; applies from the next notification |

use std::cell::RefCell;
use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::rc::{Rc, Weak};

use herald_core::{DispatchConfig, Misuse};
use tracing::{debug, trace};

use crate::observer::Observer;
use crate::unsubscriber::Unsubscriber;

pub(crate) type SubscriptionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Open,
    /// `on_complete` callbacks are running.
    Completing,
    Completed,
}

struct Subscription<T> {
    id: SubscriptionId,
    observer: Weak<dyn Observer<T>>,
}

/// Shared interior for [`Observable<T>`].
pub(crate) struct ObservableInner<T> {
    /// Newest subscription at the front.
    subscriptions: VecDeque<Subscription<T>>,
    next_id: SubscriptionId,
    phase: Phase,
    config: DispatchConfig,
}

impl<T> ObservableInner<T> {
    pub(crate) fn remove_subscription(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub(crate) fn contains(&self, id: SubscriptionId) -> bool {
        self.subscriptions
            .iter()
            .any(|s| s.id == id && s.observer.strong_count() > 0)
    }

    /// Prune dropped observers and collect the live ones.
    fn live_observers(&mut self) -> Vec<Rc<dyn Observer<T>>> {
        self.subscriptions.retain(|s| s.observer.strong_count() > 0);
        self.subscriptions
            .iter()
            .filter_map(|s| s.observer.upgrade())
            .collect()
    }

    fn active_count(&self) -> usize {
        self.subscriptions
            .iter()
            .filter(|s| s.observer.strong_count() > 0)
            .count()
    }
}

/// Source of notifications about a subject of type `T`.
///
/// Embed it in the type that owns the subject and call the `notify_*`
/// methods when the subject changes. Not `Clone`: each observable is a
/// distinct registry.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("subscriber_count", &inner.active_count())
            .field("completed", &(inner.phase == Phase::Completed))
            .field("config", &inner.config)
            .finish()
    }
}

impl<T: 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Observable<T> {
    /// Create an observable with the environment-derived configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    /// Create an observable with an explicit configuration.
    #[must_use]
    pub fn with_config(config: DispatchConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                subscriptions: VecDeque::new(),
                next_id: 1,
                phase: Phase::Open,
                config,
            })),
        }
    }

    /// The configuration captured at construction.
    #[must_use]
    pub fn config(&self) -> DispatchConfig {
        self.inner.borrow().config
    }

    /// Subscribe `observer`, returning the token that owns the subscription.
    ///
    /// The observable keeps only a weak reference; the caller keeps the
    /// observer alive. Dropping the token unsubscribes immediately.
    ///
    /// On a completing or completed observable nothing is registered: the observer gets
    /// `on_complete` right away and the returned token is inactive.
    pub fn subscribe<O: Observer<T> + 'static>(&self, observer: &Rc<O>) -> Unsubscriber {
        let observer: Rc<dyn Observer<T>> = Rc::<O>::clone(observer);
        self.subscribe_dyn(&observer)
    }

    /// [`subscribe`](Self::subscribe) for an already type-erased observer.
    pub fn subscribe_dyn(&self, observer: &Rc<dyn Observer<T>>) -> Unsubscriber {
        let id = {
            let mut inner = self.inner.borrow_mut();
            if inner.phase != Phase::Open {
                None
            } else {
                let id = inner.next_id;
                inner.next_id += 1;
                inner.subscriptions.push_front(Subscription {
                    id,
                    observer: Rc::downgrade(observer),
                });
                debug!(id, subscribers = inner.subscriptions.len(), "observer subscribed");
                Some(id)
            }
        };

        match id {
            Some(id) => Unsubscriber::bound(Rc::downgrade(&self.inner), id),
            None => {
                debug!("subscription to completed observable");
                observer.on_complete();
                Unsubscriber::inert()
            }
        }
    }

    /// Remove every subscription of `observer` without its token, returning
    /// how many were removed.
    ///
    /// Tokens of removed subscriptions become inactive; dropping them later
    /// is a no-op.
    pub fn unsubscribe<O: Observer<T> + ?Sized>(&self, observer: &Rc<O>) -> usize {
        let target = Rc::as_ptr(observer);
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscriptions.len();
        inner
            .subscriptions
            .retain(|s| !std::ptr::addr_eq(s.observer.as_ptr(), target));
        let removed = before - inner.subscriptions.len();
        debug!(removed, subscribers = inner.subscriptions.len(), "observer unsubscribed");
        removed
    }

    /// Deliver `subject` to every subscribed observer's `on_next`.
    ///
    /// # Panics
    ///
    /// Panics under strict discipline if the observable has completed.
    #[track_caller]
    pub fn notify_next(&self, subject: &T) {
        let Some(observers) = self.begin_notify("notify_next", false) else {
            return;
        };
        for observer in &observers {
            observer.on_next(subject);
        }
    }

    /// Deliver `error` to every subscribed observer's `on_error`.
    /// Subscriptions stay active.
    ///
    /// # Panics
    ///
    /// Panics under strict discipline if the observable has completed.
    #[track_caller]
    pub fn notify_error(&self, error: &(dyn Error + 'static)) {
        let Some(observers) = self.begin_notify("notify_error", false) else {
            return;
        };
        for observer in &observers {
            observer.on_error(error);
        }
    }

    /// Deliver `on_complete` to every subscribed observer, then end every
    /// subscription for good.
    ///
    /// A callback may still send a final `notify_next` or `notify_error`;
    /// the observable only reports completed once every callback returned.
    ///
    /// # Panics
    ///
    /// Panics under strict discipline if the observable has already
    /// completed or is completing.
    #[track_caller]
    pub fn notify_complete(&self) {
        let Some(observers) = self.begin_notify("notify_complete", true) else {
            return;
        };
        for observer in &observers {
            observer.on_complete();
        }
        let released = {
            let mut inner = self.inner.borrow_mut();
            inner.phase = Phase::Completed;
            std::mem::take(&mut inner.subscriptions)
        };
        debug!(
            observers = observers.len(),
            released = released.len(),
            "observable completed"
        );
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().active_count()
    }

    /// Whether `notify_complete` has run.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.inner.borrow().phase == Phase::Completed
    }

    /// Snapshot live observers, or report misuse once completed.
    ///
    /// `closing` marks the start of completion; a second one while the first
    /// is still delivering is misuse too.
    #[track_caller]
    fn begin_notify(
        &self,
        operation: &'static str,
        closing: bool,
    ) -> Option<Vec<Rc<dyn Observer<T>>>> {
        let mut inner = self.inner.borrow_mut();
        let rejected = match inner.phase {
            Phase::Open => false,
            Phase::Completing => closing,
            Phase::Completed => true,
        };
        if rejected {
            let config = inner.config;
            drop(inner);
            config.report(Misuse::NotifyAfterComplete { operation });
            return None;
        }
        if closing {
            inner.phase = Phase::Completing;
        }
        let observers = inner.live_observers();
        trace!(operation, observers = observers.len(), "notifying observers");
        Some(observers)
    }
}
