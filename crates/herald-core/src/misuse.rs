//! Contract violations and how they are reported.
//!
//! # Failure Modes
//!
//! | Misuse | Cause | Lenient | Strict |
//! |--------|-------|---------|--------|
//! | [`Misuse::InvokerDropped`] | handler add/remove after its invoker was dropped | no-op + `warn!` | panic |
//! | [`Misuse::NotifyAfterComplete`] | `notify_*` on a completed observable | no-op + `warn!` | panic |
//!
//! Releasing a token twice, releasing it after its observable is gone, or
//! removing a listener that is not registered are *not* misuse: they are
//! defined no-ops under both disciplines.

use std::fmt;

use crate::config::{Discipline, DispatchConfig};

/// A violated usage contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Misuse {
    /// A handler was used after the invoker owning its registry was dropped.
    InvokerDropped {
        /// Handler operation that was attempted.
        operation: &'static str,
    },
    /// An observable was notified after `notify_complete`.
    NotifyAfterComplete {
        /// Notification that was attempted.
        operation: &'static str,
    },
}

impl Misuse {
    /// Name of the operation that triggered the violation.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::InvokerDropped { operation } | Self::NotifyAfterComplete { operation } => {
                operation
            }
        }
    }
}

impl fmt::Display for Misuse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvokerDropped { operation } => {
                write!(f, "event handler used after its invoker was dropped ({operation})")
            }
            Self::NotifyAfterComplete { operation } => {
                write!(f, "observable notified after completion ({operation})")
            }
        }
    }
}

impl std::error::Error for Misuse {}

impl DispatchConfig {
    /// Apply the configured discipline to `misuse`.
    ///
    /// # Panics
    ///
    /// Panics under [`Discipline::Strict`].
    #[track_caller]
    pub fn report(&self, misuse: Misuse) {
        match self.discipline {
            Discipline::Strict => panic!("{misuse}"),
            Discipline::Lenient => {
                tracing::warn!(operation = misuse.operation(), %misuse, "ignoring misuse");
            }
        }
    }
}
