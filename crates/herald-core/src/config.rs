//! Dispatch configuration.
//!
//! A [`DispatchConfig`] is captured by every registry at construction and
//! copied into the capabilities bound to it (handlers, tokens). Changing the
//! process environment after a registry exists has no effect on it.
//!
//! # Environment
//!
//! | Variable        | Values                         | Effect                      |
//! |-----------------|--------------------------------|-----------------------------|
//! | `HERALD_STRICT` | `1`, `true`, `yes`, `on`       | [`Discipline::Strict`]      |
//! | `HERALD_STRICT` | anything else / unset          | [`Discipline::Lenient`]     |
//!
//! The variable is read once per process and cached.

use std::sync::OnceLock;

/// Environment variable selecting the default [`Discipline`].
pub const STRICT_ENV_VAR: &str = "HERALD_STRICT";

/// Policy applied uniformly to every misuse site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Discipline {
    /// Misuse is a defined no-op, reported through `tracing::warn!`.
    #[default]
    Lenient,
    /// Misuse panics at the call site (fail fast).
    Strict,
}

impl Discipline {
    /// Whether misuse panics under this discipline.
    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Configuration captured by an invoker or observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// How contract violations are handled.
    pub discipline: Discipline,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl DispatchConfig {
    /// Create a configuration with an explicit discipline.
    #[must_use]
    pub const fn new(discipline: Discipline) -> Self {
        Self { discipline }
    }

    /// Misuse becomes a logged no-op.
    #[must_use]
    pub const fn lenient() -> Self {
        Self::new(Discipline::Lenient)
    }

    /// Misuse panics.
    #[must_use]
    pub const fn strict() -> Self {
        Self::new(Discipline::Strict)
    }

    /// Configuration derived from `HERALD_STRICT` (cached after first read).
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(cached_env_discipline())
    }

    /// Set the misuse discipline.
    #[must_use]
    pub fn with_discipline(mut self, discipline: Discipline) -> Self {
        self.discipline = discipline;
        self
    }
}

#[inline]
fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Resolve the discipline using a custom environment lookup.
pub fn discipline_from_env<F>(get_env: F) -> Discipline
where
    F: Fn(&str) -> Option<String>,
{
    match get_env(STRICT_ENV_VAR) {
        Some(value) if env_flag(&value) => Discipline::Strict,
        _ => Discipline::Lenient,
    }
}

fn cached_env_discipline() -> Discipline {
    static DISCIPLINE: OnceLock<Discipline> = OnceLock::new();
    *DISCIPLINE.get_or_init(|| discipline_from_env(|key| std::env::var(key).ok()))
}
