#![forbid(unsafe_code)]

//! Core: dispatch configuration, misuse discipline, and logging.
//!
//! # Role in herald
//! `herald-core` is the ambient layer shared by the two notification
//! mechanisms. It does not know about listeners or observers; it only
//! decides what happens when one of them is misused.
//!
//! # Primary responsibilities
//! - **DispatchConfig**: per-registry configuration, defaulting from the
//!   `HERALD_STRICT` environment variable.
//! - **Discipline**: the single policy applied to every misuse site, either
//!   a logged no-op ([`Discipline::Lenient`]) or a panic
//!   ([`Discipline::Strict`]).
//! - **Misuse**: the typed description of a contract violation.
//!
//! # How it fits in the system
//! `herald-event` (invoker/handler) and `herald-observe`
//! (observer/observable) each embed a [`DispatchConfig`] in their registries
//! and route contract violations through [`DispatchConfig::report`]. The two
//! mechanisms never depend on each other.

pub mod config;
pub mod misuse;

#[cfg(feature = "test-helpers")]
pub mod logging;

pub use config::{Discipline, DispatchConfig, STRICT_ENV_VAR, discipline_from_env};
pub use misuse::Misuse;
