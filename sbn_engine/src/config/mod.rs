//! Configuration module for the notation engine
//!
//! Compile-time limits live in `constants`; user-facing behavior toggles live
//! in `runtime` and come from SBN_* environment variables with an optional
//! `sbn.toml` overlay.

pub mod constants;
pub mod runtime;

pub use runtime::RuntimePreferences;
