//! Rune Motion: CSS class-swap transitions for showing, hiding and swapping
//! elements.
//!
//! This crate re-exports the transition core and the `rune.toml`
//! configuration loader so applications depend on a single crate.

pub use rune_config as config;
pub use rune_config::RuneConfig;
pub use rune_transition::*;
