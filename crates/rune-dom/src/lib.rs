//! Browser host for `rune-transition`.
//!
//! The state machines in `rune-transition` are driven from outside: they ask
//! for animation frames and arm completion listeners through the
//! [`Dom`](rune_transition::Dom) trait, and expect the host to deliver the
//! resulting [`HostEvent`](rune_transition::HostEvent)s back to them.
//!
//! This crate provides that host for the browser:
//! - [`Inbox`] and [`pump`]: the queue browser callbacks write into and the
//!   loop that feeds it to a machine. Both are target-independent.
//! - `WebDom` and `Driver` (wasm32 only): the `web-sys` implementation of
//!   `Dom`, and an owner that wires callbacks to the pump.
//!
//! ```ignore
//! let driver = Driver::new(Transition::new(css, false))?;
//! driver.update(|t, dom| t.mount(dom, element_by_id("panel")?));
//! driver.update(|t, dom| t.set_visible(dom, true));
//! ```

mod error;
mod inbox;
#[cfg(target_arch = "wasm32")]
mod web;

pub use error::{DomError, Result};
pub use inbox::{Inbox, pump};
#[cfg(target_arch = "wasm32")]
pub use web::{Driver, WebDom, element_by_id};
