//! Class-swap transitions for showing, hiding and swapping elements.
//!
//! This crate provides:
//! - **TransitionRun**: Drives one `from` / `active` / `to` class choreography
//!   across animation frames and a completion signal
//! - **Transition**: Four-state enter/leave lifecycle for one element, with
//!   snap-back on interruption
//! - **Swap**: Keyed group of elements where at most one is visible, handing
//!   off leave-then-enter when the requested member changes
//! - **Dom**: The host capability surface the above run against, with
//!   [`RecordingDom`] as an in-memory implementation
//!
//! # Architecture
//!
//! ```text
//! Transition            Swap
//!   └── ManagedElement    └── ManagedElement (per member)
//!         └── TransitionRun
//!               └── Dom (class list, inline style, frames, completion)
//! ```
//!
//! Nothing here schedules work by itself. The host forwards frames and
//! completion signals (see [`Driven`] and [`HostEvent`]); every operation
//! returns an immutable snapshot for the caller to render from.

pub mod dom;
pub mod element;
pub mod events;
pub mod recording;
pub mod runner;
pub mod swap;
pub mod transition;
pub mod types;

pub use dom::{Dom, Driven, HostEvent};
pub use element::{FALLBACK_DISPLAY, FrameReport, ManagedElement};
pub use events::{EventQueue, TransitionEvent};
pub use recording::{Mutation, NodeId, RecordingDom};
pub use runner::{Step, TRANSITION_DISABLED, TransitionRun};
pub use swap::{Swap, SwapSnapshot};
pub use transition::{Transition, TransitionSnapshot};
pub use types::{ClassList, Css, Direction, RunId, Status, TransitionClasses};
