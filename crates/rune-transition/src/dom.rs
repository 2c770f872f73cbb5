//! The host capability surface.
//!
//! The state machines never touch a browser directly. Everything they need
//! from the host (class list edits, inline style writes, a computed-style read,
//! frame scheduling and a completion subscription) goes through [`Dom`], so the
//! same algorithms run against `web-sys` in the browser and against
//! [`RecordingDom`](crate::RecordingDom) in tests.
//!
//! The host drives the machines with two inputs, modelled as [`HostEvent`]:
//! one `Frame` per requested animation frame, and `TransitionEnd` when the
//! browser reports that a run's CSS transition finished.

use std::fmt;

use crate::types::{ClassList, RunId};

/// DOM operations a transition needs from its host.
///
/// Implementations must tolerate operations on nodes that have since been
/// detached; those are silently ignored.
pub trait Dom {
    /// Handle to an element.
    type Node: Clone + fmt::Debug;

    /// Add every class in `classes` to the node's class list.
    fn add_classes(&mut self, node: &Self::Node, classes: &ClassList);

    /// Remove every class in `classes` from the node's class list.
    fn remove_classes(&mut self, node: &Self::Node, classes: &ClassList);

    /// Write the inline `display` value; `None` clears it.
    fn set_display(&mut self, node: &Self::Node, display: Option<&str>);

    /// Write the inline `transition-property` value; `None` clears it.
    fn set_transition_property(&mut self, node: &Self::Node, value: Option<&str>);

    /// Read the computed `display` value.
    fn computed_display(&self, node: &Self::Node) -> Option<String>;

    /// Ask for a [`HostEvent::Frame`] before the next paint.
    ///
    /// Multiple requests before the frame fires coalesce into one.
    fn request_frame(&mut self);

    /// Subscribe to the node's "transition finished" signal on behalf of `run`.
    fn listen_transition_end(&mut self, node: &Self::Node, run: RunId);

    /// Drop the subscription registered for `run`.
    fn unlisten_transition_end(&mut self, node: &Self::Node, run: RunId);
}

/// Input delivered by the host to a driven state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEvent {
    /// A requested animation frame fired.
    Frame,
    /// The completion signal armed by the given run fired.
    TransitionEnd(RunId),
}

/// A state machine that can be pumped by a host event loop.
pub trait Driven<D: Dom> {
    fn on_frame(&mut self, dom: &mut D);

    fn on_transition_end(&mut self, dom: &mut D, run: RunId);

    fn dispatch(&mut self, dom: &mut D, event: HostEvent) {
        match event {
            HostEvent::Frame => self.on_frame(dom),
            HostEvent::TransitionEnd(run) => self.on_transition_end(dom, run),
        }
    }
}
