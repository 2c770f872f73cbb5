//! Enter/leave state machine for a single element.
//!
//! `Transition` owns the four-state lifecycle of one element:
//!
//! ```text
//! left -> entering -> entered -> leaving -> left
//! ```
//!
//! Callers set the desired visibility with [`Transition::set_visible`] and
//! forward host frames and completion signals. Every operation returns a
//! [`TransitionSnapshot`] the caller renders from.
//!
//! Reversing a run before it completes does not animate back: a leave that is
//! interrupted snaps to `entered`, an enter that is interrupted snaps to
//! `left`.
//!
//! # Example
//!
//! ```
//! use rune_transition::{Css, RecordingDom, Status, Transition, TransitionClasses};
//!
//! let css = Css::new(
//!     TransitionClasses::new("opacity-0", "transition-opacity", "opacity-100"),
//!     TransitionClasses::new("opacity-100", "transition-opacity", "opacity-0"),
//! );
//! let mut dom = RecordingDom::new();
//! let mut transition = Transition::new(css, false);
//!
//! // Ask to show; the element must be rendered before it can enter.
//! assert!(transition.set_visible(&mut dom, true).should_render);
//! let node = dom.create_node("block");
//! transition.mount(&mut dom, node);
//!
//! // First layout frame captures the natural display and starts the enter run.
//! assert_eq!(transition.frame(&mut dom).status, Status::Entering);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::{Dom, Driven};
use crate::element::ManagedElement;
use crate::events::{EventQueue, TransitionEvent};
use crate::types::{Css, Direction, RunId, Status};

/// Observable state of a [`Transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSnapshot {
    pub status: Status,
    /// Whether the caller should keep the element rendered.
    ///
    /// True whenever the status is not `Left` (the element must stay mounted
    /// while its leave animation plays) and while a show request waits for
    /// the element to be mounted.
    pub should_render: bool,
}

/// Visibility state machine for one element.
#[derive(Debug)]
pub struct Transition<N> {
    element: ManagedElement<N>,
    css: Css,
    visible: bool,
    events: EventQueue,
}

impl<N: Clone + std::fmt::Debug> Transition<N> {
    /// Create a machine whose initial status follows `visible`.
    pub fn new(css: Css, visible: bool) -> Self {
        let status = if visible { Status::Entered } else { Status::Left };
        Self {
            element: ManagedElement::new(status),
            css,
            visible,
            events: EventQueue::new(),
        }
    }

    pub fn snapshot(&self) -> TransitionSnapshot {
        let status = self.element.status();
        TransitionSnapshot {
            status,
            should_render: self.visible || status.is_visible(),
        }
    }

    pub fn status(&self) -> Status {
        self.element.status()
    }

    /// The most recently requested visibility.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn css(&self) -> &Css {
        &self.css
    }

    pub fn element(&self) -> &ManagedElement<N> {
        &self.element
    }

    /// Id of the in-flight run, if any.
    pub fn active_run(&self) -> Option<RunId> {
        self.element.active_run()
    }

    /// Drain lifecycle events collected since the last call.
    pub fn drain_events(&mut self) -> impl Iterator<Item = TransitionEvent> + '_ {
        self.events.drain()
    }

    /// Attach the element's node once it has been rendered.
    ///
    /// Pending requests are applied on the following frame, after layout.
    pub fn mount<D: Dom<Node = N>>(&mut self, dom: &mut D, node: N) -> TransitionSnapshot {
        self.element.mount(dom, node);
        self.snapshot()
    }

    /// Detach the element's node, cancelling any in-flight run.
    pub fn unmount<D: Dom<Node = N>>(&mut self, dom: &mut D) -> TransitionSnapshot {
        if let Some((run, direction)) = self.element.unmount(dom) {
            self.events.push(TransitionEvent::Cancelled {
                key: (),
                run,
                direction,
            });
        }
        self.snapshot()
    }

    /// Request the element to be shown or hidden.
    ///
    /// Repeating the current request is a no-op.
    pub fn set_visible<D: Dom<Node = N>>(&mut self, dom: &mut D, visible: bool) -> TransitionSnapshot {
        if self.visible != visible {
            debug!(visible, status = %self.element.status(), "visibility requested");
        }
        self.visible = visible;
        self.reconcile(dom);
        self.snapshot()
    }

    /// Process one animation frame.
    pub fn frame<D: Dom<Node = N>>(&mut self, dom: &mut D) -> TransitionSnapshot {
        let report = self.element.frame(dom);
        if let Some((run, direction)) = report.ended {
            self.events.push(TransitionEvent::Ended {
                key: (),
                run,
                direction,
            });
        }
        if !report.is_idle() {
            self.reconcile(dom);
        }
        self.snapshot()
    }

    /// Handle the completion signal armed by `run`.
    ///
    /// Signals from cancelled or finished runs are ignored.
    pub fn transition_end<D: Dom<Node = N>>(&mut self, dom: &mut D, run: RunId) -> TransitionSnapshot {
        self.element.transition_end(dom, run);
        self.snapshot()
    }

    fn reconcile<D: Dom<Node = N>>(&mut self, dom: &mut D) {
        match (self.visible, self.element.status()) {
            (true, Status::Left) => {
                if let Some(run) = self.element.enter(dom, &self.css.enter) {
                    self.events.push(TransitionEvent::Started {
                        key: (),
                        run,
                        direction: Direction::Enter,
                    });
                }
            }
            (false, Status::Entered) => {
                if let Some(run) = self.element.leave(dom, &self.css.leave) {
                    self.events.push(TransitionEvent::Started {
                        key: (),
                        run,
                        direction: Direction::Leave,
                    });
                }
            }
            (true, Status::Leaving) | (false, Status::Entering) => {
                if let Some((run, direction)) = self.element.interrupt(dom) {
                    self.events.push(TransitionEvent::Cancelled {
                        key: (),
                        run,
                        direction,
                    });
                }
            }
            (true, Status::Entering | Status::Entered) | (false, Status::Leaving | Status::Left) => {}
        }
    }
}

impl<N, D> Driven<D> for Transition<N>
where
    N: Clone + std::fmt::Debug,
    D: Dom<Node = N>,
{
    fn on_frame(&mut self, dom: &mut D) {
        self.frame(dom);
    }

    fn on_transition_end(&mut self, dom: &mut D, run: RunId) {
        self.transition_end(dom, run);
    }
}
