//! Per-element bookkeeping shared by [`Transition`](crate::Transition) and
//! [`Swap`](crate::Swap).

use tracing::{debug, trace};

use crate::dom::Dom;
use crate::runner::TransitionRun;
use crate::types::{Direction, RunId, Status, TransitionClasses};

/// `display` used when the computed value is unusable.
pub const FALLBACK_DISPLAY: &str = "block";

/// What happened to an element during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// The element finished its first layout since being mounted.
    pub laid_out: bool,
    /// A run completed and the element settled.
    pub ended: Option<(RunId, Direction)>,
}

impl FrameReport {
    pub fn is_idle(&self) -> bool {
        !self.laid_out && self.ended.is_none()
    }
}

/// A DOM node under transition management.
///
/// Holds the node handle (absent while unmounted), the visibility status,
/// the cached natural `display` value and the in-flight run, if any.
#[derive(Debug)]
pub struct ManagedElement<N> {
    node: Option<N>,
    status: Status,
    natural_display: Option<String>,
    run: Option<TransitionRun>,
    layout_pending: bool,
    /// Nodes whose `transition-property` was disabled by a cancel and is
    /// re-enabled on the next frame, mounted or not.
    restore_transition: Vec<N>,
}

impl<N: Clone + std::fmt::Debug> ManagedElement<N> {
    pub fn new(status: Status) -> Self {
        Self {
            node: None,
            status,
            natural_display: None,
            run: None,
            layout_pending: false,
            restore_transition: Vec::new(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.node.is_some()
    }

    /// The natural `display` value, once captured.
    pub fn natural_display(&self) -> Option<&str> {
        self.natural_display.as_deref()
    }

    /// Mounted and past its first layout frame.
    pub fn is_ready(&self) -> bool {
        self.node.is_some() && !self.layout_pending
    }

    pub fn active_run(&self) -> Option<RunId> {
        self.run.as_ref().map(TransitionRun::id)
    }

    /// Attach a node and wait for its first layout frame.
    pub fn mount<D: Dom<Node = N>>(&mut self, dom: &mut D, node: N) {
        if self.node.is_some() {
            self.unmount(dom);
        }
        trace!(?node, status = %self.status, "element mounted");
        self.node = Some(node);
        self.layout_pending = true;
        dom.request_frame();
    }

    /// Detach the node, cancelling any in-flight run.
    ///
    /// Transient statuses settle to `Left`. Returns the cancelled run.
    pub fn unmount<D: Dom<Node = N>>(&mut self, dom: &mut D) -> Option<(RunId, Direction)> {
        let cancelled = self.cancel_run(dom);
        if self.status.is_transient() {
            self.status = Status::Left;
        }
        self.node = None;
        self.layout_pending = false;
        cancelled
    }

    /// Start the enter run. Requires a laid-out node.
    ///
    /// Applies `from`, restores the natural `display` and flips to `Entering`.
    pub fn enter<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        classes: &TransitionClasses,
    ) -> Option<RunId> {
        if !self.is_ready() || self.run.is_some() {
            return None;
        }
        let node = self.node.clone()?;
        let display = self
            .natural_display
            .clone()
            .unwrap_or_else(|| FALLBACK_DISPLAY.to_string());

        let run = TransitionRun::start(dom, &node, Direction::Enter, classes);
        dom.set_display(&node, Some(&display));
        let id = run.id();
        self.run = Some(run);
        self.set_status(Status::Entering);
        Some(id)
    }

    /// Start the leave run. Requires a laid-out node.
    pub fn leave<D: Dom<Node = N>>(
        &mut self,
        dom: &mut D,
        classes: &TransitionClasses,
    ) -> Option<RunId> {
        if !self.is_ready() || self.run.is_some() {
            return None;
        }
        let node = self.node.clone()?;

        let run = TransitionRun::start(dom, &node, Direction::Leave, classes);
        let id = run.id();
        self.run = Some(run);
        self.set_status(Status::Leaving);
        Some(id)
    }

    /// Cancel the in-flight run and snap to the opposite settled status:
    /// `Entering` becomes `Left` (hidden), `Leaving` becomes `Entered`.
    ///
    /// Settled elements are left untouched.
    pub fn interrupt<D: Dom<Node = N>>(&mut self, dom: &mut D) -> Option<(RunId, Direction)> {
        let snapped = match self.status {
            Status::Entering => Status::Left,
            Status::Leaving => Status::Entered,
            Status::Entered | Status::Left => return None,
        };
        let cancelled = self.cancel_run(dom);
        if snapped == Status::Left
            && let Some(node) = &self.node
        {
            dom.set_display(node, Some("none"));
        }
        self.set_status(snapped);
        cancelled
    }

    /// Process one animation frame.
    pub fn frame<D: Dom<Node = N>>(&mut self, dom: &mut D) -> FrameReport {
        let mut report = FrameReport::default();
        for node in self.restore_transition.drain(..) {
            dom.set_transition_property(&node, None);
        }
        let Some(node) = self.node.clone() else {
            return report;
        };

        if std::mem::take(&mut self.layout_pending) {
            if self.natural_display.is_none() {
                let natural = match dom.computed_display(&node) {
                    Some(computed) if !computed.is_empty() && computed != "none" => computed,
                    _ => FALLBACK_DISPLAY.to_string(),
                };
                debug!(?node, %natural, "captured natural display");
                self.natural_display = Some(natural);
            }
            if self.status == Status::Left {
                dom.set_display(&node, Some("none"));
            }
            report.laid_out = true;
        }

        let ended = match self.run.as_mut() {
            Some(run) => run.frame(dom, &node),
            None => false,
        };
        if ended && let Some(run) = self.run.take() {
            let direction = run.direction();
            if direction == Direction::Leave {
                dom.set_display(&node, Some("none"));
            }
            run.clear(dom, &node);
            self.set_status(direction.settled());
            report.ended = Some((run.id(), direction));
        }

        report
    }

    /// Route a completion signal to the in-flight run.
    pub fn transition_end<D: Dom<Node = N>>(&mut self, dom: &mut D, run: RunId) -> bool {
        match (self.run.as_mut(), self.node.as_ref()) {
            (Some(current), Some(node)) => current.transition_end(dom, node, run),
            _ => false,
        }
    }

    fn cancel_run<D: Dom<Node = N>>(&mut self, dom: &mut D) -> Option<(RunId, Direction)> {
        let run = self.run.take()?;
        let cancelled = (run.id(), run.direction());
        if let Some(node) = &self.node {
            run.cancel(dom, node);
            self.restore_transition.push(node.clone());
        }
        Some(cancelled)
    }

    fn set_status(&mut self, status: Status) {
        if self.status != status {
            debug!(from = %self.status, to = %status, "status changed");
            self.status = status;
        }
    }
}
