//! Class-swap choreography for a single run.
//!
//! A run walks one element through a fixed pipeline, one step per animation
//! frame, so the browser commits every intermediate style state:
//!
//! ```text
//! start      add `from`, arm completion listener      -> Activate
//! frame      add `active`                             -> Settle
//! frame      remove `from`, add `to`                  -> AwaitEnd
//! end signal drop listener                            -> Finish
//! frame      report completion to the owner           -> Done
//! ```
//!
//! The owner finishes the run by calling [`TransitionRun::clear`] at the point
//! of its choosing (the leave direction hides the element first).
//!
//! A run knows nothing about visibility; it only moves classes around.

use tracing::trace;

use crate::dom::Dom;
use crate::types::{Direction, RunId, TransitionClasses};

/// Inline `transition-property` written while a cancelled run is torn down.
pub const TRANSITION_DISABLED: &str = "none";

/// Position of a run in its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// `from` applied; waiting for the frame that adds `active`.
    Activate,
    /// `active` applied; waiting for the frame that swaps `from` for `to`.
    Settle,
    /// `to` applied; waiting for the completion signal.
    AwaitEnd,
    /// Completion observed; waiting for the frame that reports it.
    Finish,
    /// Completed or cancelled.
    Done,
}

/// One in-flight class-swap animation on one element.
#[derive(Debug)]
pub struct TransitionRun {
    id: RunId,
    direction: Direction,
    classes: TransitionClasses,
    step: Step,
}

impl TransitionRun {
    /// Start a run: apply `from`, arm the completion listener and request the
    /// first frame.
    ///
    /// The caller must not start a second run on the same node while this one
    /// is outstanding.
    pub fn start<D: Dom>(
        dom: &mut D,
        node: &D::Node,
        direction: Direction,
        classes: &TransitionClasses,
    ) -> Self {
        let id = RunId::new();
        trace!(%id, ?direction, ?node, "transition run started");

        dom.add_classes(node, &classes.from);
        dom.listen_transition_end(node, id);
        dom.request_frame();

        Self {
            id,
            direction,
            classes: classes.clone(),
            step: Step::Activate,
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn is_done(&self) -> bool {
        self.step == Step::Done
    }

    /// Advance the pipeline by one animation frame.
    ///
    /// Returns true on the frame the run completes.
    pub fn frame<D: Dom>(&mut self, dom: &mut D, node: &D::Node) -> bool {
        match self.step {
            Step::Activate => {
                dom.add_classes(node, &self.classes.active);
                self.step = Step::Settle;
                dom.request_frame();
                false
            }
            Step::Settle => {
                dom.remove_classes(node, &self.classes.from);
                dom.add_classes(node, &self.classes.to);
                self.step = Step::AwaitEnd;
                false
            }
            Step::Finish => {
                self.step = Step::Done;
                trace!(id = %self.id, "transition run ended");
                true
            }
            Step::AwaitEnd | Step::Done => false,
        }
    }

    /// Handle the completion signal for `run`.
    ///
    /// Signals for another run, or arriving before `to` has been applied, are
    /// ignored. Returns true if the signal was accepted.
    pub fn transition_end<D: Dom>(&mut self, dom: &mut D, node: &D::Node, run: RunId) -> bool {
        if run != self.id || self.step != Step::AwaitEnd {
            trace!(id = %self.id, %run, step = ?self.step, "ignoring completion signal");
            return false;
        }

        dom.unlisten_transition_end(node, self.id);
        self.step = Step::Finish;
        dom.request_frame();
        true
    }

    /// Remove the `active` and `to` classes once the run has completed.
    pub fn clear<D: Dom>(&self, dom: &mut D, node: &D::Node) {
        dom.remove_classes(node, &self.classes.active);
        dom.remove_classes(node, &self.classes.to);
    }

    /// Abort the run.
    ///
    /// Drops the completion listener so a stale signal can never complete
    /// the run, disables CSS transitions on the element so interpolating
    /// values jump to their end state, and removes all three class sets.
    /// The inline `transition-property` stays disabled until the owner clears
    /// it on the next frame; a frame is requested for that purpose.
    ///
    /// Cancelling a finished run is a no-op.
    pub fn cancel<D: Dom>(mut self, dom: &mut D, node: &D::Node) {
        if self.step == Step::Done {
            return;
        }
        trace!(id = %self.id, step = ?self.step, "transition run cancelled");

        if matches!(self.step, Step::Activate | Step::Settle | Step::AwaitEnd) {
            dom.unlisten_transition_end(node, self.id);
        }
        dom.set_transition_property(node, Some(TRANSITION_DISABLED));
        dom.remove_classes(node, &self.classes.from);
        dom.remove_classes(node, &self.classes.active);
        dom.remove_classes(node, &self.classes.to);
        dom.request_frame();
        self.step = Step::Done;
    }
}
