//! A deterministic stand-in for the browser's frame clock.
//!
//! Every tick is one display refresh. A requested animation frame is delivered
//! on the next tick, and an armed `transitionend` fires once its run has been
//! in flight for the configured number of frames, the way a CSS transition
//! with a fixed duration would.

use std::collections::{HashMap, HashSet};

use rune_transition::{Driven, Mutation, RecordingDom, RunId};
use tracing::trace;

/// Frames a run spends applying `from`, `active` and `to` before the
/// transition itself starts.
const PIPELINE_FRAMES: u32 = 2;

/// What one tick delivered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub frame: bool,
    pub ended: usize,
}

impl Tick {
    pub fn is_idle(&self) -> bool {
        !self.frame && self.ended == 0
    }
}

pub struct Browser {
    dom: RecordingDom,
    clock: u64,
    transition_frames: u32,
    ages: HashMap<RunId, u32>,
    fired: HashSet<RunId>,
}

impl Browser {
    pub fn new(transition_frames: u32) -> Self {
        Self {
            dom: RecordingDom::new(),
            clock: 0,
            transition_frames: transition_frames.max(1),
            ages: HashMap::new(),
            fired: HashSet::new(),
        }
    }

    pub fn dom(&mut self) -> &mut RecordingDom {
        &mut self.dom
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// True when nothing is scheduled: no pending frame and no armed listener.
    pub fn is_idle(&self) -> bool {
        !self.dom.frame_requested() && self.dom.armed().is_empty()
    }

    /// Advance one refresh and deliver whatever is due to `machine`.
    pub fn tick<M: Driven<RecordingDom>>(&mut self, machine: &mut M) -> Tick {
        self.clock += 1;

        let armed: Vec<RunId> = self.dom.armed().into_iter().map(|(_, run)| run).collect();
        self.ages.retain(|run, _| armed.contains(run));
        self.fired.retain(|run| armed.contains(run));
        for run in &armed {
            *self.ages.entry(*run).or_default() += 1;
        }

        let mut tick = Tick {
            frame: self.dom.fire_frame(machine),
            ended: 0,
        };

        let threshold = self.transition_frames.saturating_add(PIPELINE_FRAMES);
        for run in armed {
            if self.ages.get(&run).is_some_and(|age| *age >= threshold) && self.fired.insert(run) {
                trace!(clock = self.clock, %run, "transitionend");
                machine.on_transition_end(&mut self.dom, run);
                tick.ended += 1;
            }
        }

        for mutation in self.dom.take_mutations() {
            log_mutation(self.clock, &mutation);
        }
        tick
    }
}

fn log_mutation(clock: u64, mutation: &Mutation) {
    match mutation {
        Mutation::AddClass { node, class } => trace!(clock, ?node, class, "+class"),
        Mutation::RemoveClass { node, class } => trace!(clock, ?node, class, "-class"),
        Mutation::SetDisplay { node, display: value } => trace!(clock, ?node, ?value, "display"),
        Mutation::SetTransitionProperty { node, value } => {
            trace!(clock, ?node, ?value, "transition-property")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rune_transition::{Css, Status, Transition, TransitionClasses};

    fn css() -> Css {
        Css::new(
            TransitionClasses::new("a-from", "a-active", "a-to"),
            TransitionClasses::new("b-from", "b-active", "b-to"),
        )
    }

    #[test]
    fn enter_takes_configured_frames() {
        let mut browser = Browser::new(5);
        let node = browser.dom().create_node("block");
        let mut transition = Transition::new(css(), false);
        transition.mount(browser.dom(), node);
        browser.tick(&mut transition);

        transition.set_visible(browser.dom(), true);
        let started = browser.clock();
        while transition.status() != Status::Entered {
            assert!(browser.clock() - started < 100, "enter never finished");
            browser.tick(&mut transition);
        }
        // Two pipeline frames, five transition frames, one finishing frame.
        assert_eq!(browser.clock() - started, 8);
        assert!(browser.is_idle());
    }

    #[test]
    fn huge_durations_do_not_overflow() {
        let mut browser = Browser::new(u32::MAX);
        let node = browser.dom().create_node("block");
        let mut transition = Transition::new(css(), false);
        transition.mount(browser.dom(), node);
        transition.set_visible(browser.dom(), true);
        for _ in 0..4 {
            browser.tick(&mut transition);
        }
        assert_eq!(transition.status(), Status::Entering);
        assert!(!browser.is_idle());
    }

    #[test]
    fn idle_browser_delivers_nothing() {
        let mut browser = Browser::new(3);
        let mut transition: Transition<rune_transition::NodeId> = Transition::new(css(), true);
        assert!(browser.tick(&mut transition).is_idle());
        assert_eq!(browser.clock(), 1);
    }
}
