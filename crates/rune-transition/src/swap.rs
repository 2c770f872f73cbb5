//! Mutually exclusive visibility across a keyed group of elements.
//!
//! A `Swap` shows one member at a time. Changing the requested member runs a
//! handoff: the visible member leaves completely before the requested member
//! starts entering, so two members are never laid out at full opacity.
//!
//! Arbitration runs after every request, frame, completion and mount:
//!
//! | active member            | requested   | action                             |
//! |--------------------------|-------------|------------------------------------|
//! | none                     | any         | enter requested (once laid out)    |
//! | `entered`                | other       | leave active; enter on completion  |
//! | `leaving`                | same        | cancel, snap back to `entered`     |
//! | `entering`               | other       | cancel, snap to `left`, re-arbitrate |
//! | `entered` / `entering`   | same        | nothing                            |
//! | `leaving`                | other       | nothing, wait for completion       |
//!
//! At most one member is ever outside `left`, and once host events stop the
//! group settles with exactly the most recently requested member `entered`.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, warn};

use crate::dom::{Dom, Driven};
use crate::element::ManagedElement;
use crate::events::{EventQueue, TransitionEvent};
use crate::types::{Css, Direction, RunId, Status};

/// Observable state of a [`Swap`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapSnapshot<K: Eq + Hash> {
    /// Status of every member.
    pub statuses: HashMap<K, Status>,
    /// The member the caller should render: the one member not `left`, or
    /// the requested member when all are `left`.
    pub should_render: K,
}

impl<K: Eq + Hash> SwapSnapshot<K> {
    /// Status of `id`, `Left` for unknown ids.
    pub fn status(&self, id: &K) -> Status {
        self.statuses.get(id).copied().unwrap_or_default()
    }
}

/// Coordinator for a group of mutually exclusive elements.
#[derive(Debug)]
pub struct Swap<K, N> {
    members: Vec<(K, ManagedElement<N>)>,
    requested: K,
    css: Css,
    events: EventQueue<K>,
}

impl<K, N> Swap<K, N>
where
    K: Clone + Eq + Hash + fmt::Debug,
    N: Clone + fmt::Debug,
{
    /// Create a group with `shown` initially entered and every other member left.
    pub fn new(ids: impl IntoIterator<Item = K>, shown: K, css: Css) -> Self {
        let mut swap = Self {
            members: Vec::new(),
            requested: shown,
            css,
            events: EventQueue::new(),
        };
        for id in ids {
            if swap.index_of(&id).is_none() {
                let status = if id == swap.requested {
                    Status::Entered
                } else {
                    Status::Left
                };
                swap.members.push((id, ManagedElement::new(status)));
            }
        }
        if swap.index_of(&swap.requested).is_none() {
            warn!(requested = ?swap.requested, "initially shown id is not a member");
        }
        swap
    }

    /// Add a member in the `left` state. Existing ids are left untouched.
    ///
    /// If the new member is the requested one it enters once mounted.
    pub fn insert(&mut self, id: K) {
        if self.index_of(&id).is_none() {
            self.members.push((id, ManagedElement::new(Status::Left)));
        }
    }

    /// The most recently requested member.
    pub fn requested(&self) -> &K {
        &self.requested
    }

    pub fn css(&self) -> &Css {
        &self.css
    }

    /// Member ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &K> {
        self.members.iter().map(|(id, _)| id)
    }

    pub fn contains(&self, id: &K) -> bool {
        self.index_of(id).is_some()
    }

    pub fn status(&self, id: &K) -> Option<Status> {
        self.member(id).map(ManagedElement::status)
    }

    pub fn member(&self, id: &K) -> Option<&ManagedElement<N>> {
        self.index_of(id).map(|idx| &self.members[idx].1)
    }

    /// Which member the caller should render.
    pub fn should_render(&self) -> &K {
        self.members
            .iter()
            .find(|(_, m)| m.status().is_visible())
            .map_or(&self.requested, |(id, _)| id)
    }

    pub fn snapshot(&self) -> SwapSnapshot<K> {
        SwapSnapshot {
            statuses: self
                .members
                .iter()
                .map(|(id, m)| (id.clone(), m.status()))
                .collect(),
            should_render: self.should_render().clone(),
        }
    }

    /// Drain lifecycle events collected since the last call.
    pub fn drain_events(&mut self) -> impl Iterator<Item = TransitionEvent<K>> + '_ {
        self.events.drain()
    }

    /// Attach a member's node once it has been rendered.
    pub fn mount<D: Dom<Node = N>>(&mut self, dom: &mut D, id: &K, node: N) -> SwapSnapshot<K> {
        match self.index_of(id) {
            Some(idx) => self.members[idx].1.mount(dom, node),
            None => warn!(?id, "mount ignored for unknown member"),
        }
        self.snapshot()
    }

    /// Detach a member's node, cancelling any in-flight run on it.
    pub fn unmount<D: Dom<Node = N>>(&mut self, dom: &mut D, id: &K) -> SwapSnapshot<K> {
        let Some(idx) = self.index_of(id) else {
            warn!(?id, "unmount ignored for unknown member");
            return self.snapshot();
        };
        if let Some((run, direction)) = self.members[idx].1.unmount(dom) {
            self.events.push(TransitionEvent::Cancelled {
                key: id.clone(),
                run,
                direction,
            });
            self.arbitrate(dom);
        }
        self.snapshot()
    }

    /// Request `id` to become the visible member.
    ///
    /// Unknown ids are ignored.
    pub fn set_shown<D: Dom<Node = N>>(&mut self, dom: &mut D, id: K) -> SwapSnapshot<K> {
        if self.index_of(&id).is_none() {
            warn!(?id, "swap request ignored for unknown member");
            return self.snapshot();
        }
        if self.requested != id {
            debug!(from = ?self.requested, to = ?id, "swap requested");
        }
        self.requested = id;
        self.arbitrate(dom);
        self.snapshot()
    }

    /// Process one animation frame for every member.
    pub fn frame<D: Dom<Node = N>>(&mut self, dom: &mut D) -> SwapSnapshot<K> {
        let mut changed = false;
        for (id, member) in &mut self.members {
            let report = member.frame(dom);
            if let Some((run, direction)) = report.ended {
                self.events.push(TransitionEvent::Ended {
                    key: id.clone(),
                    run,
                    direction,
                });
            }
            changed |= !report.is_idle();
        }
        if changed {
            self.arbitrate(dom);
        }
        self.snapshot()
    }

    /// Handle the completion signal armed by `run`.
    pub fn transition_end<D: Dom<Node = N>>(&mut self, dom: &mut D, run: RunId) -> SwapSnapshot<K> {
        let owner = self
            .members
            .iter_mut()
            .find(|(_, m)| m.active_run() == Some(run));
        match owner {
            Some((_, member)) => {
                member.transition_end(dom, run);
            }
            None => debug!(%run, "stale completion signal ignored"),
        }
        self.snapshot()
    }

    fn arbitrate<D: Dom<Node = N>>(&mut self, dom: &mut D) {
        loop {
            let Some(idx) = self.active() else {
                if let Some(idx) = self.index_of(&self.requested) {
                    self.start(dom, idx, Direction::Enter);
                }
                return;
            };

            let is_requested = self.members[idx].0 == self.requested;
            match (self.members[idx].1.status(), is_requested) {
                (Status::Entered, false) => {
                    debug!(leaving = ?self.members[idx].0, entering = ?self.requested, "handoff");
                    self.start(dom, idx, Direction::Leave);
                    return;
                }
                (Status::Leaving, true) | (Status::Entering, false) => {
                    let (id, member) = &mut self.members[idx];
                    if let Some((run, direction)) = member.interrupt(dom) {
                        self.events.push(TransitionEvent::Cancelled {
                            key: id.clone(),
                            run,
                            direction,
                        });
                    }
                    if member.status() != Status::Left {
                        return;
                    }
                }
                (Status::Entered | Status::Entering, true) | (Status::Leaving, false) => return,
                (Status::Left, _) => return,
            }
        }
    }

    fn start<D: Dom<Node = N>>(&mut self, dom: &mut D, idx: usize, direction: Direction) {
        let (id, member) = &mut self.members[idx];
        let run = match direction {
            Direction::Enter => member.enter(dom, &self.css.enter),
            Direction::Leave => member.leave(dom, &self.css.leave),
        };
        if let Some(run) = run {
            self.events.push(TransitionEvent::Started {
                key: id.clone(),
                run,
                direction,
            });
        }
    }

    /// The first member not `left`.
    fn active(&self) -> Option<usize> {
        self.members.iter().position(|(_, m)| m.status().is_visible())
    }

    fn index_of(&self, id: &K) -> Option<usize> {
        self.members.iter().position(|(member, _)| member == id)
    }
}

impl<K, N, D> Driven<D> for Swap<K, N>
where
    K: Clone + Eq + Hash + fmt::Debug,
    N: Clone + fmt::Debug,
    D: Dom<Node = N>,
{
    fn on_frame(&mut self, dom: &mut D) {
        self.frame(dom);
    }

    fn on_transition_end(&mut self, dom: &mut D, run: RunId) {
        self.transition_end(dom, run);
    }
}
