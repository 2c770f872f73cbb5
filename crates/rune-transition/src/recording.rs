//! In-memory [`Dom`] implementation.
//!
//! `RecordingDom` keeps just enough element state to observe what the state
//! machines do: class lists, inline `display` and `transition-property`, armed
//! completion listeners, and whether a frame has been requested. Every
//! mutation is also appended to an ordered log.
//!
//! Frames and completion signals are never delivered automatically; the
//! caller decides when a frame fires (`take_frame_request`) and when a
//! transition finishes (`armed`).

use std::collections::HashMap;

use tracing::trace;

use crate::dom::{Dom, Driven};
use crate::types::{ClassList, RunId};

/// Upper bound on [`RecordingDom::settle`] rounds.
pub const SETTLE_LIMIT: usize = 1_000;

/// Handle to a node owned by a [`RecordingDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// One recorded DOM write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    AddClass { node: NodeId, class: String },
    RemoveClass { node: NodeId, class: String },
    SetDisplay { node: NodeId, display: Option<String> },
    SetTransitionProperty { node: NodeId, value: Option<String> },
}

impl Mutation {
    pub fn node(&self) -> NodeId {
        match self {
            Self::AddClass { node, .. }
            | Self::RemoveClass { node, .. }
            | Self::SetDisplay { node, .. }
            | Self::SetTransitionProperty { node, .. } => *node,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct NodeState {
    classes: Vec<String>,
    display: Option<String>,
    transition_property: Option<String>,
    /// The `display` value the stylesheet gives this node.
    stylesheet_display: String,
    listeners: Vec<RunId>,
}

/// A fake DOM that records every write.
#[derive(Debug, Default)]
pub struct RecordingDom {
    nodes: HashMap<NodeId, NodeState>,
    next_id: u32,
    frame_requested: bool,
    frame_requests: usize,
    log: Vec<Mutation>,
}

impl RecordingDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node whose stylesheet `display` is `stylesheet_display`.
    pub fn create_node(&mut self, stylesheet_display: &str) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(
            id,
            NodeState {
                stylesheet_display: stylesheet_display.to_string(),
                ..NodeState::default()
            },
        );
        id
    }

    /// Detach a node. Later operations on it are ignored.
    pub fn remove_node(&mut self, node: NodeId) {
        self.nodes.remove(&node);
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Current class list in insertion order.
    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.nodes
            .get(&node)
            .map(|n| n.classes.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes
            .get(&node)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    /// Inline `display` value, if one is set.
    pub fn display(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(&node).and_then(|n| n.display.as_deref())
    }

    /// Inline `transition-property` value, if one is set.
    pub fn transition_property(&self, node: NodeId) -> Option<&str> {
        self.nodes
            .get(&node)
            .and_then(|n| n.transition_property.as_deref())
    }

    /// Runs currently subscribed to the node's completion signal.
    pub fn listeners(&self, node: NodeId) -> &[RunId] {
        self.nodes
            .get(&node)
            .map(|n| n.listeners.as_slice())
            .unwrap_or_default()
    }

    /// Every armed completion listener, ordered by node.
    pub fn armed(&self) -> Vec<(NodeId, RunId)> {
        let mut armed: Vec<(NodeId, RunId)> = self
            .nodes
            .iter()
            .flat_map(|(id, n)| n.listeners.iter().map(move |run| (*id, *run)))
            .collect();
        armed.sort();
        armed
    }

    pub fn frame_requested(&self) -> bool {
        self.frame_requested
    }

    /// Consume the pending frame request. Returns true if one was pending.
    pub fn take_frame_request(&mut self) -> bool {
        std::mem::take(&mut self.frame_requested)
    }

    /// Total number of `request_frame` calls, coalesced or not.
    pub fn frame_requests(&self) -> usize {
        self.frame_requests
    }

    /// Deliver the pending frame to `machine`. Returns true if one fired.
    pub fn fire_frame<M: Driven<Self>>(&mut self, machine: &mut M) -> bool {
        if !self.take_frame_request() {
            return false;
        }
        trace!("firing frame");
        machine.on_frame(self);
        true
    }

    /// Fire the completion signal of every armed listener.
    ///
    /// Signals reach the machine whether or not their run is ready for them,
    /// as a browser would deliver them. Returns the number fired.
    pub fn fire_transition_ends<M: Driven<Self>>(&mut self, machine: &mut M) -> usize {
        let armed = self.armed();
        for (node, run) in &armed {
            trace!(?node, %run, "firing transitionend");
            machine.on_transition_end(self, *run);
        }
        armed.len()
    }

    /// Alternate frames and completion signals until neither is pending.
    ///
    /// Gives up after `SETTLE_LIMIT` rounds, which only happens when a run's
    /// completion signal is never accepted. Returns the number of rounds.
    pub fn settle<M: Driven<Self>>(&mut self, machine: &mut M) -> usize {
        let mut rounds = 0;
        while rounds < SETTLE_LIMIT {
            rounds += 1;
            while self.fire_frame(machine) {}
            if self.fire_transition_ends(machine) == 0 && !self.frame_requested {
                break;
            }
        }
        rounds
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.log
    }

    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.log)
    }
}

impl Dom for RecordingDom {
    type Node = NodeId;

    fn add_classes(&mut self, node: &NodeId, classes: &ClassList) {
        let Some(state) = self.nodes.get_mut(node) else {
            return;
        };
        for class in classes.iter() {
            if !state.classes.iter().any(|c| c == class) {
                state.classes.push(class.to_string());
            }
            self.log.push(Mutation::AddClass {
                node: *node,
                class: class.to_string(),
            });
        }
    }

    fn remove_classes(&mut self, node: &NodeId, classes: &ClassList) {
        let Some(state) = self.nodes.get_mut(node) else {
            return;
        };
        for class in classes.iter() {
            state.classes.retain(|c| c != class);
            self.log.push(Mutation::RemoveClass {
                node: *node,
                class: class.to_string(),
            });
        }
    }

    fn set_display(&mut self, node: &NodeId, display: Option<&str>) {
        let Some(state) = self.nodes.get_mut(node) else {
            return;
        };
        state.display = display.map(str::to_string);
        self.log.push(Mutation::SetDisplay {
            node: *node,
            display: state.display.clone(),
        });
    }

    fn set_transition_property(&mut self, node: &NodeId, value: Option<&str>) {
        let Some(state) = self.nodes.get_mut(node) else {
            return;
        };
        state.transition_property = value.map(str::to_string);
        self.log.push(Mutation::SetTransitionProperty {
            node: *node,
            value: state.transition_property.clone(),
        });
    }

    fn computed_display(&self, node: &NodeId) -> Option<String> {
        let state = self.nodes.get(node)?;
        Some(
            state
                .display
                .clone()
                .unwrap_or_else(|| state.stylesheet_display.clone()),
        )
    }

    fn request_frame(&mut self) {
        self.frame_requested = true;
        self.frame_requests += 1;
    }

    fn listen_transition_end(&mut self, node: &NodeId, run: RunId) {
        if let Some(state) = self.nodes.get_mut(node) {
            state.listeners.push(run);
        }
    }

    fn unlisten_transition_end(&mut self, node: &NodeId, run: RunId) {
        if let Some(state) = self.nodes.get_mut(node) {
            state.listeners.retain(|r| *r != run);
        }
    }
}
