//! Transition lifecycle events.
//!
//! State machines push an event whenever a run starts, completes or is
//! cancelled. Events can be drained after each `frame`/`transition_end`
//! call to react to lifecycle changes (for example focusing an input once
//! its container has fully entered).
//!
//! # Usage
//!
//! ```ignore
//! use rune_transition::{Transition, TransitionEvent};
//!
//! transition.frame(&mut dom);
//!
//! for event in transition.drain_events() {
//!     if let TransitionEvent::Ended { direction: Direction::Enter, .. } = event {
//!         // focus something
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::types::{Direction, RunId};

/// Event emitted when a run changes state.
///
/// `K` identifies the element within its owner: `()` for a single
/// [`Transition`](crate::Transition), the member id for a [`Swap`](crate::Swap).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionEvent<K = ()> {
    /// A run has started; the element is now entering or leaving.
    Started {
        key: K,
        run: RunId,
        direction: Direction,
    },
    /// A run completed normally; the element is now entered or left.
    Ended {
        key: K,
        run: RunId,
        direction: Direction,
    },
    /// A run was cancelled by an interruption or an unmount.
    Cancelled {
        key: K,
        run: RunId,
        direction: Direction,
    },
}

impl<K> TransitionEvent<K> {
    /// The element this event refers to.
    pub fn key(&self) -> &K {
        match self {
            Self::Started { key, .. } | Self::Ended { key, .. } | Self::Cancelled { key, .. } => {
                key
            }
        }
    }

    pub fn run(&self) -> RunId {
        match self {
            Self::Started { run, .. } | Self::Ended { run, .. } | Self::Cancelled { run, .. } => {
                *run
            }
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::Started { direction, .. }
            | Self::Ended { direction, .. }
            | Self::Cancelled { direction, .. } => *direction,
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started { .. })
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, Self::Ended { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Queue for collecting transition events between host callbacks.
#[derive(Debug)]
pub struct EventQueue<K = ()> {
    events: VecDeque<TransitionEvent<K>>,
}

impl<K> Default for EventQueue<K> {
    fn default() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }
}

impl<K> EventQueue<K> {
    /// Create a new empty event queue.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TransitionEvent<K>) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Pop the next event from the queue.
    pub fn pop(&mut self) -> Option<TransitionEvent<K>> {
        self.events.pop_front()
    }

    /// Drain all events from the queue, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = TransitionEvent<K>> + '_ {
        self.events.drain(..)
    }

    pub fn peek(&self) -> Option<&TransitionEvent<K>> {
        self.events.front()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<K: PartialEq> EventQueue<K> {
    /// Get pending events for a specific element.
    pub fn events_for(&self, key: &K) -> Vec<&TransitionEvent<K>> {
        self.events.iter().filter(|e| e.key() == key).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_accessors() {
        let event = TransitionEvent::Ended {
            key: "panel",
            run: RunId(7),
            direction: Direction::Leave,
        };

        assert_eq!(*event.key(), "panel");
        assert_eq!(event.run(), RunId(7));
        assert_eq!(event.direction(), Direction::Leave);
        assert!(event.is_ended());
        assert!(!event.is_started());
        assert!(!event.is_cancelled());
    }

    #[test]
    fn test_event_queue_is_fifo() {
        let mut queue = EventQueue::new();
        queue.push(TransitionEvent::Started {
            key: (),
            run: RunId(1),
            direction: Direction::Enter,
        });
        queue.push(TransitionEvent::Cancelled {
            key: (),
            run: RunId(1),
            direction: Direction::Enter,
        });

        assert_eq!(queue.len(), 2);
        assert!(queue.peek().is_some_and(TransitionEvent::is_started));

        let drained: Vec<_> = queue.drain().collect();
        assert!(drained[0].is_started());
        assert!(drained[1].is_cancelled());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_events_for_key() {
        let mut queue = EventQueue::new();
        for (key, run) in [("a", 1), ("b", 2), ("a", 3)] {
            queue.push(TransitionEvent::Started {
                key,
                run: RunId(run),
                direction: Direction::Enter,
            });
        }

        assert_eq!(queue.events_for(&"a").len(), 2);
        assert_eq!(queue.events_for(&"b").len(), 1);
        assert!(queue.events_for(&"c").is_empty());
    }

    #[test]
    fn test_event_serializes_tagged() {
        let event = TransitionEvent::Started {
            key: (),
            run: RunId(3),
            direction: Direction::Enter,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "started");
        assert_eq!(json["direction"], "enter");
    }
}
