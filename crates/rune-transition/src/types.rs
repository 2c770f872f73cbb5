//! Core transition types and configuration.
//!
//! This module defines the fundamental types shared by the runner and the
//! state machines:
//! - `Status`: Four-state visibility lifecycle of a managed element
//! - `RunId`: Unique identifier for one class-swap run
//! - `ClassList`: Space-separated class tokens
//! - `TransitionClasses` / `Css`: Per-direction class configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a single transition run.
///
/// Completion signals carry the id of the run that armed them, so a signal
/// belonging to a cancelled run can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(pub u64);

impl RunId {
    /// Generate a new unique run ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Visibility status of a managed element.
///
/// `Entered` and `Left` are settled; `Entering` and `Leaving` are transient and
/// resolve to `Entered` / `Left` respectively unless interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The enter transition is running.
    Entering,
    /// The element is fully shown.
    Entered,
    /// The leave transition is running.
    Leaving,
    /// The element is hidden (`display: none`) or not rendered at all.
    Left,
}

impl Status {
    /// Returns true for `Entered` and `Left`.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Entered | Self::Left)
    }

    /// Returns true for `Entering` and `Leaving`.
    pub fn is_transient(self) -> bool {
        !self.is_settled()
    }

    /// Returns true for every status except `Left`.
    pub fn is_visible(self) -> bool {
        self != Self::Left
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entering => "entering",
            Self::Entered => "entered",
            Self::Leaving => "leaving",
            Self::Left => "left",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Left
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a transition run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Enter,
    Leave,
}

impl Direction {
    /// The transient status an element holds while a run in this direction is in flight.
    pub fn in_flight(self) -> Status {
        match self {
            Self::Enter => Status::Entering,
            Self::Leave => Status::Leaving,
        }
    }

    /// The settled status an element reaches once a run in this direction completes.
    pub fn settled(self) -> Status {
        match self {
            Self::Enter => Status::Entered,
            Self::Leave => Status::Left,
        }
    }
}

/// An ordered list of CSS class tokens.
///
/// Parsed from a space-separated string. Blank tokens are dropped and
/// duplicates collapsed, so an empty or whitespace-only string yields an empty
/// list and every class operation on it is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ClassList(Vec<String>);

impl ClassList {
    /// Create an empty class list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a space-separated class string.
    pub fn parse(classes: &str) -> Self {
        let mut tokens: Vec<String> = Vec::new();
        for token in classes.split_whitespace() {
            if !tokens.iter().any(|t| t == token) {
                tokens.push(token.to_string());
            }
        }
        Self(tokens)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the class tokens in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|c| c == class)
    }
}

impl FromStr for ClassList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for ClassList {
    fn from(classes: &str) -> Self {
        Self::parse(classes)
    }
}

impl From<String> for ClassList {
    fn from(classes: String) -> Self {
        Self::parse(&classes)
    }
}

impl From<ClassList> for String {
    fn from(list: ClassList) -> Self {
        list.0.join(" ")
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// Classes applied over the course of one transition direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionClasses {
    /// Applied synchronously when the run starts, removed two frames later.
    pub from: ClassList,
    /// Applied for the duration of the run. One of these classes must declare
    /// the CSS `transition` property, otherwise completion is never signalled.
    pub active: ClassList,
    /// Applied together with the removal of `from`; the values the active
    /// transition animates toward.
    pub to: ClassList,
}

impl TransitionClasses {
    pub fn new(from: &str, active: &str, to: &str) -> Self {
        Self {
            from: ClassList::parse(from),
            active: ClassList::parse(active),
            to: ClassList::parse(to),
        }
    }

    /// Returns true if no direction step would touch the class list.
    pub fn is_empty(&self) -> bool {
        self.from.is_empty() && self.active.is_empty() && self.to.is_empty()
    }
}

/// Enter and leave configuration for a managed element.
///
/// Deserializes from the shape
/// `{ enter: { from, active, to }, leave: { from, active, to } }`
/// where each value is a space-separated class string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Css {
    pub enter: TransitionClasses,
    pub leave: TransitionClasses,
}

impl Css {
    pub fn new(enter: TransitionClasses, leave: TransitionClasses) -> Self {
        Self { enter, leave }
    }

    /// Classes for the given direction.
    pub fn classes(&self, direction: Direction) -> &TransitionClasses {
        match direction {
            Direction::Enter => &self.enter,
            Direction::Leave => &self.leave,
        }
    }
}
