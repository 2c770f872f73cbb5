use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use rune_transition::{Dom, Driven, HostEvent};
use tracing::trace;

/// Shared queue of host events waiting to be delivered.
///
/// Browser callbacks hold a clone and push into it; the owner of the state
/// machine drains it with [`pump`]. Cloning shares the queue.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    queue: Rc<RefCell<VecDeque<HostEvent>>>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: HostEvent) {
        self.queue.borrow_mut().push_back(event);
    }

    pub fn pop(&self) -> Option<HostEvent> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

/// Deliver queued events to `machine` in arrival order until the inbox is empty.
///
/// Events pushed while pumping are delivered in the same call. Returns the
/// number of events handled.
pub fn pump<D, M>(inbox: &Inbox, dom: &mut D, machine: &mut M) -> usize
where
    D: Dom,
    M: Driven<D>,
{
    let mut handled = 0;
    while let Some(event) = inbox.pop() {
        trace!(?event, "dispatching host event");
        machine.dispatch(dom, event);
        handled += 1;
    }
    handled
}
