use rune_transition::{Css, NodeId, Transition, TransitionSnapshot};
use tracing::{debug, info};

use super::Scene;
use crate::browser::Browser;

/// A panel toggled open and closed, mounted only while the machine wants it
/// rendered.
pub struct TransitionScene {
    transition: Transition<NodeId>,
    node: Option<NodeId>,
    last: Option<TransitionSnapshot>,
}

impl TransitionScene {
    pub fn new(css: Css) -> Self {
        Self {
            transition: Transition::new(css, false),
            node: None,
            last: None,
        }
    }

    fn render(&mut self, browser: &mut Browser) {
        let snapshot = self.transition.snapshot();
        match (snapshot.should_render, self.node) {
            (true, None) => {
                let node = browser.dom().create_node("flex");
                self.transition.mount(browser.dom(), node);
                self.node = Some(node);
                debug!(clock = browser.clock(), ?node, "panel mounted");
            }
            (false, Some(node)) => {
                self.transition.unmount(browser.dom());
                browser.dom().remove_node(node);
                self.node = None;
                debug!(clock = browser.clock(), ?node, "panel unmounted");
            }
            _ => {}
        }
        self.report(browser.clock());
    }

    fn report(&mut self, clock: u64) {
        let snapshot = self.transition.snapshot();
        if self.last != Some(snapshot) {
            info!(
                clock,
                status = %snapshot.status,
                should_render = snapshot.should_render,
                "panel"
            );
            self.last = Some(snapshot);
        }
        for event in self.transition.drain_events() {
            debug!(clock, ?event, "transition event");
        }
    }
}

impl Scene for TransitionScene {
    fn name(&self) -> &'static str {
        "transition"
    }

    fn setup(&mut self, browser: &mut Browser) {
        self.render(browser);
    }

    fn request(&mut self, browser: &mut Browser, step: u32) {
        let visible = step % 2 == 0;
        info!(clock = browser.clock(), visible, "toggle");
        self.transition.set_visible(browser.dom(), visible);
        self.render(browser);
    }

    fn tick(&mut self, browser: &mut Browser) {
        browser.tick(&mut self.transition);
        self.render(browser);
    }

    fn snapshot_json(&self) -> serde_json::Value {
        serde_json::to_value(self.transition.snapshot()).unwrap_or_default()
    }
}
