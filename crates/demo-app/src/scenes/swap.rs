use rune_transition::{Css, NodeId, Status, Swap};
use tracing::{debug, info};

use super::Scene;
use crate::browser::Browser;

pub const TABS: [&str; 3] = ["home", "settings", "profile"];

/// Tabbed content where only one tab body is ever on screen. Only the member
/// the group names in `should_render` is mounted.
pub struct SwapScene {
    swap: Swap<&'static str, NodeId>,
    mounted: Option<(&'static str, NodeId)>,
    last: Vec<Status>,
}

impl SwapScene {
    pub fn new(css: Css) -> Self {
        Self {
            swap: Swap::new(TABS, TABS[0], css),
            mounted: None,
            last: Vec::new(),
        }
    }

    fn render(&mut self, browser: &mut Browser) {
        let wanted = *self.swap.should_render();
        match self.mounted {
            Some((id, _)) if id == wanted => {}
            current => {
                if let Some((id, node)) = current {
                    self.swap.unmount(browser.dom(), &id);
                    browser.dom().remove_node(node);
                    debug!(clock = browser.clock(), tab = id, "tab unmounted");
                }
                let node = browser.dom().create_node("block");
                self.swap.mount(browser.dom(), &wanted, node);
                self.mounted = Some((wanted, node));
                debug!(clock = browser.clock(), tab = wanted, "tab mounted");
            }
        }
        self.report(browser.clock());
    }

    fn report(&mut self, clock: u64) {
        let statuses: Vec<Status> = TABS
            .iter()
            .map(|id| self.swap.status(id).unwrap_or_default())
            .collect();
        if statuses != self.last {
            let line = TABS
                .iter()
                .zip(&statuses)
                .map(|(id, status)| format!("{id}={status}"))
                .collect::<Vec<_>>()
                .join(" ");
            info!(clock, render = *self.swap.should_render(), "{line}");
            self.last = statuses;
        }
        for event in self.swap.drain_events() {
            debug!(clock, ?event, "swap event");
        }
    }
}

impl Scene for SwapScene {
    fn name(&self) -> &'static str {
        "swap"
    }

    fn setup(&mut self, browser: &mut Browser) {
        self.render(browser);
    }

    fn request(&mut self, browser: &mut Browser, step: u32) {
        let tab = TABS[(step as usize + 1) % TABS.len()];
        info!(clock = browser.clock(), tab, "select");
        self.swap.set_shown(browser.dom(), tab);
        self.render(browser);
    }

    fn tick(&mut self, browser: &mut Browser) {
        browser.tick(&mut self.swap);
        self.render(browser);
    }

    fn snapshot_json(&self) -> serde_json::Value {
        serde_json::to_value(self.swap.snapshot()).unwrap_or_default()
    }
}
