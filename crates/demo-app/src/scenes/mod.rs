use rune_config::DemoConfig;
use thiserror::Error;

use crate::browser::Browser;

pub mod swap;
pub mod transition;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene '{scene}' still busy after {ticks} frames")]
    DidNotSettle { scene: &'static str, ticks: u64 },
}

/// A scripted page: issues requests, renders what the state machines ask
/// for, and is ticked by the simulated browser in between.
pub trait Scene {
    fn name(&self) -> &'static str;

    /// Mount the initial page.
    fn setup(&mut self, browser: &mut Browser);

    /// Issue the `step`-th scripted request.
    fn request(&mut self, browser: &mut Browser, step: u32);

    /// Advance the browser one frame and re-render.
    fn tick(&mut self, browser: &mut Browser);

    /// JSON rendering of the current snapshot.
    fn snapshot_json(&self) -> serde_json::Value;
}

/// Frames to wait after each request.
///
/// Every third request lands a quarter of the way through the previous
/// animation so the interruption paths get exercised too.
pub fn dwell(config: &DemoConfig, step: u32, handoffs: u32) -> u32 {
    let full = config
        .frames_per_transition
        .saturating_add(4)
        .saturating_mul(handoffs);
    if step % 3 == 2 { full / 4 } else { full }
}

/// Drive `scene` through `config.toggles` requests, then wait for it to settle.
pub fn play(scene: &mut dyn Scene, config: &DemoConfig, handoffs: u32) -> Result<u64, SceneError> {
    let mut browser = Browser::new(config.frames_per_transition);
    scene.setup(&mut browser);

    for step in 0..config.toggles {
        scene.request(&mut browser, step);
        for _ in 0..dwell(config, step, handoffs) {
            scene.tick(&mut browser);
        }
    }

    let limit = browser.clock() + (u64::from(config.frames_per_transition) + 4) * 8;
    while !browser.is_idle() {
        if browser.clock() >= limit {
            return Err(SceneError::DidNotSettle {
                scene: scene.name(),
                ticks: browser.clock(),
            });
        }
        scene.tick(&mut browser);
    }
    Ok(browser.clock())
}
