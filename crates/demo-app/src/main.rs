use anyhow::{Result, bail};
use rune_config::RuneConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod browser;
mod scenes;
use scenes::Scene;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration (rune.toml + env overrides)
    let config = RuneConfig::load();

    // Scene selection: --scene=NAME wins over DEMO_SCENE / rune.toml
    let scene_arg = std::env::args().find_map(|a| a.strip_prefix("--scene=").map(str::to_owned));
    let scene_name = scene_arg
        .or_else(|| config.demo.scene.clone())
        .unwrap_or_else(|| "transition".to_string());

    let (mut scene, handoffs): (Box<dyn Scene>, u32) = match scene_name.as_str() {
        "transition" => (Box::new(scenes::transition::TransitionScene::new(config.css.clone())), 1),
        "swap" => (Box::new(scenes::swap::SwapScene::new(config.css.clone())), 2),
        other => bail!("unknown scene '{other}' (expected 'transition' or 'swap')"),
    };

    info!(
        scene = scene.name(),
        frames_per_transition = config.demo.frames_per_transition,
        toggles = config.demo.toggles,
        "starting demo"
    );
    let ticks = scenes::play(scene.as_mut(), &config.demo, handoffs)?;
    info!(ticks, "settled");

    println!("{}", serde_json::to_string_pretty(&scene.snapshot_json())?);
    Ok(())
}
