use anyhow::Result;
use rune_config::{ConfigError, RuneConfig};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn loads_slide_fixture() -> Result<()> {
    let config = RuneConfig::load_from_file(fixture("slide.toml"))?;

    assert_eq!(config.demo.scene.as_deref(), Some("swap"));
    assert_eq!(config.demo.frames_per_transition, 9);
    // Unset keys keep their defaults.
    assert_eq!(config.demo.toggles, 6);

    assert_eq!(config.css.enter.from.len(), 2);
    assert!(config.css.enter.active.contains("duration-200"));
    assert_eq!(config.css.leave.to.to_string(), "opacity-0");
    Ok(())
}

#[test]
fn saved_config_loads_back() -> Result<()> {
    let mut config = RuneConfig::load_from_file(fixture("slide.toml"))?;
    config.demo.toggles = 2;

    let path = std::env::temp_dir().join(format!("rune-config-{}.toml", std::process::id()));
    std::fs::write(&path, config.to_toml_string()?)?;
    let loaded = RuneConfig::load_from_file(&path);
    std::fs::remove_file(&path)?;

    assert_eq!(loaded?, config);
    Ok(())
}

#[test]
fn missing_fixture_reports_path() {
    let err = RuneConfig::load_from_file(fixture("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}
