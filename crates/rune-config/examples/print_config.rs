/// Example program to print the loaded configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    // Load configuration from rune.toml
    let config = rune_config::RuneConfig::load();

    println!("=== Rune Motion Configuration ===\n");

    println!("Demo Settings:");
    println!("  Scene: {:?}", config.demo.scene);
    println!("  Frames per transition: {}", config.demo.frames_per_transition);
    println!("  Toggles: {}", config.demo.toggles);
    println!();

    println!("Enter Classes:");
    println!("  From: {}", config.css.enter.from);
    println!("  Active: {}", config.css.enter.active);
    println!("  To: {}", config.css.enter.to);
    println!();

    println!("Leave Classes:");
    println!("  From: {}", config.css.leave.from);
    println!("  Active: {}", config.css.leave.active);
    println!("  To: {}", config.css.leave.to);
    println!();

    // Try to serialize to TOML for verification
    match config.to_toml_string() {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
