//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up memsift defaults.

use crate::config::Config;
use anyhow::Result;

/// Settings given on the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct Changes {
    pub dump_radius: Option<usize>,
    pub color: Option<bool>,
    pub max_region_size: Option<u64>,
}

/// Handle the configure command
pub fn handle(changes: Changes, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if apply(&mut config, changes) {
        let path = config.save()?;
        println!("Configuration saved to: {}", path.display());
        show_config(&config);
    } else {
        show_usage();
    }

    Ok(())
}

/// Apply `changes` to `config`. Returns false if there was nothing to change.
pub fn apply(config: &mut Config, changes: Changes) -> bool {
    let mut changed = false;

    if let Some(radius) = changes.dump_radius {
        config.dump_radius = Some(radius);
        changed = true;
    }
    if let Some(color) = changes.color {
        config.color = Some(color);
        changed = true;
    }
    if let Some(size) = changes.max_region_size {
        config.max_region_size = Some(size);
        changed = true;
    }

    changed
}

/// Display current configuration
fn show_config(config: &Config) {
    println!("Dump radius: {}", config.dump_radius());
    println!("Color: {}", if config.color() { "on" } else { "off" });
    match config.max_region_size {
        Some(size) => println!("Max region size: {} bytes", size),
        None => println!("Max region size: unlimited"),
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: memsift configure [--radius N] [--color true|false] [--max-region-size SIZE]");
    println!("   or: memsift configure --show");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_nothing() {
        let mut config = Config::default();
        assert!(!apply(&mut config, Changes::default()));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let mut config = Config {
            dump_radius: Some(4),
            color: Some(true),
            max_region_size: None,
        };
        let changes = Changes {
            color: Some(false),
            max_region_size: Some(4096),
            ..Changes::default()
        };

        assert!(apply(&mut config, changes));
        assert_eq!(config.dump_radius, Some(4));
        assert_eq!(config.color, Some(false));
        assert_eq!(config.max_region_size, Some(4096));
    }

    #[test]
    fn test_show_usage_does_not_panic() {
        show_usage();
    }
}
