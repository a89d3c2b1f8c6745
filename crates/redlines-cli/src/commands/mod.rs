//! CLI command implementations

pub mod compare;
pub mod info;
pub mod install;

use redlines_engine::EngineConfig;

/// Builds the engine configuration shared by every command.
///
/// Directories left unset fall through to the engine's environment and
/// install-location defaults.
pub fn engine_config(target_dir: Option<&str>, bundle_dir: Option<&str>) -> EngineConfig {
    let mut config = EngineConfig::default();
    if let Some(dir) = target_dir {
        config = config.target_dir(dir);
    }
    if let Some(dir) = bundle_dir {
        config = config.bundle_dir(dir);
    }
    config
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
