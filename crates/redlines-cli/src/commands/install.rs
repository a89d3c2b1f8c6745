//! Install command implementation
//!
//! Extracts the bundled redlines binary for this platform, or confirms it is
//! already in place.

use anyhow::Result;
use colored::Colorize;
use redlines_engine::{Engine, EngineConfig, EngineResult};
use std::process::ExitCode;

use super::print_json;
use crate::json_output::{InstallOutput, JsonError};

/// Run the install command
///
/// # Arguments
/// * `config` - Engine configuration (target and bundle directories)
/// * `force` - Re-extract even if the binary is already present
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(config: EngineConfig, force: bool, json_output: bool) -> Result<ExitCode> {
    let result = Engine::new(config.force_extract(force));

    if json_output {
        let output = install_output(&result);
        print_json(&output)?;
        return Ok(if output.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        });
    }

    let engine = result?;
    if engine.extracted() {
        println!(
            "{} Extracted {} for {}",
            "ok".green(),
            engine.artifact().archive_name,
            engine.platform()
        );
    } else {
        println!("{} Redlines binary already present", "ok".green());
    }
    println!("   {}", engine.binary_path().display().to_string().dimmed());

    Ok(ExitCode::SUCCESS)
}

/// Describes an engine construction attempt for `--json`.
pub fn install_output(result: &EngineResult<Engine>) -> InstallOutput {
    match result {
        Ok(engine) => InstallOutput {
            success: true,
            binary_path: Some(engine.binary_path().display().to_string()),
            extracted: engine.extracted(),
            error: None,
        },
        Err(e) => InstallOutput {
            success: false,
            binary_path: None,
            extracted: false,
            error: Some(JsonError::from(e)),
        },
    }
}
