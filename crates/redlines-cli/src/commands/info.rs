//! Info command implementation
//!
//! Reports which artifact this host needs and where it is expected to live,
//! without extracting anything.

use anyhow::Result;
use colored::Colorize;
use redlines_engine::{ArtifactRef, EngineConfig, EngineResult};
use std::process::ExitCode;

use super::print_json;
use crate::json_output::InfoOutput;

/// Resolves platform, artifact and paths for `config`.
pub fn build_info(config: &EngineConfig) -> EngineResult<InfoOutput> {
    let platform = config.resolve_platform()?;
    let artifact = ArtifactRef::resolve(&platform, &config.version);
    let bundle_dir = config.resolve_bundle_dir()?;
    let target_dir = config.resolve_target_dir()?;

    let archive_path = artifact.archive_path(&bundle_dir);
    let binary_path = artifact.binary_path(&target_dir);

    Ok(InfoOutput {
        version: config.version.clone(),
        platform,
        bundle_dir: bundle_dir.display().to_string(),
        archive_present: archive_path.is_file(),
        archive_path: archive_path.display().to_string(),
        target_dir: target_dir.display().to_string(),
        binary_present: binary_path.is_file(),
        binary_path: binary_path.display().to_string(),
        artifact,
    })
}

/// Run the info command
///
/// # Returns
/// Exit code: 0 on success, 1 if the platform is unsupported
pub fn run(config: EngineConfig, json_output: bool) -> Result<ExitCode> {
    let info = build_info(&config)?;

    if json_output {
        print_json(&info)?;
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Redlines Engine".cyan().bold());
    println!("{}", "===============".cyan());
    println!();
    println!("  {} version  {}", "->".green(), info.version);
    println!("  {} platform {}", "->".green(), info.platform);
    println!();

    println!("{}", "Artifact:".bold());
    print_presence(info.archive_present, &info.archive_path);
    println!();

    println!("{}", "Binary:".bold());
    print_presence(info.binary_present, &info.binary_path);
    if !info.binary_present && info.archive_present {
        println!(
            "     {}",
            "Run `redline install` or any compare to extract it.".dimmed()
        );
    }

    Ok(ExitCode::SUCCESS)
}

fn print_presence(present: bool, path: &str) {
    if present {
        println!("  {} {}", "ok".green(), path);
    } else {
        println!("  {} {} (missing)", "!!".yellow(), path);
    }
}
