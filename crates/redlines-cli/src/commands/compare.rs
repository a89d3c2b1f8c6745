//! Compare command implementation
//!
//! Redlines a modified document against the original and writes the result
//! with the differences recorded as tracked changes.

use anyhow::{Context, Result};
use colored::Colorize;
use redlines_engine::{Engine, EngineConfig, EngineError, EngineResult, RedlineOutput};
use std::fs;
use std::path::Path;
use std::process::ExitCode;

use super::print_json;
use crate::json_output::{error_codes, CompareOutput, CompareResult, JsonError};

/// Arguments for a single comparison.
#[derive(Debug, Clone)]
pub struct CompareArgs<'a> {
    pub author: &'a str,
    pub original: &'a Path,
    pub modified: &'a Path,
    pub output: &'a Path,
}

/// Run the compare command
///
/// # Arguments
/// * `config` - Engine configuration
/// * `args` - Author label plus original, modified and output paths
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on error
pub fn run(config: EngineConfig, args: &CompareArgs<'_>, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(config, args)
    } else {
        run_human(config, args)
    }
}

fn redline(config: EngineConfig, args: &CompareArgs<'_>) -> EngineResult<RedlineOutput> {
    let engine = Engine::new(config)?;
    engine.run_redline(args.author, args.original, args.modified)
}

fn run_human(config: EngineConfig, args: &CompareArgs<'_>) -> Result<ExitCode> {
    let output = match redline(config, args) {
        Ok(output) => output,
        Err(EngineError::ProcessFailed {
            exit_code,
            stdout,
            stderr,
        }) => {
            eprintln!(
                "{} redlines exited with status {}",
                "error".red(),
                exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string())
            );
            print_streams(stdout.as_deref(), stderr.as_deref());
            return Ok(ExitCode::from(1));
        }
        Err(e) => return Err(e.into()),
    };

    fs::write(args.output, &output.redline)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "{} Wrote {} ({} bytes)",
        "ok".green(),
        args.output.display(),
        output.redline.len()
    );
    if let Some(count) = output.revision_count() {
        println!("   {} revision(s) attributed to {}", count, args.author.bold());
    }
    print_streams(output.stdout.as_deref(), output.stderr.as_deref());

    Ok(ExitCode::SUCCESS)
}

fn run_json(config: EngineConfig, args: &CompareArgs<'_>) -> Result<ExitCode> {
    let output = compare_output(config, args);

    if let Err(e) = print_json(&output) {
        let fallback = CompareOutput::failure(JsonError::new(
            error_codes::JSON_SERIALIZE,
            e.to_string(),
        ));
        println!("{}", serde_json::to_string(&fallback)?);
    }

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Runs a comparison for `--json`, writing the redline on success.
pub fn compare_output(config: EngineConfig, args: &CompareArgs<'_>) -> CompareOutput {
    match redline(config, args) {
        Ok(output) => match fs::write(args.output, &output.redline) {
            Ok(()) => CompareOutput::success(CompareResult {
                output: args.output.display().to_string(),
                bytes: output.redline.len(),
                revisions: output.revision_count(),
                stdout: output.stdout,
                stderr: output.stderr,
            }),
            Err(e) => CompareOutput::failure(JsonError::new(
                error_codes::OUTPUT_WRITE,
                format!("Failed to write {}: {}", args.output.display(), e),
            )),
        },
        Err(e) => CompareOutput::failure(JsonError::from(&e)),
    }
}

fn print_streams(stdout: Option<&str>, stderr: Option<&str>) {
    if let Some(text) = stdout {
        println!("{}", "stdout:".bold());
        for line in text.lines() {
            println!("  {}", line.dimmed());
        }
    }
    if let Some(text) = stderr {
        eprintln!("{}", "stderr:".yellow().bold());
        for line in text.lines() {
            eprintln!("  {line}");
        }
    }
}
