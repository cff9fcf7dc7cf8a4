//! Command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::adapters::TomlConfigAdapter;
use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::cli::args::{CheckArgs, OutputFormat, PolicyArgs, PolicyFormat, ValidateArgs};
use crate::domain::model::{QuickValidation, ValidationVerdict};
use crate::domain::policy::CompatibilityPolicy;
use crate::error::VideoGateResult;
use crate::utils::Utils;

/// Execute the validate command; returns `true` when every input passed
pub async fn validate(container: &DefaultAppContainer, args: ValidateArgs) -> Result<bool> {
    let files = collect_inputs(&args.inputs)?;
    info!("Validating {} file(s)", files.len());

    let interactor = container.validate_interactor();
    let results: Vec<(PathBuf, VideoGateResult<ValidationVerdict>)> = match &args.name {
        Some(name) => {
            if files.len() != 1 {
                anyhow::bail!("--name can only be used with a single input file");
            }
            let path = files[0].clone();
            let buffer = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let result = interactor.validate_video(&buffer, name).await;
            vec![(path, result)]
        }
        None => interactor.validate_many(files).await,
    };

    let all_valid = results
        .iter()
        .all(|(_, result)| matches!(result, Ok(verdict) if verdict.is_valid()));

    match args.format {
        OutputFormat::Text => {
            for (path, result) in &results {
                print!("{}", render_text(path, result));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results_to_value(&results))?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&results_to_value(&results))?);
        }
    }

    Ok(all_valid)
}

/// Execute the check command; returns `true` when every name is accepted
pub fn check(container: &DefaultAppContainer, args: CheckArgs) -> Result<bool> {
    let interactor = container.validate_interactor();
    let checks: Vec<(String, QuickValidation)> = args
        .names
        .into_iter()
        .map(|name| {
            let result = interactor.quick_validate(&name);
            (name, result)
        })
        .collect();

    for (name, result) in checks.iter().filter(|(_, r)| !r.valid) {
        warn!("Pre-check rejected {}", name);
        if let Some(error) = &result.error {
            eprintln!("{}: {}", name, error);
        }
    }

    match args.format {
        OutputFormat::Text => {
            for (name, result) in &checks {
                println!("{}: {}", name, if result.valid { "ok" } else { "rejected" });
            }
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            let value: Value = checks
                .iter()
                .map(|(name, result)| json!({ "file": name, "valid": result.valid, "error": result.error }))
                .collect();
            if args.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", serde_yaml::to_string(&value)?);
            }
        }
    }

    Ok(checks.iter().all(|(_, r)| r.valid))
}

/// `[policy]` table, so TOML output can be pasted into a config file
#[derive(Serialize)]
struct PolicyDocument<'a> {
    policy: &'a CompatibilityPolicy,
}

/// Execute the policy command
pub fn policy(container: &DefaultAppContainer, args: PolicyArgs) -> Result<()> {
    let policy = &container.config().policy;
    match args.format {
        PolicyFormat::Toml => print!("{}", TomlConfigAdapter::to_toml_string(&PolicyDocument { policy })?),
        PolicyFormat::Json => println!("{}", serde_json::to_string_pretty(policy)?),
    }
    Ok(())
}

/// Expand directories into their files, sorted for stable output
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!("Skipping unreadable entry: {}", e);
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .collect();
            found.sort();
            files.extend(found);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            anyhow::bail!("Input does not exist: {}", input.display());
        }
    }

    if files.is_empty() {
        anyhow::bail!("No files found to validate");
    }
    Ok(files)
}

fn results_to_value(results: &[(PathBuf, VideoGateResult<ValidationVerdict>)]) -> Value {
    results
        .iter()
        .map(|(path, result)| match result {
            Ok(verdict) => json!({ "file": path.display().to_string(), "verdict": verdict }),
            Err(e) => json!({ "file": path.display().to_string(), "error": e.to_string() }),
        })
        .collect()
}

/// Human-readable report for one file
pub fn render_text(path: &Path, result: &VideoGateResult<ValidationVerdict>) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", path.display()));

    let verdict = match result {
        Ok(verdict) => verdict,
        Err(e) => {
            output.push_str(&format!("  Status: error ({})\n", e));
            return output;
        }
    };

    output.push_str(&format!("  Status: {}\n", verdict));

    if let Some(info) = verdict.media_info() {
        output.push_str(&format!("  Codec: {}\n", info.codec));
        output.push_str(&format!("  Container: {}\n", info.container));
        if let Some((width, height)) = info.dimensions() {
            output.push_str(&format!("  Resolution: {}x{}\n", width, height));
        }
        if let Some(duration) = info
            .duration
            .and_then(|secs| std::time::Duration::try_from_secs_f64(secs).ok())
        {
            output.push_str(&format!("  Duration: {}\n", Utils::format_duration(duration)));
        }
        if let Some(bitrate) = info.bitrate {
            output.push_str(&format!("  Bitrate: {} Mbps\n", Utils::bitrate_to_mbps(bitrate)));
        }
    }

    for error in verdict.errors() {
        output.push_str(&format!("  error: {}\n", error));
    }
    for warning in verdict.warnings() {
        output.push_str(&format!("  warning: {}\n", warning));
    }

    output
}
