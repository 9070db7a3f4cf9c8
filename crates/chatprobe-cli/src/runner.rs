//! Command execution

use std::path::Path;

use chatprobe::{load_html, run_harness, Document, Policy, PolicyConfig, RunCounters};

use crate::commands::{PolicyArgs, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ConsoleSink;

/// Load the policy file if one is given, else the defaults
pub fn load_policy(path: Option<&Path>) -> CliResult<PolicyConfig> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading policy");
            PolicyConfig::load(path).map_err(|e| {
                CliError::config(format!("cannot use policy {}: {e}", path.display()))
            })
        }
        None => Ok(PolicyConfig::default()),
    }
}

/// Run the battery for one snapshot and print its report.
///
/// Returns the final counters. Without `--no-wait` they include the settled
/// Enter probe.
pub async fn run_page(config: &CliConfig, args: &RunArgs) -> CliResult<RunCounters> {
    if !(args.viewport_width.is_finite() && args.viewport_width > 0.0) {
        return Err(CliError::invalid_argument(format!(
            "viewport width must be positive, got {}",
            args.viewport_width
        )));
    }
    let policy: Policy = load_policy(args.policy.as_deref())?.compile()?;

    let mut doc = load_html(&args.file)?
        .with_location_path(args.path.clone())
        .with_embedded(args.embedded)
        .with_viewport_width(args.viewport_width);
    tracing::debug!(
        file = %args.file.display(),
        elements = doc.all_elements().len(),
        "snapshot loaded"
    );

    let sink = ConsoleSink::new(config.color.should_color(), config.verbosity.is_quiet());
    let run = run_harness(&mut doc, &policy, sink);
    let report = if args.no_wait {
        run.abandon()
    } else {
        run.settle(&mut doc).await
    };
    Ok(report.counters())
}

/// Print the effective policy as YAML
pub fn print_policy(args: &PolicyArgs) -> CliResult<String> {
    let config = load_policy(args.policy.as_deref())?;
    // Compile to reject bad patterns before printing.
    config.clone().compile()?;
    Ok(config.to_yaml()?)
}
