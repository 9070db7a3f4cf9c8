//! Chatprobe CLI: smoke-test a chat widget from an HTML snapshot
//!
//! ## Usage
//!
//! ```bash
//! chatprobe run page.html                          # Launcher battery
//! chatprobe run chat.html --path /chatbot/         # Chat-surface battery
//! chatprobe run chat.html --embedded --viewport-width 375
//! chatprobe policy > policy.yaml                   # Default policy
//! ```

use chatprobe_cli::{
    print_policy, run_page, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity,
};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match cli.command {
        Commands::Run(args) => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            let counters = runtime.block_on(run_page(&config, &args))?;
            tracing::info!(
                pass = counters.pass,
                fail = counters.fail,
                info = counters.info,
                "run finished"
            );
            Ok(())
        }
        Commands::Policy(args) => {
            print!("{}", print_policy(&args)?);
            Ok(())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// Diagnostics go to stderr so stdout carries only the report
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
