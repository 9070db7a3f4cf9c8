//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Chatprobe: heuristic smoke tests for chat widgets in HTML snapshots
#[derive(Parser, Debug)]
#[command(name = "chatprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (FAIL lines only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the battery that fits the page
    Run(RunArgs),

    /// Print the effective policy as YAML
    Policy(PolicyArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// HTML snapshot of the page
    pub file: PathBuf,

    /// Location path the page was served at
    #[arg(long, default_value = "/")]
    pub path: String,

    /// Treat the page as embedded in another page
    #[arg(long)]
    pub embedded: bool,

    /// Viewport width in CSS pixels
    #[arg(long, default_value = "1280")]
    pub viewport_width: f32,

    /// Policy file (YAML)
    #[arg(long, env = "CHATPROBE_POLICY")]
    pub policy: Option<PathBuf>,

    /// Do not wait for the Enter probe to settle
    #[arg(long)]
    pub no_wait: bool,
}

/// Arguments for the policy command
#[derive(Parser, Debug)]
pub struct PolicyArgs {
    /// Policy file to validate and print instead of the defaults
    #[arg(long, env = "CHATPROBE_POLICY")]
    pub policy: Option<PathBuf>,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
