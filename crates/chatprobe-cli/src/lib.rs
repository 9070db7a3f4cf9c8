//! Chatprobe CLI Library
//!
//! Command-line interface for the chatprobe harness: loads an HTML snapshot,
//! runs the battery that fits it, and prints the report.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, PolicyArgs, RunArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_line, ConsoleSink};
pub use runner::{load_policy, print_policy, run_page};
