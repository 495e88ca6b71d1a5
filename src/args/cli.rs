//! Root command for the CLI.
//!
//! The subcommands are defined in the [`Resources`](super::Resources) enum;
//! this module adds the global flags every subcommand accepts.
use clap::{Args, Parser};

use crate::formatting::Format;

use super::Resources;

/// Manage cloud resources from the terminal
#[derive(Parser)]
#[command(name = "stratus", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global_args: GlobalArgs,

    #[command(subcommand)]
    pub command: Resources,
}

#[derive(Args)]
#[command(rename_all = "camelCase")]
pub struct GlobalArgs {
    /// Enable debug logging.
    ///
    /// Setting this flag will set the log level to debug and only show logs from this crate.
    ///
    /// The log level can also be overridden by setting the `STRATUS_LOG` environment variable.
    /// If the `STRATUS_LOG_ALL` environment variable is set, it will show logs from all crates at the specified level.
    #[arg(global = true, hide = true, long, short = 'D', default_value = "false")]
    pub debug: bool,

    /// Output format.
    #[arg(global = true, long = "output", short = 'o')]
    pub format: Option<Format>,

    /// Base URL of the management API.
    #[arg(global = true, long, env = "STRATUS_URL")]
    pub url: Option<String>,

    /// API token used for bearer authentication.
    #[arg(global = true, long, env = "STRATUS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}
