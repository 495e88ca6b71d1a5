use anyhow::Result;
use clap::Parser;

use crate::args::Cli;
use crate::commands::command_from_args;
use crate::formatting::Format;
use crate::logging::setup_logging;

mod api;
mod args;
mod commands;
mod formatting;
mod interaction;
mod logging;
mod models;
mod option_types;
mod table;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.global_args.debug);

    let format = cli.global_args.format.unwrap_or(Format::Text);
    command_from_args(cli.command, &cli.global_args, format)?
        .execute()
        .await
}
