//! This module contains business logic for the commands for the application.
//!
//! The main entry point is the [`command_from_args`] function which converts CLI arguments into a command.
use anyhow::Result;

use crate::{
    args::{Apps, Catalog, GlobalArgs, Jobs, Resources},
    commands::with_api::WithApiClient,
    formatting::Format,
};
pub use core::{Command, CommandWithOutput, CommandWithOutputExt};

pub mod apps;
pub mod catalog;
mod core;
pub mod jobs;
mod with_api;

/// Convert CLI arguments into a command.
///
/// Every command is constructed with an API client built from the global
/// arguments, and its output will be formatted using the provided format and
/// printed to stdout.
pub fn command_from_args(
    args: Resources,
    global_args: &GlobalArgs,
    format: Format,
) -> Result<Box<dyn Command>> {
    match args {
        Resources::Apps(apps_args) => match apps_args {
            Apps::List(list_args) => {
                apps::List::with_api_client(list_args, global_args)?.with_print_to_stdout(format)
            }
            Apps::Add(add_args) => {
                apps::Add::with_api_client(add_args, global_args)?.with_print_to_stdout(format)
            }
            Apps::Update(update_args) => {
                apps::Update::with_api_client(update_args, global_args)?
                    .with_print_to_stdout(format)
            }
            Apps::Remove(remove_args) => {
                apps::Remove::with_api_client(remove_args, global_args)?
                    .with_print_to_stdout(format)
            }
        },
        Resources::Catalog(catalog_args) => match catalog_args {
            Catalog::List(list_args) => {
                catalog::List::with_api_client(list_args, global_args)?.with_print_to_stdout(format)
            }
            Catalog::Add(add_args) => {
                catalog::Add::with_api_client(add_args, global_args)?.with_print_to_stdout(format)
            }
        },
        Resources::Jobs(jobs_args) => match jobs_args {
            Jobs::List(list_args) => {
                jobs::List::with_api_client(list_args, global_args)?.with_print_to_stdout(format)
            }
            Jobs::Add(add_args) => {
                jobs::Add::with_api_client(add_args, global_args)?.with_print_to_stdout(format)
            }
        },
    }
}
