//! CLI argument parsing layer.
//!
//! This module provides the CLI interface using clap derive macros.
//! It handles parsing command-line arguments and converting them into structured data types.
//!
//! The business logic layer is [`crate::commands`], which receives these parsed arguments.

use clap::{Parser, Subcommand};

mod cli;

pub use cli::{Cli, GlobalArgs};

/// Root command enum for the resources this CLI manages.
#[derive(Subcommand)]
pub enum Resources {
    /// Manage applications.
    #[command(subcommand)]
    Apps(Apps),
    /// Manage self-service catalog items.
    #[command(subcommand)]
    Catalog(Catalog),
    /// Manage automation jobs.
    #[command(subcommand)]
    Jobs(Jobs),
}

#[derive(Subcommand)]
pub enum Apps {
    #[command(alias = "ls")]
    List(AppsList),
    Add(AppsAdd),
    Update(AppsUpdate),
    #[command(alias = "rm")]
    Remove(AppsRemove),
}

#[derive(Subcommand)]
pub enum Catalog {
    #[command(alias = "ls")]
    List(CatalogList),
    Add(CatalogAdd),
}

#[derive(Subcommand)]
pub enum Jobs {
    #[command(alias = "ls")]
    List(JobsList),
    Add(JobsAdd),
}

/// List all applications.
#[derive(Parser)]
pub struct AppsList;

/// Add a new application.
///
/// Every value not provided as a flag is resolved interactively; flags and
/// `-O` overrides skip the corresponding prompt.
#[derive(Parser)]
pub struct AppsAdd {
    /// Name of the application.
    #[arg(long)]
    pub name: Option<String>,

    /// Description shown in the application overview.
    #[arg(long)]
    pub description: Option<String>,

    /// Group the application belongs to, by id or name.
    #[arg(long)]
    pub group: Option<String>,

    /// Target environment, by value or name.
    #[arg(long)]
    pub environment: Option<String>,

    /// Set one payload value by dotted path, e.g. -O config.refreshInterval=30.
    /// Repeatable; overrides are applied after everything else.
    #[arg(short = 'O', long = "option", value_name = "PATH=VALUE")]
    pub options: Vec<String>,
}

/// Update an existing application.
///
/// Runs without prompting: only the provided flags and `-O` overrides are
/// applied. Pass the literal value "null" to clear a field.
#[derive(Parser)]
pub struct AppsUpdate {
    /// Id of the application to update.
    #[arg(index = 1)]
    pub id: i64,

    /// New name of the application.
    #[arg(long)]
    pub name: Option<String>,

    /// New description, or "null" to clear it.
    #[arg(long)]
    pub description: Option<String>,

    /// New target environment.
    #[arg(long)]
    pub environment: Option<String>,

    /// Set one payload value by dotted path. Repeatable; applied last.
    #[arg(short = 'O', long = "option", value_name = "PATH=VALUE")]
    pub options: Vec<String>,
}

/// Remove an application.
#[derive(Parser)]
pub struct AppsRemove {
    /// Id of the application to remove.
    #[arg(index = 1)]
    pub id: i64,

    /// Flag that indicates whether to skip the confirmation prompt before proceeding with the requested action.
    #[arg(long)]
    pub force: bool,
}

/// List all catalog items.
#[derive(Parser)]
pub struct CatalogList;

/// Add a new catalog item.
///
/// The item type decides which follow-up fields are prompted for.
#[derive(Parser)]
pub struct CatalogAdd {
    /// Name of the catalog item.
    #[arg(long)]
    pub name: Option<String>,

    /// Description shown in the self-service portal.
    #[arg(long)]
    pub description: Option<String>,

    /// Item type: instance, blueprint or workflow.
    #[arg(long = "type")]
    pub item_type: Option<String>,

    /// Set one payload value by dotted path. Repeatable; applied last.
    #[arg(short = 'O', long = "option", value_name = "PATH=VALUE")]
    pub options: Vec<String>,
}

/// List all jobs.
#[derive(Parser)]
pub struct JobsList;

/// Add a new job.
///
/// The job type's own option-type descriptors are fetched from the API and
/// prompted for after the base fields.
#[derive(Parser)]
pub struct JobsAdd {
    /// Name of the job.
    #[arg(long)]
    pub name: Option<String>,

    /// Job type, by id or name.
    #[arg(long = "type")]
    pub job_type: Option<String>,

    /// Set one payload value by dotted path. Repeatable; applied last.
    #[arg(short = 'O', long = "option", value_name = "PATH=VALUE")]
    pub options: Vec<String>,
}
