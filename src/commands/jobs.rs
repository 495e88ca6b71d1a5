//! Commands for the `jobs` resource: list and add.
//!
//! Job types carry their own option descriptors, so unlike the other add
//! flows the field list here is not known ahead of time: the command picks a
//! job type first, fetches that type's descriptors, and feeds them to the
//! prompt engine with their values nested under `customOptions`.

use std::fmt::Display;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::{
    api::{ApiClient, ApiError, JobCreator, JobLister, JobTypeOptionFetcher, sources::default_registry},
    args,
    commands::{CommandWithOutput, with_api::TryFromWithApiClient},
    interaction::{
        Interaction, SelectPrompt, SelectPromptOptions, SelectPromptResult, SpinnerInteraction,
    },
    models::Job,
    option_types::{
        FieldDescriptor, OptionSourceRegistry, PromptEngine, PromptError, PromptInteraction,
        SelectOption, SourceParams, coerce, payload,
    },
    table::Table,
};

/// List all jobs.
pub struct List {
    job_lister: Box<dyn ListJobManagement>,
}

pub trait ListJobManagement: JobLister + Send + Sync {}
impl<T: JobLister + Send + Sync> ListJobManagement for T {}

impl TryFromWithApiClient<args::JobsList> for List {
    fn try_from_with_api_client(_: args::JobsList, client: Arc<ApiClient>) -> Result<Self> {
        Ok(Self {
            job_lister: Box::new(client.as_ref().clone()),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListResult(Vec<Job>);

impl From<&ListResult> for Table {
    fn from(value: &ListResult) -> Self {
        Table::from_iter(
            &value.0,
            &[
                ("ID", |j| j.id.to_string()),
                ("NAME", |j| j.name.clone()),
                ("TYPE", |j| {
                    j.job_type
                        .as_ref()
                        .map(|t| t.name.clone())
                        .unwrap_or_default()
                }),
                ("ENABLED", |j| j.enabled.to_string()),
            ],
        )
    }
}

impl Display for ListResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Table::from(self).fmt(f)
    }
}

#[async_trait]
impl CommandWithOutput for List {
    type Output = ListResult;

    async fn execute(&mut self) -> Result<Self::Output> {
        Ok(ListResult(self.job_lister.list_jobs().await?))
    }
}

// Interaction dependencies for the add command
pub trait AddInteraction: PromptInteraction + SpinnerInteraction + Send + Sync {}
impl<T: PromptInteraction + SpinnerInteraction + Send + Sync> AddInteraction for T {}

pub trait AddJobManagement: JobCreator + JobTypeOptionFetcher + Send + Sync {}
impl<T: JobCreator + JobTypeOptionFetcher + Send + Sync> AddJobManagement for T {}

/// Create a job of a chosen type, prompting that type's own options.
pub struct Add {
    name: Option<String>,
    job_type: Option<String>,
    overrides: Vec<String>,

    interaction: Box<dyn AddInteraction>,
    registry: OptionSourceRegistry,
    job_management: Box<dyn AddJobManagement>,
}

impl TryFromWithApiClient<args::JobsAdd> for Add {
    fn try_from_with_api_client(args: args::JobsAdd, client: Arc<ApiClient>) -> Result<Self> {
        Ok(Self {
            name: args.name,
            job_type: args.job_type,
            overrides: args.options,

            interaction: Box::new(Interaction::new()),
            registry: default_registry(client.clone()),
            job_management: Box::new(client.as_ref().clone()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AddResult {
    Added { id: i64, name: String },
    Failed { name: Option<String>, error: String },
    Canceled,
}

impl Display for AddResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added { id, name } => write!(f, "Job '{}' created with id {}", name, id),
            Self::Failed {
                name: Some(name),
                error,
            } => write!(f, "Creating job '{}' failed: {}", name, error),
            Self::Failed { name: None, error } => write!(f, "Creating job failed: {}", error),
            Self::Canceled => write!(f, "Job not created"),
        }
    }
}

#[async_trait]
impl CommandWithOutput for Add {
    type Output = AddResult;

    async fn execute(&mut self) -> Result<Self::Output> {
        let job_types = self
            .job_management
            .list_job_types()
            .await
            .context("listing job types")?;
        if job_types.is_empty() {
            return Ok(AddResult::Failed {
                name: self.name.clone(),
                error: "no job types available".to_string(),
            });
        }

        let type_options: Vec<SelectOption> = job_types
            .iter()
            .map(|job_type| SelectOption::new(job_type.name.clone(), job_type.id))
            .collect();

        let type_value = match &self.job_type {
            Some(raw) => match coerce::match_select(raw, &type_options) {
                Some(value) => value,
                None => {
                    return Ok(AddResult::Failed {
                        name: self.name.clone(),
                        error: format!("no job type matching '{raw}'"),
                    });
                }
            },
            None => {
                let selection = self
                    .interaction
                    .select(
                        SelectPromptOptions::builder()
                            .message("Job type?")
                            .options(type_options.iter().map(|option| option.name.clone()))
                            .build(),
                    )
                    .context("selecting the job type")?;

                match selection {
                    SelectPromptResult::Selected(index) => {
                        let Some(option) = type_options.get(index) else {
                            bail!("job type selection {index} is out of range");
                        };
                        option.submit_value()
                    }
                    SelectPromptResult::Canceled => return Ok(AddResult::Canceled),
                }
            }
        };
        let Some(type_id) = type_value.as_i64() else {
            bail!("job type option carries a non-numeric id");
        };

        let mut fields = vec![
            FieldDescriptor::builder()
                .field_name("name")
                .field_label("Name")
                .required(true)
                .display_order(0)
                .build(),
        ];
        let custom_fields = self
            .job_management
            .job_type_option_types(type_id)
            .await
            .context("fetching job type options")?;
        fields.extend(custom_fields.into_iter().map(namespace_under_custom_options));

        let mut supplied = Map::new();
        if let Some(name) = &self.name {
            supplied.insert("name".to_string(), Value::String(name.clone()));
        }
        let mut params = SourceParams::new();
        params.insert("jobTypeId".to_string(), json!(type_id));

        let engine = PromptEngine::new(self.interaction.as_ref(), &self.registry);
        let resolved = match engine.prompt(&fields, &supplied, &params).await {
            Ok(resolved) => resolved,
            Err(PromptError::Canceled) => return Ok(AddResult::Canceled),
            Err(error @ (PromptError::Validation { .. } | PromptError::Coercion { .. })) => {
                return Ok(AddResult::Failed {
                    name: self.name.clone(),
                    error: error.to_string(),
                });
            }
            Err(error) => return Err(error).context("resolving job options"),
        };

        let mut payload = resolved.into_map();
        payload::set_at(&mut payload, &["type", "id"], json!(type_id));
        payload::apply_set_expressions(&mut payload, &self.overrides)
            .context("applying --option overrides")?;
        let payload = payload::deep_compact(&Value::Object(payload));

        // When _spinner goes out of scope, the spinner will be stopped
        let _spinner = self
            .interaction
            .start_spinner("Creating job...".to_string())?;

        match self.job_management.create_job(&payload).await {
            Ok(job) => Ok(AddResult::Added {
                id: job.id,
                name: job.name,
            }),
            Err(error @ ApiError::Status { .. }) => Ok(AddResult::Failed {
                name: self.name.clone(),
                error: error.to_string(),
            }),
            Err(error) => Err(error).context("creating the job"),
        }
    }
}

/// Job option values live under `customOptions` in the payload regardless of
/// the context the descriptor arrived with.
fn namespace_under_custom_options(mut field: FieldDescriptor) -> FieldDescriptor {
    field.field_context = if field.field_context.is_empty() {
        "customOptions".to_string()
    } else {
        format!("customOptions.{}", field.field_context)
    };
    field
}
