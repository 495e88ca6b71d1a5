//! Commands for the `apps` resource: list, add, update and remove.

use std::fmt::Display;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    api::{
        ApiClient, ApiError, AppCreator, AppDeleter, AppLister, AppUpdater,
        sources::default_registry,
    },
    args,
    commands::{CommandWithOutput, with_api::TryFromWithApiClient},
    interaction::{
        ConfirmationPrompt, ConfirmationPromptOptions, ConfirmationPromptResult, Interaction,
        SpinnerInteraction,
    },
    models::App,
    option_types::{
        FieldDescriptor, FieldType, OptionSource, OptionSourceRegistry, PromptEngine, PromptError,
        PromptInteraction, SelectOption, SourceParams, payload,
    },
    table::Table,
};

/// Environments offered when creating or updating an application.
const ENVIRONMENTS: &[(&str, &str)] = &[
    ("Development", "dev"),
    ("Test", "test"),
    ("Staging", "staging"),
    ("Production", "prod"),
];

fn environment_options() -> Vec<SelectOption> {
    ENVIRONMENTS
        .iter()
        .map(|(name, value)| SelectOption::new(*name, *value))
        .collect()
}

/// List all applications visible to the current token.
pub struct List {
    app_lister: Box<dyn ListAppManagement>,
}

pub trait ListAppManagement: AppLister + Send + Sync {}
impl<T: AppLister + Send + Sync> ListAppManagement for T {}

impl TryFromWithApiClient<args::AppsList> for List {
    fn try_from_with_api_client(_: args::AppsList, client: Arc<ApiClient>) -> Result<Self> {
        Ok(Self {
            app_lister: Box::new(client.as_ref().clone()),
        })
    }
}

/// Newtype over the listed applications so table conversion and [`Display`]
/// can live on the result type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListResult(Vec<App>);

impl From<&ListResult> for Table {
    fn from(value: &ListResult) -> Self {
        Table::from_iter(
            &value.0,
            &[
                ("ID", |a| a.id.to_string()),
                ("NAME", |a| a.name.clone()),
                ("GROUP", |a| {
                    a.group.as_ref().map(|g| g.name.clone()).unwrap_or_default()
                }),
                ("ENV", |a| a.environment.clone().unwrap_or_default()),
                ("STATUS", |a| a.status.clone().unwrap_or_default()),
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
        Ok(ListResult(self.app_lister.list_apps().await?))
    }
}

// Interaction dependencies for the add command
pub trait AddInteraction: PromptInteraction + SpinnerInteraction + Send + Sync {}
impl<T: PromptInteraction + SpinnerInteraction + Send + Sync> AddInteraction for T {}

pub trait AddAppManagement: AppCreator + Send + Sync {}
impl<T: AppCreator + Send + Sync> AddAppManagement for T {}

/// Create an application, prompting for whatever the flags left out.
pub struct Add {
    name: Option<String>,
    description: Option<String>,
    group: Option<String>,
    environment: Option<String>,
    overrides: Vec<String>,

    interaction: Box<dyn AddInteraction>,
    registry: OptionSourceRegistry,
    app_management: Box<dyn AddAppManagement>,
}

impl TryFromWithApiClient<args::AppsAdd> for Add {
    fn try_from_with_api_client(args: args::AppsAdd, client: Arc<ApiClient>) -> Result<Self> {
        Ok(Self {
            name: args.name,
            description: args.description,
            group: args.group,
            environment: args.environment,
            overrides: args.options,

            interaction: Box::new(Interaction::new()),
            registry: default_registry(client.clone()),
            app_management: Box::new(client.as_ref().clone()),
        })
    }
}

/// Fields driving the interactive add flow. The two `config` fields are
/// optional extras; blank answers are dropped by the final compaction.
fn add_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::builder()
            .field_name("name")
            .field_label("Name")
            .required(true)
            .display_order(0)
            .build(),
        FieldDescriptor::builder()
            .field_name("description")
            .field_label("Description")
            .field_type(FieldType::Textarea)
            .display_order(1)
            .build(),
        FieldDescriptor::builder()
            .field_name("groupId")
            .field_label("Group")
            .field_type(FieldType::Select)
            .required(true)
            .option_source(OptionSource::Named("groups".to_string()))
            .code("group")
            .display_order(2)
            .build(),
        FieldDescriptor::builder()
            .field_name("environment")
            .field_label("Environment")
            .field_type(FieldType::Select)
            .select_options(environment_options())
            .display_order(3)
            .build(),
        FieldDescriptor::builder()
            .field_name("refreshInterval")
            .field_context("config")
            .field_label("Refresh interval")
            .field_type(FieldType::Number)
            .description("Seconds between status refreshes")
            .display_order(4)
            .build(),
        FieldDescriptor::builder()
            .field_name("autoScale")
            .field_context("config")
            .field_label("Auto scale")
            .field_type(FieldType::Checkbox)
            .default_value(Value::Bool(false))
            .display_order(5)
            .build(),
    ]
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
            Self::Added { id, name } => write!(f, "Application '{}' created with id {}", name, id),
            Self::Failed {
                name: Some(name),
                error,
            } => write!(f, "Creating application '{}' failed: {}", name, error),
            Self::Failed { name: None, error } => {
                write!(f, "Creating application failed: {}", error)
            }
            Self::Canceled => write!(f, "Application not created"),
        }
    }
}

#[async_trait]
impl CommandWithOutput for Add {
    type Output = AddResult;

    async fn execute(&mut self) -> Result<Self::Output> {
        let fields = add_fields();
        let supplied = self.supplied_values();
        let params = SourceParams::new();

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
            Err(error) => return Err(error).context("resolving application options"),
        };

        let mut payload = resolved.into_map();
        payload::apply_set_expressions(&mut payload, &self.overrides)
            .context("applying --option overrides")?;
        // Create payloads carry no explicit clears, so blanks are just noise.
        let payload = payload::deep_compact(&Value::Object(payload));

        // When _spinner goes out of scope, the spinner will be stopped
        let _spinner = self
            .interaction
            .start_spinner("Creating application...".to_string())?;

        match self.app_management.create_app(&payload).await {
            Ok(app) => Ok(AddResult::Added {
                id: app.id,
                name: app.name,
            }),
            // The API rejecting the payload is an outcome, not a failure of the command itself.
            Err(error @ ApiError::Status { .. }) => Ok(AddResult::Failed {
                name: self.name.clone(),
                error: error.to_string(),
            }),
            Err(error) => Err(error).context("creating the application"),
        }
    }
}

impl Add {
    fn supplied_values(&self) -> Map<String, Value> {
        let flags = [
            ("name", &self.name),
            ("description", &self.description),
            ("groupId", &self.group),
            ("environment", &self.environment),
        ];

        let mut supplied = Map::new();
        for (key, value) in flags {
            if let Some(value) = value {
                supplied.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        supplied
    }
}

pub trait UpdateAppManagement: AppUpdater + Send + Sync {}
impl<T: AppUpdater + Send + Sync> UpdateAppManagement for T {}

/// Update an application from flags and `-O` overrides, without prompting.
///
/// Passing the literal value `null` clears a field on the server, so the
/// payload is sent uncompacted.
pub struct Update {
    id: i64,
    name: Option<String>,
    description: Option<String>,
    environment: Option<String>,
    overrides: Vec<String>,

    registry: OptionSourceRegistry,
    app_management: Box<dyn UpdateAppManagement>,
}

impl TryFromWithApiClient<args::AppsUpdate> for Update {
    fn try_from_with_api_client(args: args::AppsUpdate, client: Arc<ApiClient>) -> Result<Self> {
        Ok(Self {
            id: args.id,
            name: args.name,
            description: args.description,
            environment: args.environment,
            overrides: args.options,

            registry: default_registry(client.clone()),
            app_management: Box::new(client.as_ref().clone()),
        })
    }
}

fn update_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::builder()
            .field_name("name")
            .field_label("Name")
            .display_order(0)
            .build(),
        FieldDescriptor::builder()
            .field_name("description")
            .field_label("Description")
            .field_type(FieldType::Textarea)
            .display_order(1)
            .build(),
        FieldDescriptor::builder()
            .field_name("environment")
            .field_label("Environment")
            .field_type(FieldType::Select)
            .select_options(environment_options())
            .display_order(2)
            .build(),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateResult {
    Updated { id: i64, name: String },
    Failed { id: i64, error: String },
}

impl Display for UpdateResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Updated { name, .. } => write!(f, "Application '{}' updated", name),
            Self::Failed { id, error } => {
                write!(f, "Updating application {} failed: {}", id, error)
            }
        }
    }
}

#[async_trait]
impl CommandWithOutput for Update {
    type Output = UpdateResult;

    async fn execute(&mut self) -> Result<Self::Output> {
        let fields = update_fields();
        let supplied = self.supplied_values();
        let params = SourceParams::new();

        let interaction = Interaction::new();
        let engine = PromptEngine::new(&interaction, &self.registry);
        let resolved = match engine.resolve(&fields, &supplied, &params).await {
            Ok(resolved) => resolved,
            Err(error @ (PromptError::Validation { .. } | PromptError::Coercion { .. })) => {
                return Ok(UpdateResult::Failed {
                    id: self.id,
                    error: error.to_string(),
                });
            }
            Err(error) => return Err(error).context("resolving application options"),
        };

        let mut payload = resolved.into_map();
        payload::apply_set_expressions(&mut payload, &self.overrides)
            .context("applying --option overrides")?;

        if payload.is_empty() {
            return Ok(UpdateResult::Failed {
                id: self.id,
                error: "no changes requested".to_string(),
            });
        }

        match self
            .app_management
            .update_app(self.id, &Value::Object(payload))
            .await
        {
            Ok(app) => Ok(UpdateResult::Updated {
                id: app.id,
                name: app.name,
            }),
            Err(ApiError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }) => Ok(UpdateResult::Failed {
                id: self.id,
                error: "application not found".to_string(),
            }),
            Err(error @ ApiError::Status { .. }) => Ok(UpdateResult::Failed {
                id: self.id,
                error: error.to_string(),
            }),
            Err(error) => Err(error).context("updating the application"),
        }
    }
}

impl Update {
    fn supplied_values(&self) -> Map<String, Value> {
        let flags = [
            ("name", &self.name),
            ("description", &self.description),
            ("environment", &self.environment),
        ];

        let mut supplied = Map::new();
        for (key, value) in flags {
            if let Some(value) = value {
                supplied.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        supplied
    }
}

// Interaction dependencies for the remove command
pub trait RemoveInteraction: ConfirmationPrompt + SpinnerInteraction + Send + Sync {}
impl<T: ConfirmationPrompt + SpinnerInteraction + Send + Sync> RemoveInteraction for T {}

pub trait RemoveAppManagement: AppDeleter + Send + Sync {}
impl<T: AppDeleter + Send + Sync> RemoveAppManagement for T {}

pub struct Remove {
    id: i64,
    force: bool,

    interaction: Box<dyn RemoveInteraction>,
    app_management: Box<dyn RemoveAppManagement>,
}

impl TryFromWithApiClient<args::AppsRemove> for Remove {
    fn try_from_with_api_client(args: args::AppsRemove, client: Arc<ApiClient>) -> Result<Self> {
        Ok(Self {
            id: args.id,
            force: args.force,

            interaction: Box::new(Interaction::new()),
            app_management: Box::new(client.as_ref().clone()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RemoveResult {
    Removed { id: i64 },
    Failed { id: i64, error: String },
    Canceled { id: i64 },
}

impl Display for RemoveResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Removed { id } => write!(f, "Application {} removed", id),
            Self::Failed { id, error } => {
                write!(f, "Removing application {} failed: {}", id, error)
            }
            Self::Canceled { .. } => write!(f, "Application not removed"),
        }
    }
}

#[async_trait]
impl CommandWithOutput for Remove {
    type Output = RemoveResult;

    async fn execute(&mut self) -> Result<Self::Output> {
        if !self.force {
            let confirmation = self
                .interaction
                .confirm(
                    ConfirmationPromptOptions::builder()
                        .pre_confirmation_help_text(
                            "This operation will delete the application. This action cannot be undone."
                                .to_string(),
                        )
                        .message(format!(
                            "Are you sure you want to remove application {}?",
                            self.id
                        ))
                        .default(false)
                        .build(),
                )
                .context("confirming removal")?;

            if matches!(
                confirmation,
                ConfirmationPromptResult::No | ConfirmationPromptResult::Canceled
            ) {
                // Operation cancelled by user.
                return Ok(RemoveResult::Canceled { id: self.id });
            }
        }

        // When _spinner goes out of scope, the spinner will be stopped
        let _spinner = self
            .interaction
            .start_spinner("Removing application...".to_string())?;

        match self.app_management.delete_app(self.id).await {
            Ok(()) => Ok(RemoveResult::Removed { id: self.id }),
            Err(ApiError::Status {
                status: StatusCode::NOT_FOUND,
                ..
            }) => Ok(RemoveResult::Failed {
                id: self.id,
                error: "application not found".to_string(),
            }),
            Err(error @ ApiError::Status { .. }) => Ok(RemoveResult::Failed {
                id: self.id,
                error: error.to_string(),
            }),
            Err(error) => Err(error).context("removing the application"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApi;
    use crate::interaction::mocks::MockInteraction;
    use crate::interaction::{InputPromptResult, SpinnerHandle};
    use crate::models::NamedRef;
    use crate::option_types::sources::mocks::MockOptionSourceProvider;
    use anyhow::anyhow;
    use serde_json::json;

    fn create_spinner_handle() -> SpinnerHandle {
        SpinnerHandle::new(Box::new(|| {}))
    }

    fn test_app(id: i64, name: &str) -> App {
        App {
            id,
            name: name.to_string(),
            description: None,
            environment: Some("dev".to_string()),
            status: Some("running".to_string()),
            group: Some(NamedRef {
                id: 4,
                name: "Ops".to_string(),
            }),
        }
    }

    /// Registry whose `groups` source serves Ops (4) and Platform (7).
    fn groups_registry() -> OptionSourceRegistry {
        let mut provider = MockOptionSourceProvider::new();
        provider.expect_fetch_options().returning(|_| {
            Ok(vec![
                SelectOption::new("Ops", 4),
                SelectOption::new("Platform", 7),
            ])
        });

        let mut registry = OptionSourceRegistry::new();
        registry.register("groups", Arc::new(provider));
        registry
    }

    /// The two optional `config` prompts of the add flow: leave the refresh
    /// interval blank and answer no to auto scaling.
    fn expect_advanced_prompts(mock: &mut MockInteraction) {
        mock.expect_input()
            .withf(|options| options.message == "Refresh interval?")
            .return_once(|_| Ok(InputPromptResult::Input(String::new())));
        mock.expect_confirm()
            .return_once(|_| Ok(ConfirmationPromptResult::No));
    }

    fn not_found() -> ApiError {
        ApiError::Status {
            status: StatusCode::NOT_FOUND,
            message: "no such record".to_string(),
        }
    }

    // ==== List ====

    #[tokio::test]
    async fn test_list_command() {
        let mut mock_api = MockApi::new();
        mock_api
            .expect_list_apps()
            .return_once(|| Ok(vec![test_app(1, "web-tier"), test_app(2, "worker")]));

        let mut list_command = List {
            app_lister: Box::new(mock_api),
        };

        let result = list_command
            .execute()
            .await
            .expect("execute should succeed");

        assert_eq!(
            result,
            ListResult(vec![test_app(1, "web-tier"), test_app(2, "worker")])
        );
    }

    #[tokio::test]
    async fn test_list_command_api_error_propagates() {
        let mut mock_api = MockApi::new();
        mock_api.expect_list_apps().return_once(|| Err(not_found()));

        let mut list_command = List {
            app_lister: Box::new(mock_api),
        };

        let result = list_command.execute().await;

        assert!(result.is_err());
    }

    // ==== Add ====

    fn add_command(
        interaction: MockInteraction,
        registry: OptionSourceRegistry,
        api: MockApi,
    ) -> Add {
        Add {
            name: None,
            description: None,
            group: None,
            environment: None,
            overrides: vec![],
            interaction: Box::new(interaction),
            registry,
            app_management: Box::new(api),
        }
    }

    #[tokio::test]
    async fn test_add_with_flags_creates_application() {
        let mut mock_interaction = MockInteraction::new();
        expect_advanced_prompts(&mut mock_interaction);
        mock_interaction
            .expect_start_spinner()
            .withf(|msg| msg == "Creating application...")
            .return_once(|_| Ok(create_spinner_handle()));

        let mut mock_api = MockApi::new();
        mock_api
            .expect_create_app()
            .withf(|payload| {
                payload
                    == &json!({
                        "name": "web-tier",
                        "description": "Front tier",
                        "groupId": 4,
                        "environment": "prod",
                        "config": {"autoScale": false},
                    })
            })
            .return_once(|_| Ok(test_app(42, "web-tier")));

        let mut add_command = Add {
            name: Some("web-tier".to_string()),
            description: Some("Front tier".to_string()),
            group: Some("Ops".to_string()),
            environment: Some("prod".to_string()),
            overrides: vec![],
            interaction: Box::new(mock_interaction),
            registry: groups_registry(),
            app_management: Box::new(mock_api),
        };

        let result = add_command.execute().await.expect("execute should succeed");

        assert_eq!(
            result,
            AddResult::Added {
                id: 42,
                name: "web-tier".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_add_canceled_at_first_prompt() {
        let mut mock_interaction = MockInteraction::new();
        mock_interaction
            .expect_input()
            .withf(|options| options.message == "Name?")
            .return_once(|_| Ok(InputPromptResult::Canceled));

        let mut add_command = add_command(
            mock_interaction,
            OptionSourceRegistry::new(),
            MockApi::new(),
        );

        let result = add_command.execute().await.expect("execute should succeed");

        assert_eq!(result, AddResult::Canceled);
    }

    #[tokio::test]
    async fn test_add_unknown_group_is_failed() {
        let mut add_command = add_command(MockInteraction::new(), groups_registry(), MockApi::new());
        add_command.name = Some("checkout".to_string());
        add_command.description = Some("Checkout service".to_string());
        add_command.group = Some("Marketing".to_string());
        add_command.environment = Some("dev".to_string());

        let result = add_command.execute().await.expect("execute should succeed");

        let AddResult::Failed { name, error } = result else {
            panic!("expected a failed outcome, got {result:?}");
        };
        assert_eq!(name, Some("checkout".to_string()));
        assert!(error.contains("Marketing"));
    }

    #[tokio::test]
    async fn test_add_applies_overrides_last() {
        let mut mock_interaction = MockInteraction::new();
        expect_advanced_prompts(&mut mock_interaction);
        mock_interaction
            .expect_start_spinner()
            .return_once(|_| Ok(create_spinner_handle()));

        let mut mock_api = MockApi::new();
        mock_api
            .expect_create_app()
            .withf(|payload| {
                payload["name"] == json!("api-v2")
                    && payload["config"]["refreshInterval"] == json!(30)
                    && payload["config"]["autoScale"] == json!(false)
            })
            .return_once(|_| Ok(test_app(43, "api-v2")));

        let mut add_command = Add {
            name: Some("api".to_string()),
            description: Some("Gateway".to_string()),
            group: Some("Ops".to_string()),
            environment: Some("dev".to_string()),
            overrides: vec![
                "config.refreshInterval=30".to_string(),
                "name=api-v2".to_string(),
            ],
            interaction: Box::new(mock_interaction),
            registry: groups_registry(),
            app_management: Box::new(mock_api),
        };

        let result = add_command.execute().await.expect("execute should succeed");

        assert_eq!(
            result,
            AddResult::Added {
                id: 43,
                name: "api-v2".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_add_api_rejection_is_failed() {
        let mut mock_interaction = MockInteraction::new();
        expect_advanced_prompts(&mut mock_interaction);
        mock_interaction
            .expect_start_spinner()
            .return_once(|_| Ok(create_spinner_handle()));

        let mut mock_api = MockApi::new();
        mock_api.expect_create_app().return_once(|_| {
            Err(ApiError::Status {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: "name already taken".to_string(),
            })
        });

        let mut add_command = Add {
            name: Some("web-tier".to_string()),
            description: Some("Front tier".to_string()),
            group: Some("Ops".to_string()),
            environment: Some("dev".to_string()),
            overrides: vec![],
            interaction: Box::new(mock_interaction),
            registry: groups_registry(),
            app_management: Box::new(mock_api),
        };

        let result = add_command.execute().await.expect("execute should succeed");

        let AddResult::Failed { error, .. } = result else {
            panic!("expected a failed outcome, got {result:?}");
        };
        assert!(error.contains("name already taken"));
    }

    // ==== Update ====

    fn update_command(id: i64, api: MockApi) -> Update {
        Update {
            id,
            name: None,
            description: None,
            environment: None,
            overrides: vec![],
            registry: OptionSourceRegistry::new(),
            app_management: Box::new(api),
        }
    }

    #[tokio::test]
    async fn test_update_sends_changed_fields_only() {
        let mut mock_api = MockApi::new();
        mock_api
            .expect_update_app()
            .withf(|id, payload| *id == 7 && payload == &json!({"name": "renamed"}))
            .return_once(|_, _| Ok(test_app(7, "renamed")));

        let mut update_command = update_command(7, mock_api);
        update_command.name = Some("renamed".to_string());

        let result = update_command
            .execute()
            .await
            .expect("execute should succeed");

        assert_eq!(
            result,
            UpdateResult::Updated {
                id: 7,
                name: "renamed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_update_null_clears_description() {
        let mut mock_api = MockApi::new();
        mock_api
            .expect_update_app()
            .withf(|_, payload| payload == &json!({"description": null}))
            .return_once(|_, _| Ok(test_app(7, "web-tier")));

        let mut update_command = update_command(7, mock_api);
        update_command.description = Some("null".to_string());

        let result = update_command
            .execute()
            .await
            .expect("execute should succeed");

        assert!(matches!(result, UpdateResult::Updated { .. }));
    }

    #[tokio::test]
    async fn test_update_without_changes_is_failed() {
        let mut update_command = update_command(7, MockApi::new());

        let result = update_command
            .execute()
            .await
            .expect("execute should succeed");

        assert_eq!(
            result,
            UpdateResult::Failed {
                id: 7,
                error: "no changes requested".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_update_applies_overrides() {
        let mut mock_api = MockApi::new();
        mock_api
            .expect_update_app()
            .withf(|_, payload| payload == &json!({"config": {"tier": "gold"}}))
            .return_once(|_, _| Ok(test_app(7, "web-tier")));

        let mut update_command = update_command(7, mock_api);
        update_command.overrides = vec!["config.tier=gold".to_string()];

        let result = update_command
            .execute()
            .await
            .expect("execute should succeed");

        assert!(matches!(result, UpdateResult::Updated { .. }));
    }

    #[tokio::test]
    async fn test_update_unknown_environment_is_skipped() {
        // An optional select with no matching option contributes nothing, so
        // the command sees an empty change set.
        let mut update_command = update_command(7, MockApi::new());
        update_command.environment = Some("qa".to_string());

        let result = update_command
            .execute()
            .await
            .expect("execute should succeed");

        assert_eq!(
            result,
            UpdateResult::Failed {
                id: 7,
                error: "no changes requested".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_update_not_found_is_failed() {
        let mut mock_api = MockApi::new();
        mock_api
            .expect_update_app()
            .return_once(|_, _| Err(not_found()));

        let mut update_command = update_command(7, mock_api);
        update_command.name = Some("renamed".to_string());

        let result = update_command
            .execute()
            .await
            .expect("execute should succeed");

        assert_eq!(
            result,
            UpdateResult::Failed {
                id: 7,
                error: "application not found".to_string()
            }
        );
    }

    // ==== Remove ====

    #[tokio::test]
    async fn test_remove_force_false_user_confirms() {
        let mut mock_interaction = MockInteraction::new();
        mock_interaction
            .expect_confirm()
            .return_once(|_| Ok(ConfirmationPromptResult::Yes));
        mock_interaction
            .expect_start_spinner()
            .withf(|msg| msg == "Removing application...")
            .return_once(|_| Ok(create_spinner_handle()));

        let mut mock_api = MockApi::new();
        mock_api
            .expect_delete_app()
            .withf(|id| *id == 7)
            .return_once(|_| Ok(()));

        let mut remove_command = Remove {
            id: 7,
            force: false,
            interaction: Box::new(mock_interaction),
            app_management: Box::new(mock_api),
        };

        let result = remove_command
            .execute()
            .await
            .expect("execute should succeed");

        assert_eq!(result, RemoveResult::Removed { id: 7 });
    }

    #[tokio::test]
    async fn test_remove_force_true_skips_confirmation() {
        let mut mock_interaction = MockInteraction::new();
        // When force is true, confirm should not be called
        mock_interaction
            .expect_start_spinner()
            .return_once(|_| Ok(create_spinner_handle()));

        let mut mock_api = MockApi::new();
        mock_api.expect_delete_app().return_once(|_| Ok(()));

        let mut remove_command = Remove {
            id: 7,
            force: true,
            interaction: Box::new(mock_interaction),
            app_management: Box::new(mock_api),
        };

        let result = remove_command
            .execute()
            .await
            .expect("execute should succeed");

        assert_eq!(result, RemoveResult::Removed { id: 7 });
    }

    #[tokio::test]
    async fn test_remove_user_declines() {
        let mut mock_interaction = MockInteraction::new();
        mock_interaction
            .expect_confirm()
            .return_once(|_| Ok(ConfirmationPromptResult::No));

        let mut remove_command = Remove {
            id: 7,
            force: false,
            interaction: Box::new(mock_interaction),
            app_management: Box::new(MockApi::new()),
        };

        let result = remove_command
            .execute()
            .await
            .expect("execute should succeed");

        assert_eq!(result, RemoveResult::Canceled { id: 7 });
    }

    #[tokio::test]
    async fn test_remove_user_cancels() {
        let mut mock_interaction = MockInteraction::new();
        mock_interaction
            .expect_confirm()
            .return_once(|_| Ok(ConfirmationPromptResult::Canceled));

        let mut remove_command = Remove {
            id: 7,
            force: false,
            interaction: Box::new(mock_interaction),
            app_management: Box::new(MockApi::new()),
        };

        let result = remove_command
            .execute()
            .await
            .expect("execute should succeed");

        assert_eq!(result, RemoveResult::Canceled { id: 7 });
    }

    #[tokio::test]
    async fn test_remove_confirmation_error_propagates() {
        let mut mock_interaction = MockInteraction::new();
        mock_interaction
            .expect_confirm()
            .return_once(|_| Err(anyhow!("input error")));

        let mut remove_command = Remove {
            id: 7,
            force: false,
            interaction: Box::new(mock_interaction),
            app_management: Box::new(MockApi::new()),
        };

        let result = remove_command.execute().await;

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("confirming removal")
        );
    }

    #[tokio::test]
    async fn test_remove_not_found_is_failed() {
        let mut mock_interaction = MockInteraction::new();
        mock_interaction
            .expect_start_spinner()
            .return_once(|_| Ok(create_spinner_handle()));

        let mut mock_api = MockApi::new();
        mock_api.expect_delete_app().return_once(|_| Err(not_found()));

        let mut remove_command = Remove {
            id: 7,
            force: true,
            interaction: Box::new(mock_interaction),
            app_management: Box::new(mock_api),
        };

        let result = remove_command
            .execute()
            .await
            .expect("execute should succeed");

        assert_eq!(
            result,
            RemoveResult::Failed {
                id: 7,
                error: "application not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_remove_transport_error_propagates() {
        let mut mock_interaction = MockInteraction::new();
        mock_interaction
            .expect_start_spinner()
            .return_once(|_| Ok(create_spinner_handle()));

        let mut mock_api = MockApi::new();
        mock_api
            .expect_delete_app()
            .return_once(|_| Err(ApiError::Url(url::ParseError::EmptyHost)));

        let mut remove_command = Remove {
            id: 7,
            force: true,
            interaction: Box::new(mock_interaction),
            app_management: Box::new(mock_api),
        };

        let result = remove_command.execute().await;

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("removing the application")
        );
    }
}
