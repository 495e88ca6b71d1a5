//! Commands for the `catalog` resource: list and add.
//!
//! A catalog item is one of three variants (`instance`, `blueprint`,
//! `workflow`) and the add flow only asks for what the chosen variant needs:
//! instances take free-form configuration through the editor, the other two
//! pick their target from a platform option source.

use std::fmt::Display;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    api::{
        ApiClient, ApiError, CatalogItemCreator, CatalogItemLister, sources::default_registry,
    },
    args,
    commands::{CommandWithOutput, with_api::TryFromWithApiClient},
    interaction::{Interaction, SpinnerInteraction},
    models::CatalogItem,
    option_types::{
        FieldDescriptor, FieldType, OptionSource, OptionSourceRegistry, PromptEngine, PromptError,
        PromptInteraction, SelectOption, SourceParams, coerce, payload,
    },
    table::Table,
};

const ITEM_TYPES: &[(&str, &str)] = &[
    ("Instance", "instance"),
    ("Blueprint", "blueprint"),
    ("Workflow", "workflow"),
];

fn item_type_options() -> Vec<SelectOption> {
    ITEM_TYPES
        .iter()
        .map(|(name, value)| SelectOption::new(*name, *value))
        .collect()
}

/// List all catalog items.
pub struct List {
    item_lister: Box<dyn ListCatalogManagement>,
}

pub trait ListCatalogManagement: CatalogItemLister + Send + Sync {}
impl<T: CatalogItemLister + Send + Sync> ListCatalogManagement for T {}

impl TryFromWithApiClient<args::CatalogList> for List {
    fn try_from_with_api_client(_: args::CatalogList, client: Arc<ApiClient>) -> Result<Self> {
        Ok(Self {
            item_lister: Box::new(client.as_ref().clone()),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListResult(Vec<CatalogItem>);

impl From<&ListResult> for Table {
    fn from(value: &ListResult) -> Self {
        Table::from_iter(
            &value.0,
            &[
                ("ID", |i| i.id.to_string()),
                ("NAME", |i| i.name.clone()),
                ("TYPE", |i| i.item_type.clone().unwrap_or_default()),
                ("ENABLED", |i| i.enabled.to_string()),
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
        Ok(ListResult(self.item_lister.list_catalog_items().await?))
    }
}

// Interaction dependencies for the add command
pub trait AddInteraction: PromptInteraction + SpinnerInteraction + Send + Sync {}
impl<T: PromptInteraction + SpinnerInteraction + Send + Sync> AddInteraction for T {}

pub trait AddCatalogManagement: CatalogItemCreator + Send + Sync {}
impl<T: CatalogItemCreator + Send + Sync> AddCatalogManagement for T {}

/// Create a catalog item, prompting per variant.
pub struct Add {
    name: Option<String>,
    description: Option<String>,
    item_type: Option<String>,
    overrides: Vec<String>,

    interaction: Box<dyn AddInteraction>,
    registry: OptionSourceRegistry,
    catalog_management: Box<dyn AddCatalogManagement>,
}

impl TryFromWithApiClient<args::CatalogAdd> for Add {
    fn try_from_with_api_client(args: args::CatalogAdd, client: Arc<ApiClient>) -> Result<Self> {
        Ok(Self {
            name: args.name,
            description: args.description,
            item_type: args.item_type,
            overrides: args.options,

            interaction: Box::new(Interaction::new()),
            registry: default_registry(client.clone()),
            catalog_management: Box::new(client.as_ref().clone()),
        })
    }
}

/// The variant select publishes its value under the `catalogItemType.type`
/// code; the three fields after it are gated on that code.
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
            .field_name("type")
            .field_label("Type")
            .field_type(FieldType::Select)
            .required(true)
            .select_options(item_type_options())
            .code("catalogItemType.type")
            .display_order(2)
            .build(),
        FieldDescriptor::builder()
            .field_name("config")
            .field_label("Configuration")
            .field_type(FieldType::CodeEditor)
            .depends_on_code("catalogItemType.type:instance")
            .description("Instance configuration as JSON or YAML")
            .display_order(3)
            .build(),
        FieldDescriptor::builder()
            .field_name("blueprintId")
            .field_label("Blueprint")
            .field_type(FieldType::Select)
            .required(true)
            .option_source(OptionSource::Named("blueprints".to_string()))
            .depends_on_code("catalogItemType.type:blueprint")
            .display_order(4)
            .build(),
        FieldDescriptor::builder()
            .field_name("workflowId")
            .field_label("Workflow")
            .field_type(FieldType::Select)
            .required(true)
            .option_source(OptionSource::Named("workflows".to_string()))
            .depends_on_code("catalogItemType.type:workflow")
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
            Self::Added { id, name } => {
                write!(f, "Catalog item '{}' created with id {}", name, id)
            }
            Self::Failed {
                name: Some(name),
                error,
            } => write!(f, "Creating catalog item '{}' failed: {}", name, error),
            Self::Failed { name: None, error } => {
                write!(f, "Creating catalog item failed: {}", error)
            }
            Self::Canceled => write!(f, "Catalog item not created"),
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
            Err(error) => return Err(error).context("resolving catalog item options"),
        };

        let mut payload = resolved.into_map();
        payload::apply_set_expressions(&mut payload, &self.overrides)
            .context("applying --option overrides")?;

        // Editor content arrives as text; the API wants it structured.
        if let Err(error) = parse_config_content(&mut payload) {
            return Ok(AddResult::Failed {
                name: self.name.clone(),
                error,
            });
        }
        let payload = payload::deep_compact(&Value::Object(payload));

        // When _spinner goes out of scope, the spinner will be stopped
        let _spinner = self
            .interaction
            .start_spinner("Creating catalog item...".to_string())?;

        match self.catalog_management.create_catalog_item(&payload).await {
            Ok(item) => Ok(AddResult::Added {
                id: item.id,
                name: item.name,
            }),
            Err(error @ ApiError::Status { .. }) => Ok(AddResult::Failed {
                name: self.name.clone(),
                error: error.to_string(),
            }),
            Err(error) => Err(error).context("creating the catalog item"),
        }
    }
}

impl Add {
    fn supplied_values(&self) -> Map<String, Value> {
        let flags = [
            ("name", &self.name),
            ("description", &self.description),
            ("type", &self.item_type),
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

/// Replace a string `config` entry with its parsed form, JSON first and YAML
/// as the fallback. Non-string configs (from a typed `-O` override) pass
/// through untouched.
fn parse_config_content(payload: &mut Map<String, Value>) -> Result<(), String> {
    let Some(Value::String(content)) = payload.get("config") else {
        return Ok(());
    };

    match coerce::parse_structured(content) {
        Ok(parsed) => {
            payload.insert("config".to_string(), parsed);
            Ok(())
        }
        Err(error) => Err(format!("invalid configuration: {error}")),
    }
}
