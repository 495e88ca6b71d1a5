//! The prompt engine.
//!
//! Walks a list of field descriptors in display order and produces a resolved
//! value map, either interactively ([`PromptEngine::prompt`]) or purely from
//! values the caller already has ([`PromptEngine::resolve`]). Both paths share
//! the same semantics: supplied values win over prompting, defaults fill the
//! gaps, dependency gating decides which fields participate at all, and
//! option sources are consulted lazily, one field at a time, in order.

use std::collections::HashMap;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

use crate::interaction::{
    ConfirmationPrompt, ConfirmationPromptOptions, ConfirmationPromptResult, EditorPrompt,
    EditorPromptOptions, EditorPromptResult, InputPrompt, InputPromptOptions, InputPromptResult,
    InputPromptValidator, PasswordPrompt, PasswordPromptOptions, PasswordPromptResult,
    SelectPrompt, SelectPromptOptions, SelectPromptResult,
};

use super::{
    FieldDescriptor, FieldType, ResolvedValues, SelectOption, coerce, depends,
    payload::{self, value_to_string},
    sources::{self, OptionSourceRegistry, SourceParams},
    validate::{NumberValidator, RequiredValidator},
};

// Interaction dependencies for the engine
pub trait PromptInteraction:
    InputPrompt + SelectPrompt + PasswordPrompt + EditorPrompt + ConfirmationPrompt
{
}
impl<T> PromptInteraction for T where
    T: InputPrompt + SelectPrompt + PasswordPrompt + EditorPrompt + ConfirmationPrompt + ?Sized
{
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("{field_name} {reason}")]
    Validation { field_name: String, reason: String },

    #[error("{field_name}: {reason}")]
    Coercion { field_name: String, reason: String },

    #[error("loading options for '{field_name}' failed")]
    OptionSource {
        field_name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("canceled")]
    Canceled,

    #[error(transparent)]
    Interaction(#[from] anyhow::Error),
}

/// Knobs the caller can turn without touching the value maps.
#[derive(Debug, Clone, TypedBuilder)]
pub struct PromptSettings {
    /// How many invalid or blank answers to accept for one required field
    /// before giving up with a validation error.
    #[builder(default = 3)]
    pub max_attempts: usize,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

pub struct PromptEngine<'a, I: ?Sized> {
    interaction: &'a I,
    registry: &'a OptionSourceRegistry,
    settings: PromptSettings,
}

impl<'a, I> PromptEngine<'a, I>
where
    I: PromptInteraction + ?Sized,
{
    pub fn new(interaction: &'a I, registry: &'a OptionSourceRegistry) -> Self {
        Self {
            interaction,
            registry,
            settings: PromptSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PromptSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Resolve every field, prompting interactively for the ones no supplied
    /// value or default covers.
    pub async fn prompt(
        &self,
        fields: &[FieldDescriptor],
        supplied: &Map<String, Value>,
        params: &SourceParams,
    ) -> Result<ResolvedValues, PromptError> {
        self.run(fields, supplied, params, true).await
    }

    /// Resolve every field from supplied values and defaults alone. A required
    /// field left uncovered is a validation error, never a prompt.
    pub async fn resolve(
        &self,
        fields: &[FieldDescriptor],
        supplied: &Map<String, Value>,
        params: &SourceParams,
    ) -> Result<ResolvedValues, PromptError> {
        self.run(fields, supplied, params, false).await
    }

    async fn run(
        &self,
        fields: &[FieldDescriptor],
        supplied: &Map<String, Value>,
        params: &SourceParams,
        interactive: bool,
    ) -> Result<ResolvedValues, PromptError> {
        // Stable sort keeps declaration order for equal displayOrder values.
        let mut ordered: Vec<&FieldDescriptor> = fields.iter().collect();
        ordered.sort_by_key(|field| field.display_order);

        let mut resolved = ResolvedValues::new();
        let mut resolved_codes: HashMap<String, String> = HashMap::new();

        for field in ordered {
            if !depends::is_active(field, &resolved_codes) {
                debug!(field = %field.field_name, "prerequisite not met, skipping");
                continue;
            }

            let value = self
                .resolve_field(field, supplied, params, &resolved, interactive)
                .await?;

            match value {
                Some(value) => {
                    if let Some(code) = &field.code {
                        resolved_codes.insert(code.clone(), value_to_string(&value));
                    }
                    resolved.insert(field, value);
                }
                None if field.required => {
                    return Err(PromptError::Validation {
                        field_name: field.label().to_string(),
                        reason: "is required".to_string(),
                    });
                }
                None => {}
            }
        }

        Ok(resolved)
    }

    async fn resolve_field(
        &self,
        field: &FieldDescriptor,
        supplied: &Map<String, Value>,
        params: &SourceParams,
        resolved: &ResolvedValues,
        interactive: bool,
    ) -> Result<Option<Value>, PromptError> {
        if let Some(value) = lookup_supplied(supplied, field) {
            debug!(field = %field.field_name, "using supplied value");
            return self
                .apply_candidate(field, value.clone(), params, resolved)
                .await;
        }

        // Hidden fields never prompt, they only carry defaults into the
        // payload. The non-interactive path treats every field that way.
        if field.field_type == FieldType::Hidden || !interactive {
            let Some(default) = &field.default_value else {
                return Ok(None);
            };
            return self
                .apply_candidate(field, default.clone(), params, resolved)
                .await;
        }

        self.prompt_field(field, params, resolved).await
    }

    /// Turn a supplied value or default into the final typed value.
    ///
    /// Strings go through coercion, everything else is trusted as already
    /// typed. Select candidates are matched against the resolved option list.
    async fn apply_candidate(
        &self,
        field: &FieldDescriptor,
        candidate: Value,
        params: &SourceParams,
        resolved: &ResolvedValues,
    ) -> Result<Option<Value>, PromptError> {
        if field.field_type == FieldType::Select {
            return self
                .match_candidate(field, candidate, params, resolved)
                .await;
        }

        match candidate {
            Value::String(raw) => match coerce::coerce(&raw, field.field_type) {
                Ok(value) => Ok(Some(value)),
                Err(reason) if field.required => Err(PromptError::Coercion {
                    field_name: field.label().to_string(),
                    reason,
                }),
                Err(reason) => {
                    warn!(field = %field.field_name, %reason, "discarding invalid value");
                    Ok(None)
                }
            },
            value => Ok(Some(value)),
        }
    }

    async fn match_candidate(
        &self,
        field: &FieldDescriptor,
        candidate: Value,
        params: &SourceParams,
        resolved: &ResolvedValues,
    ) -> Result<Option<Value>, PromptError> {
        let (raw, passthrough) = match candidate {
            Value::Null => return Ok(Some(Value::Null)),
            Value::String(raw) if coerce::is_clear_request(&raw) => {
                return Ok(Some(Value::Null));
            }
            Value::String(raw) => (raw.clone(), Value::String(raw)),
            other => (value_to_string(&other), other),
        };

        let options = self.options_for(field, params, resolved).await?;

        // A select without any option list at all degrades to free text.
        if options.is_empty() && field.option_source.is_none() {
            return Ok(Some(passthrough));
        }

        match coerce::match_select(&raw, &options) {
            Some(value) => Ok(Some(value)),
            None if field.required => Err(PromptError::Validation {
                field_name: field.label().to_string(),
                reason: format!("has no option matching '{raw}'"),
            }),
            None => {
                warn!(field = %field.field_name, value = %raw, "no matching option, skipping");
                Ok(None)
            }
        }
    }

    async fn prompt_field(
        &self,
        field: &FieldDescriptor,
        params: &SourceParams,
        resolved: &ResolvedValues,
    ) -> Result<Option<Value>, PromptError> {
        match field.field_type {
            FieldType::Select => self.prompt_select(field, params, resolved).await,
            FieldType::Checkbox => self.prompt_checkbox(field),
            FieldType::Password => self.prompt_password(field),
            FieldType::CodeEditor => self.prompt_editor(field),
            FieldType::Text | FieldType::Textarea | FieldType::Number => self.prompt_text(field),
            FieldType::Hidden => Ok(None),
        }
    }

    fn prompt_text(&self, field: &FieldDescriptor) -> Result<Option<Value>, PromptError> {
        let default = field.default_value.as_ref().map(value_to_string);

        let mut last_reason = "is required".to_string();
        for _ in 0..self.settings.max_attempts.max(1) {
            let options = InputPromptOptions::builder()
                .message(prompt_message(field))
                .default_opt(default.clone())
                .help_message_opt(field.description.clone())
                .validator_opt(live_validator(field))
                .build();

            match self.interaction.input(options)? {
                InputPromptResult::Canceled => return Err(PromptError::Canceled),
                InputPromptResult::Input(raw) => {
                    if raw.is_empty() {
                        if field.required {
                            continue;
                        }
                        return Ok(None);
                    }

                    match coerce::coerce(&raw, field.field_type) {
                        Ok(value) => return Ok(Some(value)),
                        Err(reason) => last_reason = reason,
                    }
                }
            }
        }

        Err(PromptError::Validation {
            field_name: field.label().to_string(),
            reason: last_reason,
        })
    }

    fn prompt_checkbox(&self, field: &FieldDescriptor) -> Result<Option<Value>, PromptError> {
        let default = field
            .default_value
            .as_ref()
            .map(|value| coerce::is_truthy(&value_to_string(value)));

        let options = ConfirmationPromptOptions::builder()
            .message(prompt_message(field))
            .default_opt(default)
            .post_confirmation_help_text_opt(field.description.clone())
            .build();

        match self.interaction.confirm(options)? {
            ConfirmationPromptResult::Yes => Ok(Some(Value::Bool(true))),
            ConfirmationPromptResult::No => Ok(Some(Value::Bool(false))),
            ConfirmationPromptResult::Canceled => Err(PromptError::Canceled),
        }
    }

    async fn prompt_select(
        &self,
        field: &FieldDescriptor,
        params: &SourceParams,
        resolved: &ResolvedValues,
    ) -> Result<Option<Value>, PromptError> {
        let options = self.options_for(field, params, resolved).await?;

        if options.is_empty() {
            // Nothing to offer, fall back to free-form input.
            return self.prompt_text(field);
        }

        let starting_cursor = field.default_value.as_ref().and_then(|default| {
            let raw = value_to_string(default);
            options.iter().position(|option| {
                value_to_string(&option.value) == raw || option.name.eq_ignore_ascii_case(&raw)
            })
        });

        let prompt = SelectPromptOptions::builder()
            .message(prompt_message(field))
            .options(options.iter().map(|option| option.name.clone()))
            .help_message_opt(field.description.clone())
            .starting_cursor_opt(starting_cursor)
            .build();

        match self.interaction.select(prompt)? {
            SelectPromptResult::Selected(index) => {
                let option = options.get(index).ok_or_else(|| PromptError::Validation {
                    field_name: field.label().to_string(),
                    reason: format!("selection {index} is out of range"),
                })?;
                Ok(Some(option.submit_value()))
            }
            SelectPromptResult::Canceled => Err(PromptError::Canceled),
        }
    }

    fn prompt_password(&self, field: &FieldDescriptor) -> Result<Option<Value>, PromptError> {
        for _ in 0..self.settings.max_attempts.max(1) {
            let options = PasswordPromptOptions::builder()
                .message(prompt_message(field))
                .help_message_opt(field.description.clone())
                .build();

            match self.interaction.password(options)? {
                PasswordPromptResult::Canceled => return Err(PromptError::Canceled),
                PasswordPromptResult::Input(secret) => {
                    if secret.is_empty() {
                        if field.required {
                            continue;
                        }
                        return Ok(None);
                    }
                    return Ok(Some(Value::String(secret)));
                }
            }
        }

        Err(PromptError::Validation {
            field_name: field.label().to_string(),
            reason: "is required".to_string(),
        })
    }

    fn prompt_editor(&self, field: &FieldDescriptor) -> Result<Option<Value>, PromptError> {
        let predefined = field.default_value.as_ref().map(editor_seed);

        for _ in 0..self.settings.max_attempts.max(1) {
            let options = EditorPromptOptions::builder()
                .message(prompt_message(field))
                .predefined_text_opt(predefined.clone())
                .build();

            match self.interaction.editor(options)? {
                EditorPromptResult::Canceled => return Err(PromptError::Canceled),
                EditorPromptResult::Content(content) => {
                    if content.trim().is_empty() {
                        if field.required {
                            continue;
                        }
                        return Ok(None);
                    }
                    return Ok(Some(Value::String(content)));
                }
            }
        }

        Err(PromptError::Validation {
            field_name: field.label().to_string(),
            reason: "is required".to_string(),
        })
    }

    /// Resolve the option list for a select field: a non-empty static list
    /// wins, otherwise the declared source is fetched. Fetches are never
    /// cached; a source may depend on values resolved moments ago.
    async fn options_for(
        &self,
        field: &FieldDescriptor,
        params: &SourceParams,
        resolved: &ResolvedValues,
    ) -> Result<Vec<SelectOption>, PromptError> {
        if let Some(options) = &field.select_options {
            if !options.is_empty() {
                return Ok(options.clone());
            }
        }

        let Some(source) = &field.option_source else {
            return Ok(Vec::new());
        };

        // The source sees the caller's parameters plus everything resolved so
        // far, so a cloud list can be scoped to the group picked above it.
        let mut fetch_params = params.clone();
        for (key, value) in resolved.as_map() {
            fetch_params.insert(key.clone(), value.clone());
        }

        match sources::fetch_from(source, self.registry, &fetch_params).await {
            Ok(options) => Ok(options),
            Err(error) if field.required => Err(PromptError::OptionSource {
                field_name: field.label().to_string(),
                source: error,
            }),
            Err(error) => {
                warn!(
                    field = %field.field_name,
                    %error,
                    "option source failed, continuing without options"
                );
                Ok(Vec::new())
            }
        }
    }
}

/// Find a supplied value for a field, nested under its context first, then
/// under its bare name at the top level.
fn lookup_supplied<'v>(
    supplied: &'v Map<String, Value>,
    field: &FieldDescriptor,
) -> Option<&'v Value> {
    if !field.field_context.is_empty() {
        if let Some(value) = payload::get_at(supplied, &field.path_segments()) {
            return Some(value);
        }
    }
    supplied.get(&field.field_name)
}

fn prompt_message(field: &FieldDescriptor) -> String {
    format!("{}?", field.label())
}

fn live_validator(field: &FieldDescriptor) -> Option<InputPromptValidator> {
    match field.field_type {
        FieldType::Number => Some(InputPromptValidator::new(NumberValidator)),
        _ if field.required => Some(InputPromptValidator::new(RequiredValidator::new(
            field.label(),
        ))),
        _ => None,
    }
}

fn editor_seed(value: &Value) -> String {
    match value {
        Value::String(content) => content.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
