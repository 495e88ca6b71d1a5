//! Option-type driven prompting and payload resolution.
//!
//! Add and update commands describe their inputs as a list of
//! [`FieldDescriptor`]s instead of hand-rolling one prompt per field. The
//! [`PromptEngine`](engine::PromptEngine) walks the descriptors in display
//! order, decides which fields are active, resolves select options (static or
//! fetched through an [`OptionSourceRegistry`](sources::OptionSourceRegistry)),
//! prompts or applies supplied values, coerces the raw input to typed JSON
//! values, and nests the results under each field's context path. The
//! [`payload`] helpers then merge one resolved group at a time into the final
//! request body.
//!
//! Descriptor lists are built fresh per command invocation; nothing in this
//! module holds state across runs.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use typed_builder::TypedBuilder;

pub mod coerce;
pub mod depends;
pub mod engine;
pub mod payload;
pub mod sources;
pub mod validate;

pub use engine::{PromptEngine, PromptError, PromptInteraction, PromptSettings};
pub use sources::{FnSource, OptionSourceProvider, OptionSourceRegistry, SourceParams};

/// Input types a field can declare.
///
/// The type decides how a field is prompted for and how raw input is coerced;
/// see [`coerce`] for the per-type rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Password,
    Number,
    Checkbox,
    Select,
    CodeEditor,
    Hidden,
}

/// One choice offered by a select field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectOption {
    pub name: String,
    /// The value submitted when this option is chosen. Options coming from
    /// the API occasionally omit it; [`SelectOption::submit_value`] falls back
    /// to the display name in that case.
    #[serde(default)]
    pub value: Value,
}

impl SelectOption {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The value a selection of this option resolves to.
    pub fn submit_value(&self) -> Value {
        if self.value.is_null() {
            Value::String(self.name.clone())
        } else {
            self.value.clone()
        }
    }
}

/// Where a select field's options come from when they are not embedded in the
/// descriptor itself.
///
/// Named sources are looked up in the [`OptionSourceRegistry`] handed to the
/// engine; provider sources carry their own fetcher (typically a small struct
/// capturing the API client).
#[derive(Clone, Deserialize)]
#[serde(from = "String")]
pub enum OptionSource {
    Named(String),
    Provider(Arc<dyn OptionSourceProvider>),
}

impl From<String> for OptionSource {
    fn from(name: String) -> Self {
        OptionSource::Named(name)
    }
}

impl fmt::Debug for OptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSource::Named(name) => f.debug_tuple("Named").field(name).finish(),
            OptionSource::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// Declarative definition of one prompt-able field.
///
/// Descriptors are either built in code via the builder or deserialized from
/// the API's own option-type JSON (camelCase keys, `type` for the field
/// type). `field_name` must be unique within one descriptor list; prompting
/// order follows ascending `display_order` with list order breaking ties.
#[derive(Debug, Clone, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    #[builder(setter(into))]
    pub field_name: String,

    /// Dot-path namespace the resolved value nests under; empty means the
    /// value sits at the top level of the result map.
    #[serde(default)]
    #[builder(default, setter(into))]
    pub field_context: String,

    #[serde(default)]
    #[builder(default, setter(into))]
    pub field_label: String,

    #[serde(rename = "type", default)]
    #[builder(default)]
    pub field_type: FieldType,

    #[serde(default)]
    #[builder(default)]
    pub required: bool,

    #[serde(default)]
    #[builder(default, setter(strip_option))]
    pub default_value: Option<Value>,

    #[serde(default)]
    #[builder(default, setter(strip_option))]
    pub select_options: Option<Vec<SelectOption>>,

    #[serde(default)]
    #[builder(default, setter(strip_option))]
    pub option_source: Option<OptionSource>,

    /// `"<code>:<value>"` gate referring to an earlier field's `code`; see
    /// [`depends`].
    #[serde(default)]
    #[builder(default, setter(strip_option, into))]
    pub depends_on_code: Option<String>,

    /// Stable identifier other fields can depend on.
    #[serde(default)]
    #[builder(default, setter(strip_option, into))]
    pub code: Option<String>,

    #[serde(default)]
    #[builder(default)]
    pub display_order: i64,

    #[serde(default)]
    #[builder(default, setter(strip_option, into))]
    pub description: Option<String>,
}

impl FieldDescriptor {
    /// Label shown when prompting; falls back to the field name.
    pub fn label(&self) -> &str {
        if self.field_label.is_empty() {
            &self.field_name
        } else {
            &self.field_label
        }
    }

    /// Path segments the resolved value is inserted at: the context split on
    /// dots, followed by the field name as one atomic segment.
    pub fn path_segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = if self.field_context.is_empty() {
            Vec::new()
        } else {
            self.field_context.split('.').collect()
        };
        segments.push(&self.field_name);
        segments
    }
}

/// Values resolved by one prompt pass, nested by field context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedValues {
    root: Map<String, Value>,
}

impl ResolvedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resolved value at the descriptor's context path.
    pub fn insert(&mut self, descriptor: &FieldDescriptor, value: Value) {
        payload::set_at(&mut self.root, &descriptor.path_segments(), value);
    }

    pub fn get<S: AsRef<str>>(&self, segments: &[S]) -> Option<&Value> {
        payload::get_at(&self.root, segments)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

impl From<ResolvedValues> for Value {
    fn from(values: ResolvedValues) -> Self {
        values.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_descriptor_deserializes_api_shape() {
        let descriptor: FieldDescriptor = serde_json::from_value(json!({
            "fieldName": "poolType",
            "fieldContext": "networkPool",
            "fieldLabel": "Pool Type",
            "type": "select",
            "required": true,
            "optionSource": "poolTypes",
            "displayOrder": 2,
            "description": "Type of the address pool"
        }))
        .expect("descriptor should deserialize");

        assert_eq!(descriptor.field_name, "poolType");
        assert_eq!(descriptor.field_context, "networkPool");
        assert_eq!(descriptor.field_type, FieldType::Select);
        assert!(descriptor.required);
        assert_eq!(descriptor.display_order, 2);
        assert!(matches!(
            descriptor.option_source,
            Some(OptionSource::Named(ref name)) if name == "poolTypes"
        ));
    }

    #[test]
    fn test_field_descriptor_defaults() {
        let descriptor: FieldDescriptor =
            serde_json::from_value(json!({"fieldName": "name"})).expect("minimal descriptor");

        assert_eq!(descriptor.field_type, FieldType::Text);
        assert_eq!(descriptor.field_context, "");
        assert!(!descriptor.required);
        assert_eq!(descriptor.display_order, 0);
        assert_eq!(descriptor.label(), "name");
    }

    #[test]
    fn test_field_type_wire_names() {
        let parsed: Vec<FieldType> = serde_json::from_value(json!([
            "text", "textarea", "password", "number", "checkbox", "select", "code-editor",
            "hidden"
        ]))
        .expect("all field type names should parse");

        assert_eq!(
            parsed,
            vec![
                FieldType::Text,
                FieldType::Textarea,
                FieldType::Password,
                FieldType::Number,
                FieldType::Checkbox,
                FieldType::Select,
                FieldType::CodeEditor,
                FieldType::Hidden,
            ]
        );
    }

    #[test]
    fn test_path_segments_split_context_but_not_name() {
        let descriptor = FieldDescriptor::builder()
            .field_name("dns.primary")
            .field_context("config.network")
            .build();

        assert_eq!(descriptor.path_segments(), vec!["config", "network", "dns.primary"]);
    }

    #[test]
    fn test_resolved_values_nests_by_context() {
        let descriptor = FieldDescriptor::builder()
            .field_name("url")
            .field_context("config")
            .build();

        let mut values = ResolvedValues::new();
        values.insert(&descriptor, json!("http://x"));

        assert_eq!(values.into_value(), json!({"config": {"url": "http://x"}}));
    }

    #[test]
    fn test_select_option_submit_value_falls_back_to_name() {
        assert_eq!(
            SelectOption::new("Amazon", "amazon").submit_value(),
            json!("amazon")
        );
        let unnamed: SelectOption =
            serde_json::from_value(json!({"name": "Amazon"})).expect("option without value");
        assert_eq!(unnamed.submit_value(), json!("Amazon"));
    }
}
