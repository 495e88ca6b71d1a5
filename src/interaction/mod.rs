use std::rc::Rc;

use anyhow::Result;
use typed_builder::TypedBuilder;

mod input;
mod spinner;

#[derive(Debug, Default, Clone)]
pub struct Interaction;

impl Interaction {
    pub fn new() -> Self {
        Default::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct ConfirmationPromptOptions {
    #[builder(setter(into))]
    message: String,
    #[builder(default, setter(strip_option(fallback = default_opt)))]
    default: Option<bool>,
    #[builder(default, setter(strip_option))]
    pre_confirmation_help_text: Option<String>,
    #[builder(default, setter(strip_option(fallback = post_confirmation_help_text_opt)))]
    post_confirmation_help_text: Option<String>,
}

pub enum ConfirmationPromptResult {
    Yes,
    No,
    Canceled,
}

pub trait ConfirmationPrompt {
    fn confirm(&self, options: ConfirmationPromptOptions) -> Result<ConfirmationPromptResult>;
}

#[derive(TypedBuilder)]
pub struct InputPromptOptions {
    #[builder(setter(into))]
    pub message: String,
    #[builder(default, setter(strip_option(fallback = default_opt)))]
    pub default: Option<String>,
    #[builder(default, setter(strip_option(fallback = help_message_opt)))]
    pub help_message: Option<String>,
    #[builder(default, setter(strip_option(fallback = validator_opt)))]
    pub validator: Option<InputPromptValidator>,
}

#[derive(Clone)]
// We're using an Rc because the validator needs to be cloneable, this is the most elegant way to do this
pub struct InputPromptValidator(Rc<dyn InputValidator>);

impl InputPromptValidator {
    pub fn new(validator: impl InputValidator + 'static) -> Self {
        Self(Rc::new(validator))
    }
}

pub trait InputValidator {
    fn validate(&self, input: &str) -> Result<InputValidatorResult>;
}

pub enum InputValidatorResult {
    Valid,
    Invalid(String),
}

pub enum InputPromptResult {
    Input(String),
    Canceled,
}

pub trait InputPrompt {
    fn input(&self, options: InputPromptOptions) -> Result<InputPromptResult>;
}

#[derive(Debug, PartialEq, Eq, TypedBuilder)]
pub struct SelectPromptOptions {
    #[builder(setter(transform = |s: impl Into<String>| s.into()))]
    pub message: String,
    #[builder(setter(transform = |items: impl IntoIterator<Item = impl Into<String>>| {
        items.into_iter().map(|s| s.into()).collect()
    }))]
    pub options: Vec<String>,
    #[builder(default, setter(strip_option(fallback = help_message_opt)))]
    pub help_message: Option<String>,
    #[builder(default, setter(strip_option(fallback = starting_cursor_opt)))]
    pub starting_cursor: Option<usize>,
}

/// A selection is reported by index into the offered options so callers can
/// recover the full record behind the displayed label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectPromptResult {
    Selected(usize),
    Canceled,
}

pub trait SelectPrompt {
    fn select(&self, options: SelectPromptOptions) -> Result<SelectPromptResult>;
}

#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct PasswordPromptOptions {
    #[builder(setter(into))]
    pub message: String,
    #[builder(default, setter(strip_option(fallback = help_message_opt)))]
    pub help_message: Option<String>,
}

pub enum PasswordPromptResult {
    Input(String),
    Canceled,
}

pub trait PasswordPrompt {
    fn password(&self, options: PasswordPromptOptions) -> Result<PasswordPromptResult>;
}

#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct EditorPromptOptions {
    #[builder(setter(into))]
    pub message: String,
    #[builder(default, setter(strip_option(fallback = predefined_text_opt)))]
    pub predefined_text: Option<String>,
    /// Passed to the editor so syntax highlighting works, ".json" by default.
    #[builder(default = String::from(".json"), setter(into))]
    pub file_extension: String,
}

pub enum EditorPromptResult {
    Content(String),
    Canceled,
}

pub trait EditorPrompt {
    fn editor(&self, options: EditorPromptOptions) -> Result<EditorPromptResult>;
}

pub struct SpinnerHandle {
    stop_spinner: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl SpinnerHandle {
    pub fn new(stop_spinner: Box<dyn FnOnce() + Send + Sync>) -> Self {
        Self {
            stop_spinner: Some(stop_spinner),
        }
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        if let Some(stop_spinner) = self.stop_spinner.take() {
            stop_spinner();
        }
    }
}

pub trait SpinnerInteraction {
    fn start_spinner(&self, message: String) -> Result<SpinnerHandle>;
}
