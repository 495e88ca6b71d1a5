use anyhow::Result;
use console::style;
use inquire::{Confirm, Editor, InquireError, Password, Select, Text, validator::StringValidator};

use crate::interaction::{
    InputPrompt, InputPromptOptions, InputPromptResult, InputPromptValidator, InputValidatorResult,
};

use super::{
    ConfirmationPrompt, ConfirmationPromptOptions, ConfirmationPromptResult, EditorPrompt,
    EditorPromptOptions, EditorPromptResult, Interaction, PasswordPrompt, PasswordPromptOptions,
    PasswordPromptResult, SelectPrompt, SelectPromptOptions, SelectPromptResult,
};

impl ConfirmationPrompt for Interaction {
    fn confirm(&self, options: ConfirmationPromptOptions) -> Result<ConfirmationPromptResult> {
        let mut prompt = Confirm::new(&options.message);
        if let Some(default) = options.default {
            prompt = prompt.with_default(default);
        }

        if let Some(help_text) = &options.post_confirmation_help_text {
            prompt = prompt.with_help_message(help_text);
        }

        if let Some(help_text) = &options.pre_confirmation_help_text {
            println!("{}", style(help_text).yellow());
        }

        match prompt.prompt() {
            Ok(true) => Ok(ConfirmationPromptResult::Yes),
            Ok(false) => Ok(ConfirmationPromptResult::No),
            Err(InquireError::OperationCanceled) => Ok(ConfirmationPromptResult::Canceled),
            Err(InquireError::OperationInterrupted) => Ok(ConfirmationPromptResult::Canceled),
            Err(err) => Err(anyhow::anyhow!("error prompting for confirmation: {}", err)),
        }
    }
}

// Implement the StringValidator trait for the InputPromptValidator
impl StringValidator for InputPromptValidator {
    fn validate(
        &self,
        input: &str,
    ) -> Result<inquire::validator::Validation, inquire::error::CustomUserError> {
        match self.0.validate(input) {
            Ok(InputValidatorResult::Valid) => Ok(inquire::validator::Validation::Valid),
            Ok(InputValidatorResult::Invalid(error)) => {
                Ok(inquire::validator::Validation::Invalid(
                    inquire::validator::ErrorMessage::Custom(error),
                ))
            }
            Err(e) => Err(inquire::error::CustomUserError::from(e)),
        }
    }
}

impl InputPrompt for Interaction {
    fn input(&self, options: InputPromptOptions) -> Result<InputPromptResult> {
        let mut prompt = Text::new(&options.message);

        // Set the default value if provided
        if let Some(default) = options.default.as_deref() {
            prompt = prompt.with_default(default);
        }

        if let Some(help_message) = options.help_message.as_deref() {
            prompt = prompt.with_help_message(help_message);
        }

        // Set the validator if provided
        if let Some(validator) = options.validator {
            prompt = prompt.with_validator(validator);
        }

        match prompt.prompt() {
            Ok(name) => Ok(InputPromptResult::Input(name)),
            Err(e) => match e {
                InquireError::OperationCanceled => Ok(InputPromptResult::Canceled),
                InquireError::OperationInterrupted => Ok(InputPromptResult::Canceled),
                _ => Err(anyhow::anyhow!("error prompting for input: {}", e)),
            },
        }
    }
}

impl SelectPrompt for Interaction {
    fn select(&self, options: SelectPromptOptions) -> Result<SelectPromptResult> {
        let mut select = Select::new(&options.message, options.options);

        if let Some(help_message) = options.help_message.as_deref() {
            select = select.with_help_message(help_message);
        }

        if let Some(cursor) = options.starting_cursor {
            select = select.with_starting_cursor(cursor);
        }

        match select.raw_prompt() {
            Ok(selected) => Ok(SelectPromptResult::Selected(selected.index)),
            Err(InquireError::OperationCanceled) => Ok(SelectPromptResult::Canceled),
            Err(InquireError::OperationInterrupted) => Ok(SelectPromptResult::Canceled),
            Err(err) => Err(anyhow::anyhow!("error prompting for selection: {}", err)),
        }
    }
}

impl PasswordPrompt for Interaction {
    fn password(&self, options: PasswordPromptOptions) -> Result<PasswordPromptResult> {
        let mut prompt = Password::new(&options.message).without_confirmation();

        if let Some(help_message) = options.help_message.as_deref() {
            prompt = prompt.with_help_message(help_message);
        }

        match prompt.prompt() {
            Ok(secret) => Ok(PasswordPromptResult::Input(secret)),
            Err(InquireError::OperationCanceled) => Ok(PasswordPromptResult::Canceled),
            Err(InquireError::OperationInterrupted) => Ok(PasswordPromptResult::Canceled),
            Err(err) => Err(anyhow::anyhow!("error prompting for password: {}", err)),
        }
    }
}

impl EditorPrompt for Interaction {
    fn editor(&self, options: EditorPromptOptions) -> Result<EditorPromptResult> {
        let mut prompt = Editor::new(&options.message).with_file_extension(&options.file_extension);

        if let Some(predefined) = options.predefined_text.as_deref() {
            prompt = prompt.with_predefined_text(predefined);
        }

        match prompt.prompt() {
            Ok(content) => Ok(EditorPromptResult::Content(content)),
            Err(InquireError::OperationCanceled) => Ok(EditorPromptResult::Canceled),
            Err(InquireError::OperationInterrupted) => Ok(EditorPromptResult::Canceled),
            Err(err) => Err(anyhow::anyhow!("error prompting for content: {}", err)),
        }
    }
}
