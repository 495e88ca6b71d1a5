//! Live input validators attached to interactive prompts.
//!
//! These run inside the prompt itself so the user sees the problem before
//! submitting, instead of being bounced back afterwards.

use anyhow::Result;

use crate::interaction::{InputValidator, InputValidatorResult};

const NUMBER_ERROR_MESSAGE: &str = "Enter a number, or 'null' to clear the value";

/// Validator for number fields.
///
/// Accepts integers, decimals, the literal `null`, and the empty string
/// (emptiness is judged separately against the field's required flag).
#[derive(Clone)]
pub struct NumberValidator;

impl InputValidator for NumberValidator {
    fn validate(&self, input: &str) -> Result<InputValidatorResult> {
        if input.is_empty() || input == "null" {
            return Ok(InputValidatorResult::Valid);
        }

        if input.parse::<f64>().is_ok() {
            Ok(InputValidatorResult::Valid)
        } else {
            Ok(InputValidatorResult::Invalid(
                NUMBER_ERROR_MESSAGE.to_string(),
            ))
        }
    }
}

/// Validator for required fields, rejects blank input.
#[derive(Clone)]
pub struct RequiredValidator {
    label: String,
}

impl RequiredValidator {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl InputValidator for RequiredValidator {
    fn validate(&self, input: &str) -> Result<InputValidatorResult> {
        if input.trim().is_empty() {
            Ok(InputValidatorResult::Invalid(format!(
                "{} is required",
                self.label
            )))
        } else {
            Ok(InputValidatorResult::Valid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_validator() {
        let validator = NumberValidator;

        assert!(matches!(
            validator.validate("").unwrap(),
            InputValidatorResult::Valid
        ));
        assert!(matches!(
            validator.validate("null").unwrap(),
            InputValidatorResult::Valid
        ));
        assert!(matches!(
            validator.validate("42").unwrap(),
            InputValidatorResult::Valid
        ));
        assert!(matches!(
            validator.validate("-2.5").unwrap(),
            InputValidatorResult::Valid
        ));

        assert!(matches!(
            validator.validate("forty-two").unwrap(),
            InputValidatorResult::Invalid(_)
        ));
    }

    #[test]
    fn test_required_validator() {
        let validator = RequiredValidator::new("Name");

        assert!(matches!(
            validator.validate("anything").unwrap(),
            InputValidatorResult::Valid
        ));
        assert!(matches!(
            validator.validate("").unwrap(),
            InputValidatorResult::Invalid(_)
        ));
        assert!(matches!(
            validator.validate("   ").unwrap(),
            InputValidatorResult::Invalid(_)
        ));
    }
}
