//! Dependency gating between fields.
//!
//! A field may declare `dependsOnCode` referring to another field's `code`,
//! optionally with a required value (`"code:value"`). Fields whose
//! prerequisite has not resolved to the expected value are inactive: they
//! are neither prompted for nor included in the payload.

use std::collections::HashMap;

use super::FieldDescriptor;

/// Parsed form of a `dependsOnCode` expression.
///
/// `"catalogItemType.type:instance"` depends on the field with code
/// `catalogItemType.type` having resolved to `instance`. Without the
/// `:value` suffix the prerequisite only has to resolve to something
/// non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency<'a> {
    pub code: &'a str,
    pub expected: Option<&'a str>,
}

impl<'a> Dependency<'a> {
    pub fn parse(expression: &'a str) -> Self {
        match expression.split_once(':') {
            Some((code, expected)) => Self {
                code,
                expected: Some(expected),
            },
            None => Self {
                code: expression,
                expected: None,
            },
        }
    }
}

/// Decide whether a field is active given the codes resolved so far.
///
/// Fields without a `dependsOnCode` are always active. An unresolved
/// prerequisite, or one resolved to a different value, makes the field
/// inactive.
pub fn is_active(descriptor: &FieldDescriptor, resolved_codes: &HashMap<String, String>) -> bool {
    let Some(expression) = descriptor.depends_on_code.as_deref() else {
        return true;
    };

    let dependency = Dependency::parse(expression);
    match resolved_codes.get(dependency.code) {
        Some(actual) => match dependency.expected {
            Some(expected) => actual == expected,
            None => !actual.is_empty(),
        },
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option_types::FieldDescriptor;

    fn codes(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(code, value)| (code.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_with_and_without_expected_value() {
        assert_eq!(
            Dependency::parse("catalogItemType.type:instance"),
            Dependency {
                code: "catalogItemType.type",
                expected: Some("instance"),
            }
        );
        assert_eq!(
            Dependency::parse("group"),
            Dependency {
                code: "group",
                expected: None,
            }
        );
    }

    #[test]
    fn test_field_without_dependency_is_always_active() {
        let field = FieldDescriptor::builder().field_name("name").build();
        assert!(is_active(&field, &HashMap::new()));
    }

    #[test]
    fn test_unresolved_prerequisite_is_inactive() {
        let field = FieldDescriptor::builder()
            .field_name("config")
            .depends_on_code("catalogItemType.type:instance")
            .build();
        assert!(!is_active(&field, &HashMap::new()));
    }

    #[test]
    fn test_expected_value_must_match_exactly() {
        let field = FieldDescriptor::builder()
            .field_name("config")
            .depends_on_code("catalogItemType.type:instance")
            .build();

        assert!(is_active(
            &field,
            &codes(&[("catalogItemType.type", "instance")])
        ));
        assert!(!is_active(
            &field,
            &codes(&[("catalogItemType.type", "workflow")])
        ));
        assert!(!is_active(
            &field,
            &codes(&[("catalogItemType.type", "Instance")])
        ));
    }

    #[test]
    fn test_bare_code_requires_non_empty_resolution() {
        let field = FieldDescriptor::builder()
            .field_name("cloud")
            .depends_on_code("group")
            .build();

        assert!(is_active(&field, &codes(&[("group", "1")])));
        assert!(!is_active(&field, &codes(&[("group", "")])));
        assert!(!is_active(&field, &HashMap::new()));
    }
}
