//! Validation of built configuration
//!
//! Untyped builds accept any [`Validator`]: it looks at the assembled
//! [`ConfigInstance`] and reports one message per violated constraint, an
//! empty list meaning the instance is valid. Plain closures
//! `Fn(&ConfigInstance) -> Vec<String>` are validators too.
//!
//! Typed configuration structs derive [`validator::Validate`] instead, and
//! [`violation_messages`] flattens the resulting errors into the same
//! `<path> <message>` strings.

use std::future::Future;

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::ConfigError;
use crate::value::ConfigInstance;

/// Checks an assembled configuration instance
pub trait Validator: Send + Sync {
    fn validate(&self, instance: &ConfigInstance) -> impl Future<Output = Vec<String>> + Send;
}

impl<F> Validator for F
where
    F: Fn(&ConfigInstance) -> Vec<String> + Send + Sync,
{
    fn validate(&self, instance: &ConfigInstance) -> impl Future<Output = Vec<String>> + Send {
        std::future::ready(self(instance))
    }
}

/// Flatten validation errors into `<path> <message>` strings.
///
/// Nested structs extend the path with `.field`, list items with `[index]`.
/// Fields are reported in name order.
pub fn violation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect(errors, "", &mut messages);
    messages
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    for (field, kind) in fields {
        let field: &str = field;
        // struct level checks are keyed `__all__` and belong to the struct itself
        let path = if field == "__all__" {
            prefix.trim_end_matches('.').to_string()
        } else {
            format!("{prefix}{field}")
        };

        match kind {
            ValidationErrorsKind::Field(errors) => {
                out.extend(errors.iter().map(|error| match path.as_str() {
                    "" => describe(error),
                    path => format!("{path} {}", describe(error)),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &format!("{path}."), out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}[{index}]."), out);
                }
            }
        }
    }
}

fn describe(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("failed {} check", error.code),
    }
}

/// The error a build ends with when validation reports violations.
pub(crate) fn rejected(class: &str, violations: Vec<String>) -> ConfigError {
    tracing::warn!(class, violations = violations.len(), "config validation failed");
    ConfigError::Validation { violations }
}
