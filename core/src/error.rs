//! Error types for configuration building
//!
//! Every message below is an observable contract: callers and tests match
//! on the exact rendered strings.

use thiserror::Error;

/// Result type alias for configuration building
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The broad failure kinds a build can end with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The target class is not marked as a configuration class
    Config,
    /// A nested configuration field also declares a default or a source
    Structural,
    /// A raw value can't be coerced, or the declared type is unsupported
    Type,
    /// The assembled instance failed external validation
    Validation,
    /// A required typed field resolved to no value
    Missing,
    /// A custom field parser failed
    Parser,
}

/// Main error type for configuration building
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("The class '{class}' is not a config class.")]
    NotConfigClass { class: String },

    #[error("Config class field '{field}' can't set default value")]
    NestedDefault { field: String },

    #[error("Config class field '{field}' can't set config source")]
    NestedSource { field: String },

    #[error("Can't convert type of '{raw}' to boolean!")]
    NotBoolean { raw: String },

    #[error("Can't convert type of '{raw}' to number!")]
    NotNumber { raw: String },

    #[error("From instance '{field}' get an unsupported type: '{type_name}'.")]
    UnsupportedType { field: String, type_name: String },

    #[error("From instance '{field}' get a not support type.")]
    UnknownType { field: String },

    /// A parsed number doesn't fit the integer type of a typed field
    #[error("Can't convert '{value}' of field '{field}' to {target}!")]
    OutOfRange {
        field: String,
        value: f64,
        target: &'static str,
    },

    /// A typed field received a value of another shape than it declared
    #[error("Config field '{field}' expected {expected} value, got {found}")]
    Mismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Config field '{field}' is not set.")]
    Missing { field: String },

    #[error("{}", .violations.join(", "))]
    Validation { violations: Vec<String> },

    #[error(transparent)]
    Parser(anyhow::Error),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::NotConfigClass { .. } => ErrorKind::Config,
            ConfigError::NestedDefault { .. } | ConfigError::NestedSource { .. } => {
                ErrorKind::Structural
            }
            ConfigError::NotBoolean { .. }
            | ConfigError::NotNumber { .. }
            | ConfigError::UnsupportedType { .. }
            | ConfigError::UnknownType { .. }
            | ConfigError::OutOfRange { .. }
            | ConfigError::Mismatch { .. } => ErrorKind::Type,
            ConfigError::Validation { .. } => ErrorKind::Validation,
            ConfigError::Missing { .. } => ErrorKind::Missing,
            ConfigError::Parser(_) => ErrorKind::Parser,
        }
    }

    /// Violation messages when this is a validation failure
    pub fn violations(&self) -> &[String] {
        match self {
            ConfigError::Validation { violations } => violations,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_config_class() {
        let err = ConfigError::NotConfigClass {
            class: "ErrorConfig".to_string(),
        };
        assert_eq!(err.to_string(), "The class 'ErrorConfig' is not a config class.");
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_error_display_unsupported_type_variants() {
        let named = ConfigError::UnsupportedType {
            field: "error".to_string(),
            type_name: "Array".to_string(),
        };
        assert_eq!(
            named.to_string(),
            "From instance 'error' get an unsupported type: 'Array'."
        );

        let unnamed = ConfigError::UnknownType {
            field: "error".to_string(),
        };
        assert_eq!(unnamed.to_string(), "From instance 'error' get a not support type.");
        assert_eq!(unnamed.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_error_display_validation_joins_violations() {
        let err = ConfigError::Validation {
            violations: vec![
                "port must be a number".to_string(),
                "database.host must not be empty".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "port must be a number, database.host must not be empty"
        );
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn test_parser_error_is_transparent() {
        let err = ConfigError::Parser(anyhow::anyhow!("bad list"));
        assert_eq!(err.to_string(), "bad list");
        assert_eq!(err.kind(), ErrorKind::Parser);
        assert!(err.violations().is_empty());
    }
}
