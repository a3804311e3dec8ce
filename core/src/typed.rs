//! Typed access on top of the descriptor engine
//!
//! `#[derive(Config)]` implements [`Config`], [`FieldType`] and
//! [`FromConfigValue`] for a struct. The engine builds a [`ConfigInstance`]
//! from the struct's descriptor table, then the instance is moved field by
//! field into the struct.

use std::any::{type_name, Any};

use validator::Validate;

use crate::builder::{self, ConfigClass};
use crate::error::{ConfigError, ConfigResult};
use crate::field::DeclaredType;
use crate::validation::{self, violation_messages};
use crate::value::{ConfigInstance, ConfigValue};

/// A typed configuration struct
pub trait Config: Sized {
    /// The descriptor table the engine builds from
    fn config_class() -> ConfigClass;

    /// Move a built instance into the typed struct
    fn from_instance(instance: ConfigInstance) -> ConfigResult<Self>;

    /// Build a fresh, fully populated configuration
    fn build() -> ConfigResult<Self> {
        let instance = builder::build(&Self::config_class())?;
        Self::from_instance(instance)
    }

    /// Build, then run the struct's own `Validate` rules on the result
    fn build_validated() -> ConfigResult<Self>
    where
        Self: Validate,
    {
        let config = Self::build()?;
        if let Err(errors) = config.validate() {
            return Err(validation::rejected(type_name::<Self>(), violation_messages(&errors)));
        }
        Ok(config)
    }
}

/// Maps a Rust field type to the shape the engine coerces raw values into
pub trait FieldType {
    fn declared_type() -> DeclaredType;
}

/// Converts a resolved slot into a typed field value
pub trait FromConfigValue: Sized {
    fn from_config_value(field: &str, value: ConfigValue) -> ConfigResult<Self>;
}

fn mismatch(field: &str, expected: &'static str, value: ConfigValue) -> ConfigError {
    match value {
        ConfigValue::Undefined => ConfigError::Missing {
            field: field.to_string(),
        },
        other => ConfigError::Mismatch {
            field: field.to_string(),
            expected,
            found: other.shape(),
        },
    }
}

impl FieldType for String {
    fn declared_type() -> DeclaredType {
        DeclaredType::String
    }
}

impl FromConfigValue for String {
    fn from_config_value(field: &str, value: ConfigValue) -> ConfigResult<Self> {
        match value {
            ConfigValue::String(value) => Ok(value),
            other => Err(mismatch(field, "a string", other)),
        }
    }
}

impl FieldType for bool {
    fn declared_type() -> DeclaredType {
        DeclaredType::Boolean
    }
}

impl FromConfigValue for bool {
    fn from_config_value(field: &str, value: ConfigValue) -> ConfigResult<Self> {
        match value {
            ConfigValue::Boolean(value) => Ok(value),
            other => Err(mismatch(field, "a boolean", other)),
        }
    }
}

macro_rules! impl_float {
    ($($ty:ty),*) => {$(
        impl FieldType for $ty {
            fn declared_type() -> DeclaredType {
                DeclaredType::Number
            }
        }

        impl FromConfigValue for $ty {
            fn from_config_value(field: &str, value: ConfigValue) -> ConfigResult<Self> {
                match value {
                    ConfigValue::Number(value) => Ok(value as $ty),
                    other => Err(mismatch(field, "a number", other)),
                }
            }
        }
    )*};
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {$(
        impl FieldType for $ty {
            fn declared_type() -> DeclaredType {
                DeclaredType::Number
            }
        }

        impl FromConfigValue for $ty {
            fn from_config_value(field: &str, value: ConfigValue) -> ConfigResult<Self> {
                match value {
                    ConfigValue::Number(value) => {
                        // MAX as f64 may round up, so compare against MAX + 1 exclusively
                        let fits = value.fract() == 0.0
                            && value >= <$ty>::MIN as f64
                            && value < <$ty>::MAX as f64 + 1.0;
                        if fits {
                            Ok(value as $ty)
                        } else {
                            Err(ConfigError::OutOfRange {
                                field: field.to_string(),
                                value,
                                target: stringify!($ty),
                            })
                        }
                    }
                    other => Err(mismatch(field, "a number", other)),
                }
            }
        }
    )*};
}

impl_float!(f32, f64);
impl_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl<T: FieldType> FieldType for Option<T> {
    fn declared_type() -> DeclaredType {
        T::declared_type()
    }
}

impl<T: FromConfigValue> FromConfigValue for Option<T> {
    fn from_config_value(field: &str, value: ConfigValue) -> ConfigResult<Self> {
        match value {
            ConfigValue::Undefined => Ok(None),
            value => T::from_config_value(field, value).map(Some),
        }
    }
}

/// Convert a nested slot into its typed configuration.
pub fn nested_from_value<T: Config>(field: &str, value: ConfigValue) -> ConfigResult<T> {
    match value {
        ConfigValue::Nested(instance) => T::from_instance(instance),
        other => Err(mismatch(field, "a nested config", other)),
    }
}

/// Take the output of a custom parser out of its slot.
pub fn custom_from_value<T: Any>(field: &str, value: ConfigValue) -> ConfigResult<T> {
    match value {
        ConfigValue::Custom(boxed) => boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| ConfigError::Mismatch {
                field: field.to_string(),
                expected: type_name::<T>(),
                found: "custom",
            }),
        other => Err(mismatch(field, type_name::<T>(), other)),
    }
}
