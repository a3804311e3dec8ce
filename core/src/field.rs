//! Field descriptors and the per-field resolution step.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::builder::{self, ConfigClass};
use crate::env::EnvSource;
use crate::error::{ConfigError, ConfigResult};
use crate::parser::{parse_boolean, parse_number};
use crate::source::{resolve_sources, FieldContext, Sources, ValueSource};
use crate::value::ConfigValue;

/// Lazily produces the descriptor of a nested configuration class
pub type ClassRef = fn() -> ConfigClass;

/// The declared shape of a configuration field
#[derive(Debug, Clone)]
pub enum DeclaredType {
    String,
    Number,
    Boolean,
    Nested(ClassRef),
    /// Any other shape; only usable together with a custom parser
    Unsupported(Option<Cow<'static, str>>),
}

impl DeclaredType {
    pub fn unsupported(type_name: impl Into<Cow<'static, str>>) -> Self {
        DeclaredType::Unsupported(Some(type_name.into()))
    }
}

type ParseFn = dyn Fn(Option<&str>) -> anyhow::Result<Box<dyn Any + Send + Sync>> + Send + Sync;

/// A custom raw value parser
///
/// Replaces type coercion entirely. Whatever it returns is stored as
/// [`ConfigValue::Custom`] without further checks.
#[derive(Clone)]
pub struct FieldParser(Arc<ParseFn>);

impl FieldParser {
    pub fn new<T, E, F>(parse: F) -> Self
    where
        F: Fn(Option<&str>) -> Result<T, E> + Send + Sync + 'static,
        T: Any + Send + Sync,
        E: Into<anyhow::Error>,
    {
        Self(Arc::new(move |raw: Option<&str>| -> anyhow::Result<Box<dyn Any + Send + Sync>> {
            parse(raw)
                .map(|value| Box::new(value) as Box<dyn Any + Send + Sync>)
                .map_err(Into::into)
        }))
    }

    pub fn parse(&self, raw: Option<&str>) -> ConfigResult<ConfigValue> {
        (self.0)(raw).map(ConfigValue::Custom).map_err(ConfigError::Parser)
    }
}

impl fmt::Debug for FieldParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FieldParser")
    }
}

/// Everything the builder knows about one configuration field
#[derive(Clone)]
pub struct FieldDescriptor {
    name: Cow<'static, str>,
    declared_type: DeclaredType,
    sources: Sources,
    default_value: Option<String>,
    parser: Option<FieldParser>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<Cow<'static, str>>, declared_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            sources: Vec::new(),
            default_value: None,
            parser: None,
        }
    }

    pub fn string(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, DeclaredType::String)
    }

    pub fn number(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, DeclaredType::Number)
    }

    pub fn boolean(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(name, DeclaredType::Boolean)
    }

    pub fn nested(name: impl Into<Cow<'static, str>>, class: ClassRef) -> Self {
        Self::new(name, DeclaredType::Nested(class))
    }

    /// Raw value used when no source yields one. It is coerced like any other raw value.
    pub fn default_value(mut self, raw: impl Into<String>) -> Self {
        self.default_value = Some(raw.into());
        self
    }

    /// Append a source; earlier sources take precedence.
    pub fn source(mut self, source: impl ValueSource + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    pub fn shared_source(mut self, source: Arc<dyn ValueSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Append an environment source reading the variable derived from the field name.
    pub fn from_env(self) -> Self {
        self.source(EnvSource::derived())
    }

    pub fn from_env_named(self, variable: impl Into<String>) -> Self {
        self.source(EnvSource::named(variable))
    }

    pub fn parser(mut self, parser: FieldParser) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared_type
    }

    pub fn sources(&self) -> &[Arc<dyn ValueSource>] {
        &self.sources
    }

    pub fn default_raw(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn custom_parser(&self) -> Option<&FieldParser> {
        self.parser.as_ref()
    }

    pub fn context(&self) -> FieldContext<'_> {
        FieldContext {
            name: &self.name,
            declared_type: &self.declared_type,
        }
    }

    /// The winning raw value: first source that yields one, else the default.
    pub fn raw_value(&self) -> Option<String> {
        let from_source = resolve_sources(&self.sources, &self.context());
        let origin = match (&from_source, &self.default_value) {
            (Some(_), _) => "source",
            (None, Some(_)) => "default",
            (None, None) => "none",
        };
        tracing::trace!(field = %self.name, origin, "resolved raw value");
        from_source.or_else(|| self.default_value.clone())
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field(
                "sources",
                &self.sources.iter().map(|s| s.describe()).collect::<Vec<_>>(),
            )
            .field("default_value", &self.default_value)
            .field("parser", &self.parser)
            .finish()
    }
}

/// Turn a field's raw value into its typed value.
///
/// A custom parser wins over everything. Nested classes are built from their
/// own fields and ignore `raw`. Primitive types are coerced strictly.
pub fn resolve_field(field: &FieldDescriptor, raw: Option<&str>) -> ConfigResult<ConfigValue> {
    if let Some(parser) = &field.parser {
        return parser.parse(raw);
    }

    match &field.declared_type {
        DeclaredType::Nested(class_ref) => {
            let class = class_ref();
            if !class.is_marked() {
                return Err(ConfigError::UnsupportedType {
                    field: field.name.to_string(),
                    type_name: class.name().to_string(),
                });
            }
            if field.default_value.is_some() {
                return Err(ConfigError::NestedDefault {
                    field: field.name.to_string(),
                });
            }
            if !field.sources.is_empty() {
                return Err(ConfigError::NestedSource {
                    field: field.name.to_string(),
                });
            }
            builder::build(&class).map(ConfigValue::Nested)
        }
        DeclaredType::String => Ok(raw.map_or(ConfigValue::Undefined, |raw| {
            ConfigValue::String(raw.to_string())
        })),
        DeclaredType::Number => Ok(parse_number(raw)?.map_or(ConfigValue::Undefined, ConfigValue::Number)),
        DeclaredType::Boolean => Ok(parse_boolean(raw)?.map_or(ConfigValue::Undefined, ConfigValue::Boolean)),
        DeclaredType::Unsupported(Some(type_name)) => Err(ConfigError::UnsupportedType {
            field: field.name.to_string(),
            type_name: type_name.to_string(),
        }),
        DeclaredType::Unsupported(None) => Err(ConfigError::UnknownType {
            field: field.name.to_string(),
        }),
    }
}
