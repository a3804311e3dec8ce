use std::borrow::Cow;

use crate::error::{ConfigError, ConfigResult};
use crate::field::{resolve_field, FieldDescriptor};
use crate::validation::{self, Validator};
use crate::value::ConfigInstance;

/// Descriptor of a configuration class: its name, the config marker and its field table
#[derive(Debug, Clone)]
pub struct ConfigClass {
    name: Cow<'static, str>,
    marked: bool,
    fields: Vec<FieldDescriptor>,
}

impl ConfigClass {
    /// A class marked as buildable.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            marked: true,
            fields: Vec::new(),
        }
    }

    /// A class that declares fields but is not marked as a config class.
    ///
    /// Building it, or nesting it inside another class, fails.
    pub fn unmarked(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            marked: false,
            ..Self::new(name)
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

/// Build a fresh instance of a configuration class.
///
/// Every field is resolved independently; the first failure aborts the whole
/// build and nothing partial is returned.
pub fn build(class: &ConfigClass) -> ConfigResult<ConfigInstance> {
    if !class.is_marked() {
        return Err(ConfigError::NotConfigClass {
            class: class.name().to_string(),
        });
    }

    tracing::debug!(class = class.name(), fields = class.fields.len(), "building config class");

    let mut instance = ConfigInstance::new(class.name());
    for field in &class.fields {
        let raw = field.raw_value();
        let value = resolve_field(field, raw.as_deref())?;
        instance.insert(field.name(), value);
    }

    tracing::debug!(class = class.name(), "built config class");
    Ok(instance)
}

/// Build an instance, then hand it to `validator`.
///
/// Any violation fails the build with all messages attached.
pub async fn build_validated<V: Validator>(
    class: &ConfigClass,
    validator: &V,
) -> ConfigResult<ConfigInstance> {
    let instance = build(class)?;

    let violations = validator.validate(&instance).await;
    if !violations.is_empty() {
        return Err(validation::rejected(class.name(), violations));
    }

    Ok(instance)
}
