use std::any::Any;
use std::fmt;

/// A resolved field value.
pub enum ConfigValue {
    /// No source, default or parser produced a value
    Undefined,
    String(String),
    Number(f64),
    Boolean(bool),
    Nested(ConfigInstance),
    /// Output of a custom field parser, stored as-is
    Custom(Box<dyn Any + Send + Sync>),
}

impl ConfigValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, ConfigValue::Undefined)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ConfigValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&ConfigInstance> {
        match self {
            ConfigValue::Nested(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            ConfigValue::Custom(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Short shape name, reported by typed conversion mismatches
    pub fn shape(&self) -> &'static str {
        match self {
            ConfigValue::Undefined => "undefined",
            ConfigValue::String(_) => "string",
            ConfigValue::Number(_) => "number",
            ConfigValue::Boolean(_) => "boolean",
            ConfigValue::Nested(_) => "config",
            ConfigValue::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Undefined => f.write_str("Undefined"),
            ConfigValue::String(value) => f.debug_tuple("String").field(value).finish(),
            ConfigValue::Number(value) => f.debug_tuple("Number").field(value).finish(),
            ConfigValue::Boolean(value) => f.debug_tuple("Boolean").field(value).finish(),
            ConfigValue::Nested(instance) => f.debug_tuple("Nested").field(instance).finish(),
            ConfigValue::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A built configuration object: named slots in declaration order.
///
/// Each nested instance is owned by exactly one parent slot.
#[derive(Debug)]
pub struct ConfigInstance {
    class: String,
    fields: Vec<(String, ConfigValue)>,
}

impl ConfigInstance {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: Vec::new(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// Assign a slot, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: ConfigValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Move a slot out; the slot is left `Undefined`.
    pub fn take(&mut self, name: &str) -> ConfigValue {
        self.fields
            .iter_mut()
            .find(|(field, _)| field == name)
            .map(|(_, value)| std::mem::replace(value, ConfigValue::Undefined))
            .unwrap_or(ConfigValue::Undefined)
    }

    /// Look up a value through a dotted path, e.g. `database.host`.
    pub fn lookup(&self, path: &str) -> Option<&ConfigValue> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let value = self.get(head)?;
        match rest {
            None => Some(value),
            Some(rest) => value.as_nested()?.lookup(rest),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
