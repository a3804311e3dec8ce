use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::field::DeclaredType;
use crate::naming::derive_env_name;

/// What a value source gets to see about the field being resolved
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub name: &'a str,
    pub declared_type: &'a DeclaredType,
}

/// A provider of raw string values for configuration fields
///
/// Implementations only look values up; coercion happens later.
pub trait ValueSource: Send + Sync {
    /// Try to get the raw value for a field
    fn get_value(&self, field: &FieldContext<'_>) -> Option<String>;

    /// Short label used in logs
    fn describe(&self) -> String {
        "source".to_string()
    }
}

impl<S: ValueSource + ?Sized> ValueSource for Arc<S> {
    fn get_value(&self, field: &FieldContext<'_>) -> Option<String> {
        (**self).get_value(field)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Ordered sources attached to a field
pub type Sources = Vec<Arc<dyn ValueSource>>;

/// Return the first value any source yields, in order.
pub fn resolve_sources(sources: &[Arc<dyn ValueSource>], field: &FieldContext<'_>) -> Option<String> {
    sources.iter().find_map(|source| {
        let value = source.get_value(field);
        if value.is_some() {
            tracing::trace!(field = field.name, source = %source.describe(), "source yielded a value");
        }
        value
    })
}

/// A static key-value source
///
/// Keys are matched against the field name first, then against its derived
/// environment name.
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Build from a JSON object.
    ///
    /// Strings are taken verbatim, numbers and booleans are rendered.
    /// Nulls, arrays and objects have no raw string form and are skipped.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let values = value
            .as_object()
            .into_iter()
            .flatten()
            .filter_map(|(key, value)| {
                let raw = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((key.clone(), raw))
            })
            .collect();
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl ValueSource for MapSource {
    fn get_value(&self, field: &FieldContext<'_>) -> Option<String> {
        self.values
            .get(field.name)
            .or_else(|| self.values.get(&derive_env_name(field.name)))
            .cloned()
    }

    fn describe(&self) -> String {
        format!("map({} keys)", self.values.len())
    }
}

/// A source backed by a closure
pub struct FnSource<F>(F);

impl<F> FnSource<F>
where
    F: Fn(&FieldContext<'_>) -> Option<String> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSource")
    }
}

impl<F> ValueSource for FnSource<F>
where
    F: Fn(&FieldContext<'_>) -> Option<String> + Send + Sync,
{
    fn get_value(&self, field: &FieldContext<'_>) -> Option<String> {
        (self.0)(field)
    }

    fn describe(&self) -> String {
        "fn".to_string()
    }
}

/// A source that yields the same value for every field
#[derive(Debug, Clone)]
pub struct ConstSource(Option<String>);

impl ConstSource {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Some(value.into()))
    }

    pub fn empty() -> Self {
        Self(None)
    }
}

impl ValueSource for ConstSource {
    fn get_value(&self, _field: &FieldContext<'_>) -> Option<String> {
        self.0.clone()
    }

    fn describe(&self) -> String {
        "const".to_string()
    }
}
