//! Environment variable source
//!
//! Values are read from an immutable [`Environment`] snapshot rather than
//! from the live process environment, so a build never observes a variable
//! changing halfway through.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::naming::derive_env_name;
use crate::source::{FieldContext, ValueSource};

static GLOBAL: OnceLock<Arc<Environment>> = OnceLock::new();

/// A read-only snapshot of environment variables
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Snapshot the current process environment.
    ///
    /// Variables whose name or value is not valid unicode are left out.
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
                .collect(),
        }
    }

    /// The process-wide snapshot, captured on first use.
    ///
    /// Hosts that load a `.env` file must do so before the first build.
    pub fn global() -> Arc<Environment> {
        GLOBAL
            .get_or_init(|| {
                let env = Environment::capture();
                tracing::debug!(vars = env.vars.len(), "captured process environment");
                Arc::new(env)
            })
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Reads a field's value from an environment variable
///
/// The variable name is either given explicitly or derived from the field
/// name (`serverName` reads `SERVER_NAME`).
#[derive(Debug, Clone)]
pub struct EnvSource {
    name: Option<String>,
    env: Option<Arc<Environment>>,
}

impl EnvSource {
    /// Read the variable named after the field.
    pub fn derived() -> Self {
        Self { name: None, env: None }
    }

    /// Read a specific variable.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            env: None,
        }
    }

    /// Read from the given snapshot instead of [`Environment::global`].
    pub fn in_env(mut self, env: Arc<Environment>) -> Self {
        self.env = Some(env);
        self
    }

    /// The variable name this source reads for a field.
    pub fn variable_for(&self, field: &str) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => derive_env_name(field),
        }
    }
}

impl ValueSource for EnvSource {
    fn get_value(&self, field: &FieldContext<'_>) -> Option<String> {
        let variable = self.variable_for(field.name);
        match &self.env {
            Some(env) => env.get(&variable).map(str::to_string),
            None => Environment::global().get(&variable).map(str::to_string),
        }
    }

    fn describe(&self) -> String {
        match &self.name {
            Some(name) => format!("env({name})"),
            None => "env(derived)".to_string(),
        }
    }
}
