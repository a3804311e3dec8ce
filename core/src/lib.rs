//! Declarative configuration binding.
//!
//! Configuration structs describe their fields once, through
//! `#[derive(Config)]` or by hand with [`ConfigClass`] and
//! [`FieldDescriptor`]. Building walks that description, looks every field
//! up in its ordered value sources, falls back to defaults, coerces the raw
//! strings strictly and recurses into nested configuration structs.
//!
//! ```ignore
//! use cfgbind_core::Config;
//!
//! #[derive(Config)]
//! struct DatabaseConfig {
//!     #[config(env = "DB_HOST", default = "localhost")]
//!     host: String,
//!     #[config(env, default = "5432")]
//!     port: u16,
//! }
//!
//! #[derive(Config)]
//! struct AppConfig {
//!     #[config(env, default = "false")]
//!     debug: bool,
//!     database: DatabaseConfig,
//! }
//!
//! let config = AppConfig::build()?;
//! ```

pub mod builder;
pub mod env;
pub mod error;
pub mod field;
pub mod naming;
pub mod parser;
pub mod source;
pub mod typed;
pub mod validation;
pub mod value;

pub use builder::{build, build_validated, ConfigClass};
pub use env::{EnvSource, Environment};
pub use error::{ConfigError, ConfigResult, ErrorKind};
pub use field::{resolve_field, ClassRef, DeclaredType, FieldDescriptor, FieldParser};
pub use naming::derive_env_name;
pub use parser::{parse_boolean, parse_number};
pub use source::{resolve_sources, ConstSource, FieldContext, FnSource, MapSource, ValueSource};
pub use typed::{Config, FieldType, FromConfigValue};
pub use validation::{violation_messages, Validator};
pub use value::{ConfigInstance, ConfigValue};

pub use cfgbind_macros::Config;
pub use validator::Validate;
