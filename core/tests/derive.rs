//! End-to-end tests for `#[derive(Config)]`.
//!
//! Environment values mostly come from isolated snapshots. Only the
//! `CARGO_PKG_*` variables cargo exports are read from the process itself.

use std::sync::Arc;

use cfgbind_core::{
    Config, ConstSource, EnvSource, Environment, ErrorKind, FieldType, MapSource, Validate,
    ValueSource,
};

fn env(vars: &[(&str, &str)]) -> Arc<Environment> {
    Arc::new(vars.iter().copied().collect())
}

fn server_env() -> Arc<Environment> {
    env(&[("SERVER_PORT", "8080"), ("SERVER_NAME", "test")])
}

fn logging_env() -> Arc<Environment> {
    env(&[("LOGGING", "yes")])
}

#[derive(Config, Debug)]
struct ServerConfig {
    #[config(default = "localhost")]
    host: String,
    #[config(default = "8080")]
    port: u16,
}

#[test]
fn builds_from_defaults() {
    let config = ServerConfig::build().unwrap();
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 8080);
}

#[derive(Config, Debug)]
struct EnvPortConfig {
    #[config(source = EnvSource::named("SERVER_PORT").in_env(server_env()))]
    port: f64,
    #[config(source = EnvSource::derived().in_env(server_env()))]
    server_name: String,
}

#[test]
fn reads_numbers_and_derived_names_from_environment() {
    let config = EnvPortConfig::build().unwrap();
    assert_eq!(config.port, 8080.0);
    assert_eq!(config.server_name, "test");
}

#[derive(Config, Debug)]
struct LoggingConfig {
    #[config(source = EnvSource::derived().in_env(logging_env()))]
    #[allow(dead_code)]
    logging: bool,
}

#[test]
fn rejects_non_boolean_environment_value() {
    let err = LoggingConfig::build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(err.to_string(), "Can't convert type of 'yes' to boolean!");
}

#[derive(Config, Debug)]
struct DatabaseConfig {
    #[config(default = "localhost")]
    host: String,
    #[config(default = "5432")]
    port: u16,
}

#[derive(Config, Debug)]
struct RedisConfig {
    #[config(default = "127.0.0.1")]
    host: String,
    #[config(default = "1188")]
    port: u32,
}

#[derive(Config, Debug)]
struct AppConfig {
    #[config(default = "false")]
    debug: bool,
    database: DatabaseConfig,
    redis: RedisConfig,
}

#[test]
fn builds_nested_configs_independently() {
    let config = AppConfig::build().unwrap();
    assert!(!config.debug);
    assert_eq!(config.database.host, "localhost");
    assert_eq!(config.database.port, 5432);
    assert_eq!(config.redis.host, "127.0.0.1");
    assert_eq!(config.redis.port, 1188);
}

#[test]
fn nested_config_declares_nested_type() {
    let class = AppConfig::config_class();
    assert_eq!(class.name(), "AppConfig");
    assert_eq!(class.fields().len(), 3);
    assert!(matches!(
        DatabaseConfig::declared_type(),
        cfgbind_core::DeclaredType::Nested(_)
    ));
}

#[derive(Config, Debug)]
#[allow(dead_code)]
struct NestedWithDefault {
    #[config(default = "x")]
    database: DatabaseConfig,
}

#[derive(Config, Debug)]
#[allow(dead_code)]
struct NestedWithSource {
    #[config(env = "DATABASE")]
    database: DatabaseConfig,
}

#[test]
fn nested_fields_reject_default_and_source_at_build_time() {
    let err = NestedWithDefault::build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.to_string(), "Config class field 'database' can't set default value");

    let err = NestedWithSource::build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.to_string(), "Config class field 'database' can't set config source");
}

#[derive(Config, Debug)]
struct PrecedenceConfig {
    #[config(source = ConstSource::empty(), source = ConstSource::new("second"), default = "default")]
    second_wins: String,
    #[config(source = ConstSource::new("first"), source = ConstSource::new("second"))]
    first_wins: String,
    #[config(source = ConstSource::empty(), default = "7")]
    from_default: i32,
}

#[test]
fn sources_are_tried_in_attribute_order() {
    let config = PrecedenceConfig::build().unwrap();
    assert_eq!(config.second_wins, "second");
    assert_eq!(config.first_wins, "first");
    assert_eq!(config.from_default, 7);
}

#[derive(Config, Debug)]
struct OptionalConfig {
    name: Option<String>,
    port: Option<u16>,
    #[config(default = "t")]
    verbose: Option<bool>,
}

#[test]
fn optional_fields_without_value_are_none() {
    let config = OptionalConfig::build().unwrap();
    assert_eq!(config.name, None);
    assert_eq!(config.port, None);
    assert_eq!(config.verbose, Some(true));
}

#[derive(Config, Debug)]
#[allow(dead_code)]
struct RequiredConfig {
    database_url: String,
}

#[test]
fn required_field_without_value_is_missing() {
    let err = RequiredConfig::build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Missing);
    assert_eq!(err.to_string(), "Config field 'database_url' is not set.");
}

#[derive(Config, Debug)]
#[allow(dead_code)]
struct OutOfRangeConfig {
    #[config(default = "70000")]
    port: u16,
}

#[test]
fn integer_fields_reject_values_out_of_range() {
    let err = OutOfRangeConfig::build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(err.to_string(), "Can't convert '70000' of field 'port' to u16!");
}

fn parse_tags(raw: Option<&str>) -> anyhow::Result<Vec<String>> {
    Ok(raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect())
}

fn parse_port(raw: Option<&str>) -> Result<u16, std::num::ParseIntError> {
    raw.unwrap_or("0").parse()
}

fn tags_source() -> MapSource {
    MapSource::new().with("TAGS", "a, b,,c")
}

#[derive(Config, Debug)]
struct ParserConfig {
    #[config(source = tags_source(), parser = parse_tags)]
    tags: Vec<String>,
    #[config(parser = parse_tags)]
    empty_tags: Vec<String>,
    #[config(default = "not a boolean", parser = |raw: Option<&str>| Ok::<_, anyhow::Error>(raw.map(str::len)))]
    length: Option<usize>,
}

#[test]
fn custom_parsers_override_coercion() {
    let config = ParserConfig::build().unwrap();
    assert_eq!(config.tags, vec!["a", "b", "c"]);
    assert!(config.empty_tags.is_empty());
    assert_eq!(config.length, Some(13));
}

#[derive(Config, Debug)]
#[allow(dead_code)]
struct FailingParserConfig {
    #[config(default = "http", parser = parse_port)]
    port: u16,
}

#[test]
fn custom_parser_errors_propagate() {
    let err = FailingParserConfig::build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parser);
    assert_eq!(err.to_string(), "invalid digit found in string");
}

#[derive(Debug, Default)]
struct RuntimeState {
    started: bool,
}

#[derive(Config, Debug)]
#[config(name = "Renamed")]
struct SkipConfig {
    #[config(default = "svc")]
    r#type: String,
    #[config(skip)]
    state: RuntimeState,
}

#[test]
fn skipped_fields_use_default_and_raw_idents_are_unraw() {
    let class = SkipConfig::config_class();
    assert_eq!(class.name(), "Renamed");
    assert_eq!(class.fields().len(), 1);
    assert_eq!(class.fields()[0].name(), "type");

    let config = SkipConfig::build().unwrap();
    assert_eq!(config.r#type, "svc");
    assert!(!config.state.started);
}

#[derive(Config, Validate, Debug)]
struct ValidatedDatabase {
    #[config(default = "")]
    #[validate(length(min = 1, message = "must not be empty"))]
    host: String,
    #[config(default = "5432")]
    #[validate(range(min = 1, message = "must be a port number"))]
    port: u16,
}

#[derive(Config, Validate, Debug)]
struct ValidatedApp {
    #[config(default = "0")]
    #[validate(range(min = 1, max = 64, message = "must be between 1 and 64"))]
    workers: u32,
    #[validate(nested)]
    database: ValidatedDatabase,
}

#[test]
fn validation_failures_carry_dotted_paths() {
    let err = ValidatedApp::build_validated().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.violations(),
        &[
            "database.host must not be empty".to_string(),
            "workers must be between 1 and 64".to_string(),
        ]
    );
    assert_eq!(
        err.to_string(),
        "database.host must not be empty, workers must be between 1 and 64"
    );
}

#[derive(Config, Validate, Debug)]
struct ValidatedServer {
    #[config(default = "localhost")]
    #[validate(length(min = 1))]
    host: String,
    #[config(default = "8080")]
    #[validate(range(min = 1))]
    port: u16,
}

#[test]
fn validation_passes_and_returns_typed_config() {
    let config = ValidatedServer::build_validated().unwrap();
    assert_eq!(config.host, "localhost");
    assert_eq!(config.port, 8080);
}

#[test]
fn build_errors_win_over_validation() {
    #[derive(Config, Validate, Debug)]
    #[allow(dead_code)]
    struct BadDefault {
        #[config(default = "seventy")]
        #[validate(range(min = 1))]
        port: u16,
    }
    let err = BadDefault::build_validated().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(err.to_string(), "Can't convert type of 'seventy' to number!");
}

// cargo exports CARGO_PKG_* to the test process, so the global snapshot has them
#[derive(Config, Debug)]
struct PackageConfig {
    #[config(env)]
    cargo_pkg_name: String,
    #[config(env = "CARGO_PKG_VERSION")]
    version: String,
    #[config(env, default = "fallback")]
    cfgbind_unset_variable: String,
}

#[test]
fn env_attributes_read_the_process_environment() {
    let config = PackageConfig::build().unwrap();
    assert_eq!(config.cargo_pkg_name, env!("CARGO_PKG_NAME"));
    assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(config.cfgbind_unset_variable, "fallback");
}

#[test]
fn env_attributes_generate_env_sources() {
    let class = PackageConfig::config_class();
    let sources: Vec<Vec<String>> = class
        .fields()
        .iter()
        .map(|field| field.sources().iter().map(|source| source.describe()).collect())
        .collect();
    assert_eq!(
        sources,
        vec![
            vec!["env(derived)".to_string()],
            vec!["env(CARGO_PKG_VERSION)".to_string()],
            vec!["env(derived)".to_string()],
        ]
    );
    assert_eq!(class.fields()[2].default_raw(), Some("fallback"));
}

#[test]
fn unsupported_field_types_fail_at_build_time() {
    // A derived struct can't declare a Vec field without a parser, so describe one by hand
    let class = cfgbind_core::ConfigClass::new("ArrayConfigClass").field(
        cfgbind_core::FieldDescriptor::new("error", cfgbind_core::DeclaredType::unsupported("Array")),
    );
    let err = cfgbind_core::build(&class).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(err.to_string(), "From instance 'error' get an unsupported type: 'Array'.");
}
