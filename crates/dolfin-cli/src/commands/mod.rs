//! CLI command implementations.

pub mod get;
pub mod show;
pub mod version;

use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use dolfin_core::{CommandError, Config, ConfigSchema, Value};
use std::path::Path;
use tracing::debug;

/// Add the config source arguments shared by `show` and `get`.
pub fn config_args(parser: ClapCommand) -> ClapCommand {
    parser
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("JSON or YAML config file to load"),
        )
        .arg(
            Arg::new("set")
                .short('s')
                .long("set")
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Override a key (VALUE is parsed as JSON, else taken as text)"),
        )
        .arg(
            Arg::new("default")
                .short('d')
                .long("default")
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Register a default used when the key is not set"),
        )
}

/// Split `KEY=VALUE`, parsing the value as JSON when possible.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), CommandError> {
    let (key, value) = raw
        .split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| CommandError::new(format!("expected KEY=VALUE, got '{}'", raw)))?;

    let value = serde_json::from_str::<serde_json::Value>(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), Value::from(value)))
}

fn assignments(args: &ArgMatches, id: &str) -> Result<Vec<(String, Value)>, CommandError> {
    args.get_many::<String>(id)
        .into_iter()
        .flatten()
        .map(|raw| parse_assignment(raw))
        .collect()
}

/// Build the config described by the shared arguments.
pub fn load_config(args: &ArgMatches) -> Result<Config, CommandError> {
    let schema = ConfigSchema::new("dolfin-cli");
    schema.register_defaults(assignments(args, "default")?);

    let overrides = assignments(args, "set")?;
    let file = args.get_one::<String>("file").map(Path::new);
    debug!(file = ?file, overrides = overrides.len(), "loading config");

    Ok(Config::load(&schema, file, overrides)?)
}
