//! Read a single configuration value.

use anyhow::Result;
use clap::{Arg, ArgMatches, Command as ClapCommand};
use dolfin_core::{CommandError, SubCommand, Value};

use super::{config_args, load_config};

/// `dolfin get [--file FILE] [--default KEY=VALUE]... KEY.PATH`
pub struct Get;

impl SubCommand for Get {
    fn name(&self) -> &str {
        "get"
    }

    fn about(&self) -> &str {
        "Print one value by dotted key path"
    }

    fn configure(&self, parser: ClapCommand) -> ClapCommand {
        config_args(parser).arg(
            Arg::new("key")
                .value_name("KEY.PATH")
                .required(true)
                .help("Dotted key path, e.g. meta.name"),
        )
    }

    fn handle(&self, args: &ArgMatches) -> Result<Option<String>> {
        let key = args
            .get_one::<String>("key")
            .ok_or_else(|| CommandError::new("no key given"))?;
        let mut config = load_config(args)?;

        let value = config
            .get_path(key)
            .ok_or_else(|| CommandError::new(format!("key '{}' is not set", key)))?;
        Ok(Some(render(value)))
    }
}

/// Strings print bare; everything else prints as JSON.
fn render(value: &Value) -> String {
    match value.as_str() {
        Some(text) => text.to_string(),
        None => value.to_json().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dolfin_core::Command;

    fn get(args: &[&str]) -> anyhow::Result<Option<String>> {
        let argv = ["dolfin", "get"].into_iter().chain(args.iter().copied());
        crate::cli::app().invoke(argv)
    }

    #[test]
    fn test_get_reads_nested_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.yaml");
        std::fs::write(&path, "db:\n  host: localhost\n  port: 5432\n").unwrap();
        let path_arg = path.to_string_lossy().into_owned();

        assert_eq!(get(&["-f", &path_arg, "db.host"]).unwrap().as_deref(), Some("localhost"));
        assert_eq!(get(&["-f", &path_arg, "db.port"]).unwrap().as_deref(), Some("5432"));
        assert_eq!(get(&["-f", &path_arg, "meta.name"]).unwrap().as_deref(), Some("app.yaml"));
    }

    #[test]
    fn test_get_falls_back_to_default() {
        assert_eq!(get(&["-d", "color=red", "color"]).unwrap().as_deref(), Some("red"));
        assert_eq!(
            get(&["-d", "color=red", "-s", "color=blue", "color"]).unwrap().as_deref(),
            Some("blue")
        );
    }

    #[test]
    fn test_get_unset_meta_is_null() {
        assert_eq!(get(&["meta.path"]).unwrap().as_deref(), Some("null"));
    }

    #[test]
    fn test_get_missing_key_is_command_error() {
        let err = get(&["missing"]).unwrap_err();
        let cmd_err = dolfin_core::command::as_command_error(&err).unwrap();
        assert_eq!(cmd_err.message(), "key 'missing' is not set");
    }

    #[test]
    fn test_bad_assignment_is_command_error() {
        let err = get(&["-s", "broken", "broken"]).unwrap_err();
        assert!(dolfin_core::command::as_command_error(&err).is_some());
    }
}
