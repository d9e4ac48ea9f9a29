//! Show a resolved configuration.

use anyhow::{Context, Result};
use clap::{ArgMatches, Command as ClapCommand};
use dolfin_core::SubCommand;

use super::{config_args, load_config};

/// `dolfin show [--file FILE] [--set KEY=VALUE]...`
pub struct Show;

impl SubCommand for Show {
    fn name(&self) -> &str {
        "show"
    }

    fn about(&self) -> &str {
        "Print the merged configuration as JSON"
    }

    fn configure(&self, parser: ClapCommand) -> ClapCommand {
        config_args(parser)
    }

    fn handle(&self, args: &ArgMatches) -> Result<Option<String>> {
        let config = load_config(args)?;
        let rendered = serde_json::to_string_pretty(&config.to_value())
            .context("Failed to render configuration")?;
        Ok(Some(rendered))
    }
}

#[cfg(test)]
mod tests {
    use dolfin_core::Command;
    use serde_json::json;

    #[test]
    fn test_show_merges_file_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        std::fs::write(&path, r#"{"foo": "bar", "port": 80}"#).unwrap();
        let path_arg = path.to_string_lossy().into_owned();

        let output = crate::cli::app()
            .invoke(["dolfin", "show", "-f", path_arg.as_str(), "--set", "foo=baz"])
            .unwrap()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["foo"], json!("baz"));
        assert_eq!(value["port"], json!(80));
        assert_eq!(value["meta"]["name"], json!("app.json"));
        assert_eq!(value["meta"]["path"], json!(dir.path().to_string_lossy()));
    }

    #[test]
    fn test_show_without_file() {
        let output = crate::cli::app()
            .invoke(["dolfin", "show", "--set", "debug=true"])
            .unwrap()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value, json!({"debug": true, "meta": {"name": null, "path": null}}));
    }

    #[test]
    fn test_show_missing_file_is_command_error() {
        let err = crate::cli::app()
            .invoke(["dolfin", "show", "-f", "dolfin-cli-missing.json"])
            .unwrap_err();
        let cmd_err = dolfin_core::command::as_command_error(&err).unwrap();
        assert!(cmd_err.message().contains("current directory"));
    }
}
