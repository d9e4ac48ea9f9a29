//! Show version information.

use anyhow::Result;
use clap::{Arg, ArgMatches, Command as ClapCommand};
use colored::Colorize;
use dolfin_core::{current_version, SemVer, SubCommand};
use std::path::Path;

use crate::cli::tool_version;

/// `dolfin version [--dir DIR] [--base X.Y.Z]`
pub struct Version;

impl SubCommand for Version {
    fn name(&self) -> &str {
        "version"
    }

    fn about(&self) -> &str {
        "Show version information, with the source control revision when known"
    }

    fn configure(&self, parser: ClapCommand) -> ClapCommand {
        parser
            .arg(
                Arg::new("dir")
                    .long("dir")
                    .value_name("DIR")
                    .requires("base")
                    .help("Repository directory to read the revision from"),
            )
            .arg(
                Arg::new("base")
                    .long("base")
                    .value_name("X.Y.Z")
                    .help("Base version to decorate instead of dolfin's own"),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .action(clap::ArgAction::SetTrue)
                    .help("Show detailed build information"),
            )
    }

    fn handle(&self, args: &ArgMatches) -> Result<Option<String>> {
        if let Some(base) = args.get_one::<String>("base") {
            let parts = parse_parts(base)?;
            let dir = args
                .get_one::<String>("dir")
                .map(Path::new)
                .unwrap_or_else(|| Path::new("."));
            return Ok(Some(current_version(SemVer::from_parts(&parts), dir)));
        }

        let mut output = format!("{} {}", "dolfin".cyan().bold(), tool_version());
        if args.get_flag("verbose") {
            output.push_str("\n\nBuild Information:");
            output.push_str(&format!("\n  Version: {}", env!("CARGO_PKG_VERSION")));
            output.push_str(&format!("\n  Target: {}", std::env::consts::ARCH));
            output.push_str(&format!("\n  OS: {}", std::env::consts::OS));
        }
        Ok(Some(output))
    }
}

/// Parse a dotted version of any length into numeric parts.
fn parse_parts(raw: &str) -> Result<Vec<u32>, dolfin_core::CommandError> {
    raw.split('.')
        .map(|part| {
            part.parse::<u32>().map_err(|_| {
                dolfin_core::CommandError::new(format!(
                    "invalid version component '{}' in '{}'",
                    part, raw
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dolfin_core::Command;

    #[test]
    fn test_base_version_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let dir_arg = dir.path().to_string_lossy().into_owned();
        let output = crate::cli::app()
            .invoke(["dolfin", "version", "--base", "0.1", "--dir", dir_arg.as_str()])
            .unwrap();
        assert_eq!(output.as_deref(), Some("0.1.0"));

        std::fs::write(dir.path().join("REVISION"), "abcdef123456\n").unwrap();
        let output = crate::cli::app()
            .invoke(["dolfin", "version", "--base", "0.1.0.7", "--dir", dir_arg.as_str()])
            .unwrap();
        assert_eq!(output.as_deref(), Some("0.1.0+abcdef123456"));
    }

    #[test]
    fn test_invalid_base_is_command_error() {
        let err = crate::cli::app()
            .invoke(["dolfin", "version", "--base", "1.x"])
            .unwrap_err();
        assert!(dolfin_core::command::as_command_error(&err).is_some());
    }

    #[test]
    fn test_own_version_is_reported() {
        let output = crate::cli::app().invoke(["dolfin", "version"]).unwrap().unwrap();
        assert!(output.contains(env!("CARGO_PKG_VERSION")));
    }
}
