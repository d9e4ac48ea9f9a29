//! Command and sub-command building blocks for CLI tools.
//!
//! A [`Command`] supplies a clap parser and a handler. The provided
//! [`Command::run`] wraps the handler: a [`CommandError`] is printed to
//! stderr as `Error: <message>` and ends the process with status 1, while
//! any other error is returned to the caller untouched.
//!
//! [`CommandSet`] builds a tool out of [`SubCommand`]s:
//!
//! ```
//! use anyhow::Result;
//! use clap::ArgMatches;
//! use dolfin_core::command::{Command, CommandSet, SubCommand};
//!
//! struct Hello;
//!
//! impl SubCommand for Hello {
//!     fn name(&self) -> &str { "hello" }
//!     fn about(&self) -> &str { "Say hello" }
//!     fn handle(&self, _args: &ArgMatches) -> Result<Option<String>> {
//!         Ok(Some("hello".to_string()))
//!     }
//! }
//!
//! let tool = CommandSet::new("demo", "0.1.0").with(Hello);
//! let output = tool.invoke(["demo", "hello"]).unwrap();
//! assert_eq!(output.as_deref(), Some("hello"));
//! ```

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};
use dolfin_types::{CommandError, DolfinError};
use std::ffi::OsString;
use tracing::debug;

/// Exit status used when a command fails with a [`CommandError`].
pub const FAILURE_EXIT_CODE: i32 = 1;

const VERSION_FLAG: &str = "version";

/// A command-line tool: a parser plus a handler for the parsed arguments.
pub trait Command {
    /// Build the argument parser.
    fn parser(&self) -> ClapCommand;

    /// Handle parsed arguments, returning optional output to print.
    ///
    /// Return a [`CommandError`] for failures the user should see as a
    /// plain message.
    fn handle(&self, args: &ArgMatches) -> Result<Option<String>>;

    /// Parse `argv` and handle it without printing or exiting.
    ///
    /// Parse failures, including `--help`, are returned as
    /// `DolfinError::Usage`.
    fn invoke<I, T>(&self, argv: I) -> Result<Option<String>>
    where
        Self: Sized,
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .parser()
            .try_get_matches_from(argv)
            .map_err(|e| DolfinError::Usage(e.to_string()))?;
        self.handle(&matches)
    }

    /// Parse `argv`, handle it, and print the output.
    ///
    /// Usage errors exit the way clap always does. A [`CommandError`] is
    /// printed and exits with [`FAILURE_EXIT_CODE`]; other errors are
    /// returned.
    fn run_from<I, T>(&self, argv: I) -> Result<()>
    where
        Self: Sized,
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.parser().get_matches_from(argv);
        match self.handle(&matches) {
            Ok(Some(output)) => {
                println!("{}", output);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => match as_command_error(&err) {
                Some(cmd_err) => {
                    eprintln!("{}", error_line(cmd_err));
                    std::process::exit(FAILURE_EXIT_CODE);
                }
                None => Err(err),
            },
        }
    }

    /// [`Command::run_from`] with the process arguments.
    fn run(&self) -> Result<()>
    where
        Self: Sized,
    {
        self.run_from(std::env::args_os())
    }
}

/// A named sub-command of a [`CommandSet`].
pub trait SubCommand {
    /// Name used on the command line.
    fn name(&self) -> &str;

    /// One-line help text.
    fn about(&self) -> &str;

    /// Add arguments to the sub-command parser.
    fn configure(&self, parser: ClapCommand) -> ClapCommand {
        parser
    }

    /// Handle the sub-command's parsed arguments.
    fn handle(&self, args: &ArgMatches) -> Result<Option<String>>;
}

/// A tool made of sub-commands, dispatched by name.
///
/// The tool version is only computed when `--version` is given.
pub struct CommandSet {
    name: String,
    version: Box<dyn Fn() -> String>,
    about: Option<String>,
    subcommands: Vec<Box<dyn SubCommand>>,
}

impl CommandSet {
    /// Create an empty set for the tool `name` at `version`.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            name: name.into(),
            version: Box::new(move || version.clone()),
            about: None,
            subcommands: Vec::new(),
        }
    }

    /// Compute the version with `version` each time `--version` is asked
    /// for, instead of using a fixed string.
    pub fn version_with(mut self, version: impl Fn() -> String + 'static) -> Self {
        self.version = Box::new(version);
        self
    }

    /// Set the tool's help text.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Register a sub-command.
    pub fn with(mut self, subcommand: impl SubCommand + 'static) -> Self {
        self.subcommands.push(Box::new(subcommand));
        self
    }

    /// Names of the registered sub-commands, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.subcommands.iter().map(|s| s.name())
    }
}

impl Command for CommandSet {
    fn parser(&self) -> ClapCommand {
        let mut parser = ClapCommand::new(self.name.clone())
            .disable_version_flag(true)
            .arg(
                Arg::new(VERSION_FLAG)
                    .short('V')
                    .long("version")
                    .action(ArgAction::SetTrue)
                    .help("Print version"),
            )
            .args_conflicts_with_subcommands(true)
            .arg_required_else_help(true);
        if let Some(about) = &self.about {
            parser = parser.about(about.clone());
        }
        for sub in &self.subcommands {
            let sub_parser =
                ClapCommand::new(sub.name().to_string()).about(sub.about().to_string());
            parser = parser.subcommand(sub.configure(sub_parser));
        }
        parser
    }

    fn handle(&self, args: &ArgMatches) -> Result<Option<String>> {
        if args.get_flag(VERSION_FLAG) {
            return Ok(Some(format!("{} {}", self.name, (self.version)())));
        }

        let (name, sub_args) = args
            .subcommand()
            .ok_or_else(|| CommandError::new("no command given"))?;
        let sub = self
            .subcommands
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| CommandError::new(format!("unknown command '{}'", name)))?;

        debug!(tool = %self.name, command = name, "dispatching");
        sub.handle(sub_args)
    }
}

/// Find a [`CommandError`] anywhere in an error's chain.
pub fn as_command_error(err: &anyhow::Error) -> Option<&CommandError> {
    err.chain().find_map(|e| e.downcast_ref::<CommandError>())
}

/// The line printed for a command error.
pub fn error_line(err: &CommandError) -> String {
    format!("Error: {}", err)
}
