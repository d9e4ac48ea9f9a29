//! # Dolfin Core
//!
//! General-purpose building blocks for scripts and command-line tools.
//!
//! This crate provides:
//!
//! - **Storage**: ordered mappings with no-fail reads and nested wrapping
//! - **Configuration**: file-backed configs with overrides and lazy defaults
//! - **Commands**: parser/handler traits and a sub-command dispatcher
//! - **Versions**: version strings decorated with the source control revision
//! - **Logging**: `tracing` subscriber setup
//! - **Utilities**: JSON/YAML document loading, process execution
//!
//! ## Example
//!
//! ```no_run
//! use dolfin_core::{Config, ConfigSchema};
//!
//! // Initialize logging
//! dolfin_core::log::init_default()?;
//!
//! // Register defaults once, then load configuration
//! let schema = ConfigSchema::new("app");
//! schema.register_defaults([("color", "red")]);
//! let mut config = Config::open(&schema, "app.json")?;
//!
//! let color = config.get("color").and_then(|v| v.as_str());
//! # Ok::<(), dolfin_core::DolfinError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod command;
pub mod config;
pub mod log;
pub mod revision;
pub mod storage;
pub mod util;
pub mod version;

// Re-export commonly used items
pub use command::{Command, CommandSet, SubCommand};
pub use config::{Config, ConfigSchema};
pub use dolfin_types::{CommandError, DolfinError, Result, RevisionLookup, SemVer};
pub use revision::ScmRevision;
pub use storage::{Storage, Value};
pub use version::{current_version, include_revision};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const APP_NAME: &str = "dolfin";
