//! CLI structure and command registration.

use crate::commands::{get::Get, show::Show, version::Version};
use dolfin_core::{current_version, CommandSet, SemVer};
use std::path::Path;
use tracing::debug;

/// Directory the binary was built from, probed for its revision.
pub const SOURCE_DIR: &str = env!("CARGO_MANIFEST_DIR");

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// This build's version, with the source revision when one is available.
///
/// Installed binaries usually outlive their source tree; the plain package
/// version is reported then.
pub fn tool_version() -> String {
    let source = Path::new(SOURCE_DIR);
    if !source.is_dir() {
        debug!(dir = SOURCE_DIR, "source directory is gone, skipping revision lookup");
        return PKG_VERSION.to_string();
    }
    match SemVer::parse(PKG_VERSION) {
        Ok(base) => current_version(base, source),
        Err(_) => PKG_VERSION.to_string(),
    }
}

/// Build the `dolfin` command set.
pub fn app() -> CommandSet {
    CommandSet::new("dolfin", PKG_VERSION)
        .version_with(tool_version)
        .about("Inspect layered JSON/YAML configuration files")
        .with(Version)
        .with(Show)
        .with(Get)
}
