//! Source control revision lookup.
//!
//! [`ScmRevision`] is the default [`RevisionLookup`]: it detects a Mercurial
//! or Git checkout by its marker directory, asks the matching tool for the
//! short revision id, and falls back to a `REVISION` or `.REVISION` file.
//! Lookups never fail; every problem is reported as "no revision".

use crate::util::process::run_in;
use dolfin_types::RevisionLookup;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Revision reported by `hg identify` for a repository with no commits.
pub const EMPTY_REVISION: &str = "000000000000";

/// Fallback files read when no tool reports a revision. A later file takes
/// precedence over an earlier one.
pub const REVISION_FILES: [&str; 2] = ["REVISION", ".REVISION"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scm {
    Mercurial,
    Git,
}

impl Scm {
    const ALL: [Scm; 2] = [Scm::Mercurial, Scm::Git];

    fn marker(self) -> &'static str {
        match self {
            Scm::Mercurial => ".hg",
            Scm::Git => ".git",
        }
    }

    fn program(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Scm::Mercurial => ("hg", &["identify", "-i"]),
            Scm::Git => ("git", &["rev-parse", "--short=12", "HEAD"]),
        }
    }

    fn detect(dir: &Path) -> Option<Scm> {
        Self::ALL.into_iter().find(|scm| dir.join(scm.marker()).exists())
    }

    /// Ask the tool for the revision.
    fn identify(self, dir: &Path) -> Option<Identified> {
        let (program, args) = self.program();
        match run_in(dir, program, args) {
            Ok((stdout, 0, _)) => parse_tool_output(&stdout),
            Ok((_, code, stderr)) => {
                debug!(program, code, stderr = stderr.trim(), "revision lookup failed");
                None
            }
            Err(e) => {
                warn!(program, error = %e, "unable to run revision lookup");
                None
            }
        }
    }
}

/// Default revision lookup backed by the `hg` and `git` executables.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScmRevision;

impl ScmRevision {
    /// Create a new lookup.
    pub fn new() -> Self {
        Self
    }
}

impl RevisionLookup for ScmRevision {
    fn lookup_revision(&self, dir: &Path) -> Option<String> {
        if !dir.is_dir() && !is_package_archive(dir) {
            warn!(
                dir = %dir.display(),
                "not a repository directory or package archive; skipping revision lookup"
            );
            return None;
        }

        match Scm::detect(dir).and_then(|scm| scm.identify(dir)) {
            Some(Identified::Revision(revision)) => Some(revision),
            Some(Identified::Empty) => None,
            None => read_revision_file(dir),
        }
    }
}

/// What a tool reported for a checkout.
#[derive(Debug, PartialEq, Eq)]
enum Identified {
    Revision(String),
    /// A repository without commits.
    Empty,
}

/// Interpret a tool's stdout. Blank output means the tool had nothing to
/// say, so the caller falls back to the revision files.
fn parse_tool_output(stdout: &str) -> Option<Identified> {
    match stdout.trim() {
        "" => None,
        EMPTY_REVISION => Some(Identified::Empty),
        revision => Some(Identified::Revision(revision.to_string())),
    }
}

fn is_package_archive(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("egg") | Some("whl")
    )
}

/// First line of the last readable revision file in `dir`.
fn read_revision_file(dir: &Path) -> Option<String> {
    let content = REVISION_FILES
        .iter()
        .map(|name| dir.join(name))
        .filter(|path| path.is_file())
        .filter_map(|path| fs::read_to_string(&path).ok())
        .last()?;
    let revision = content.lines().next()?.trim();
    (!revision.is_empty()).then(|| revision.to_string())
}
