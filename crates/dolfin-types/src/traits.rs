//! Core trait definitions for dolfin abstractions.

use std::path::Path;

/// Trait for source control revision lookups.
///
/// Implementers report the latest change identifier for the repository
/// rooted at a directory. Lookups never fail: anything that goes wrong is
/// reported as `None`, meaning "no revision".
pub trait RevisionLookup {
    /// Get the short revision identifier for `dir`, if one can be found.
    fn lookup_revision(&self, dir: &Path) -> Option<String>;
}

impl<F> RevisionLookup for F
where
    F: Fn(&Path) -> Option<String>,
{
    fn lookup_revision(&self, dir: &Path) -> Option<String> {
        self(dir)
    }
}
