//! Revision-decorated version strings.
//!
//! ```
//! use dolfin_core::version::include_revision;
//! use std::path::Path;
//!
//! let lookup = |_: &Path| Some("abcdef123456".to_string());
//! assert_eq!(include_revision([0, 1], Path::new("."), &lookup), "0.1.0+abcdef123456");
//!
//! let none = |_: &Path| -> Option<String> { None };
//! assert_eq!(include_revision([0, 1], Path::new("."), &none), "0.1.0");
//! ```

use crate::revision::ScmRevision;
use dolfin_types::{RevisionLookup, SemVer};
use std::path::Path;
use tracing::debug;

/// Render `base` as `MAJOR.MINOR.PATCH`, appending `+<revision>` when
/// `lookup` finds one for `dir`.
pub fn include_revision(
    base: impl Into<SemVer>,
    dir: &Path,
    lookup: &dyn RevisionLookup,
) -> String {
    let version = base.into();
    match lookup.lookup_revision(dir) {
        Some(revision) => {
            debug!(%version, %revision, dir = %dir.display(), "found revision");
            version.with_build(revision).to_string()
        }
        None => version.to_string(),
    }
}

/// [`include_revision`] using the source control tools on `PATH`.
pub fn current_version(base: impl Into<SemVer>, dir: &Path) -> String {
    include_revision(base, dir, &ScmRevision)
}
