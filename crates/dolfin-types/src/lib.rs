//! # Dolfin Types
//!
//! Core types, traits, and errors shared across all dolfin crates.
//!
//! This crate provides:
//!
//! - The library error type and result alias
//! - The user-facing `CommandError` raised by command handlers
//! - A semantic version type able to carry a source control revision
//! - The `RevisionLookup` collaborator trait
//!
//! ## Example
//!
//! ```
//! use dolfin_types::SemVer;
//!
//! // Versions are normalized to exactly three components
//! let v = SemVer::from_parts(&[0, 1]);
//! assert_eq!(v.to_string(), "0.1.0");
//!
//! let v = v.with_build("abcdef123456");
//! assert_eq!(v.to_string(), "0.1.0+abcdef123456");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod identifiers;
pub mod traits;

// Re-export common types for convenience
pub use errors::{CommandError, DolfinError, Result};
pub use identifiers::SemVer;
pub use traits::RevisionLookup;
