//! Common utility functions.

pub mod data;
pub mod process;

// Re-export commonly used items
pub use data::{load_document_file, parse_document, DocumentFormat};
pub use process::run_in;
