//! Process execution utilities.

use dolfin_types::Result;
use std::path::Path;
use std::process::{Command, Stdio};

/// Execute a command synchronously with `dir` as the child's working
/// directory. The current process directory is left untouched.
pub fn run_in(dir: &Path, command: &str, args: &[&str]) -> Result<(String, i32, String)> {
    let output = Command::new(command)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()?;

    Ok((
        String::from_utf8_lossy(&output.stdout).to_string(),
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stderr).to_string(),
    ))
}
