//! dolfin CLI entry point.

use anyhow::Result;
use dolfin_core::Command;

mod cli;
mod commands;

fn main() -> Result<()> {
    if let Err(e) = dolfin_core::log::init_default() {
        eprintln!("warning: {}", e);
    }

    cli::app().run()
}
