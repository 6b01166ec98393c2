//! Command: print the pending diff without applying it.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::lockfile::{self, persist};
use crate::logging::Log;

/// Print what `apply` would record as the diff, as JSON on stdout.
///
/// # Errors
///
/// Returns an error if setup fails or the diff cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn run(global: &GlobalOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, None, log)?;
    let changes = lockfile::diff(&setup.state.before, &setup.state.after);
    println!("{}", persist::to_json(&changes, &setup.settings.indent)?);
    Ok(())
}
