pub mod apply;
pub mod diff;
pub mod status;
pub mod version;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::{Overrides, Settings};
use crate::lockfile::{self, Mode, builder, merge, persist};
use crate::logging::Log;
use crate::tasks::RunState;

/// Shared state produced by the common command setup sequence.
///
/// Resolves the settings, reads the previous snapshot and builds the fresh
/// one with the previous install state carried over, so that each command
/// does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Resolved settings.
    pub settings: Settings,
    /// Previous and fresh snapshots.
    pub state: RunState,
}

impl CommandSetup {
    /// Resolve settings and build the before/after snapshots.
    ///
    /// With `copy` unset, the mirroring mode stays whatever the persisted
    /// lockfile recorded unless `hm.toml` asks for copies.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be resolved, the persisted
    /// lockfile is unreadable, or the source tree cannot be scanned.
    pub fn init(global: &GlobalOpts, copy: Option<bool>, log: &dyn Log) -> Result<Self> {
        let mut settings = Settings::resolve(&Overrides {
            source_dir: global.source_dir.clone(),
            target_dir: global.target_dir.clone(),
            lockfile: global.lockfile.clone(),
            diff_file: global.diff_file.clone(),
            copy: copy.unwrap_or(false),
        })?;
        log.debug(&format!("source: {}", settings.source_dir.display()));
        log.debug(&format!("target: {}", settings.target_dir.display()));

        log.stage("Reading lockfile");
        let before = persist::read_or_default(&settings.lockfile)?;
        log.debug(&format!(
            "{}: {} configs, {} hidden",
            settings.lockfile.display(),
            before.configs.len(),
            before.hidden_configs.len()
        ));
        if copy.is_none() && settings.mode == Mode::Symlink {
            settings.mode = before.mode;
        }

        log.stage("Scanning configs");
        let mut after = builder::build(&settings.source_dir, &settings.target_dir, settings.mode)
            .with_context(|| format!("scanning {}", settings.source_dir.display()))?;
        after.global_dependencies = builder::global_dependencies(&settings.source_dir)?;
        merge::copy_install_info(&before, &mut after);
        log.info(&format!(
            "found {} configs, {} hidden, {} global dependencies",
            after.configs.len(),
            after.hidden_configs.len(),
            after.global_dependencies.len()
        ));

        let newly_hidden = lockfile::newly_hidden(&before, &after);
        Ok(Self {
            settings,
            state: RunState {
                before,
                after,
                newly_hidden,
            },
        })
    }

    /// Write the fresh lockfile, then the diff against the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be written. The diff is still
    /// attempted when the lockfile write fails.
    pub fn persist(&self, log: &dyn Log) -> Result<()> {
        let Self { settings, state } = self;
        log.stage("Saving lockfile");

        let saved = persist::save(&state.after, &settings.lockfile, &settings.indent);
        let changes = lockfile::diff(&state.before, &state.after);
        let diffed = persist::save(&changes, &settings.diff_file, &settings.indent);
        report_changes(&changes, log);

        saved?;
        diffed?;
        log.info(&format!("wrote {}", settings.lockfile.display()));
        Ok(())
    }
}

/// Log a one-line description of each change in `changes`.
fn report_changes(changes: &lockfile::LockfileDiff, log: &dyn Log) {
    if changes.is_empty() {
        log.debug("no changes since last run");
        return;
    }
    for cfg in &changes.added_configs {
        log.info(&format!("added: {}", cfg.name));
    }
    for cfg in &changes.removed_configs {
        log.info(&format!("removed: {}", cfg.name));
    }
    for cfg in &changes.previously_removed_configs {
        log.info(&format!("no longer hidden: {}", cfg.name));
    }
    for dep in &changes.added_global_deps {
        log.info(&format!("added dependency: {}", dep.pkg()));
    }
    for dep in &changes.removed_global_deps {
        log.info(&format!("removed dependency: {}", dep.pkg()));
    }
    if changes.mode_changed {
        log.info("mirroring mode changed");
    }
}
