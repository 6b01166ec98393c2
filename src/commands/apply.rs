use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::Result;

use super::CommandSetup;
use crate::cli::{ApplyOpts, GlobalOpts};
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::resources::mirror::{Mirror, SystemMirror};
use crate::resources::package::{Backends, Resolver};
use crate::tasks::{self, Context, Intent};

/// Run the apply command against the real system.
///
/// # Errors
///
/// Returns an error if setup or persistence fails, or if any unit failed.
pub fn run(
    global: &GlobalOpts,
    opts: &ApplyOpts,
    log: &Arc<Logger>,
    interrupted: Arc<AtomicBool>,
) -> Result<()> {
    run_with(
        global,
        opts,
        log,
        Arc::new(SystemExecutor),
        Arc::new(SystemMirror),
        interrupted,
    )
}

/// Run the apply command with the given process and filesystem backends.
///
/// The lockfile and diff are written after every task has run, even when
/// some units failed, unless this is a dry run.
///
/// # Errors
///
/// Returns an error if setup or persistence fails, or if any unit failed.
pub fn run_with(
    global: &GlobalOpts,
    opts: &ApplyOpts,
    log: &Arc<Logger>,
    executor: Arc<dyn Executor>,
    mirror: Arc<dyn Mirror>,
    interrupted: Arc<AtomicBool>,
) -> Result<()> {
    let version = option_env!("HM_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.info(&format!("hm {version}"));

    let mut setup = CommandSetup::init(global, Some(opts.copy), log.as_ref())?;

    let intent = Intent {
        install: opts.install,
        only_install: opts.only_install,
        uninstall: opts.uninstall,
        only_uninstall: opts.only_uninstall,
        upgrade: opts.upgrade,
        pkgs: opts.pkgs.clone(),
    };
    let backends = if intent.wants_install() || intent.wants_uninstall() {
        log.stage("Detecting package managers");
        Backends::detect(executor.as_ref())
    } else {
        Backends::default()
    };

    let ctx = Context {
        settings: setup.settings.clone(),
        intent,
        resolver: Resolver::new(backends),
        executor,
        mirror,
        log: Arc::clone(log) as Arc<dyn Log>,
        dry_run: global.dry_run,
        interrupted,
    };

    for task in tasks::all_apply_tasks() {
        tasks::execute(task.as_ref(), &ctx, &mut setup.state);
    }

    let persisted = if ctx.dry_run {
        log.debug("dry run, lockfile left untouched");
        Ok(())
    } else {
        setup.persist(log.as_ref())
    };

    log.print_summary();
    persisted?;

    if ctx.is_interrupted() {
        anyhow::bail!("interrupted");
    }
    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} action(s) failed");
    }
    Ok(())
}
