use anyhow::Result;

use super::{Context, RunState, Task, TaskResult, TaskStats, run_install_chain, timestamp};
use crate::lockfile::Config;
use crate::logging::ActionStatus;

/// Install every visible unit that has an `INSTALL` instruction.
///
/// Dependencies run first, in file order, and the first failing one aborts
/// that unit. Units that are already installed are left alone unless
/// `--upgrade` was given.
#[derive(Debug)]
pub struct InstallConfigs;

/// What to do with one unit.
#[derive(Debug, PartialEq, Eq)]
enum Plan {
    Skip(&'static str),
    Install,
    Upgrade,
}

fn plan(ctx: &Context, cfg: &Config) -> Plan {
    if !ctx.intent.selects(&cfg.name) {
        return Plan::Skip("not selected");
    }
    if cfg.requirements.install.is_none() {
        return Plan::Skip("no install instruction");
    }
    match (cfg.install_info.is_installed, ctx.intent.upgrade) {
        (true, false) => Plan::Skip("already installed"),
        (true, true) => Plan::Upgrade,
        (false, _) => Plan::Install,
    }
}

impl Task for InstallConfigs {
    fn name(&self) -> &str {
        "Installing configs"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.intent.wants_install()
    }

    fn run(&self, ctx: &Context, state: &mut RunState) -> Result<TaskResult> {
        let mut stats = TaskStats::default();
        for cfg in &mut state.after.configs {
            let action = format!("install {}", cfg.name);
            if ctx.is_interrupted() {
                ctx.log
                    .record(&action, ActionStatus::Skipped, Some("interrupted"));
                continue;
            }

            let verb = match plan(ctx, cfg) {
                Plan::Skip(reason) => {
                    ctx.log.debug(&format!("{}: {reason}", cfg.name));
                    stats.already_ok += 1;
                    continue;
                }
                Plan::Install => "installing",
                Plan::Upgrade => "upgrading",
            };
            let Some(own) = cfg.requirements.install.as_ref() else {
                continue;
            };
            ctx.log.debug(&format!("{verb} {}", cfg.name));

            let chain: Vec<_> = cfg
                .requirements
                .dependencies
                .iter()
                .chain(std::iter::once(own))
                .collect();
            match run_install_chain(ctx, &chain) {
                Ok(_) if ctx.dry_run => {
                    ctx.log.record(&action, ActionStatus::DryRun, None);
                    stats.changed += 1;
                }
                Ok(command) => {
                    cfg.install_info.mark_installed(command, timestamp());
                    ctx.log.record(&action, ActionStatus::Ok, None);
                    stats.changed += 1;
                }
                Err(e) => {
                    ctx.log.error(&format!("{action}: {e:#}"));
                    ctx.log
                        .record(&action, ActionStatus::Failed, Some(&format!("{e:#}")));
                    stats.failed += 1;
                }
            }
        }

        ctx.log.info(&stats.summary(ctx.dry_run));
        Ok(if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        })
    }
}
