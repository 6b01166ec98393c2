use anyhow::Result;

use super::{Context, RunState, Task, TaskResult, TaskStats, timestamp};
use crate::logging::ActionStatus;

/// Uninstall units that were visible in the previous run and are hidden now.
///
/// Only the unit's own instruction is reversed; its dependencies stay.
#[derive(Debug)]
pub struct UninstallConfigs;

impl Task for UninstallConfigs {
    fn name(&self) -> &str {
        "Uninstalling configs"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.intent.wants_uninstall()
    }

    fn run(&self, ctx: &Context, state: &mut RunState) -> Result<TaskResult> {
        if state.newly_hidden.is_empty() {
            return Ok(TaskResult::Skipped("no newly hidden configs".to_string()));
        }

        let mut stats = TaskStats::default();
        for name in &state.newly_hidden {
            let action = format!("uninstall {name}");
            if ctx.is_interrupted() {
                ctx.log
                    .record(&action, ActionStatus::Skipped, Some("interrupted"));
                continue;
            }
            if !ctx.intent.selects(name) {
                continue;
            }
            let Some(cfg) = state.after.find_mut(name) else {
                continue;
            };
            let Some(inst) = cfg.requirements.install.as_ref() else {
                ctx.log.debug(&format!("{name}: no install instruction"));
                stats.already_ok += 1;
                continue;
            };
            if !cfg.install_info.is_installed {
                ctx.log.debug(&format!("{name}: not installed"));
                stats.already_ok += 1;
                continue;
            }

            let cmd = match ctx.resolver.uninstall_command(inst) {
                Ok(cmd) => cmd,
                Err(e) => {
                    ctx.log.error(&format!("{action}: {e}"));
                    ctx.log
                        .record(&action, ActionStatus::Failed, Some(&e.to_string()));
                    stats.failed += 1;
                    continue;
                }
            };

            if ctx.dry_run {
                ctx.log.dry_run(&format!("would run: {cmd}"));
                ctx.log.record(&action, ActionStatus::DryRun, None);
                stats.changed += 1;
                continue;
            }

            ctx.log.info(&format!("running: {cmd}"));
            match ctx.executor.run_interactive(&cmd) {
                Ok(()) => {
                    cfg.install_info
                        .mark_uninstalled(vec![cmd.to_string()], timestamp());
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
