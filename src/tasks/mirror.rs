use anyhow::Result;

use super::{Context, RunState, Task, TaskResult, TaskStats};
use crate::lockfile::Mode;
use crate::logging::ActionStatus;

/// Mirror every visible unit into the target directory.
#[derive(Debug)]
pub struct MirrorConfigs;

impl Task for MirrorConfigs {
    fn name(&self) -> &str {
        "Mirroring configs"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.intent.wants_mirror()
    }

    fn run(&self, ctx: &Context, state: &mut RunState) -> Result<TaskResult> {
        if state.after.configs.is_empty() {
            return Ok(TaskResult::Skipped("no visible configs".to_string()));
        }

        let verb = match state.after.mode {
            Mode::Symlink => "link",
            Mode::Copy => "copy",
        };
        let mut stats = TaskStats::default();
        for cfg in &state.after.configs {
            if ctx.dry_run {
                ctx.log.dry_run(&format!(
                    "would {verb} {} -> {}",
                    cfg.to.display(),
                    cfg.from.display()
                ));
                stats.changed += 1;
                continue;
            }

            let result = match state.after.mode {
                Mode::Symlink => ctx.mirror.symlink(&cfg.from, &cfg.to),
                Mode::Copy => ctx.mirror.copy(&cfg.from, &cfg.to),
            };
            match result {
                Ok(()) => {
                    ctx.log.debug(&format!(
                        "{verb} {} -> {}",
                        cfg.to.display(),
                        cfg.from.display()
                    ));
                    stats.changed += 1;
                }
                Err(e) => {
                    let action = format!("{verb} {}", cfg.name);
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

/// Remove the mirror target of every hidden unit.
#[derive(Debug)]
pub struct RemoveHiddenConfigs;

impl Task for RemoveHiddenConfigs {
    fn name(&self) -> &str {
        "Removing hidden configs"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.intent.wants_mirror()
    }

    fn run(&self, ctx: &Context, state: &mut RunState) -> Result<TaskResult> {
        if state.after.hidden_configs.is_empty() {
            return Ok(TaskResult::Skipped("no hidden configs".to_string()));
        }

        let mut stats = TaskStats::default();
        for cfg in &state.after.hidden_configs {
            if ctx.dry_run {
                ctx.log
                    .dry_run(&format!("would remove {}", cfg.to.display()));
                stats.changed += 1;
                continue;
            }

            if let Err(e) = ctx.mirror.remove(&cfg.to) {
                let action = format!("remove {}", cfg.name);
                ctx.log.error(&format!("{action}: {e:#}"));
                ctx.log
                    .record(&action, ActionStatus::Failed, Some(&format!("{e:#}")));
                stats.failed += 1;
            } else {
                ctx.log.debug(&format!("removed {}", cfg.to.display()));
                stats.changed += 1;
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
