use anyhow::Result;

use super::{Context, RunState, Task, TaskResult, TaskStats, run_install_chain, timestamp};
use crate::lockfile::merge::{global_dependencies_changed, global_dependencies_installed};
use crate::logging::ActionStatus;

/// Install the packages listed in the source root's `DEPENDENCIES` file.
///
/// The list is treated as one batch: it only runs when it changed since
/// the last run, when none of it was installed before, or on `--upgrade`.
#[derive(Debug)]
pub struct InstallGlobalDependencies;

impl Task for InstallGlobalDependencies {
    fn name(&self) -> &str {
        "Installing global dependencies"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.intent.wants_global_dependencies()
    }

    fn run(&self, ctx: &Context, state: &mut RunState) -> Result<TaskResult> {
        if state.after.global_dependencies.is_empty() {
            return Ok(TaskResult::Skipped("no global dependencies".to_string()));
        }

        let changed = global_dependencies_changed(
            &state.before.global_dependencies,
            &state.after.global_dependencies,
        );
        let installed = global_dependencies_installed(&state.before.global_dependencies);
        if !changed && installed && !ctx.intent.upgrade {
            return Ok(TaskResult::Skipped("already up to date".to_string()));
        }

        let mut stats = TaskStats::default();
        for dep in &mut state.after.global_dependencies {
            let action = format!("dependency {}", dep.pkg());
            if ctx.is_interrupted() {
                ctx.log
                    .record(&action, ActionStatus::Skipped, Some("interrupted"));
                continue;
            }

            match run_install_chain(ctx, &[&dep.instruction]) {
                Ok(_) if ctx.dry_run => {
                    ctx.log.record(&action, ActionStatus::DryRun, None);
                    stats.changed += 1;
                }
                Ok(command) => {
                    dep.install_info.mark_installed(command, timestamp());
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
