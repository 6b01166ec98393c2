//! Orchestration steps of `hm apply`, run in a fixed order.
mod context;
pub mod global_deps;
pub mod install;
pub mod mirror;
pub mod uninstall;

pub use context::{Context, Intent, RunState};

use anyhow::Result;

use crate::config::instruction::InstallInstruction;
use crate::logging::ActionStatus;

/// Result of a single task execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed; per-unit failures are recorded separately.
    Ok,
    /// Task had nothing to do.
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// Counters for tasks that walk many units.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Units acted on.
    pub changed: u32,
    /// Units that needed nothing.
    pub already_ok: u32,
    /// Units that failed.
    pub failed: u32,
}

impl TaskStats {
    /// One-line summary, e.g. `2 changed, 5 already ok, 1 failed`.
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut out = format!("{} {verb}, {} already ok", self.changed, self.already_ok);
        if self.failed > 0 {
            out.push_str(&format!(", {} failed", self.failed));
        }
        out
    }
}

/// A named orchestration step.
pub trait Task {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether the run's intent calls for this task.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task, updating `state.after` in place.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures that prevent the task as a whole
    /// from running; individual unit failures are logged and recorded.
    fn run(&self, ctx: &Context, state: &mut RunState) -> Result<TaskResult>;
}

/// The tasks of `hm apply`, in execution order.
#[must_use]
pub fn all_apply_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(global_deps::InstallGlobalDependencies),
        Box::new(mirror::MirrorConfigs),
        Box::new(mirror::RemoveHiddenConfigs),
        Box::new(install::InstallConfigs),
        Box::new(uninstall::UninstallConfigs),
    ]
}

/// Execute a task, recording the result in the logger.
pub fn execute(task: &dyn Task, ctx: &Context, state: &mut RunState) {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not requested)", task.name()));
        return;
    }

    ctx.log.stage(task.name());

    match task.run(ctx, state) {
        Ok(TaskResult::Ok) => {
            ctx.log.record(task.name(), ActionStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record(task.name(), ActionStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record(task.name(), ActionStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record(task.name(), ActionStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}

/// Current UTC time as stored in the lockfile.
#[must_use]
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Resolve and run the install command of every instruction in order,
/// stopping at the first failure.
///
/// Returns the literal command of the last instruction. In dry-run mode the
/// commands are only logged.
///
/// # Errors
///
/// Returns an error if `instructions` is empty, or if an instruction cannot
/// be resolved or its command fails.
pub(crate) fn run_install_chain(
    ctx: &Context,
    instructions: &[&InstallInstruction],
) -> Result<String> {
    let mut last = None;
    for inst in instructions {
        let cmd = ctx
            .resolver
            .install_command(inst)
            .map_err(|e| anyhow::anyhow!("{inst}: {e}"))?;
        if ctx.dry_run {
            ctx.log.dry_run(&format!("would run: {cmd}"));
        } else {
            ctx.log.info(&format!("running: {cmd}"));
            ctx.executor.run_interactive(&cmd)?;
        }
        last = Some(cmd.to_string());
    }
    last.ok_or_else(|| anyhow::anyhow!("nothing to install"))
}


#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use super::test_helpers::{RecordingExecutor, RecordingLog, RecordingMirror, make_context};
    use super::*;
    use crate::config::instruction::InstallMethod;
    use crate::resources::package::Backends;

    struct MockTask {
        should_run: bool,
        result: Result<TaskResult, String>,
    }

    impl Task for MockTask {
        fn name(&self) -> &str {
            "mock"
        }
        fn should_run(&self, _: &Context) -> bool {
            self.should_run
        }
        fn run(&self, _: &Context, _: &mut RunState) -> Result<TaskResult> {
            self.result.clone().map_err(|s| anyhow::anyhow!("{s}"))
        }
    }

    fn run_mock(task: &MockTask) -> Arc<RecordingLog> {
        let log = Arc::new(RecordingLog::default());
        let ctx = make_context(
            Intent::default(),
            Backends::default(),
            Arc::new(RecordingExecutor::default()),
            Arc::new(RecordingMirror::default()),
            log.clone(),
        );
        execute(task, &ctx, &mut RunState::default());
        log
    }

    #[test]
    fn execute_ignores_unrequested_task() {
        let log = run_mock(&MockTask {
            should_run: false,
            result: Ok(TaskResult::Ok),
        });
        assert!(log.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn execute_records_each_outcome() {
        let ok = run_mock(&MockTask {
            should_run: true,
            result: Ok(TaskResult::Ok),
        });
        assert_eq!(ok.with_status(ActionStatus::Ok).len(), 1);

        let skipped = run_mock(&MockTask {
            should_run: true,
            result: Ok(TaskResult::Skipped("nothing hidden".into())),
        });
        let entry = &skipped.with_status(ActionStatus::Skipped)[0];
        assert_eq!(entry.message.as_deref(), Some("nothing hidden"));

        let failed = run_mock(&MockTask {
            should_run: true,
            result: Err("kaboom".into()),
        });
        assert_eq!(failed.with_status(ActionStatus::Failed)[0].name, "mock");
    }

    #[test]
    fn apply_tasks_run_in_order() {
        let names: Vec<_> = all_apply_tasks().iter().map(|t| t.name().to_string()).collect();
        assert_eq!(
            names,
            [
                "Installing global dependencies",
                "Mirroring configs",
                "Removing hidden configs",
                "Installing configs",
                "Uninstalling configs",
            ]
        );
    }

    #[test]
    fn stats_summary() {
        let stats = TaskStats {
            changed: 2,
            already_ok: 5,
            failed: 1,
        };
        assert_eq!(stats.summary(false), "2 changed, 5 already ok, 1 failed");
        assert_eq!(
            TaskStats::default().summary(true),
            "0 would change, 0 already ok"
        );
    }

    #[test]
    fn install_chain_stops_at_first_failure() {
        let executor = Arc::new(RecordingExecutor::failing(&["cargo install bad"]));
        let ctx = make_context(
            Intent::default(),
            Backends::default(),
            executor.clone(),
            Arc::new(RecordingMirror::default()),
            Arc::new(RecordingLog::default()),
        );
        let a = InstallInstruction::new(InstallMethod::Cargo, "bad");
        let b = InstallInstruction::new(InstallMethod::Cargo, "good");

        assert!(run_install_chain(&ctx, &[&a, &b]).is_err());
        assert_eq!(executor.calls(), ["cargo install bad"]);
    }

    #[test]
    fn install_chain_returns_last_command() {
        let ctx = make_context(
            Intent::default(),
            Backends::default(),
            Arc::new(RecordingExecutor::default()),
            Arc::new(RecordingMirror::default()),
            Arc::new(RecordingLog::default()),
        );
        let dep = InstallInstruction::new(InstallMethod::Cargo, "starship");
        let own = InstallInstruction::new(InstallMethod::Pacman, "fish");
        assert_eq!(
            run_install_chain(&ctx, &[&dep, &own]).unwrap(),
            "sudo pacman -S --noconfirm fish"
        );
    }

    #[test]
    fn timestamp_is_rfc3339_utc() {
        let t = timestamp();
        assert!(t.ends_with('Z'), "got {t}");
        assert!(chrono::DateTime::parse_from_rfc3339(&t).is_ok());
    }
}
