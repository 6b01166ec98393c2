//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{ActionEntry, ActionStatus, Log};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Logger facade over [`tracing`] that also collects action results for the
/// end-of-run summary.
///
/// Every message also lands in `$XDG_CACHE_HOME/hm/<command>.log` through
/// the file layer installed by [`init_subscriber`](super::init_subscriber).
#[derive(Debug)]
pub struct Logger {
    actions: Mutex<Vec<ActionEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// owned by the subscriber.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` in its summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            actions: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log an action that would have been taken.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record an action result for the summary.
    pub fn record(&self, name: &str, status: ActionStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.actions.lock() {
            guard.push(ActionEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// All recorded actions, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<ActionEntry> {
        self.actions.lock().map_or_else(|_| Vec::new(), |g| g.clone())
    }

    /// Number of failed actions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.actions.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|a| a.status == ActionStatus::Failed)
                .count()
        })
    }

    /// Log every recorded action followed by a one-line tally.
    ///
    /// Skipped actions are only listed in the log file unless verbose.
    pub fn print_summary(&self) {
        let actions = self.entries();
        if actions.is_empty() {
            return;
        }

        self.stage("Summary");

        let (mut ok, mut skipped, mut dry_run, mut failed) = (0u32, 0u32, 0u32, 0u32);
        for action in &actions {
            let suffix = action
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));
            match action.status {
                ActionStatus::Ok => {
                    ok += 1;
                    self.info(&format!("\x1b[32m✓ {}{suffix}\x1b[0m", action.name));
                }
                ActionStatus::Skipped => {
                    skipped += 1;
                    self.debug(&format!("○ {}{suffix}", action.name));
                }
                ActionStatus::DryRun => {
                    dry_run += 1;
                    self.info(&format!("\x1b[37m~ {}{suffix}\x1b[0m", action.name));
                }
                ActionStatus::Failed => {
                    failed += 1;
                    self.info(&format!("\x1b[31m✗ {}{suffix}\x1b[0m", action.name));
                }
            }
        }

        let total = ok + skipped + dry_run + failed;
        self.info(&format!(
            "{total} actions: \x1b[32m{ok} ok\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record(&self, name: &str, status: ActionStatus, message: Option<&str>) {
        self.record(name, status, message);
    }
}
