//! Core logging types: action entries, status, and the [`Log`] trait.

/// Result of one orchestration step, kept for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    /// What was acted on, e.g. `install fish`.
    pub name: String,
    /// Final status.
    pub status: ActionStatus,
    /// Skip reason or error description.
    pub message: Option<String>,
}

/// Status of a completed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// Completed successfully.
    Ok,
    /// Nothing to do (already installed, no instruction, filtered out).
    Skipped,
    /// Resolved and logged but not executed.
    DryRun,
    /// Could not complete; the lockfile entry was left unchanged.
    Failed,
}

/// Abstraction over logging backends so orchestration code can be tested
/// with a recording implementation.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log an action that would have been taken.
    fn dry_run(&self, msg: &str);
    /// Record an action result for the summary.
    fn record(&self, name: &str, status: ActionStatus, message: Option<&str>);
}
