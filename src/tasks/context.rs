use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::Settings;
use crate::exec::Executor;
use crate::lockfile::Lockfile;
use crate::logging::Log;
use crate::resources::mirror::Mirror;
use crate::resources::package::Resolver;

/// What the user asked `apply` to do besides mirroring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intent {
    /// Install units that are not installed yet.
    pub install: bool,
    /// Install without mirroring.
    pub only_install: bool,
    /// Uninstall newly hidden units.
    pub uninstall: bool,
    /// Uninstall without mirroring.
    pub only_uninstall: bool,
    /// Re-run install instructions of units that are already installed.
    pub upgrade: bool,
    /// Restrict install/uninstall to these unit names; empty means all.
    pub pkgs: Vec<String>,
}

impl Intent {
    /// Whether units get installed this run.
    #[must_use]
    pub const fn wants_install(&self) -> bool {
        (self.install || self.only_install || self.upgrade) && !self.only_uninstall
    }

    /// Whether newly hidden units get uninstalled this run.
    #[must_use]
    pub const fn wants_uninstall(&self) -> bool {
        (self.uninstall || self.only_uninstall) && !self.only_install
    }

    /// Whether global dependencies are considered this run.
    #[must_use]
    pub const fn wants_global_dependencies(&self) -> bool {
        self.install || self.only_install || self.upgrade
    }

    /// Whether units get mirrored into the target directory.
    #[must_use]
    pub const fn wants_mirror(&self) -> bool {
        !self.only_install && !self.only_uninstall
    }

    /// Whether `name` passes the `--pkgs` filter.
    #[must_use]
    pub fn selects(&self, name: &str) -> bool {
        self.pkgs.is_empty() || self.pkgs.iter().any(|p| p == name)
    }
}

/// Shared, read-only context for one run.
pub struct Context {
    /// Resolved settings.
    pub settings: Settings,
    /// Requested install/uninstall behaviour.
    pub intent: Intent,
    /// Command construction over the backends probed at startup.
    pub resolver: Resolver,
    /// Process execution.
    pub executor: Arc<dyn Executor>,
    /// Filesystem mirroring.
    pub mirror: Arc<dyn Mirror>,
    /// Logger for output and action recording.
    pub log: Arc<dyn Log>,
    /// Log every action instead of performing it.
    pub dry_run: bool,
    /// Set by the Ctrl-C handler.
    pub interrupted: Arc<AtomicBool>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings)
            .field("intent", &self.intent)
            .field("resolver", &self.resolver)
            .field("executor", &self.executor)
            .field("mirror", &self.mirror)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("interrupted", &self.interrupted)
            .finish()
    }
}

impl Context {
    /// Whether the user pressed Ctrl-C.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }
}

/// Mutable state threaded through the tasks of one run.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    /// Snapshot persisted by the previous run.
    pub before: Lockfile,
    /// Fresh snapshot with carried-over install state; updated by the tasks
    /// and persisted at the end.
    pub after: Lockfile,
    /// Names of units that were visible before and are hidden now.
    pub newly_hidden: Vec<String>,
}
