// Shared helpers for integration tests.
//
// Provides a temporary source and target directory pair with a fluent
// builder for config units, plus an executor that records commands instead
// of running them.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use hm_cli::cli::{ApplyOpts, GlobalOpts};
use hm_cli::commands::apply;
use hm_cli::exec::{CommandLine, Executor};
use hm_cli::lockfile::{Lockfile, LockfileDiff};
use hm_cli::logging::Logger;
use hm_cli::resources::mirror::SystemMirror;

/// Executor that records every command line and fails those in `failing`.
/// No package manager is ever detected.
#[derive(Debug, Default)]
pub struct FakeExecutor {
    calls: Mutex<Vec<String>>,
    failing: HashSet<String>,
}

impl FakeExecutor {
    /// An executor whose listed commands exit non-zero.
    pub fn failing(commands: &[&str]) -> Self {
        Self {
            failing: commands.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    /// Commands run so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Executor for FakeExecutor {
    fn run_interactive(&self, cmd: &CommandLine) -> anyhow::Result<()> {
        let line = cmd.to_string();
        self.calls.lock().expect("calls lock").push(line.clone());
        if self.failing.contains(&line) {
            anyhow::bail!("{line} failed (exit 1)");
        }
        Ok(())
    }

    fn probe(&self, _: &str, _: &str) -> bool {
        false
    }

    fn which(&self, _: &str) -> bool {
        false
    }
}

/// An isolated configuration repository and mirror target.
pub struct TestRepo {
    /// Directory holding the config units.
    pub source: tempfile::TempDir,
    /// Directory units are mirrored into.
    pub target: tempfile::TempDir,
}

impl TestRepo {
    /// Empty source and target directories.
    pub fn new() -> Self {
        Self {
            source: tempfile::tempdir().expect("create source dir"),
            target: tempfile::tempdir().expect("create target dir"),
        }
    }

    /// Add a unit directory with a single config file.
    pub fn unit(self, dir: &str) -> Self {
        let path = self.source.path().join(dir);
        std::fs::create_dir_all(&path).expect("create unit dir");
        std::fs::write(path.join("config"), dir).expect("write unit config");
        self
    }

    /// Add a unit with an `INSTALL` file.
    pub fn unit_with_install(self, dir: &str, instruction: &str) -> Self {
        let repo = self.unit(dir);
        repo.write(&format!("{dir}/INSTALL"), instruction);
        repo
    }

    /// Write `content` to `rel` under the source directory.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.source.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(path, content).expect("write file");
    }

    /// Rename a unit directory, e.g. to hide it with a leading dot.
    pub fn rename(&self, from: &str, to: &str) {
        std::fs::rename(self.source.path().join(from), self.source.path().join(to))
            .expect("rename unit");
    }

    /// Global options pointing every path into this repo.
    pub fn global(&self, dry_run: bool) -> GlobalOpts {
        GlobalOpts {
            dry_run,
            source_dir: Some(self.source.path().to_path_buf()),
            target_dir: Some(self.target.path().to_path_buf()),
            lockfile: Some(self.lockfile_path()),
            diff_file: Some(self.diff_path()),
        }
    }

    /// Default lockfile location.
    pub fn lockfile_path(&self) -> PathBuf {
        self.source.path().join("hm-lock.json")
    }

    /// Default diff location.
    pub fn diff_path(&self) -> PathBuf {
        self.source.path().join("hm-lock.diff.json")
    }

    /// Parse the persisted lockfile.
    pub fn lockfile(&self) -> Lockfile {
        read_json(&self.lockfile_path())
    }

    /// Parse the persisted diff.
    pub fn diff(&self) -> LockfileDiff {
        read_json(&self.diff_path())
    }

    /// Run `hm apply` against this repo with `executor` and the real
    /// filesystem mirror.
    pub fn apply(&self, opts: &ApplyOpts, executor: &Arc<FakeExecutor>) -> anyhow::Result<()> {
        self.apply_with(opts, executor, false)
    }

    /// [`apply`](Self::apply) with an explicit dry-run flag.
    pub fn apply_with(
        &self,
        opts: &ApplyOpts,
        executor: &Arc<FakeExecutor>,
        dry_run: bool,
    ) -> anyhow::Result<()> {
        let log = Arc::new(Logger::with_log_file(None));
        apply::run_with(
            &self.global(dry_run),
            opts,
            &log,
            Arc::clone(executor) as Arc<dyn Executor>,
            Arc::new(SystemMirror),
            Arc::new(AtomicBool::new(false)),
        )
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    let content = std::fs::read_to_string(path).expect("read json file");
    serde_json::from_str(&content).expect("parse json file")
}

/// `apply --install`.
pub fn install() -> ApplyOpts {
    ApplyOpts {
        install: true,
        ..ApplyOpts::default()
    }
}
