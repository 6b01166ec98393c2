//! Child process execution.
use std::fmt;
use std::process::{Command, Stdio};

use anyhow::{Context as _, Result, bail};

/// A command ready to run.
///
/// Package-manager commands are built as a program plus argument vector so
/// package names never go through word splitting. Only the `bash` install
/// method produces a raw shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    /// A program and its arguments.
    Program {
        /// Executable name or path.
        program: String,
        /// Arguments passed verbatim.
        args: Vec<String>,
    },
    /// A line handed to `bash -c`.
    Shell(String),
}

impl CommandLine {
    /// Build a [`CommandLine::Program`].
    #[must_use]
    pub fn program<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Program {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a [`CommandLine::Shell`].
    #[must_use]
    pub fn shell(line: impl Into<String>) -> Self {
        Self::Shell(line.into())
    }

    fn to_command(&self) -> Command {
        match self {
            Self::Program { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
            Self::Shell(line) => {
                let mut cmd = Command::new("bash");
                cmd.arg("-c").arg(line);
                cmd
            }
        }
    }
}

/// The literal command as recorded in the lockfile.
impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Program { program, args } => {
                f.write_str(program)?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                Ok(())
            }
            Self::Shell(line) => f.write_str(line),
        }
    }
}

/// Abstraction over process execution so orchestration can be tested
/// without spawning package managers.
#[cfg_attr(test, mockall::automock)]
pub trait Executor: fmt::Debug {
    /// Run a command attached to the controlling terminal and wait for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or exits non-zero.
    fn run_interactive(&self, cmd: &CommandLine) -> Result<()>;

    /// Run `program arg` with all output discarded and report whether it
    /// exited successfully. Spawn failures count as `false`.
    fn probe(&self, program: &str, arg: &str) -> bool;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_interactive(&self, cmd: &CommandLine) -> Result<()> {
        let status = cmd
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("failed to execute: {cmd}"))?;
        if !status.success() {
            bail!(
                "{cmd} failed (exit {})",
                status
                    .code()
                    .map_or_else(|| "signal".to_string(), |c| c.to_string())
            );
        }
        Ok(())
    }

    fn probe(&self, program: &str, arg: &str) -> bool {
        Command::new(program)
            .arg(arg)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
