use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the home configuration manager.
#[derive(Parser, Debug)]
#[command(
    name = "hm",
    about = "Mirror a directory of per-program configs into place and keep their packages installed",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Directory holding one subdirectory per config [env: HM_SOURCE_DIR]
    #[arg(short, long, global = true)]
    pub source_dir: Option<PathBuf>,

    /// Directory configs are mirrored into [env: HM_TARGET_DIR]
    #[arg(short, long, global = true)]
    pub target_dir: Option<PathBuf>,

    /// Lockfile path (default: <source-dir>/hm-lock.json)
    #[arg(long, global = true)]
    pub lockfile: Option<PathBuf>,

    /// Diff output path (default: <source-dir>/hm-lock.diff.json)
    #[arg(long, global = true)]
    pub diff_file: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Mirror configs and optionally install or uninstall their packages
    Apply(ApplyOpts),
    /// Print what changed since the last apply, without touching anything
    Diff,
    /// List every config with its install state
    Status,
    /// Print version information
    Version,
}

/// Options for the `apply` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct ApplyOpts {
    /// Copy configs instead of symlinking them
    #[arg(long)]
    pub copy: bool,

    /// Install configs that are not installed yet
    #[arg(long, conflicts_with_all = ["only_uninstall", "upgrade"])]
    pub install: bool,

    /// Install without mirroring
    #[arg(long, conflicts_with_all = ["only_uninstall", "uninstall", "upgrade"])]
    pub only_install: bool,

    /// Uninstall configs that were hidden since the last run
    #[arg(long, conflicts_with = "upgrade")]
    pub uninstall: bool,

    /// Uninstall without mirroring
    #[arg(long, conflicts_with = "upgrade")]
    pub only_uninstall: bool,

    /// Re-run install instructions of installed configs
    #[arg(long)]
    pub upgrade: bool,

    /// Limit install and uninstall to these configs
    #[arg(long, value_delimiter = ',')]
    pub pkgs: Vec<String>,
}
