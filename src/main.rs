use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use clap::Parser;

use hm_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    let command = match &args.command {
        cli::Command::Apply(_) => "apply",
        cli::Command::Diff => "diff",
        cli::Command::Status => "status",
        cli::Command::Version => {
            commands::version::run();
            return Ok(());
        }
    };
    logging::init_subscriber(args.verbose, command);
    let log = Arc::new(logging::Logger::new(command));

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupted);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            log.warn(&format!("could not install Ctrl-C handler: {e}"));
        }
    }

    match args.command {
        cli::Command::Apply(opts) => commands::apply::run(&args.global, &opts, &log, interrupted),
        cli::Command::Diff => commands::diff::run(&args.global, log.as_ref()),
        cli::Command::Status => commands::status::run(&args.global, log.as_ref()),
        cli::Command::Version => Ok(()),
    }
}
