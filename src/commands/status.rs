//! Command: list configs and their install state.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::lockfile::Config;
use crate::logging::Log;

/// One status line for `cfg`.
fn describe(cfg: &Config, hidden: bool) -> String {
    let info = &cfg.install_info;
    let state = if cfg.requirements.install.is_none() {
        "no install".to_string()
    } else if info.is_installed {
        format!("installed {}", info.install_time)
    } else if info.was_uninstalled {
        format!("uninstalled {}", info.uninstall_time)
    } else {
        "not installed".to_string()
    };
    let marker = if hidden { " (hidden)" } else { "" };
    format!("{:<20} {state}{marker}", cfg.name)
}

/// Print every visible and hidden config with its install state.
///
/// # Errors
///
/// Returns an error if setup fails.
#[allow(clippy::print_stdout)]
pub fn run(global: &GlobalOpts, log: &dyn Log) -> Result<()> {
    let setup = CommandSetup::init(global, None, log)?;
    let after = &setup.state.after;
    for cfg in &after.configs {
        println!("{}", describe(cfg, false));
    }
    for cfg in &after.hidden_configs {
        println!("{}", describe(cfg, true));
    }
    for dep in &after.global_dependencies {
        let state = if dep.install_info.is_installed {
            "installed"
        } else {
            "not installed"
        };
        println!("{:<20} {state} (global {})", dep.pkg(), dep.instruction.method);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::instruction::{InstallInstruction, InstallMethod};
    use crate::config::requirements::Requirements;

    fn cfg(install: bool) -> Config {
        let requirements = Requirements {
            install: install.then(|| InstallInstruction::new(InstallMethod::Pacman, "fish")),
            dependencies: Vec::new(),
        };
        Config::new("fish", "/s/fish", "/t/fish", requirements)
    }

    #[test]
    fn describes_each_state() {
        assert!(describe(&cfg(false), false).ends_with("no install"));
        assert!(describe(&cfg(true), false).ends_with("not installed"));

        let mut installed = cfg(true);
        installed
            .install_info
            .mark_installed("sudo pacman -S --noconfirm fish".into(), "2024-05-01T10:00:00Z".into());
        assert!(describe(&installed, false).ends_with("installed 2024-05-01T10:00:00Z"));

        let mut removed = cfg(true);
        removed.install_info.mark_uninstalled(Vec::new(), "2024-05-02T10:00:00Z".into());
        assert!(describe(&removed, true).ends_with("uninstalled 2024-05-02T10:00:00Z (hidden)"));
    }
}
