//! Package manager backends and install/uninstall command construction.
use std::fmt;

use crate::config::instruction::{InstallInstruction, InstallMethod};
use crate::error::InstructionError;
use crate::exec::{CommandLine, Executor};

/// Concrete package managers that can back a logical method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Debian/Ubuntu apt.
    Apt,
    /// Arch Linux pacman.
    Pacman,
    /// Fedora dnf.
    Dnf,
    /// Homebrew.
    Brew,
    /// paru AUR helper.
    Paru,
    /// yay AUR helper.
    Yay,
    /// pacaur AUR helper.
    Pacaur,
    /// aurman AUR helper.
    Aurman,
}

impl PackageManager {
    /// Probe order for the `system` method.
    pub const SYSTEM: [Self; 4] = [Self::Apt, Self::Pacman, Self::Dnf, Self::Brew];

    /// Probe order for the `aur` method.
    pub const AUR: [Self; 4] = [Self::Paru, Self::Yay, Self::Pacaur, Self::Aurman];

    /// Executable name.
    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Pacman => "pacman",
            Self::Dnf => "dnf",
            Self::Brew => "brew",
            Self::Paru => "paru",
            Self::Yay => "yay",
            Self::Pacaur => "pacaur",
            Self::Aurman => "aurman",
        }
    }

    /// Flag used to check that the executable responds.
    const fn probe_arg(self) -> &'static str {
        match self {
            // pacaur has no --version
            Self::Pacaur => "-h",
            _ => "--version",
        }
    }

    /// Command that installs `pkg`.
    #[must_use]
    pub fn install_command(self, pkg: &str) -> CommandLine {
        match self {
            Self::Apt => CommandLine::program("sudo", ["apt", "install", "-y", pkg]),
            Self::Pacman => CommandLine::program("sudo", ["pacman", "-S", "--noconfirm", pkg]),
            Self::Dnf => CommandLine::program("sudo", ["dnf", "install", "-y", pkg]),
            Self::Brew => CommandLine::program("brew", ["install", pkg]),
            Self::Paru | Self::Yay => CommandLine::program(self.program(), ["-S", "--sudoloop", pkg]),
            Self::Pacaur | Self::Aurman => CommandLine::program(self.program(), ["-S", pkg]),
        }
    }

    /// Command that removes `pkg`.
    #[must_use]
    pub fn uninstall_command(self, pkg: &str) -> CommandLine {
        match self {
            Self::Apt => CommandLine::program("sudo", ["apt", "remove", "-y", pkg]),
            Self::Pacman => CommandLine::program("sudo", ["pacman", "-R", "--noconfirm", pkg]),
            Self::Dnf => CommandLine::program("sudo", ["dnf", "remove", "-y", pkg]),
            Self::Brew => CommandLine::program("brew", ["uninstall", pkg]),
            Self::Paru | Self::Yay | Self::Pacaur | Self::Aurman => {
                CommandLine::program(self.program(), ["-R", pkg])
            }
        }
    }

    /// The manager matching a concrete install method, if any.
    #[must_use]
    pub const fn from_method(method: InstallMethod) -> Option<Self> {
        match method {
            InstallMethod::Apt => Some(Self::Apt),
            InstallMethod::Pacman => Some(Self::Pacman),
            InstallMethod::Dnf => Some(Self::Dnf),
            InstallMethod::Brew => Some(Self::Brew),
            InstallMethod::Paru => Some(Self::Paru),
            InstallMethod::Yay => Some(Self::Yay),
            InstallMethod::Pacaur => Some(Self::Pacaur),
            InstallMethod::Aurman => Some(Self::Aurman),
            InstallMethod::System
            | InstallMethod::Aur
            | InstallMethod::Cargo
            | InstallMethod::CargoBinstall
            | InstallMethod::Bash => None,
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Backends found by probing the host, one per logical method.
///
/// Detected once per run and handed to the [`Resolver`]; never re-probed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Backends {
    /// Backend for the `system` method.
    pub system: Option<PackageManager>,
    /// Backend for the `aur` method.
    pub aur: Option<PackageManager>,
}

impl Backends {
    /// Probe the host for each logical method's backends in priority order.
    pub fn detect(executor: &dyn Executor) -> Self {
        let found = Self {
            system: first_available(executor, &PackageManager::SYSTEM),
            aur: first_available(executor, &PackageManager::AUR),
        };
        tracing::debug!(
            "detected backends: system={}, aur={}",
            found.system.map_or("none", PackageManager::program),
            found.aur.map_or("none", PackageManager::program),
        );
        found
    }
}

fn first_available(executor: &dyn Executor, candidates: &[PackageManager]) -> Option<PackageManager> {
    candidates
        .iter()
        .copied()
        .find(|m| executor.which(m.program()) && executor.probe(m.program(), m.probe_arg()))
}

/// Turns [`InstallInstruction`]s into [`CommandLine`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    backends: Backends,
}

impl Resolver {
    /// Create a resolver over previously detected backends.
    #[must_use]
    pub const fn new(backends: Backends) -> Self {
        Self { backends }
    }

    /// Build the command that installs `inst`.
    ///
    /// # Errors
    ///
    /// Returns [`InstructionError::NoBackendDetected`] for a logical method
    /// whose probe found nothing.
    pub fn install_command(&self, inst: &InstallInstruction) -> Result<CommandLine, InstructionError> {
        let pkg = inst.pkg.as_str();
        match inst.method {
            InstallMethod::Cargo => Ok(CommandLine::program("cargo", ["install", pkg])),
            InstallMethod::CargoBinstall => Ok(CommandLine::program("cargo-binstall", [pkg])),
            InstallMethod::Bash => Ok(CommandLine::shell(pkg)),
            method => Ok(self.manager_for(method)?.install_command(pkg)),
        }
    }

    /// Build the command that removes `inst`.
    ///
    /// # Errors
    ///
    /// Returns [`InstructionError::UnsupportedMethod`] for `bash`, which has
    /// no inverse, and [`InstructionError::NoBackendDetected`] as for
    /// [`install_command`](Self::install_command).
    pub fn uninstall_command(
        &self,
        inst: &InstallInstruction,
    ) -> Result<CommandLine, InstructionError> {
        let pkg = inst.pkg.as_str();
        match inst.method {
            InstallMethod::Cargo | InstallMethod::CargoBinstall => {
                Ok(CommandLine::program("cargo", ["uninstall", pkg]))
            }
            InstallMethod::Bash => Err(InstructionError::UnsupportedMethod {
                method: inst.method.to_string(),
                action: "uninstall",
            }),
            method => Ok(self.manager_for(method)?.uninstall_command(pkg)),
        }
    }

    fn manager_for(&self, method: InstallMethod) -> Result<PackageManager, InstructionError> {
        match method {
            InstallMethod::System => self
                .backends
                .system
                .ok_or(InstructionError::NoBackendDetected { kind: "system" }),
            InstallMethod::Aur => self
                .backends
                .aur
                .ok_or(InstructionError::NoBackendDetected { kind: "aur" }),
            other => PackageManager::from_method(other).ok_or_else(|| {
                InstructionError::UnsupportedMethod {
                    method: other.to_string(),
                    action: "install",
                }
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::exec::MockExecutor;

    fn inst(method: InstallMethod, pkg: &str) -> InstallInstruction {
        InstallInstruction::new(method, pkg)
    }

    fn resolver(system: Option<PackageManager>, aur: Option<PackageManager>) -> Resolver {
        Resolver::new(Backends { system, aur })
    }

    #[test]
    fn pacman_install_and_uninstall() {
        let r = Resolver::default();
        let pacman = inst(InstallMethod::Pacman, "fish");
        assert_eq!(
            r.install_command(&pacman).unwrap().to_string(),
            "sudo pacman -S --noconfirm fish"
        );
        assert_eq!(
            r.uninstall_command(&pacman).unwrap().to_string(),
            "sudo pacman -R --noconfirm fish"
        );
    }

    #[test]
    fn direct_methods_do_not_need_backends() {
        let r = Resolver::default();
        let cases = [
            (InstallMethod::Apt, "sudo apt install -y fish"),
            (InstallMethod::Dnf, "sudo dnf install -y fish"),
            (InstallMethod::Brew, "brew install fish"),
            (InstallMethod::Yay, "yay -S --sudoloop fish"),
            (InstallMethod::Paru, "paru -S --sudoloop fish"),
            (InstallMethod::Pacaur, "pacaur -S fish"),
            (InstallMethod::Aurman, "aurman -S fish"),
            (InstallMethod::Cargo, "cargo install fish"),
            (InstallMethod::CargoBinstall, "cargo-binstall fish"),
        ];
        for (method, expected) in cases {
            assert_eq!(
                r.install_command(&inst(method, "fish")).unwrap().to_string(),
                expected
            );
        }
    }

    #[test]
    fn cargo_binstall_uninstalls_with_cargo() {
        let cmd = Resolver::default()
            .uninstall_command(&inst(InstallMethod::CargoBinstall, "bat"))
            .unwrap();
        assert_eq!(cmd, CommandLine::program("cargo", ["uninstall", "bat"]));
    }

    #[test]
    fn package_with_spaces_stays_one_argument() {
        let cmd = Resolver::default()
            .install_command(&inst(InstallMethod::Brew, "font fira code"))
            .unwrap();
        assert_eq!(
            cmd,
            CommandLine::Program {
                program: "brew".to_string(),
                args: vec!["install".to_string(), "font fira code".to_string()],
            }
        );
    }

    #[test]
    fn bash_install_is_the_literal_command() {
        let cmd = Resolver::default()
            .install_command(&inst(InstallMethod::Bash, "curl -fsS https://x | sh"))
            .unwrap();
        assert_eq!(cmd, CommandLine::shell("curl -fsS https://x | sh"));
    }

    #[test]
    fn bash_uninstall_is_unsupported() {
        let err = Resolver::default()
            .uninstall_command(&inst(InstallMethod::Bash, "echo hi"))
            .unwrap_err();
        assert_eq!(
            err,
            InstructionError::UnsupportedMethod {
                method: "bash".to_string(),
                action: "uninstall",
            }
        );
    }

    #[test]
    fn system_resolves_to_detected_backend() {
        let r = resolver(Some(PackageManager::Dnf), None);
        let cmd = r.install_command(&inst(InstallMethod::System, "fish")).unwrap();
        assert_eq!(cmd.to_string(), "sudo dnf install -y fish");
        let cmd = r.uninstall_command(&inst(InstallMethod::System, "fish")).unwrap();
        assert_eq!(cmd.to_string(), "sudo dnf remove -y fish");
    }

    #[test]
    fn aur_resolves_to_detected_helper() {
        let r = resolver(None, Some(PackageManager::Yay));
        let cmd = r.install_command(&inst(InstallMethod::Aur, "wlogout")).unwrap();
        assert_eq!(cmd.to_string(), "yay -S --sudoloop wlogout");
    }

    #[test]
    fn logical_method_without_backend_fails() {
        let r = Resolver::default();
        assert_eq!(
            r.install_command(&inst(InstallMethod::Aur, "wlogout")),
            Err(InstructionError::NoBackendDetected { kind: "aur" })
        );
        assert_eq!(
            r.uninstall_command(&inst(InstallMethod::System, "fish")),
            Err(InstructionError::NoBackendDetected { kind: "system" })
        );
    }

    #[test]
    fn detect_picks_first_responding_backend_in_priority_order() {
        let mut executor = MockExecutor::new();
        executor
            .expect_which()
            .returning(|p| matches!(p, "pacman" | "brew" | "yay" | "aurman"));
        executor
            .expect_probe()
            .returning(|p, _| matches!(p, "pacman" | "aurman"));

        let backends = Backends::detect(&executor);
        assert_eq!(backends.system, Some(PackageManager::Pacman));
        assert_eq!(backends.aur, Some(PackageManager::Aurman));
    }

    #[test]
    fn detect_with_nothing_installed_finds_nothing() {
        let mut executor = MockExecutor::new();
        executor.expect_which().return_const(false);
        executor.expect_probe().never();
        assert_eq!(Backends::detect(&executor), Backends::default());
    }
}
