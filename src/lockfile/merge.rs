//! Carrying install state from the previous snapshot into a fresh one.
use super::{GlobalDependency, Lockfile};

/// Copy every unit's and global dependency's [`InstallInfo`] from `from`
/// onto the same-named entry in `to`.
///
/// Units are matched by name across both visible and hidden lists, visible
/// first. Dependencies are matched by package name. Entries of `to` with no
/// counterpart in `from` keep their default state.
///
/// [`InstallInfo`]: super::InstallInfo
pub fn copy_install_info(from: &Lockfile, to: &mut Lockfile) {
    for cfg in from.configs.iter().chain(&from.hidden_configs) {
        if let Some(target) = to.find_mut(&cfg.name) {
            target.install_info.clone_from(&cfg.install_info);
        }
    }

    for dep in &from.global_dependencies {
        for target in to
            .global_dependencies
            .iter_mut()
            .filter(|d| d.pkg() == dep.pkg())
        {
            target.install_info.clone_from(&dep.install_info);
        }
    }
}

/// Whether the set of global dependency package names differs.
///
/// Order is ignored; duplicates count.
#[must_use]
pub fn global_dependencies_changed(before: &[GlobalDependency], after: &[GlobalDependency]) -> bool {
    fn names(deps: &[GlobalDependency]) -> Vec<&str> {
        let mut names: Vec<&str> = deps.iter().map(GlobalDependency::pkg).collect();
        names.sort_unstable();
        names
    }
    names(before) != names(after)
}

/// Whether any global dependency has been acted on in a previous run.
#[must_use]
pub fn global_dependencies_installed(deps: &[GlobalDependency]) -> bool {
    deps.iter()
        .any(|d| d.install_info.is_installed || d.install_info.was_uninstalled)
}
