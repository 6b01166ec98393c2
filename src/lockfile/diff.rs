//! Structural comparison of two [`Lockfile`] snapshots.
use serde::{Deserialize, Serialize};

use super::{Config, GlobalDependency, Lockfile};

/// What changed between two snapshots. Written next to the lockfile as an
/// audit record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LockfileDiff {
    /// Visible units that were not visible before.
    pub added_configs: Vec<Config>,
    /// Units that were visible and no longer are.
    pub removed_configs: Vec<Config>,
    /// Units that were hidden and no longer are, either revealed or deleted.
    pub previously_removed_configs: Vec<Config>,
    /// Global dependencies with a new package name.
    pub added_global_deps: Vec<GlobalDependency>,
    /// Global dependencies whose package name disappeared.
    pub removed_global_deps: Vec<GlobalDependency>,
    /// The mirroring mode differs.
    pub mode_changed: bool,
    /// The format version differs.
    pub version_changed: bool,
}

impl LockfileDiff {
    /// Whether the two snapshots are structurally identical.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added_configs.is_empty()
            && self.removed_configs.is_empty()
            && self.previously_removed_configs.is_empty()
            && self.added_global_deps.is_empty()
            && self.removed_global_deps.is_empty()
            && !self.mode_changed
            && !self.version_changed
    }
}

fn has_unit(units: &[Config], name: &str) -> bool {
    units.iter().any(|c| c.name == name)
}

fn has_dep(deps: &[GlobalDependency], pkg: &str) -> bool {
    deps.iter().any(|d| d.pkg() == pkg)
}

/// Compare `before` with `after`.
///
/// Units are compared by name, global dependencies by package name. Added
/// entries keep the order of `after`, removed ones the order of `before`.
#[must_use]
pub fn diff(before: &Lockfile, after: &Lockfile) -> LockfileDiff {
    LockfileDiff {
        added_configs: after
            .configs
            .iter()
            .filter(|c| !has_unit(&before.configs, &c.name))
            .cloned()
            .collect(),
        removed_configs: before
            .configs
            .iter()
            .filter(|c| !has_unit(&after.configs, &c.name))
            .cloned()
            .collect(),
        previously_removed_configs: before
            .hidden_configs
            .iter()
            .filter(|c| !has_unit(&after.hidden_configs, &c.name))
            .cloned()
            .collect(),
        added_global_deps: after
            .global_dependencies
            .iter()
            .filter(|d| !has_dep(&before.global_dependencies, d.pkg()))
            .cloned()
            .collect(),
        removed_global_deps: before
            .global_dependencies
            .iter()
            .filter(|d| !has_dep(&after.global_dependencies, d.pkg()))
            .cloned()
            .collect(),
        mode_changed: before.mode != after.mode,
        version_changed: before.version != after.version,
    }
}

/// Names of units that were visible in `before` and became hidden in
/// `after`. These are the uninstall candidates.
#[must_use]
pub fn newly_hidden(before: &Lockfile, after: &Lockfile) -> Vec<String> {
    before
        .configs
        .iter()
        .filter(|c| {
            has_unit(&after.hidden_configs, &c.name) && !has_unit(&before.hidden_configs, &c.name)
        })
        .map(|c| c.name.clone())
        .collect()
}
