//! Rebuilding a [`Lockfile`] from the source tree.
use std::path::Path;

use super::{Config, GlobalDependency, Lockfile, Mode};
use crate::config::requirements::{DEPENDENCIES_FILE, Requirements, parse_dependencies_file};
use crate::error::{ConfigAuthoringError, HmError};

/// Scan `source_dir` and produce a fresh snapshot with no install state.
///
/// Every immediate subdirectory except `.git` becomes a unit targeting
/// `target_dir/<name>`. Dot-prefixed directories become hidden units named
/// without the dot; their requirements are still read from the dotted
/// directory. Units are ordered by directory name. Global dependencies are
/// not read here, see [`global_dependencies`].
///
/// # Errors
///
/// Returns an error if the source directory cannot be listed, a unit's
/// `INSTALL`/`DEPENDENCIES` file is unreadable or malformed, or a unit
/// exists both with and without the leading dot.
pub fn build(source_dir: &Path, target_dir: &Path, mode: Mode) -> Result<Lockfile, HmError> {
    let io_err = |source| HmError::Io {
        path: source_dir.to_path_buf(),
        source,
    };

    let mut entries = std::fs::read_dir(source_dir)
        .map_err(io_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    let mut lockfile = Lockfile {
        mode,
        ..Lockfile::default()
    };

    for entry in entries {
        // symlinked directories are not units
        if !entry.file_type().is_ok_and(|t| t.is_dir()) {
            continue;
        }
        let dir_name = entry.file_name().to_string_lossy().into_owned();
        if dir_name == ".git" {
            continue;
        }

        let from = entry.path();
        let requirements = Requirements::parse(&from)?;

        if let Some(name) = dir_name.strip_prefix('.') {
            if name.is_empty() {
                continue;
            }
            tracing::debug!("hidden unit: {name}");
            lockfile
                .hidden_configs
                .push(Config::new(name, &from, target_dir.join(name), requirements));
        } else {
            lockfile.configs.push(Config::new(
                dir_name.as_str(),
                &from,
                target_dir.join(&dir_name),
                requirements,
            ));
        }
    }

    for hidden in &lockfile.hidden_configs {
        if let Some(visible) = lockfile.configs.iter().find(|c| c.name == hidden.name) {
            return Err(ConfigAuthoringError::VisibleAndHidden {
                name: hidden.name.clone(),
                visible: visible.from.clone(),
                hidden: hidden.from.clone(),
            }
            .into());
        }
    }

    tracing::debug!(
        "built lockfile: {} visible, {} hidden, mode {:?}",
        lockfile.configs.len(),
        lockfile.hidden_configs.len(),
        lockfile.mode
    );
    Ok(lockfile)
}

/// Read the `DEPENDENCIES` file at the root of `source_dir`.
///
/// # Errors
///
/// Returns an error if the file is unreadable or malformed.
pub fn global_dependencies(source_dir: &Path) -> Result<Vec<GlobalDependency>, HmError> {
    Ok(parse_dependencies_file(&source_dir.join(DEPENDENCIES_FILE))?
        .into_iter()
        .map(GlobalDependency::new)
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::instruction::{InstallInstruction, InstallMethod};
    use std::path::PathBuf;

    fn source_tree(units: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for unit in units {
            std::fs::create_dir_all(dir.path().join(unit)).unwrap();
        }
        dir
    }

    fn write(root: &tempfile::TempDir, rel: &str, content: &str) {
        std::fs::write(root.path().join(rel), content).unwrap();
    }

    #[test]
    fn visible_and_hidden_units() {
        let src = source_tree(&["fish", ".ghostty"]);
        let target = PathBuf::from("/home/u/.config");

        let l = build(src.path(), &target, Mode::Symlink).unwrap();

        assert_eq!(l.configs.len(), 1);
        assert_eq!(l.configs[0].name, "fish");
        assert_eq!(l.configs[0].from, src.path().join("fish"));
        assert_eq!(l.configs[0].to, target.join("fish"));

        assert_eq!(l.hidden_configs.len(), 1);
        let hidden = &l.hidden_configs[0];
        assert_eq!(hidden.name, "ghostty");
        assert_eq!(hidden.from, src.path().join(".ghostty"));
        assert_eq!(hidden.to, target.join("ghostty"));
    }

    #[test]
    fn skips_git_and_plain_files() {
        let src = source_tree(&[".git", "nvim"]);
        write(&src, "README.md", "# dots");
        write(&src, "DEPENDENCIES", "pacman:git");

        let l = build(src.path(), Path::new("/t"), Mode::Copy).unwrap();

        assert_eq!(l.configs.len(), 1);
        assert!(l.hidden_configs.is_empty());
        assert_eq!(l.mode, Mode::Copy);
    }

    #[test]
    fn hidden_unit_requirements_come_from_dotted_dir() {
        let src = source_tree(&[".sway"]);
        write(&src, ".sway/INSTALL", "pacman:sway");
        let l = build(src.path(), Path::new("/t"), Mode::Symlink).unwrap();
        assert_eq!(
            l.hidden_configs[0].requirements.install,
            Some(InstallInstruction::new(InstallMethod::Pacman, "sway"))
        );
    }

    #[test]
    fn units_are_sorted_by_name() {
        let src = source_tree(&["zsh", "alacritty", "kitty"]);
        let l = build(src.path(), Path::new("/t"), Mode::Symlink).unwrap();
        let names: Vec<_> = l.configs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["alacritty", "kitty", "zsh"]);
    }

    #[test]
    fn fresh_snapshot_has_no_install_state() {
        let src = source_tree(&["fish"]);
        write(&src, "fish/INSTALL", "pacman:fish");
        let l = build(src.path(), Path::new("/t"), Mode::Symlink).unwrap();
        assert_eq!(l.configs[0].install_info, Default::default());
    }

    #[test]
    fn malformed_unit_aborts_build() {
        let src = source_tree(&["fish"]);
        write(&src, "fish/INSTALL", "snap:fish");
        assert!(matches!(
            build(src.path(), Path::new("/t"), Mode::Symlink),
            Err(HmError::ConfigAuthoring(_))
        ));
    }

    #[test]
    fn same_name_visible_and_hidden_is_rejected() {
        let src = source_tree(&["fish", ".fish", "nvim"]);

        let err = build(src.path(), Path::new("/t"), Mode::Symlink).unwrap_err();

        let visible = src.path().join("fish");
        let hidden = src.path().join(".fish");
        assert!(matches!(
            &err,
            HmError::ConfigAuthoring(ConfigAuthoringError::VisibleAndHidden { name, visible: v, hidden: h })
                if name == "fish" && *v == visible && *h == hidden
        ));
        let msg = err.to_string();
        assert!(msg.contains(&visible.display().to_string()));
        assert!(msg.contains(&hidden.display().to_string()));
    }

    #[test]
    fn missing_source_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            build(&missing, Path::new("/t"), Mode::Symlink),
            Err(HmError::Io { .. })
        ));
    }

    #[test]
    fn reads_root_dependencies() {
        let src = source_tree(&[]);
        write(&src, "DEPENDENCIES", "pacman:git\n// cargo:old\ncargo:bat\n");
        let deps = global_dependencies(src.path()).unwrap();
        let pkgs: Vec<_> = deps.iter().map(GlobalDependency::pkg).collect();
        assert_eq!(pkgs, ["git", "bat"]);
        assert!(deps.iter().all(|d| !d.install_info.is_installed));
    }

    #[test]
    fn no_root_dependencies_file() {
        let src = source_tree(&[]);
        assert!(global_dependencies(src.path()).unwrap().is_empty());
    }
}
