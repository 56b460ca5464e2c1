use std::path::{Path, PathBuf};

/// Project configuration file, looked up at the project root.
pub const CONFIG_FILE: &str = "shipwright.json";

/// Project configuration file path
pub fn config_file(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Python project metadata file path
pub fn pyproject(root: &Path) -> PathBuf {
    root.join("pyproject.toml")
}

/// Executable inside a virtual environment (`Scripts/` on Windows, `bin/` elsewhere).
pub fn venv_executable(env_dir: &Path, name: &str) -> PathBuf {
    #[cfg(windows)]
    {
        env_dir.join("Scripts").join(name)
    }

    #[cfg(not(windows))]
    {
        env_dir.join("bin").join(name)
    }
}

/// Resolve a configured path against the project root, expanding `~` and `$VAR`.
pub fn resolve(root: &Path, configured: &str) -> PathBuf {
    let expanded = shellexpand::full(configured)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| shellexpand::tilde(configured).into_owned());
    let path = PathBuf::from(expanded);
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_join_root() {
        assert_eq!(
            resolve(Path::new("/work/pkg"), "dist"),
            PathBuf::from("/work/pkg/dist")
        );
    }

    #[test]
    fn absolute_paths_are_kept() {
        assert_eq!(
            resolve(Path::new("/work/pkg"), "/tmp/env"),
            PathBuf::from("/tmp/env")
        );
    }

    #[cfg(not(windows))]
    #[test]
    fn venv_executables_live_in_bin() {
        assert_eq!(
            venv_executable(Path::new(".test-env"), "pip"),
            PathBuf::from(".test-env/bin/pip")
        );
    }
}
