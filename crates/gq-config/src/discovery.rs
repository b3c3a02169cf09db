//! Configuration file discovery.
//!
//! Discovers `.gq.toml` files by walking up the directory tree from a starting point,
//! then appending the global `~/.gq.toml` if present.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".gq.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global (`~/.gq.toml`) last.
/// Walking stops at a file that sets `root = true`, in which case the global file is skipped.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();
    let mut found_root = false;

    let mut current = Some(cwd);
    while let Some(dir) = current {
        let config_path = dir.join(CONFIG_FILENAME);
        if config_path.is_file() {
            let is_root = is_root_config(&config_path);
            configs.push(config_path);
            if is_root {
                found_root = true;
                break;
            }
        }
        current = dir.parent();
    }

    if !found_root
        && let Some(global_path) = global_config_path()
        && global_path.is_file()
        && !configs.contains(&global_path)
    {
        configs.push(global_path);
    }

    configs
}

/// Returns the path to the global configuration file (`~/.gq.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    /// Temporary directory tree for discovery tests.
    struct TestDir {
        root: tempfile::TempDir,
    }

    impl TestDir {
        fn new() -> Self {
            Self {
                root: tempfile::tempdir().unwrap(),
            }
        }

        fn path(&self) -> &Path {
            self.root.path()
        }

        fn create_dir(&self, rel_path: &str) -> PathBuf {
            let path = self.root.path().join(rel_path);
            fs::create_dir_all(&path).unwrap();
            path
        }

        fn create_config(&self, rel_path: &str, content: &str) -> PathBuf {
            let dir = self.create_dir(rel_path);
            let config = dir.join(CONFIG_FILENAME);
            fs::write(&config, content).unwrap();
            config
        }
    }

    /// Drops the global config, which depends on the test machine's home directory.
    fn local_only(configs: Vec<PathBuf>, root: &Path) -> Vec<PathBuf> {
        configs.into_iter().filter(|p| p.starts_with(root)).collect()
    }

    #[test]
    fn finds_nothing_in_empty_tree() {
        let dir = TestDir::new();
        let found = discover_config_files(&dir.create_dir("a/b"));
        assert!(local_only(found, dir.path()).is_empty());
    }

    #[test]
    fn closest_config_first() {
        let dir = TestDir::new();
        let outer = dir.create_config("", "# outer\n");
        let inner = dir.create_config("a", "# inner\n");
        let cwd = dir.create_dir("a/b");

        let found = local_only(discover_config_files(&cwd), dir.path());
        assert_eq!(found, vec![inner, outer]);
    }

    #[test]
    fn root_config_stops_walk() {
        let dir = TestDir::new();
        dir.create_config("", "# outer\n");
        let inner = dir.create_config("a", "root = true\n");

        let found = discover_config_files(&dir.create_dir("a/b"));
        assert_eq!(found, vec![inner]);
    }
}
