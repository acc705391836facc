//! Executable lookup for backend programs.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const FALLBACK_DIR: &str = "/usr/bin";

/// Resolves backend program names to executable paths.
#[derive(Clone, Debug)]
pub struct BinaryLocator {
    search_dirs: Vec<PathBuf>,
    fallback_dir: Option<PathBuf>,
}

impl BinaryLocator {
    /// Search `PATH`, then `/usr/bin`.
    pub fn from_env() -> Self {
        let search_dirs = std::env::var_os("PATH")
            .map(|path| std::env::split_paths(&path).collect())
            .unwrap_or_default();
        Self {
            search_dirs,
            fallback_dir: Some(PathBuf::from(FALLBACK_DIR)),
        }
    }

    /// Search only the given directories, with no fallback.
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self {
            search_dirs: dirs,
            fallback_dir: None,
        }
    }

    /// Return the first executable named `name`, or `None` when the program
    /// is not installed.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        self.search_dirs
            .iter()
            .chain(self.fallback_dir.iter())
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable(candidate))
    }
}

impl Default for BinaryLocator {
    fn default() -> Self {
        Self::from_env()
    }
}

fn is_executable(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "stream-player-locate-{tag}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&root).expect("create temp dir");
        root
    }

    fn write_file(path: &Path, mode: u32) {
        std::fs::write(path, b"#!/bin/sh\n").expect("write file");
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).expect("chmod");
    }

    #[test]
    fn finds_executable_in_first_matching_dir() {
        let first = temp_dir("first");
        let second = temp_dir("second");
        write_file(&second.join("ffmpeg"), 0o755);

        let locator = BinaryLocator::with_dirs(vec![first, second.clone()]);
        assert_eq!(locator.find("ffmpeg"), Some(second.join("ffmpeg")));
    }

    #[test]
    fn skips_non_executable_files() {
        let dir = temp_dir("noexec");
        write_file(&dir.join("aplay"), 0o644);

        let locator = BinaryLocator::with_dirs(vec![dir]);
        assert_eq!(locator.find("aplay"), None);
    }

    #[test]
    fn skips_directories_with_program_name() {
        let dir = temp_dir("dir");
        std::fs::create_dir_all(dir.join("cvlc")).expect("mkdir");

        let locator = BinaryLocator::with_dirs(vec![dir]);
        assert_eq!(locator.find("cvlc"), None);
    }

    #[test]
    fn missing_program_is_none() {
        let locator = BinaryLocator::with_dirs(Vec::new());
        assert_eq!(locator.find("definitely-not-installed"), None);
    }
}
