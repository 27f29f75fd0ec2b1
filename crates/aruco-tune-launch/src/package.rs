//! Locating installed packages under ament-style install prefixes.
//!
//! A prefix holds `share/<package>/` for data files and
//! `lib/<package>/<executable>` for node binaries.

use crate::LaunchError;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable listing install prefixes, `:`-separated.
pub const PREFIX_ENV: &str = "AMENT_PREFIX_PATH";

/// Ordered list of install prefixes; the first match wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackageIndex {
    prefixes: Vec<PathBuf>,
}

impl PackageIndex {
    pub fn new(prefixes: Vec<PathBuf>) -> Self {
        Self { prefixes }
    }

    /// Parse a `:`-separated prefix list, skipping empty entries.
    pub fn from_path_list(list: &str) -> Self {
        Self::new(env::split_paths(list).filter(|p| !p.as_os_str().is_empty()).collect())
    }

    /// Prefixes from [`PREFIX_ENV`], empty if unset.
    pub fn from_env() -> Self {
        env::var(PREFIX_ENV)
            .map(|v| Self::from_path_list(&v))
            .unwrap_or_default()
    }

    /// Put `prefixes` ahead of the current ones.
    pub fn with_overrides(mut self, prefixes: &[PathBuf]) -> Self {
        let mut merged = prefixes.to_vec();
        merged.append(&mut self.prefixes);
        self.prefixes = merged;
        self
    }

    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }

    /// `<prefix>/share/<package>` for the first prefix that has it.
    pub fn share_dir(&self, package: &str) -> Result<PathBuf, LaunchError> {
        self.find(|prefix| prefix.join("share").join(package), Path::is_dir)
            .ok_or_else(|| self.not_found(package))
    }

    /// `<prefix>/lib/<package>/<executable>` for the first prefix that has it.
    pub fn executable(&self, package: &str, executable: &str) -> Result<PathBuf, LaunchError> {
        if let Some(path) = self.find(
            |prefix| prefix.join("lib").join(package).join(executable),
            Path::is_file,
        ) {
            return Ok(path);
        }
        let known = self
            .prefixes
            .iter()
            .any(|p| p.join("lib").join(package).is_dir() || p.join("share").join(package).is_dir());
        if known {
            Err(LaunchError::ExecutableNotFound {
                package: package.to_string(),
                executable: executable.to_string(),
            })
        } else {
            Err(self.not_found(package))
        }
    }

    fn find<F, P>(&self, candidate: F, exists: P) -> Option<PathBuf>
    where
        F: Fn(&Path) -> PathBuf,
        P: Fn(&Path) -> bool,
    {
        self.prefixes
            .iter()
            .map(|p| candidate(p))
            .find(|path| exists(path))
    }

    fn not_found(&self, package: &str) -> LaunchError {
        LaunchError::PackageNotFound {
            package: package.to_string(),
            searched: self.prefixes.clone(),
        }
    }
}
