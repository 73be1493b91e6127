//! Scanner configuration.
//!
//! Defaults scan the live system. `PLUGSCAN_HOME` and `PLUGSCAN_ROOT` point
//! the scanner at another home directory or a mounted system volume.

use crate::paths::PathResolver;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const HOME_ENV: &str = "PLUGSCAN_HOME";
pub const ROOT_ENV: &str = "PLUGSCAN_ROOT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Home directory used to expand `~`. Defaults to the current user's.
    #[serde(default)]
    pub home: Option<PathBuf>,
    /// Prefix for system-wide locations. Defaults to `/`. Scope is inferred
    /// from bundle paths below this prefix.
    #[serde(default)]
    pub system_root: Option<PathBuf>,
}

impl ScanConfig {
    pub fn from_env() -> Self {
        Self {
            home: env_path(HOME_ENV),
            system_root: env_path(ROOT_ENV),
        }
    }

    pub fn resolver(&self) -> PathResolver {
        let home = self.home.clone().or_else(dirs::home_dir);
        let resolver = PathResolver::new(home);
        match &self.system_root {
            Some(root) => resolver.with_root(root),
            None => resolver,
        }
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
