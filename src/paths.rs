//! Lexical resolution of registry path strings.
//!
//! Resolution never touches the filesystem and never fails: a path that cannot
//! be expanded is returned as-is and simply won't exist when scanned.

use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    home: Option<PathBuf>,
    root: Option<PathBuf>,
}

impl PathResolver {
    pub fn new(home: Option<PathBuf>) -> Self {
        Self { home, root: None }
    }

    /// Resolver using the current user's home directory.
    pub fn from_env() -> Self {
        Self::new(dirs::home_dir())
    }

    /// Re-anchor absolute paths under `root` (e.g. a mounted system volume).
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.root = if root == Path::new("/") {
            None
        } else {
            Some(normalize(&root))
        };
        self
    }

    /// System root absolute paths are re-anchored under, if not `/`.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Expand `~`, anchor relative paths at the working directory and
    /// normalize `.` and `..` components.
    pub fn resolve(&self, raw: &str) -> PathBuf {
        let expanded = if raw == "~" {
            self.home.clone().unwrap_or_else(|| PathBuf::from(raw))
        } else if let Some(rest) = raw.strip_prefix("~/") {
            match &self.home {
                Some(home) => home.join(rest),
                None => PathBuf::from(raw),
            }
        } else {
            let path = PathBuf::from(raw);
            if path.is_absolute() {
                match &self.root {
                    Some(root) => root.join(raw.trim_start_matches('/')),
                    None => path,
                }
            } else {
                match std::env::current_dir() {
                    Ok(cwd) => cwd.join(path),
                    Err(_) => path,
                }
            }
        };

        normalize(&expanded)
    }
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::from_env()
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` above the root stays at the root
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
