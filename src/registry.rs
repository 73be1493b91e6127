//! Plugin location registry and directory scanning.
//!
//! # Layout
//!
//! On macOS every plugin format ships as a bundle: a directory whose name ends
//! in `.component`, `.vst`, `.vst3` or `.aaxplugin`. Bundles live in a small
//! set of well-known folders, both system-wide under `/Library` and per-user
//! under `~/Library`.
//!
//! Scanning is best-effort. A folder that does not exist, or that the current
//! user is not allowed to list, contributes no plugins and is skipped silently.

use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::paths::PathResolver;
use crate::{PluginCollection, PluginFormat, PluginRecord, Scope};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Path segment that marks a bundle as installed for a single user.
pub const USER_HOME_MARKER: &str = "/Users/";

/// A folder searched for plugins of one format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub format: PluginFormat,
    pub scope: Scope,
    pub raw_path: String,
}

impl Location {
    pub fn new(format: PluginFormat, scope: Scope, raw_path: impl Into<String>) -> Self {
        Self {
            format,
            scope,
            raw_path: raw_path.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocationRegistry {
    locations: Vec<Location>,
}

impl LocationRegistry {
    pub fn new(locations: Vec<Location>) -> Self {
        Self { locations }
    }

    /// The standard macOS install folders, scanned in this order.
    pub fn standard() -> Self {
        Self::new(vec![
            // Audio Units
            Location::new(PluginFormat::Au, Scope::System, "/Library/Audio/Plug-Ins/Components"),
            Location::new(PluginFormat::Au, Scope::User, "~/Library/Audio/Plug-Ins/Components"),
            // VST2
            Location::new(PluginFormat::Vst, Scope::System, "/Library/Audio/Plug-Ins/VST"),
            Location::new(PluginFormat::Vst, Scope::User, "~/Library/Audio/Plug-Ins/VST"),
            // VST3
            Location::new(PluginFormat::Vst3, Scope::System, "/Library/Audio/Plug-Ins/VST3"),
            Location::new(PluginFormat::Vst3, Scope::User, "~/Library/Audio/Plug-Ins/VST3"),
            // AAX (Pro Tools)
            Location::new(
                PluginFormat::Aax,
                Scope::System,
                "/Library/Application Support/Avid/Audio/Plug-Ins",
            ),
        ])
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Scans every location in order and buckets the results by format.
    ///
    /// Never fails. Unexpected I/O errors skip the location with a warning.
    pub fn scan_installed(&self, resolver: &PathResolver) -> PluginCollection {
        let mut collection = PluginCollection::new();

        for location in &self.locations {
            let directory = resolver.resolve(&location.raw_path);

            match scan_rooted(&directory, resolver.root(), location.format.scan_label()) {
                Ok(records) => {
                    debug!(
                        format = %location.format,
                        scope = %location.scope,
                        path = %directory.display(),
                        found = records.len(),
                        "scanned plugin location"
                    );
                    collection.extend(location.format, records);
                }
                Err(e) => {
                    warn!(error = %e, "skipping plugin location");
                }
            }
        }

        collection
    }
}

impl Default for LocationRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Scans the standard locations, honouring [`ScanConfig::from_env`].
pub fn scan_installed() -> PluginCollection {
    LocationRegistry::standard().scan_installed(&ScanConfig::from_env().resolver())
}

/// Lists the bundles directly inside `directory`.
///
/// A missing directory, or one the user may not list, yields `Ok` with the
/// records gathered so far (usually none).
pub fn scan_directory(directory: &Path, format_label: &str) -> Result<Vec<PluginRecord>> {
    scan_rooted(directory, None, format_label)
}

/// As [`scan_directory`], but scope is inferred from the path below `root`,
/// so a root that itself sits under `/Users/` doesn't make system bundles
/// look user-installed.
fn scan_rooted(directory: &Path, root: Option<&Path>, format_label: &str) -> Result<Vec<PluginRecord>> {
    if !directory.exists() {
        return Ok(Vec::new());
    }

    let listing = fs::read_dir(directory)
        .map(|entries| entries.map(|entry| entry.map(|e| e.path())));
    collect_listing(directory, root, listing, format_label)
}

fn collect_listing<I>(
    directory: &Path,
    root: Option<&Path>,
    listing: io::Result<I>,
    format_label: &str,
) -> Result<Vec<PluginRecord>>
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    let entries = match listing {
        Ok(entries) => entries,
        Err(e) if is_skippable(&e) => return Ok(Vec::new()),
        Err(source) => {
            return Err(ScanError::Io {
                path: directory.to_path_buf(),
                source,
            })
        }
    };

    let mut plugins = Vec::new();

    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => break,
            Err(source) => {
                return Err(ScanError::Io {
                    path: directory.to_path_buf(),
                    source,
                })
            }
        };

        // Bundles are directories; loose files are ignored
        if !path.is_dir() {
            continue;
        }

        let Some(file_name) = path.file_name() else {
            continue;
        };
        let file_name = file_name.to_string_lossy();
        let scope = match root.and_then(|r| path.strip_prefix(r).ok()) {
            Some(relative) => infer_scope(&Path::new("/").join(relative).to_string_lossy()),
            None => infer_scope(&path.to_string_lossy()),
        };

        plugins.push(PluginRecord {
            name: strip_bundle_suffix(&file_name).to_string(),
            format_label: format_label.to_string(),
            path: path.to_string_lossy().into_owned(),
            scope,
        });
    }

    Ok(plugins)
}

fn is_skippable(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound
    )
}

/// Removes one trailing bundle extension (`Reverb.vst3` -> `Reverb`).
/// Matching is case-sensitive; unknown extensions are kept.
pub fn strip_bundle_suffix(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if PluginFormat::ALL.iter().any(|f| f.bundle_suffix() == ext) => stem,
        _ => name,
    }
}

pub fn infer_scope(path: &str) -> Scope {
    if path.contains(USER_HOME_MARKER) {
        Scope::User
    } else {
        Scope::System
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_strip_known_suffixes() {
        assert_eq!(strip_bundle_suffix("Reverb.component"), "Reverb");
        assert_eq!(strip_bundle_suffix("Reverb.vst"), "Reverb");
        assert_eq!(strip_bundle_suffix("Reverb.vst3"), "Reverb");
        assert_eq!(strip_bundle_suffix("Reverb.aaxplugin"), "Reverb");
    }

    #[test]
    fn test_strip_removes_suffix_once() {
        assert_eq!(strip_bundle_suffix("Reverb.vst.vst"), "Reverb.vst");
        assert_eq!(strip_bundle_suffix("Pro-Q 3.vst3"), "Pro-Q 3");
    }

    #[test]
    fn test_strip_leaves_unknown_names() {
        assert_eq!(strip_bundle_suffix("Reverb"), "Reverb");
        assert_eq!(strip_bundle_suffix("Reverb.lv2"), "Reverb.lv2");
        assert_eq!(strip_bundle_suffix("Reverb.VST3"), "Reverb.VST3");
        assert_eq!(strip_bundle_suffix("Reverb.vst3.bak"), "Reverb.vst3.bak");
    }

    #[test]
    fn test_infer_scope() {
        assert_eq!(
            infer_scope("/Users/alice/Library/Audio/Plug-Ins/VST/Reverb.vst"),
            Scope::User
        );
        assert_eq!(
            infer_scope("/Library/Audio/Plug-Ins/VST/Reverb.vst"),
            Scope::System
        );
        assert_eq!(infer_scope("/Volumes/Users"), Scope::System);
    }

    #[test]
    fn test_standard_registry_layout() {
        let registry = LocationRegistry::standard();
        let locations = registry.locations();
        assert_eq!(locations.len(), 7);

        let vst: Vec<&Location> = locations
            .iter()
            .filter(|l| l.format == PluginFormat::Vst)
            .collect();
        assert_eq!(vst.len(), 2);
        assert!(vst.iter().all(|l| l.raw_path.ends_with("/VST")));

        let vst3_count = locations
            .iter()
            .filter(|l| l.format == PluginFormat::Vst3)
            .count();
        assert_eq!(vst3_count, 2);

        let user_paths: Vec<&str> = locations
            .iter()
            .filter(|l| l.scope == Scope::User)
            .map(|l| l.raw_path.as_str())
            .collect();
        assert!(user_paths.iter().all(|p| p.starts_with("~/")));
    }

    #[test]
    fn test_scan_missing_directory_is_empty() {
        let temp = TempDir::new().unwrap();
        let records = scan_directory(&temp.path().join("nope"), "VST").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_scan_keeps_only_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("Reverb.vst3")).unwrap();
        fs::create_dir(temp.path().join("Tuner")).unwrap();
        fs::write(temp.path().join("readme.txt"), "not a plugin").unwrap();
        fs::write(temp.path().join("Loose.vst3"), "").unwrap();

        let mut records = scan_directory(temp.path(), "VST3").unwrap();
        records.sort_by(|a, b| a.name.cmp(&b.name));

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Reverb", "Tuner"]);
        assert!(records.iter().all(|r| r.format_label == "VST3"));
        assert!(records.iter().all(|r| r.scope == Scope::System));
        assert!(records[0].path.ends_with("Reverb.vst3"));
    }

    #[test]
    fn test_scan_tags_user_scope_from_path() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("Users/alice/Library/Audio/Plug-Ins/VST");
        fs::create_dir_all(dir.join("Reverb.vst")).unwrap();

        let records = scan_directory(&dir, "VST").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].scope, Scope::User);
    }

    #[test]
    fn test_permission_denied_mid_listing_keeps_collected() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("First.component");
        let later = temp.path().join("Later.component");
        fs::create_dir(&first).unwrap();
        fs::create_dir(&later).unwrap();

        let entries = vec![
            Ok(first),
            Err(io::Error::from(io::ErrorKind::PermissionDenied)),
            Ok(later),
        ];
        let records = collect_listing(temp.path(), None, Ok(entries), "AU Component").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "First");
    }

    #[test]
    fn test_other_listing_errors_propagate() {
        let temp = TempDir::new().unwrap();
        let entries = vec![Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))];
        let result = collect_listing(temp.path(), None, Ok(entries), "VST");
        assert!(matches!(result, Err(ScanError::Io { .. })));
    }

    #[test]
    fn test_permission_denied_at_open_is_empty() {
        let temp = TempDir::new().unwrap();
        let denied: io::Result<Vec<io::Result<PathBuf>>> =
            Err(io::Error::from(io::ErrorKind::PermissionDenied));

        let records = collect_listing(temp.path(), None, denied, "AAX").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_other_open_errors_propagate() {
        let temp = TempDir::new().unwrap();
        let failed: io::Result<Vec<io::Result<PathBuf>>> =
            Err(io::Error::new(io::ErrorKind::Other, "stale handle"));

        let result = collect_listing(temp.path(), None, failed, "AAX");
        assert!(matches!(result, Err(ScanError::Io { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_empty() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("Locked");
        fs::create_dir_all(locked.join("Hidden.aaxplugin")).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still list the directory
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let records = scan_directory(&locked, "AAX");

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(records.unwrap().is_empty());
    }

    #[test]
    fn test_scan_installed_buckets_by_format() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("Users/alice");
        let root = temp.path().join("root");
        fs::create_dir_all(root.join("Library/Audio/Plug-Ins/VST3/Reverb.vst3")).unwrap();
        fs::create_dir_all(home.join("Library/Audio/Plug-Ins/VST/Reverb.vst")).unwrap();

        let resolver = PathResolver::new(Some(home)).with_root(&root);
        let collection = LocationRegistry::standard().scan_installed(&resolver);

        assert_eq!(collection.bucket(PluginFormat::Vst3).len(), 1);
        assert_eq!(collection.bucket(PluginFormat::Vst).len(), 1);
        assert_eq!(collection.bucket(PluginFormat::Vst)[0].scope, Scope::User);
        assert_eq!(collection.bucket(PluginFormat::Vst3)[0].scope, Scope::System);
        assert!(collection.bucket(PluginFormat::Au).is_empty());
        assert_eq!(collection.total_instances(), 2);
    }

    #[test]
    fn test_root_under_users_keeps_system_scope() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Users/me/backup");
        let home = temp.path().join("Users/alice");
        fs::create_dir_all(root.join("Library/Audio/Plug-Ins/VST3/Reverb.vst3")).unwrap();
        fs::create_dir_all(home.join("Library/Audio/Plug-Ins/VST3/Reverb.vst3")).unwrap();

        let resolver = PathResolver::new(Some(home)).with_root(&root);
        let collection = LocationRegistry::standard().scan_installed(&resolver);

        let mut scopes: Vec<Scope> = collection
            .bucket(PluginFormat::Vst3)
            .iter()
            .map(|r| r.scope)
            .collect();
        scopes.sort();
        assert_eq!(scopes, vec![Scope::User, Scope::System]);
    }

    #[test]
    fn test_rooted_scope_ignores_marker_in_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("Users/me");
        let dir = root.join("Library/Audio/Plug-Ins/VST");
        fs::create_dir_all(dir.join("Delay.vst")).unwrap();

        let rooted = scan_rooted(&dir, Some(&root), "VST").unwrap();
        assert_eq!(rooted[0].scope, Scope::System);

        let unrooted = scan_directory(&dir, "VST").unwrap();
        assert_eq!(unrooted[0].scope, Scope::User);
    }
}
