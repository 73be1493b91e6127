//! Merges per-format scan results into one entry per logical plugin.
//!
//! Records are grouped by `(name, scope)`: the same plugin installed as both
//! AU and VST3 system-wide becomes one entry, while a user-level copy of it
//! stays separate.

use crate::{ConsolidatedEntry, PathEntry, PluginCollection, Scope};
use std::collections::HashMap;

/// Folds every record of every bucket into consolidated entries.
///
/// Entries come back in order of first encounter. Repeated formats are kept
/// in `formats`; use [`ConsolidatedEntry::display_formats`] for the distinct
/// sorted set. With `include_paths`, each entry also lists every contributing
/// path in encounter order.
pub fn consolidate(collection: &PluginCollection, include_paths: bool) -> Vec<ConsolidatedEntry> {
    let mut entries: Vec<ConsolidatedEntry> = Vec::new();
    let mut index: HashMap<(String, Scope), usize> = HashMap::new();

    for (format, records) in collection.iter() {
        for record in records {
            let key = (record.name.clone(), record.scope);
            let slot = *index.entry(key).or_insert_with(|| {
                entries.push(ConsolidatedEntry {
                    name: record.name.clone(),
                    scope: record.scope,
                    formats: Vec::new(),
                    paths: include_paths.then(Vec::new),
                });
                entries.len() - 1
            });

            let entry = &mut entries[slot];
            entry.formats.push(format);
            if let Some(paths) = entry.paths.as_mut() {
                paths.push(PathEntry {
                    format,
                    path: record.path.clone(),
                    format_label: record.format_label.clone(),
                });
            }
        }
    }

    entries
}
