//! Text reports over a scan.
//!
//! Every renderer is read-only over its input and returns the report as
//! lines; printing is left to the caller.

use crate::consolidate::consolidate;
use crate::{ConsolidatedEntry, PathEntry, PluginCollection, PluginFormat, PluginRecord};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;

const TITLE: &str = "🎵 Audio Plugin Scanner for macOS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportMode {
    Summary,
    Detailed,
    /// Raw records of a single format, selected by a user-supplied token.
    ByType(String),
}

pub fn render(collection: &PluginCollection, mode: &ReportMode) -> Vec<String> {
    match mode {
        ReportMode::Summary => render_summary(collection),
        ReportMode::Detailed => render_detailed(collection),
        ReportMode::ByType(token) => render_by_type(collection, token),
    }
}

pub fn render_summary(collection: &PluginCollection) -> Vec<String> {
    let consolidated = consolidate(collection, false);
    let mut lines = header(TITLE, 50, collection, consolidated.len());

    lines.push("Consolidated Plugin List:".to_string());
    lines.push("-".repeat(40));
    for entry in sorted_by_name(&consolidated) {
        lines.push(entry_line(entry));
    }
    lines.push(String::new());

    lines.extend(breakdown(collection));
    lines
}

pub fn render_detailed(collection: &PluginCollection) -> Vec<String> {
    let consolidated = consolidate(collection, true);
    let mut lines = header(&format!("{TITLE} (Detailed)"), 70, collection, consolidated.len());

    lines.push("Consolidated Plugin List with Paths:".to_string());
    lines.push("-".repeat(70));
    for entry in sorted_by_name(&consolidated) {
        lines.push(entry_line(entry));

        let mut by_code: BTreeMap<&'static str, Vec<&PathEntry>> = BTreeMap::new();
        for path in entry.paths.iter().flatten() {
            by_code.entry(path.format.short_code()).or_default().push(path);
        }
        for (code, paths) in by_code {
            for path in paths {
                lines.push(format!("     {}: {}", code, path.path));
            }
        }
        lines.push(String::new());
    }

    lines.extend(breakdown(collection));
    lines
}

/// Lists one bucket's raw records; consolidation is not applied.
pub fn render_by_type(collection: &PluginCollection, token: &str) -> Vec<String> {
    let records = resolve_format_token(token).map(|format| (format, collection.bucket(format)));

    match records {
        Some((format, records)) if !records.is_empty() => {
            let mut lines = vec![
                String::new(),
                format!(
                    "{} Plugins ({} found):",
                    format.listing_heading(),
                    records.len()
                ),
                "-".repeat(50),
            ];

            let mut sorted: Vec<&PluginRecord> = records.iter().collect();
            sorted.sort_by_key(|r| r.name.to_lowercase());
            for record in sorted {
                lines.push(format!("  {} {}", record.scope.marker(), record.name));
            }
            lines
        }
        _ => vec![String::new(), format!("No {token} plugins found.")],
    }
}

/// Maps a user-supplied format token to a bucket.
///
/// `au`, `vst`, `vst3` and `aax` match case-insensitively. Anything else is
/// uppercased with `-` turned into `_` and must then equal a bucket key.
pub fn resolve_format_token(token: &str) -> Option<PluginFormat> {
    match token.to_lowercase().as_str() {
        "au" => Some(PluginFormat::Au),
        "vst" => Some(PluginFormat::Vst),
        "vst3" => Some(PluginFormat::Vst3),
        "aax" => Some(PluginFormat::Aax),
        _ => PluginFormat::from_bucket_key(&token.to_uppercase().replace('-', "_")),
    }
}

/// Serializable view of a scan, for machine-readable output.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSnapshot {
    pub scanned_at: DateTime<Local>,
    pub total_instances: usize,
    pub unique_plugins: usize,
    pub plugins: Vec<ConsolidatedEntry>,
    /// Instance count per non-empty bucket, in bucket order.
    pub breakdown: BTreeMap<PluginFormat, usize>,
}

impl ScanSnapshot {
    pub fn new(collection: &PluginCollection, include_paths: bool) -> Self {
        let mut plugins = consolidate(collection, include_paths);
        plugins.sort_by_key(|p| p.name.to_lowercase());

        let breakdown = collection
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(format, records)| (format, records.len()))
            .collect();

        Self {
            scanned_at: Local::now(),
            total_instances: collection.total_instances(),
            unique_plugins: plugins.len(),
            plugins,
            breakdown,
        }
    }
}

fn header(title: &str, width: usize, collection: &PluginCollection, unique: usize) -> Vec<String> {
    vec![
        String::new(),
        title.to_string(),
        "=".repeat(width),
        format!("Total plugin instances: {}", collection.total_instances()),
        format!("Unique plugins: {unique}"),
        String::new(),
    ]
}

fn sorted_by_name(entries: &[ConsolidatedEntry]) -> Vec<&ConsolidatedEntry> {
    let mut sorted: Vec<&ConsolidatedEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.name.to_lowercase());
    sorted
}

fn entry_line(entry: &ConsolidatedEntry) -> String {
    format!(
        "  {} {} [{}]",
        entry.scope.marker(),
        entry.name,
        entry.display_formats().join(", ")
    )
}

fn breakdown(collection: &PluginCollection) -> Vec<String> {
    let mut lines = vec!["Format Breakdown:".to_string(), "-".repeat(20)];
    for (format, records) in collection.iter() {
        if records.is_empty() {
            continue;
        }
        lines.push(format!("  {}: {}", format.breakdown_name(), records.len()));
    }
    lines
}
