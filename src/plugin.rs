use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Audio plugin formats found on macOS.
///
/// Variants are declared in bucket order, which is also the order of the
/// format breakdown in every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PluginFormat {
    #[serde(rename = "AU")]
    Au,
    #[serde(rename = "VST")]
    Vst,
    #[serde(rename = "VST3")]
    Vst3,
    #[serde(rename = "AAX")]
    Aax,
}

impl PluginFormat {
    pub const ALL: [PluginFormat; 4] = [
        PluginFormat::Au,
        PluginFormat::Vst,
        PluginFormat::Vst3,
        PluginFormat::Aax,
    ];

    /// Key of the per-format bucket this format's records are collected under.
    pub fn bucket_key(&self) -> &'static str {
        match self {
            PluginFormat::Au => "AU_Components",
            PluginFormat::Vst => "VST",
            PluginFormat::Vst3 => "VST3",
            PluginFormat::Aax => "AAX",
        }
    }

    /// Short code used for grouping and in the consolidated listing.
    pub fn short_code(&self) -> &'static str {
        match self {
            PluginFormat::Au => "AU",
            PluginFormat::Vst => "VST",
            PluginFormat::Vst3 => "VST3",
            PluginFormat::Aax => "AAX",
        }
    }

    /// Label stamped on each record when a location of this format is scanned.
    pub fn scan_label(&self) -> &'static str {
        match self {
            PluginFormat::Au => "AU Component",
            _ => self.bucket_key(),
        }
    }

    /// Name shown in the format breakdown section.
    pub fn breakdown_name(&self) -> &'static str {
        match self {
            PluginFormat::Au => "AU Components",
            _ => self.bucket_key(),
        }
    }

    /// Heading used by the single-format listing.
    pub fn listing_heading(&self) -> &'static str {
        match self {
            PluginFormat::Au => "AU Component",
            _ => self.bucket_key(),
        }
    }

    /// Bundle extension, without the leading dot.
    pub fn bundle_suffix(&self) -> &'static str {
        match self {
            PluginFormat::Au => "component",
            PluginFormat::Vst => "vst",
            PluginFormat::Vst3 => "vst3",
            PluginFormat::Aax => "aaxplugin",
        }
    }

    pub fn from_bucket_key(key: &str) -> Option<PluginFormat> {
        Self::ALL.into_iter().find(|format| format.bucket_key() == key)
    }
}

impl fmt::Display for PluginFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_code())
    }
}

/// Installation scope of a plugin bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Scope {
    User,
    System,
}

impl Scope {
    pub fn marker(&self) -> &'static str {
        match self {
            Scope::User => "🏠",
            Scope::System => "🏢",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::User => f.write_str("User"),
            Scope::System => f.write_str("System"),
        }
    }
}

/// A single plugin bundle found while scanning one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRecord {
    pub name: String,
    pub format_label: String,
    pub path: String,
    pub scope: Scope,
}

/// One contributing install path of a consolidated plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathEntry {
    pub format: PluginFormat,
    pub path: String,
    pub format_label: String,
}

/// A logical plugin, merged across formats by name and scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedEntry {
    pub name: String,
    pub scope: Scope,
    /// Format of every contributing record, in encounter order. May repeat.
    pub formats: Vec<PluginFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<Vec<PathEntry>>,
}

impl ConsolidatedEntry {
    /// Distinct short codes, sorted for display.
    pub fn display_formats(&self) -> Vec<&'static str> {
        let mut codes: Vec<&'static str> = self.formats.iter().map(|f| f.short_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }
}

/// Scan output: every record found, bucketed by format.
///
/// All four buckets are always present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginCollection {
    buckets: BTreeMap<PluginFormat, Vec<PluginRecord>>,
}

impl PluginCollection {
    pub fn new() -> Self {
        let buckets = PluginFormat::ALL
            .into_iter()
            .map(|format| (format, Vec::new()))
            .collect();
        Self { buckets }
    }

    pub fn bucket(&self, format: PluginFormat) -> &[PluginRecord] {
        self.buckets.get(&format).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn extend<I>(&mut self, format: PluginFormat, records: I)
    where
        I: IntoIterator<Item = PluginRecord>,
    {
        self.buckets.entry(format).or_default().extend(records);
    }

    pub fn push(&mut self, format: PluginFormat, record: PluginRecord) {
        self.buckets.entry(format).or_default().push(record);
    }

    /// Buckets in format order.
    pub fn iter(&self) -> impl Iterator<Item = (PluginFormat, &[PluginRecord])> {
        self.buckets
            .iter()
            .map(|(format, records)| (*format, records.as_slice()))
    }

    /// Sum of all bucket sizes.
    pub fn total_instances(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

impl Default for PluginCollection {
    fn default() -> Self {
        Self::new()
    }
}
