//! Plugscan Core Library
//!
//! Enumerates installed macOS audio plugins (AU, VST, VST3 and AAX), merges
//! the same plugin shipped in several formats, and renders text reports.
//!
//! # Pipeline
//!
//! ## Discovery (`registry` module)
//! - `LocationRegistry::standard()` - The seven well-known install folders
//! - `scan_directory()` - List plugin bundles in one folder, best-effort
//! - `scan_installed()` - Scan every folder into a `PluginCollection`
//!
//! ## Consolidation (`consolidate` module)
//! - `consolidate()` - One `ConsolidatedEntry` per (name, scope)
//!
//! ## Reports (`report` module)
//! - `render_summary()` - Consolidated list with format breakdown
//! - `render_detailed()` - As summary, plus every install path
//! - `render_by_type()` - Raw listing of a single format
//! - `ScanSnapshot` - Serializable view for JSON output
//!
//! ## Native bridge (`ffi` module)
//! - C ABI wrappers returning the rendered reports as C strings

pub mod config;
pub mod consolidate;
pub mod error;
pub mod ffi;
pub mod paths;
pub mod plugin;
pub mod registry;
pub mod report;

pub use config::ScanConfig;
pub use consolidate::consolidate;
pub use error::{Result, ScanError};
pub use paths::PathResolver;
pub use plugin::{ConsolidatedEntry, PathEntry, PluginCollection, PluginFormat, PluginRecord, Scope};
pub use registry::{scan_directory, scan_installed, Location, LocationRegistry};
pub use report::{render, render_by_type, render_detailed, render_summary, ReportMode, ScanSnapshot};
