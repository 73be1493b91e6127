//! Error types for the plugin scanner.
//!
//! Missing and permission-restricted plugin directories are not errors: the
//! scanner reports them as empty. Only unexpected I/O failures surface here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to read plugin directory {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Report text contains an interior NUL byte")]
    InvalidString(#[from] std::ffi::NulError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
