//! FFI (Foreign Function Interface) bindings for native frontends.
//!
//! Each entry point scans the standard locations (honouring `PLUGSCAN_HOME`
//! and `PLUGSCAN_ROOT`) and returns the rendered report as one newline-joined,
//! null-terminated UTF-8 string.
//!
//! # Memory Management
//!
//! - Rust allocates the returned strings
//! - The caller MUST release them with `plugscan_free_string()`
//! - A null return means the report could not be converted to a C string
//! - Functions taking pointers are `unsafe`; see each `# Safety` section
//!
//! # Usage from Swift (macOS)
//!
//! ```swift
//! let reportPtr = plugscan_render_summary()
//! defer { plugscan_free_string(reportPtr) }
//! let report = String(cString: reportPtr!)
//! ```

use crate::error::Result;
use crate::registry::scan_installed;
use crate::report::{render, ReportMode};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use tracing::error;

/// Render the summary report.
/// Caller MUST call plugscan_free_string() when done.
#[no_mangle]
pub extern "C" fn plugscan_render_summary() -> *mut c_char {
    render_to_c(&ReportMode::Summary)
}

/// Render the detailed report, including every install path.
/// Caller MUST call plugscan_free_string() when done.
#[no_mangle]
pub extern "C" fn plugscan_render_detailed() -> *mut c_char {
    render_to_c(&ReportMode::Detailed)
}

/// Render the listing for one format token (`au`, `vst`, `vst3`, `aax`).
/// A null token is treated as an empty one and yields the "none found" text.
/// Caller MUST call plugscan_free_string() when done.
///
/// # Safety
///
/// `token` must be null or point to a valid null-terminated string that
/// stays alive for the duration of the call.
#[no_mangle]
pub unsafe extern "C" fn plugscan_render_by_type(token: *const c_char) -> *mut c_char {
    let token = if token.is_null() {
        String::new()
    } else {
        CStr::from_ptr(token).to_string_lossy().into_owned()
    };
    render_to_c(&ReportMode::ByType(token))
}

/// Free a string returned by any plugscan_render_* function.
///
/// # Safety
///
/// `s` must be null or a pointer returned by this library that has not been
/// freed yet.
#[no_mangle]
pub unsafe extern "C" fn plugscan_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

fn render_to_c(mode: &ReportMode) -> *mut c_char {
    match report_string(mode) {
        Ok(report) => report.into_raw(),
        Err(e) => {
            error!(error = %e, "failed to render plugin report");
            ptr::null_mut()
        }
    }
}

fn report_string(mode: &ReportMode) -> Result<CString> {
    let lines = render(&scan_installed(), mode);
    Ok(CString::new(lines.join("\n"))?)
}
