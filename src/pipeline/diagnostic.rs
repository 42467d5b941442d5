//! Fill diagnostic dump: writes each run's planned batches to disk.
//!
//! **Activation**: only when `ScribeConfig::dump_dir` is set, either through
//! `SCRIBE_DUMP_DIR` or `SCRIBE_DIAGNOSTICS=1`.
//!
//! **Output structure**:
//! ```text
//! {dump_dir}/{run_id}/
//!   00-extraction.json
//!   01-grid-labs.json
//!   01-grid-cardiac.json
//!   02-placeholders.json
//!   03-report.json
//! ```

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Returns the dump directory for a run, creating it on first call.
///
/// Returns `None` (with a warning) if directory creation fails. Never panics,
/// never blocks the fill.
pub fn dump_dir_for(base: &Path, run_id: &Uuid) -> Option<PathBuf> {
    let dir = base.join(run_id.to_string());

    if let Err(e) = std::fs::create_dir_all(&dir) {
        tracing::warn!(
            path = %dir.display(),
            error = %e,
            "Diagnostic dump: failed to create directory"
        );
        return None;
    }

    Some(dir)
}

/// Write a JSON artifact, pretty-printed. Never panics.
pub fn dump_json<T: serde::Serialize>(dir: &Path, filename: &str, value: &T) {
    let path = dir.join(filename);
    match serde_json::to_string_pretty(value) {
        Ok(json) => match std::fs::write(&path, json.as_bytes()) {
            Ok(()) => tracing::debug!(
                path = %path.display(),
                size = json.len(),
                "Diagnostic dump: JSON written"
            ),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Diagnostic dump: failed to write JSON"
            ),
        },
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Diagnostic dump: failed to serialize JSON"
        ),
    }
}

/// Write a text artifact (the raw model response). Never panics.
pub fn dump_text(dir: &Path, filename: &str, text: &str) {
    let path = dir.join(filename);
    match std::fs::write(&path, text.as_bytes()) {
        Ok(()) => tracing::debug!(
            path = %path.display(),
            size = text.len(),
            "Diagnostic dump: text written"
        ),
        Err(e) => tracing::warn!(
            path = %path.display(),
            error = %e,
            "Diagnostic dump: failed to write text"
        ),
    }
}
