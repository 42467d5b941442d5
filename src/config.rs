use std::path::PathBuf;

use crate::grid::AnchorCleanup;

/// Application-level constants
pub const APP_NAME: &str = "DischargeScribe";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DOCUMENT_URL_BASE: &str = "https://docs.google.com/document/d/";

/// Diagnostic dump subdirectory name inside app data.
const DIAGNOSTIC_SUBDIR: &str = "diagnostic";

pub const ENV_ANCHOR_CLEANUP: &str = "SCRIBE_ANCHOR_CLEANUP";
pub const ENV_DUMP_DIR: &str = "SCRIBE_DUMP_DIR";
pub const ENV_DIAGNOSTICS: &str = "SCRIBE_DIAGNOSTICS";

/// Get the application data directory
/// ~/DischargeScribe/ on all platforms
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_NAME))
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "discharge_scribe=info,warn"
}

/// Edit link for a document in the store.
pub fn document_link(document_id: &str) -> String {
    format!("{DOCUMENT_URL_BASE}{document_id}")
}

/// Runtime settings for a fill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScribeConfig {
    pub anchor_cleanup: AnchorCleanup,
    /// Base directory for diagnostic dumps; `None` disables them.
    pub dump_dir: Option<PathBuf>,
}

impl ScribeConfig {
    /// Read settings from the process environment.
    ///
    /// - `SCRIBE_ANCHOR_CLEANUP`: `scoped` (default) or `global`
    /// - `SCRIBE_DUMP_DIR`: dump base directory, enables dumps
    /// - `SCRIBE_DIAGNOSTICS=1`: enables dumps under `~/DischargeScribe/diagnostic/`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let anchor_cleanup = match lookup(ENV_ANCHOR_CLEANUP) {
            Some(raw) => AnchorCleanup::from_str(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Unknown anchor cleanup mode, using scoped");
                AnchorCleanup::Scoped
            }),
            None => AnchorCleanup::default(),
        };

        let dump_dir = match lookup(ENV_DUMP_DIR) {
            Some(dir) if !dir.trim().is_empty() => Some(PathBuf::from(dir)),
            _ if lookup(ENV_DIAGNOSTICS).is_some_and(|v| v.trim() == "1") => {
                app_data_dir().map(|dir| dir.join(DIAGNOSTIC_SUBDIR))
            }
            _ => None,
        };

        Self {
            anchor_cleanup,
            dump_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir().unwrap();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("DischargeScribe"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }

    #[test]
    fn document_link_appends_id() {
        assert_eq!(
            document_link("abc123"),
            "https://docs.google.com/document/d/abc123"
        );
    }

    #[test]
    fn defaults_are_scoped_without_dumps() {
        let config = ScribeConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ScribeConfig::default());
        assert_eq!(config.anchor_cleanup, AnchorCleanup::Scoped);
        assert!(config.dump_dir.is_none());
    }

    #[test]
    fn cleanup_mode_is_read_from_env() {
        let config = ScribeConfig::from_lookup(lookup(&[(ENV_ANCHOR_CLEANUP, "Global")]));
        assert_eq!(config.anchor_cleanup, AnchorCleanup::Global);

        let config = ScribeConfig::from_lookup(lookup(&[(ENV_ANCHOR_CLEANUP, "everywhere")]));
        assert_eq!(config.anchor_cleanup, AnchorCleanup::Scoped);
    }

    #[test]
    fn explicit_dump_dir_wins_over_diagnostics_flag() {
        let config = ScribeConfig::from_lookup(lookup(&[
            (ENV_DUMP_DIR, "/tmp/scribe-dumps"),
            (ENV_DIAGNOSTICS, "1"),
        ]));
        assert_eq!(config.dump_dir, Some(PathBuf::from("/tmp/scribe-dumps")));
    }

    #[test]
    fn diagnostics_flag_uses_app_data_dir() {
        let config = ScribeConfig::from_lookup(lookup(&[(ENV_DIAGNOSTICS, "1")]));
        let dir = config.dump_dir.unwrap();
        assert!(dir.ends_with("DischargeScribe/diagnostic"));
    }
}
