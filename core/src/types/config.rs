use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LayoutError, Result};


/// File name of the settings document inside the config dir.
pub const SETTINGS_FILE: &str = "settings.yaml";


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Terminal control binary to invoke. Default: `wt`.
    #[serde(default = "default_program")]
    pub program: String,
    /// Target passed to `-w`. Default: `0` (the most recent window).
    #[serde(default = "default_window")]
    pub window: String,
    /// Token placed between subcommands. Default: `;`.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Revert virtualenv activation before launching. Default: true.
    #[serde(default = "default_true")]
    pub sanitize_env: bool,
    /// Expand `$VAR`, `${VAR}` and `%VAR%` in launched tokens. Default: true.
    #[serde(default = "default_true")]
    pub expand_vars: bool,
}

fn default_program() -> String {
    "wt".into()
}

fn default_window() -> String {
    "0".into()
}

fn default_separator() -> String {
    ";".into()
}

fn default_true() -> bool {
    true
}

impl Default for LayoutSettings {
    fn default() -> Self {
        LayoutSettings {
            program: default_program(),
            window: default_window(),
            separator: default_separator(),
            sanitize_env: default_true(),
            expand_vars: default_true(),
        }
    }
}

impl LayoutSettings {
    pub fn from_yaml(text: &str) -> Result<LayoutSettings> {
        if text.trim().is_empty() {
            return Ok(LayoutSettings::default());
        }
        serde_yaml::from_str(text).map_err(|e| LayoutError::Config(e.to_string()))
    }

    /// Load settings from a file. A missing file yields the defaults; any
    /// other read failure is a config error.
    pub fn from_file(path: &Path) -> Result<LayoutSettings> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                debug!(path = %path.display(), "loading settings");
                Self::from_yaml(&text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Ok(LayoutSettings::default())
            }
            Err(e) => Err(LayoutError::Config(format!(
                "cannot read '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    /// Load from `<config dir>/settings.yaml`.
    pub fn from_default_path() -> Result<LayoutSettings> {
        Self::from_file(&resolve_config_dir().join(SETTINGS_FILE))
    }
}


/// `$WTLAYOUT_CONFIG_DIR`, else `$HOME/.config/wtlayout`.
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("WTLAYOUT_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".config").join("wtlayout")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() {
        assert_eq!(LayoutSettings::from_yaml("").unwrap(), LayoutSettings::default());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let s = LayoutSettings::from_yaml("program: wt.exe\nexpand_vars: false\n").unwrap();
        assert_eq!(s.program, "wt.exe");
        assert!(!s.expand_vars);
        assert_eq!(s.window, "0");
        assert_eq!(s.separator, ";");
        assert!(s.sanitize_env);
    }

    #[test]
    fn invalid_yaml_is_config_error() {
        let err = LayoutSettings::from_yaml("program: [unterminated").unwrap_err();
        assert!(matches!(err, LayoutError::Config(_)));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        assert_eq!(LayoutSettings::from_file(&path).unwrap(), LayoutSettings::default());
    }

    #[test]
    fn settings_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "separator: \\;\n").unwrap();
        assert_eq!(LayoutSettings::from_file(&path).unwrap().separator, "\\;");
    }

    #[test]
    fn unreadable_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LayoutSettings::from_file(dir.path()).unwrap_err();
        assert!(matches!(err, LayoutError::Config(_)), "{:?}", err);
    }
}
