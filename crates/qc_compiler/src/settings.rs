// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compiler settings.
//!
//! Settings live in a RON file next to the graphs being compiled. Missing
//! fields fall back to defaults, and a missing file means all defaults.

use qc_graph::ScriptOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name looked up in the working directory
pub const SETTINGS_FILE_NAME: &str = "qc_compiler.ron";

/// Default log filter directive
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Indentation used inside script blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IndentStyle {
    /// One tab per level
    #[default]
    Tab,
    /// The given number of spaces per level
    Spaces(usize),
}

impl IndentStyle {
    /// The indent string for one level
    pub fn as_string(&self) -> String {
        match self {
            IndentStyle::Tab => "\t".to_string(),
            IndentStyle::Spaces(count) => " ".repeat(*count),
        }
    }
}

/// Script formatting settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    /// Write a comment naming the source graph at the top
    pub header: bool,
    /// Block indentation
    pub indent: IndentStyle,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            header: true,
            indent: IndentStyle::Tab,
        }
    }
}

/// Complete compiler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// Format version
    pub version: u32,
    /// Script formatting
    pub script: ScriptSettings,
    /// Log filter directive (error, warn, info, debug, trace)
    pub log_level: String,
    /// Directory relative output paths are resolved against
    pub output_dir: Option<PathBuf>,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            script: ScriptSettings::default(),
            log_level: DEFAULT_LOG_FILTER.to_string(),
            output_dir: None,
        }
    }
}

impl CompilerSettings {
    /// Load settings from a RON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        let settings: Self = ron::from_str(&contents)?;
        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion(settings.version));
        }
        Ok(settings)
    }

    /// Load from an explicit path, or from [`SETTINGS_FILE_NAME`] if it exists
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(SETTINGS_FILE_NAME);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Script emission options from these settings
    pub fn script_options(&self) -> ScriptOptions {
        ScriptOptions {
            header: self.script.header,
            indent: self.script.indent.as_string(),
        }
    }

    /// Resolve an output path against [`Self::output_dir`]
    pub fn output_path(&self, path: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Error when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON for the settings format
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// File was written by a newer version
    #[error("Unsupported settings version: {0}")]
    UnsupportedVersion(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = CompilerSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.log_level, DEFAULT_LOG_FILTER);
        assert_eq!(settings.script_options(), ScriptOptions::default());
    }

    #[test]
    fn test_load_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);

        let mut settings = CompilerSettings::default();
        settings.script.indent = IndentStyle::Spaces(4);
        settings.log_level = "debug".to_string();
        let contents = ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::default()).unwrap();
        std::fs::write(&path, contents).unwrap();

        let loaded = CompilerSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(loaded.script_options().indent, "    ");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.ron");
        std::fs::write(&path, "(log_level: \"warn\")").unwrap();

        let loaded = CompilerSettings::load(&path).unwrap();
        assert_eq!(loaded.log_level, "warn");
        assert!(loaded.script.header);
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("future.ron");
        std::fs::write(&path, "(version: 99)").unwrap();

        assert!(matches!(
            CompilerSettings::load(&path),
            Err(SettingsError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn test_output_path() {
        let settings = CompilerSettings {
            output_dir: Some(PathBuf::from("build")),
            ..CompilerSettings::default()
        };
        assert_eq!(settings.output_path(Path::new("a.qc")), PathBuf::from("build/a.qc"));
    }
}
