//! User settings persisted as TOML.
//!
//! Missing or malformed files fall back to defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use esi_export::ExportSettings;
use esi_report::DEFAULT_SENTINEL;
use serde::{Deserialize, Serialize};

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Report composition.
    pub report: ReportSettings,

    /// Export endpoints, busy timing, PDF and DOI options.
    pub export: ExportSettings,

    /// Upload storage.
    pub uploads: UploadSettings,
}

/// Report composition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Token replaced by the molecule viewer.
    pub sentinel: String,
    /// Template passed to the text and archive endpoints.
    pub template: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL.to_string(),
            template: "default".to_string(),
        }
    }
}

/// Upload storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Directory holding one subdirectory per session.
    pub dir: PathBuf,
    /// Sessions untouched for longer than this are removed by `clean`.
    pub max_age_hours: u64,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir().join("esi-uploads"),
            max_age_hours: 24,
        }
    }
}

impl Settings {
    /// Load settings from the default path.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from a specific path.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed settings");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write settings to {}", path.display()))
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "SupportingInformation", "esi")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("settings.toml");
        std::fs::write(
            &path,
            "[export]\nmin_busy_ms = 100\n\n[export.doi]\nzenodo = true\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path);

        assert_eq!(settings.export.min_busy_ms, 100);
        assert!(settings.export.doi.zenodo);
        assert!(!settings.export.doi.gist);
        assert_eq!(settings.report, ReportSettings::default());
        assert_eq!(settings.export.pdf.resolution_dpi, 300);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("settings.toml");
        std::fs::write(&path, "report = 3").unwrap();

        assert_eq!(Settings::load_from(&path), Settings::default());
        assert_eq!(
            Settings::load_from(&temp.path().join("missing.toml")),
            Settings::default()
        );
    }

    #[test]
    fn test_save_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("settings.toml");
        let mut settings = Settings::default();
        settings.report.sentinel = "<!-- viewer -->".to_string();
        settings.uploads.max_age_hours = 6;

        settings.save_to(&path).unwrap();

        assert_eq!(Settings::load_from(&path), settings);
    }
}
