//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML
//! tables. Every field has a default, so a partial or missing config
//! file always yields something usable.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::models::{MatchOptions, NormalizeRule};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Matching defaults.
    #[serde(default)]
    pub matching: MatchingSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            paths: PathSettings::default(),
            matching: MatchingSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Path configuration and remembered locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder thumbnails are exported into.
    #[serde(default = "default_export_folder")]
    pub export_folder: String,

    /// Last playlist file that was loaded.
    #[serde(default)]
    pub last_playlist_path: String,

    /// Last thumbnails directory that was scanned.
    #[serde(default)]
    pub last_thumbnails_path: String,
}

fn default_export_folder() -> String {
    "thumbnails".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            export_folder: default_export_folder(),
            last_playlist_path: String::new(),
            last_thumbnails_path: String::new(),
        }
    }
}

/// Default options for match runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingSettings {
    /// Minimum similarity for a pair to be considered.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Cap on per-entry suggestion lists in diagnostics.
    #[serde(default = "default_max_candidates")]
    pub max_candidates_per_entry: usize,

    /// Lowercase labels and candidates before scoring.
    #[serde(default = "default_true")]
    pub case_fold: bool,

    /// Turn punctuation into spaces before scoring.
    #[serde(default = "default_true")]
    pub strip_punctuation: bool,

    /// Collapse whitespace runs before scoring.
    #[serde(default = "default_true")]
    pub collapse_whitespace: bool,

    /// Drop region tags like `(USA)` before scoring.
    #[serde(default)]
    pub strip_region_tags: bool,
}

fn default_threshold() -> f64 {
    0.5
}

fn default_max_candidates() -> usize {
    1
}

fn default_true() -> bool {
    true
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            max_candidates_per_entry: default_max_candidates(),
            case_fold: true,
            strip_punctuation: true,
            collapse_whitespace: true,
            strip_region_tags: false,
        }
    }
}

impl MatchingSettings {
    /// Convert this section into engine options.
    pub fn to_options(&self) -> MatchOptions {
        let mut normalize = Vec::new();
        if self.case_fold {
            normalize.push(NormalizeRule::CaseFold);
        }
        if self.strip_punctuation {
            normalize.push(NormalizeRule::StripPunctuation);
        }
        if self.collapse_whitespace {
            normalize.push(NormalizeRule::CollapseWhitespace);
        }
        if self.strip_region_tags {
            normalize.push(NormalizeRule::StripRegionTags);
        }
        MatchOptions {
            threshold: self.threshold,
            normalize,
            max_candidates_per_entry: self.max_candidates_per_entry,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default log level when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.paths.export_folder, "thumbnails");
        assert_eq!(settings.matching.threshold, 0.5);
        assert_eq!(settings.matching.max_candidates_per_entry, 1);
        assert!(settings.matching.case_fold);
        assert!(!settings.matching.strip_region_tags);
        assert_eq!(settings.logging.level, LogLevel::Info);
    }

    #[test]
    fn empty_toml_parses_to_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let settings: Settings =
            toml::from_str("[matching]\nthreshold = 0.8\nstrip_region_tags = true\n").unwrap();
        assert_eq!(settings.matching.threshold, 0.8);
        assert!(settings.matching.strip_region_tags);
        assert!(settings.matching.case_fold);
        assert_eq!(settings.paths.export_folder, "thumbnails");
    }

    #[test]
    fn to_options_maps_enabled_rules() {
        let options = MatchingSettings::default().to_options();
        assert_eq!(options.threshold, 0.5);
        assert_eq!(options.normalize, NormalizeRule::default_rules());

        let mut section = MatchingSettings::default();
        section.strip_region_tags = true;
        section.case_fold = false;
        let options = section.to_options();
        assert!(options.normalize.contains(&NormalizeRule::StripRegionTags));
        assert!(!options.normalize.contains(&NormalizeRule::CaseFold));
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let mut settings = Settings::default();
        settings.paths.last_playlist_path = "/lists/nes.lpl".to_string();
        settings.logging.level = LogLevel::Debug;

        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("level = \"debug\""));

        let back: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(back, settings);
    }
}
