//! Engine settings: presentation defaults and validation thresholds.

use serde::{Deserialize, Serialize};

use crate::entry::{Anchor, SubtitlePosition, SubtitleStyle};

/// Silence between adjacent entries above which a gap warning is raised.
pub const DEFAULT_MAX_GAP_SECS: f64 = 2.0;

/// How overlapping entries are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapCheck {
    /// Compare each entry with its immediate successor only. An entry that
    /// spans several later entries is reported once, against its neighbor.
    #[default]
    Adjacent,
    /// Compare each entry with every later entry it overlaps.
    AllPairs,
}

/// Authoring thresholds. `None` disables the corresponding check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationThresholds {
    pub min_duration_seconds: Option<f64>,
    pub max_duration_seconds: Option<f64>,
    pub max_chars_per_line: Option<usize>,
    pub max_lines: Option<usize>,
    pub max_gap_seconds: Option<f64>,
    pub overlap_check: OverlapCheck,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            min_duration_seconds: Some(0.5),
            max_duration_seconds: Some(7.0),
            max_chars_per_line: Some(40),
            max_lines: Some(2),
            max_gap_seconds: Some(DEFAULT_MAX_GAP_SECS),
            overlap_check: OverlapCheck::Adjacent,
        }
    }
}

impl ValidationThresholds {
    /// Every optional check disabled; structural errors are still reported.
    pub fn disabled() -> Self {
        Self {
            min_duration_seconds: None,
            max_duration_seconds: None,
            max_chars_per_line: None,
            max_lines: None,
            max_gap_seconds: None,
            overlap_check: OverlapCheck::Adjacent,
        }
    }
}

/// Per-instance engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub default_style: SubtitleStyle,
    pub default_position: SubtitlePosition,

    /// Run the validator after every entry add/update.
    pub auto_validate: bool,

    pub validation: ValidationThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_style: SubtitleStyle {
                font_name: Some("Arial".to_string()),
                font_size: Some(24),
                primary_color: Some("#FFFFFF".to_string()),
                outline_color: Some("#000000".to_string()),
                outline_width: Some(2.0),
                ..Default::default()
            },
            default_position: SubtitlePosition {
                anchor: Anchor::BottomCenter,
                margin_v: Some(20),
                ..Default::default()
            },
            auto_validate: true,
            validation: ValidationThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Large bold yellow captions for course material.
    pub fn course() -> Self {
        Self {
            default_style: SubtitleStyle {
                font_name: Some("Arial".to_string()),
                font_size: Some(28),
                bold: Some(true),
                primary_color: Some("#FFFF00".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Larger text, heavier outline, and a reading-speed friendly minimum.
    pub fn accessible() -> Self {
        Self {
            default_style: SubtitleStyle {
                font_name: Some("Arial".to_string()),
                font_size: Some(32),
                outline_width: Some(4.0),
                ..Default::default()
            },
            validation: ValidationThresholds {
                min_duration_seconds: Some(1.5),
                max_chars_per_line: Some(35),
                max_gap_seconds: Some(DEFAULT_MAX_GAP_SECS),
                ..ValidationThresholds::disabled()
            },
            ..Default::default()
        }
    }
}

/// Shallow partial update: every present field replaces the current one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfigPatch {
    pub default_style: Option<SubtitleStyle>,
    pub default_position: Option<SubtitlePosition>,
    pub auto_validate: Option<bool>,
    pub validation: Option<ValidationThresholds>,
}

impl EngineConfigPatch {
    pub fn apply(self, config: &mut EngineConfig) {
        if let Some(style) = self.default_style {
            config.default_style = style;
        }
        if let Some(position) = self.default_position {
            config.default_position = position;
        }
        if let Some(auto_validate) = self.auto_validate {
            config.auto_validate = auto_validate;
        }
        if let Some(validation) = self.validation {
            config.validation = validation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_style.font_name.as_deref(), Some("Arial"));
        assert_eq!(config.default_style.font_size, Some(24));
        assert_eq!(config.default_position.anchor, Anchor::BottomCenter);
        assert!(config.auto_validate);
        assert_eq!(config.validation.min_duration_seconds, Some(0.5));
        assert_eq!(config.validation.max_duration_seconds, Some(7.0));
        assert_eq!(config.validation.max_chars_per_line, Some(40));
        assert_eq!(config.validation.max_lines, Some(2));
    }

    #[test]
    fn test_sparse_json_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"auto_validate": false, "validation": {"max_lines": 3}}"#)
                .unwrap();
        assert!(!config.auto_validate);
        assert_eq!(config.validation.max_lines, Some(3));
        assert_eq!(config.validation.max_chars_per_line, Some(40));
        assert_eq!(config.default_style.font_size, Some(24));
    }

    #[test]
    fn test_patch_replaces_whole_fields() {
        let mut config = EngineConfig::default();
        EngineConfigPatch {
            default_style: Some(SubtitleStyle {
                font_name: Some("Helvetica".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
        .apply(&mut config);

        assert_eq!(config.default_style.font_name.as_deref(), Some("Helvetica"));
        assert_eq!(config.default_style.font_size, None);
        assert!(config.auto_validate);
    }

    #[test]
    fn test_presets() {
        let course = EngineConfig::course();
        assert_eq!(course.default_style.font_size, Some(28));
        assert!(course.default_style.is_bold());

        let accessible = EngineConfig::accessible();
        assert_eq!(accessible.validation.min_duration_seconds, Some(1.5));
        assert_eq!(accessible.validation.max_chars_per_line, Some(35));
        assert_eq!(accessible.validation.max_duration_seconds, None);
        assert_eq!(accessible.validation.max_gap_seconds, Some(DEFAULT_MAX_GAP_SECS));
    }

    #[test]
    fn test_overlap_check_serde_names() {
        let json = serde_json::to_string(&OverlapCheck::AllPairs).unwrap();
        assert_eq!(json, "\"all_pairs\"");
    }
}
