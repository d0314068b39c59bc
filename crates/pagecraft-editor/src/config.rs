#![forbid(unsafe_code)]

//! Editor configuration.
//!
//! Every tunable of the interactive layer lives in one [`EditorConfig`] that
//! can be loaded from TOML or JSON:
//!
//! ```toml
//! min_fraction_ratio = 0.05
//! handle_width_px = 8.0
//!
//! [hover_outline]
//! stroke = "dashed"
//! color = "#3b82f6"
//! width_px = 1.0
//! ```
//!
//! Missing keys take their defaults, so `EditorConfig::default()` and an
//! empty file behave the same.

use std::fmt;
use std::path::Path;

use pagecraft_core::pointer::PointerButton;
use serde::{Deserialize, Serialize};

/// Default share of a resized pair that each column keeps at minimum.
pub const DEFAULT_MIN_FRACTION_RATIO: f64 = 0.05;

/// Default hit-region width of a column resize handle, in pixels.
pub const DEFAULT_HANDLE_WIDTH_PX: f64 = 8.0;

/// Outline stroke pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeStyle {
    Dashed,
    Solid,
}

/// How one outline kind is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineStyle {
    pub stroke: StrokeStyle,
    pub color: String,
    pub width_px: f64,
}

impl OutlineStyle {
    #[must_use]
    pub fn hover() -> Self {
        Self {
            stroke: StrokeStyle::Dashed,
            color: "#3b82f6".to_string(),
            width_px: 1.0,
        }
    }

    #[must_use]
    pub fn selection() -> Self {
        Self {
            stroke: StrokeStyle::Solid,
            color: "#2563eb".to_string(),
            width_px: 2.0,
        }
    }
}

/// Tunables for overlays and the column resize controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Floor for each column of a resized pair, as a share of the pair's
    /// combined fraction.
    pub min_fraction_ratio: f64,
    /// Width of a resize handle's hit region.
    pub handle_width_px: f64,
    /// Button that starts a resize drag.
    pub activation_button: PointerButton,
    pub hover_outline: OutlineStyle,
    pub selection_outline: OutlineStyle,
    /// Show a selected row's handles while nothing is hovered.
    pub show_handles_on_selection: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_fraction_ratio: DEFAULT_MIN_FRACTION_RATIO,
            handle_width_px: DEFAULT_HANDLE_WIDTH_PX,
            activation_button: PointerButton::Primary,
            hover_outline: OutlineStyle::hover(),
            selection_outline: OutlineStyle::selection(),
            show_handles_on_selection: true,
        }
    }
}

impl EditorConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate parameter ranges. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(self.min_fraction_ratio > 0.0 && self.min_fraction_ratio < 0.5) {
            errors.push(format!(
                "min_fraction_ratio must be in (0, 0.5), got {}",
                self.min_fraction_ratio
            ));
        }
        if !(self.handle_width_px.is_finite() && self.handle_width_px > 0.0) {
            errors.push(format!(
                "handle_width_px must be positive, got {}",
                self.handle_width_px
            ));
        }
        for (name, style) in [
            ("hover_outline", &self.hover_outline),
            ("selection_outline", &self.selection_outline),
        ] {
            if !(style.width_px.is_finite() && style.width_px >= 0.0) {
                errors.push(format!(
                    "{name}.width_px must be non-negative, got {}",
                    style.width_px
                ));
            }
        }
        errors
    }

    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors that can occur when loading an editor configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_is_default() {
        let config = EditorConfig::from_toml_str("").expect("empty config loads");
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let config = EditorConfig::from_toml_str(
            r##"
            min_fraction_ratio = 0.1

            [selection_outline]
            stroke = "dashed"
            color = "#000"
            width_px = 3.0
            "##,
        )
        .expect("config loads");
        assert_eq!(config.min_fraction_ratio, 0.1);
        assert_eq!(config.handle_width_px, DEFAULT_HANDLE_WIDTH_PX);
        assert_eq!(config.selection_outline.stroke, StrokeStyle::Dashed);
        assert_eq!(config.hover_outline, OutlineStyle::hover());
    }

    #[test]
    fn json_loads_and_validates() {
        let json = r#"{ "handle_width_px": 12.0, "activation_button": "secondary" }"#;
        let config = EditorConfig::from_json_str(json).expect("config loads");
        assert_eq!(config.handle_width_px, 12.0);
        assert_eq!(config.activation_button, PointerButton::Secondary);

        let err = EditorConfig::from_json_str(r#"{ "min_fraction_ratio": 0.7 }"#)
            .expect_err("ratio out of range");
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("min_fraction_ratio"));
    }

    #[test]
    fn malformed_input_reports_parser() {
        assert!(matches!(
            EditorConfig::from_toml_str("handle_width_px = ["),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            EditorConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "handle_width_px = 6.0").expect("write config");
        let config = EditorConfig::from_toml_file(file.path()).expect("file loads");
        assert_eq!(config.handle_width_px, 6.0);

        assert!(matches!(
            EditorConfig::from_json_file(file.path().with_extension("missing")),
            Err(ConfigError::Io(_))
        ));
    }
}
