//! Grid configuration files.
//!
//! A [`GridConfig`] describes the columns of a grid and its style in TOML or
//! JSON. Colors are hex strings and are validated when the configuration is
//! loaded, so a successfully loaded configuration always converts into a
//! [`TableStyle`].
//!
//! ```toml
//! [[columns]]
//! type = "string"
//!
//! [[columns]]
//! type = "date"
//! format = "DD MMM YYYY"
//! locale = "en-GB"
//!
//! [style]
//! highlight_color = "#FFEE00"
//! long_press_delay_ms = 250
//!
//! [style.text.number]
//! bold = true
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use horizon_grid_core::logging::targets;
use horizon_grid_core::{GridError, Result};

use crate::column::ColumnConfig;
use crate::style::{CellBox, Color, TableStyle, TextRole, TextStyle, DEFAULT_LONG_PRESS_DELAY_MS};

/// Serialized text attributes for one text role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyleConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    pub bold: bool,
}

impl TextStyleConfig {
    fn to_text_style(&self, field: &str) -> Result<TextStyle> {
        let color = self.color.as_deref().map(str::parse::<Color>).transpose()?;
        if let Some(size) = self.font_size {
            if size.is_nan() || size <= 0.0 {
                return Err(GridError::invalid_value(
                    format!("{field}.font_size"),
                    format!("must be positive, got {size}"),
                ));
            }
        }
        Ok(TextStyle {
            color,
            font_size: self.font_size,
            bold: self.bold,
        })
    }
}

/// Serialized text styles, one per text role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStylesConfig {
    pub string: TextStyleConfig,
    pub number: TextStyleConfig,
    pub date: TextStyleConfig,
    pub link: TextStyleConfig,
    pub raw: TextStyleConfig,
}

/// Serialized table style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableStyleConfig {
    /// Highlight applied to every pressed cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_color: Option<String>,
    pub long_press_delay_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
    pub text: TextStylesConfig,
}

impl Default for TableStyleConfig {
    fn default() -> Self {
        Self {
            highlight_color: None,
            long_press_delay_ms: DEFAULT_LONG_PRESS_DELAY_MS,
            border_color: None,
            min_height: None,
            padding: None,
            text: TextStylesConfig::default(),
        }
    }
}

impl TableStyleConfig {
    /// Convert into a [`TableStyle`], validating every field.
    pub fn to_table_style(&self) -> Result<TableStyle> {
        if self.long_press_delay_ms == 0 {
            return Err(GridError::invalid_value(
                "style.long_press_delay_ms",
                "must be greater than zero",
            ));
        }

        let defaults = CellBox::default();
        let cell_box = CellBox {
            min_height: non_negative("style.min_height", self.min_height, defaults.min_height)?,
            padding: non_negative("style.padding", self.padding, defaults.padding)?,
            border_color: match &self.border_color {
                Some(hex) => hex.parse()?,
                None => defaults.border_color,
            },
        };

        let mut style = TableStyle {
            highlight_color: self
                .highlight_color
                .as_deref()
                .map(str::parse::<Color>)
                .transpose()?,
            long_press_delay: Duration::from_millis(self.long_press_delay_ms),
            cell_box,
            ..TableStyle::default()
        };

        let text = &self.text;
        for (role, config, field) in [
            (TextRole::String, &text.string, "style.text.string"),
            (TextRole::Number, &text.number, "style.text.number"),
            (TextRole::Date, &text.date, "style.text.date"),
            (TextRole::Link, &text.link, "style.text.link"),
            (TextRole::Raw, &text.raw, "style.text.raw"),
        ] {
            style = style.with_text_style(role, config.to_text_style(field)?);
        }
        Ok(style)
    }
}

fn non_negative(field: &str, value: Option<f32>, default: f32) -> Result<f32> {
    match value {
        None => Ok(default),
        Some(v) if v >= 0.0 => Ok(v),
        Some(v) => Err(GridError::invalid_value(
            field,
            format!("must not be negative, got {v}"),
        )),
    }
}

/// Columns and style of one grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    pub columns: Vec<ColumnConfig>,
    pub style: TableStyleConfig,
}

impl GridConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| GridError::parse("TOML", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| GridError::parse("JSON", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// The format is chosen by extension: `.toml` or `.json`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let content = std::fs::read_to_string(path).map_err(|e| GridError::io(path, e))?;
        let config = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            other => {
                return Err(GridError::invalid_value(
                    "path",
                    format!(
                        "unsupported configuration extension {:?} for '{}'",
                        other.unwrap_or(""),
                        path.display()
                    ),
                ));
            }
        };
        tracing::debug!(
            target: targets::CONFIG,
            path = %path.display(),
            columns = config.columns.len(),
            "loaded grid configuration"
        );
        Ok(config)
    }

    /// Check every field without converting.
    pub fn validate(&self) -> Result<()> {
        self.style.to_table_style().map(|_| ())
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GridError::parse("TOML", e.to_string()))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GridError::parse("JSON", e.to_string()))
    }

    /// Split into the column list and the resolved table style.
    pub fn into_parts(self) -> Result<(Vec<ColumnConfig>, TableStyle)> {
        let style = self.style.to_table_style()?;
        Ok((self.columns, style))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnType;
    use std::io::Write;

    const SAMPLE: &str = r##"
[[columns]]
type = "string"

[[columns]]
type = "Number"

[[columns]]
type = "date"
format = "DD MMM YYYY"
locale = "en-GB"

[[columns]]
type = "rating"

[style]
highlight_color = "#FFEE00"
long_press_delay_ms = 250
border_color = "#333"

[style.text.number]
bold = true
font_size = 14.0
"##;

    #[test]
    fn test_parse_toml() {
        let config = GridConfig::from_toml_str(SAMPLE).unwrap();
        let (columns, style) = config.into_parts().unwrap();

        assert_eq!(columns.len(), 4);
        assert_eq!(columns[1].column_type, ColumnType::Number);
        assert_eq!(columns[2].locale.as_deref(), Some("en-GB"));
        assert_eq!(columns[3].column_type, ColumnType::Unknown("rating".into()));

        assert_eq!(style.highlight_color, Some(Color::from_rgb8(0xFF, 0xEE, 0x00)));
        assert_eq!(style.long_press_delay, Duration::from_millis(250));
        assert_eq!(style.cell_box.border_color, Color::from_rgb8(0x33, 0x33, 0x33));
        assert!(style.text_style(TextRole::Number).bold);
        assert_eq!(style.text_style(TextRole::Number).font_size, Some(14.0));
        assert!(!style.text_style(TextRole::String).bold);
    }

    #[test]
    fn test_parse_json() {
        let json = r##"{
            "columns": [{ "type": "link" }],
            "style": { "highlight_color": "#00ff0080" }
        }"##;
        let (columns, style) = GridConfig::from_json_str(json).unwrap().into_parts().unwrap();
        assert_eq!(columns, vec![ColumnConfig::link()]);
        assert_eq!(style.highlight_color, Some(Color::from_rgba8(0, 255, 0, 128)));
        assert_eq!(style.long_press_delay, Duration::from_millis(DEFAULT_LONG_PRESS_DELAY_MS));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let (columns, style) = GridConfig::from_toml_str("").unwrap().into_parts().unwrap();
        assert!(columns.is_empty());
        assert_eq!(style, TableStyle::default());
    }

    #[test]
    fn test_invalid_color_rejected() {
        let err = GridConfig::from_toml_str("[style]\nhighlight_color = \"yellow\"").unwrap_err();
        assert!(matches!(err, GridError::InvalidColor { ref value } if value == "yellow"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = GridConfig::from_toml_str("[style]\nlong_press_delay_ms = 0").unwrap_err();
        assert!(matches!(
            err,
            GridError::InvalidValue { ref field, .. } if field == "style.long_press_delay_ms"
        ));

        let err = GridConfig::from_toml_str("[style.text.date]\nfont_size = -1.0").unwrap_err();
        assert!(matches!(
            err,
            GridError::InvalidValue { ref field, .. } if field == "style.text.date.font_size"
        ));

        let err = GridConfig::from_toml_str("[style]\npadding = -2.0").unwrap_err();
        assert!(matches!(err, GridError::InvalidValue { .. }));
    }

    #[test]
    fn test_syntax_errors() {
        let err = GridConfig::from_toml_str("[[columns]\n").unwrap_err();
        assert!(matches!(err, GridError::Parse { format: "TOML", .. }));

        let err = GridConfig::from_json_str("{ \"columns\": ").unwrap_err();
        assert!(matches!(err, GridError::Parse { format: "JSON", .. }));

        let err = GridConfig::from_toml_str("[style]\nunknown_key = 1").unwrap_err();
        assert!(matches!(err, GridError::Parse { .. }));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("grid.toml");
        std::fs::File::create(&toml_path)
            .unwrap()
            .write_all(SAMPLE.as_bytes())
            .unwrap();
        let from_toml = GridConfig::from_path(&toml_path).unwrap();
        assert_eq!(from_toml.columns.len(), 4);

        let json_path = dir.path().join("grid.JSON");
        std::fs::write(&json_path, from_toml.to_json_string().unwrap()).unwrap();
        assert_eq!(GridConfig::from_path(&json_path).unwrap(), from_toml);

        let err = GridConfig::from_path(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, GridError::Io { .. }));

        let yaml_path = dir.path().join("grid.yaml");
        std::fs::write(&yaml_path, "columns: []").unwrap();
        let err = GridConfig::from_path(&yaml_path).unwrap_err();
        assert!(matches!(err, GridError::InvalidValue { ref field, .. } if field == "path"));
    }

    #[test]
    fn test_toml_output_reloads() {
        let config = GridConfig::from_toml_str(SAMPLE).unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(GridConfig::from_toml_str(&text).unwrap(), config);
    }
}
