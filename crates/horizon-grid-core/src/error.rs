//! Error types for Horizon Grid.
//!
//! Rendering and broadcasting never fail; degenerate input falls back to an
//! empty or unstyled cell. Errors only arise while loading grid
//! configuration from text or files.

use std::path::PathBuf;

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors that can occur while configuring a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The configuration text could not be parsed.
    #[error("Failed to parse {format} grid configuration: {message}")]
    Parse {
        /// The configuration format ("TOML" or "JSON").
        format: &'static str,
        message: String,
    },

    /// The configuration file could not be read.
    #[error("Failed to read grid configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A color string was not a valid hex color.
    #[error("Invalid color '{value}': expected #RGB, #RRGGBB or #RRGGBBAA")]
    InvalidColor { value: String },

    /// A configuration value is out of range or inconsistent.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl GridError {
    /// Create a parse error.
    pub fn parse(format: &'static str, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a color error.
    pub fn invalid_color(value: impl Into<String>) -> Self {
        Self::InvalidColor {
            value: value.into(),
        }
    }

    /// Create a value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridError::invalid_color("#12");
        assert_eq!(
            err.to_string(),
            "Invalid color '#12': expected #RGB, #RRGGBB or #RRGGBBAA"
        );

        let err = GridError::parse("TOML", "expected `=`");
        assert!(err.to_string().contains("TOML"));
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error;

        let err = GridError::io(
            "/missing/grid.toml",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/missing/grid.toml"));
    }
}
