//! Per-column configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The declared type of a column, which selects how its values are displayed.
///
/// Type names are matched case-insensitively. A name outside the known set
/// is kept as [`ColumnType::Unknown`] and displayed as raw text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    /// Free text, elided at the end when it overflows.
    #[default]
    String,
    /// Numeric values.
    Number,
    /// Dates, rendered through a [`DateFormatter`](crate::date::DateFormatter).
    Date,
    /// Link text. Navigation is left to the host.
    Link,
    /// Any other type name.
    Unknown(String),
}

impl ColumnType {
    /// The canonical type name.
    pub fn as_str(&self) -> &str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Link => "link",
            ColumnType::Unknown(name) => name,
        }
    }

    /// Returns `true` for the four built-in types.
    pub fn is_known(&self) -> bool {
        !matches!(self, ColumnType::Unknown(_))
    }
}

impl From<&str> for ColumnType {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "string" => ColumnType::String,
            "number" => ColumnType::Number,
            "date" => ColumnType::Date,
            "link" => ColumnType::Link,
            _ => ColumnType::Unknown(name.to_string()),
        }
    }
}

impl From<String> for ColumnType {
    fn from(name: String) -> Self {
        ColumnType::from(name.as_str())
    }
}

impl From<ColumnType> for String {
    fn from(column_type: ColumnType) -> Self {
        column_type.as_str().to_string()
    }
}

impl FromStr for ColumnType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ColumnType::from(s))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Describes one column: its type and, for dates, how to format them.
///
/// Supplied once by the host and never changed while the grid is alive.
///
/// # Example
///
/// ```
/// use horizon_grid::{ColumnConfig, ColumnType};
///
/// let column = ColumnConfig::date()
///     .with_format("YYYY-MM-DD")
///     .with_locale("en-US");
/// assert_eq!(column.column_type, ColumnType::Date);
/// assert_eq!(column.format.as_deref(), Some("YYYY-MM-DD"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// The declared column type.
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    /// Date format pattern (`date` columns only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Locale identifier such as `en-US` (`date` columns only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl ColumnConfig {
    /// Creates a column of the given type.
    pub fn new(column_type: impl Into<ColumnType>) -> Self {
        Self {
            column_type: column_type.into(),
            format: None,
            locale: None,
        }
    }

    /// A `string` column.
    pub fn string() -> Self {
        Self::new(ColumnType::String)
    }

    /// A `number` column.
    pub fn number() -> Self {
        Self::new(ColumnType::Number)
    }

    /// A `date` column.
    pub fn date() -> Self {
        Self::new(ColumnType::Date)
    }

    /// A `link` column.
    pub fn link() -> Self {
        Self::new(ColumnType::Link)
    }

    /// Sets the date format pattern.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_parsing() {
        assert_eq!(ColumnType::from("string"), ColumnType::String);
        assert_eq!(ColumnType::from("Number"), ColumnType::Number);
        assert_eq!(ColumnType::from(" DATE "), ColumnType::Date);
        assert_eq!(ColumnType::from("link"), ColumnType::Link);
        assert_eq!(
            ColumnType::from("currency"),
            ColumnType::Unknown("currency".into())
        );
        assert!(!ColumnType::from("currency").is_known());
    }

    #[test]
    fn test_column_type_display() {
        assert_eq!(ColumnType::Number.to_string(), "number");
        assert_eq!(ColumnType::Unknown("rating".into()).to_string(), "rating");
    }

    #[test]
    fn test_column_config_deserialize() {
        let column: ColumnConfig =
            serde_json::from_str(r#"{"type": "date", "format": "DD.MM.YYYY", "locale": "de-DE"}"#)
                .unwrap();
        assert_eq!(column, ColumnConfig::date().with_format("DD.MM.YYYY").with_locale("de-DE"));

        let column: ColumnConfig = serde_json::from_str(r#"{"type": "percent"}"#).unwrap();
        assert_eq!(column.column_type, ColumnType::Unknown("percent".into()));
        assert!(column.format.is_none());
    }

    #[test]
    fn test_column_config_serialize_skips_empty_fields() {
        let json = serde_json::to_string(&ColumnConfig::number()).unwrap();
        assert_eq!(json, r#"{"type":"number"}"#);
    }
}
