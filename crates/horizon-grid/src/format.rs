//! Type-driven value formatting.
//!
//! [`format_value`] is a pure function from a raw value and its column
//! configuration to the [`CellContent`] a host should draw.
//!
//! | column type | content |
//! |---|---|
//! | `string` | single line, elided at the end |
//! | `number` | decimal text, single line, elided at the end |
//! | `date` | [`DateFormatter`] output, single line, elided at the end |
//! | `link` | raw text, single line, clipped |
//! | unknown | raw text, single line, clipped |
//!
//! A `Null` value is [`CellContent::Empty`] for every column type.

use std::borrow::Cow;

use horizon_grid_core::logging::targets;
use unicode_segmentation::UnicodeSegmentation;

use crate::column::{ColumnConfig, ColumnType};
use crate::date::DateFormatter;
use crate::style::TextRole;
use crate::value::CellValue;

/// The ellipsis appended to elided text.
pub const ELLIPSIS: &str = "…";

/// How text that does not fit is shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElideMode {
    /// Cut at the boundary without a marker.
    #[default]
    None,
    /// Keep the start and append an ellipsis: "longfilena…"
    Right,
}

/// A run of text to draw in a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    /// Full, unshortened text.
    pub text: String,
    /// Which text style applies.
    pub role: TextRole,
    /// Maximum number of visual lines.
    pub max_lines: usize,
    /// Shortening applied when the text overflows.
    pub elide: ElideMode,
}

impl TextContent {
    fn single_line(text: String, role: TextRole, elide: ElideMode) -> Self {
        Self {
            text,
            role,
            max_lines: 1,
            elide,
        }
    }

    /// Fit the text into `max_width` columns, measuring one column per
    /// grapheme cluster.
    pub fn fit(&self, max_width: usize) -> Cow<'_, str> {
        self.fit_with(max_width as f32, |s| s.graphemes(true).count() as f32)
    }

    /// Fit the text into `max_width` using a caller-supplied measure.
    ///
    /// Only the first line is kept. When the text overflows, or further
    /// lines were dropped, the result is shortened per [`ElideMode`].
    pub fn fit_with<M>(&self, max_width: f32, measure: M) -> Cow<'_, str>
    where
        M: Fn(&str) -> f32,
    {
        let first_line = self.text.lines().next().unwrap_or("");
        let truncated_lines = first_line.len() < self.text.trim_end_matches(['\r', '\n']).len();

        if !truncated_lines && measure(first_line) <= max_width {
            return Cow::Borrowed(first_line);
        }

        match self.elide {
            ElideMode::None => {
                Cow::Owned(longest_prefix(first_line, max_width, &measure).to_string())
            }
            ElideMode::Right => {
                let available = max_width - measure(ELLIPSIS);
                if available <= 0.0 {
                    return Cow::Borrowed(ELLIPSIS);
                }
                let prefix = longest_prefix(first_line, available, &measure);
                Cow::Owned(format!("{}{}", prefix.trim_end(), ELLIPSIS))
            }
        }
    }
}

/// Longest grapheme-aligned prefix of `text` whose width fits `max_width`.
fn longest_prefix<'a, M>(text: &'a str, max_width: f32, measure: &M) -> &'a str
where
    M: Fn(&str) -> f32,
{
    let boundaries: Vec<usize> = text
        .grapheme_indices(true)
        .map(|(i, g)| i + g.len())
        .collect();

    // Binary search for the last boundary that fits
    let mut low = 0;
    let mut high = boundaries.len();
    while low < high {
        let mid = (low + high + 1) / 2;
        if measure(&text[..boundaries[mid - 1]]) <= max_width {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    if low == 0 {
        ""
    } else {
        &text[..boundaries[low - 1]]
    }
}

/// What a cell draws.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellContent {
    /// An empty placeholder.
    #[default]
    Empty,
    /// A run of text.
    Text(TextContent),
}

impl CellContent {
    /// Returns `true` for the empty placeholder.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    /// The full text, or `None` for the placeholder.
    pub fn text(&self) -> Option<&str> {
        match self {
            CellContent::Empty => None,
            CellContent::Text(content) => Some(&content.text),
        }
    }

    /// The full text, or `""` for the placeholder.
    pub fn display_text(&self) -> &str {
        self.text().unwrap_or("")
    }

    /// The text role, or `None` for the placeholder.
    pub fn role(&self) -> Option<TextRole> {
        match self {
            CellContent::Empty => None,
            CellContent::Text(content) => Some(content.role),
        }
    }
}

/// Format `value` for a cell of `column`.
///
/// # Example
///
/// ```
/// use horizon_grid::{format_value, CellValue, ChronoDateFormatter, ColumnConfig};
///
/// let dates = ChronoDateFormatter::new();
/// let content = format_value(&CellValue::from(42), &ColumnConfig::number(), &dates);
/// assert_eq!(content.display_text(), "42");
///
/// let content = format_value(&CellValue::Null, &ColumnConfig::number(), &dates);
/// assert!(content.is_empty());
/// ```
pub fn format_value(
    value: &CellValue,
    column: &ColumnConfig,
    dates: &dyn DateFormatter,
) -> CellContent {
    if value.is_null() {
        return CellContent::Empty;
    }

    let content = match &column.column_type {
        ColumnType::String => {
            TextContent::single_line(value.display_text(), TextRole::String, ElideMode::Right)
        }
        ColumnType::Number => {
            TextContent::single_line(value.display_text(), TextRole::Number, ElideMode::Right)
        }
        ColumnType::Date => TextContent::single_line(
            dates.format_date(value, column.format.as_deref(), column.locale.as_deref()),
            TextRole::Date,
            ElideMode::Right,
        ),
        ColumnType::Link => {
            TextContent::single_line(value.display_text(), TextRole::Link, ElideMode::None)
        }
        ColumnType::Unknown(name) => {
            tracing::trace!(
                target: targets::FORMAT,
                column_type = %name,
                "unknown column type, showing raw text"
            );
            TextContent::single_line(value.display_text(), TextRole::Raw, ElideMode::None)
        }
    };
    CellContent::Text(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::ChronoDateFormatter;
    use chrono::NaiveDate;

    fn render(value: impl Into<CellValue>, column: &ColumnConfig) -> CellContent {
        format_value(&value.into(), column, &ChronoDateFormatter::new())
    }

    #[test]
    fn test_dispatch_by_type() {
        let content = render("Alice", &ColumnConfig::string());
        assert_eq!(content.display_text(), "Alice");
        assert_eq!(content.role(), Some(TextRole::String));

        assert_eq!(render(42, &ColumnConfig::number()).display_text(), "42");
        assert_eq!(render(0.5, &ColumnConfig::number()).display_text(), "0.5");

        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let content = render(date, &ColumnConfig::date().with_format("DD/MM/YYYY"));
        assert_eq!(content.display_text(), "15/01/2024");
        assert_eq!(content.role(), Some(TextRole::Date));

        let content = render("https://example.com", &ColumnConfig::link());
        assert_eq!(content.display_text(), "https://example.com");
        assert_eq!(content.role(), Some(TextRole::Link));
    }

    #[test]
    fn test_null_is_empty_for_every_type() {
        for column in [
            ColumnConfig::string(),
            ColumnConfig::number(),
            ColumnConfig::date().with_format("YYYY"),
            ColumnConfig::link(),
            ColumnConfig::new("mystery"),
        ] {
            let content = render(CellValue::Null, &column);
            assert!(content.is_empty(), "{column:?}");
            assert_eq!(content.display_text(), "");
        }
    }

    #[test]
    fn test_unknown_type_shows_raw_text() {
        let content = render(7, &ColumnConfig::new("rating"));
        assert_eq!(content.display_text(), "7");
        assert_eq!(content.role(), Some(TextRole::Raw));
    }

    #[test]
    fn test_every_content_is_single_line() {
        let content = render("a\nb", &ColumnConfig::string());
        match content {
            CellContent::Text(text) => assert_eq!(text.max_lines, 1),
            CellContent::Empty => panic!("expected text"),
        }
    }

    #[test]
    fn test_fit_elides_string() {
        let content =
            TextContent::single_line("Hello, world".into(), TextRole::String, ElideMode::Right);
        assert_eq!(content.fit(20), "Hello, world");
        assert_eq!(content.fit(6), "Hello…");
        assert_eq!(content.fit(7), "Hello,…");
        assert_eq!(content.fit(1), "…");
        assert_eq!(content.fit(0), "…");
    }

    #[test]
    fn test_fit_clips_link() {
        let content =
            TextContent::single_line("example.com".into(), TextRole::Link, ElideMode::None);
        assert_eq!(content.fit(7), "example");
    }

    #[test]
    fn test_fit_drops_extra_lines() {
        let content =
            TextContent::single_line("first\nsecond".into(), TextRole::String, ElideMode::Right);
        assert_eq!(content.fit(40), "first…");

        let content = TextContent::single_line("only\n".into(), TextRole::String, ElideMode::Right);
        assert_eq!(content.fit(40), "only");
    }

    #[test]
    fn test_fit_respects_graphemes() {
        let content = TextContent::single_line(
            "e\u{301}e\u{301}e\u{301}".into(),
            TextRole::String,
            ElideMode::None,
        );
        assert_eq!(content.fit(2), "e\u{301}e\u{301}");
    }
}
