//! Presentation values derived from cell state.
//!
//! Nothing here draws. These types describe what a host renderer should
//! paint for a cell: its highlight background, its border, and the text
//! style for each kind of content.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use horizon_grid_core::GridError;

/// Default delay before a press counts as a long-press.
pub const DEFAULT_LONG_PRESS_DELAY_MS: u64 = 100;

/// An RGBA color with straight (non-premultiplied) 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a color from RGBA channels.
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from RGB channels.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

        match hex.len() {
            3 => {
                let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
                Some(Self::from_rgb8(short(0)?, short(1)?, short(2)?))
            }
            6 => Some(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Some(Self::from_rgba8(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    pub const BLACK: Self = Self::from_rgb8(0, 0, 0);
    pub const WHITE: Self = Self::from_rgb8(255, 255, 255);
    /// Default background of a pressed row (`#DCDCDC`).
    pub const GAINSBORO: Self = Self::from_rgb8(0xDC, 0xDC, 0xDC);
}

impl FromStr for Color {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| GridError::invalid_color(s))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// The kind of text a cell shows, used to pick a [`TextStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRole {
    /// Content of a `string` column.
    String,
    /// Content of a `number` column.
    Number,
    /// Content of a `date` column.
    Date,
    /// Content of a `link` column.
    Link,
    /// Raw text of a column with an unrecognized type.
    Raw,
}

/// Optional text attributes. Unset fields inherit the host's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    pub color: Option<Color>,
    pub font_size: Option<f32>,
    pub bold: bool,
}

/// Position of a line within the matrix, used for border treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowPosition {
    /// The matrix has a single line.
    Only,
    First,
    Interior,
    Last,
}

impl RowPosition {
    /// Classify `parent_index` within a matrix of `len` lines.
    pub fn of(parent_index: usize, len: usize) -> Self {
        match (parent_index, len) {
            (_, 0 | 1) => RowPosition::Only,
            (0, _) => RowPosition::First,
            (i, n) if i + 1 >= n => RowPosition::Last,
            _ => RowPosition::Interior,
        }
    }

    /// First, last and only lines are on the grid's edge.
    pub fn is_edge(self) -> bool {
        !matches!(self, RowPosition::Interior)
    }
}

/// Border widths of one cell, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBorder {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
    pub color: Color,
}

impl CellBorder {
    /// Hairline width used between interior cells.
    pub const HAIRLINE: f32 = 0.3;
    /// Width of the outer edge of the grid.
    pub const EDGE: f32 = 1.0;

    /// Derive the border for a cell at `position`.
    ///
    /// Edge lines get a full-width border on their outer side; every other
    /// side is a hairline.
    pub fn for_position(position: RowPosition, color: Color) -> Self {
        let mut border = Self {
            top: Self::HAIRLINE,
            right: Self::HAIRLINE,
            bottom: Self::HAIRLINE,
            left: Self::HAIRLINE,
            color,
        };
        match position {
            RowPosition::Only => {
                border.top = Self::EDGE;
                border.bottom = Self::EDGE;
            }
            RowPosition::First => border.top = Self::EDGE,
            RowPosition::Last => border.bottom = Self::EDGE,
            RowPosition::Interior => {}
        }
        border
    }
}

/// Box metrics shared by every cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBox {
    pub min_height: f32,
    pub padding: f32,
    pub border_color: Color,
}

impl Default for CellBox {
    fn default() -> Self {
        Self {
            min_height: 40.0,
            padding: 8.0,
            border_color: Color::BLACK,
        }
    }
}

/// Grid-wide style settings.
///
/// # Example
///
/// ```
/// use horizon_grid::{Color, TableStyle, TextRole, TextStyle};
///
/// let style = TableStyle::default()
///     .with_highlight_color(Color::from_rgb8(0xFF, 0xEE, 0x00))
///     .with_text_style(TextRole::Number, TextStyle { bold: true, ..Default::default() });
///
/// assert!(style.text_style(TextRole::Number).bold);
/// assert!(!style.text_style(TextRole::String).bold);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    /// Highlight applied to every pressed cell, overriding per-cell colors.
    pub highlight_color: Option<Color>,
    /// Delay before a press counts as a long-press.
    pub long_press_delay: Duration,
    pub cell_box: CellBox,
    pub string_text: TextStyle,
    pub number_text: TextStyle,
    pub date_text: TextStyle,
    pub link_text: TextStyle,
    pub raw_text: TextStyle,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            highlight_color: None,
            long_press_delay: Duration::from_millis(DEFAULT_LONG_PRESS_DELAY_MS),
            cell_box: CellBox::default(),
            string_text: TextStyle::default(),
            number_text: TextStyle::default(),
            date_text: TextStyle::default(),
            link_text: TextStyle::default(),
            raw_text: TextStyle::default(),
        }
    }
}

impl TableStyle {
    /// Sets the grid-wide highlight color.
    pub fn with_highlight_color(mut self, color: Color) -> Self {
        self.highlight_color = Some(color);
        self
    }

    /// Sets the long-press delay.
    pub fn with_long_press_delay(mut self, delay: Duration) -> Self {
        self.long_press_delay = delay;
        self
    }

    /// Sets the text style for one role.
    pub fn with_text_style(mut self, role: TextRole, style: TextStyle) -> Self {
        *self.text_style_mut(role) = style;
        self
    }

    /// The text style for `role`.
    pub fn text_style(&self, role: TextRole) -> &TextStyle {
        match role {
            TextRole::String => &self.string_text,
            TextRole::Number => &self.number_text,
            TextRole::Date => &self.date_text,
            TextRole::Link => &self.link_text,
            TextRole::Raw => &self.raw_text,
        }
    }

    fn text_style_mut(&mut self, role: TextRole) -> &mut TextStyle {
        match role {
            TextRole::String => &mut self.string_text,
            TextRole::Number => &mut self.number_text,
            TextRole::Date => &mut self.date_text,
            TextRole::Link => &mut self.link_text,
            TextRole::Raw => &mut self.raw_text,
        }
    }
}

/// Style overrides for a single cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStyleOverrides {
    /// Highlight used while pressed, unless the table sets one.
    pub highlight_color: Option<Color>,
}

impl CellStyleOverrides {
    /// Overrides with a per-cell highlight color.
    pub fn with_highlight_color(color: Color) -> Self {
        Self {
            highlight_color: Some(color),
        }
    }
}

/// Resolve the background override of a cell.
///
/// Unpressed cells get no override. Pressed cells use the table color, else
/// the cell color, else [`Color::GAINSBORO`].
pub fn resolve_highlight(
    table: &TableStyle,
    cell: &CellStyleOverrides,
    pressed: bool,
) -> Option<Color> {
    if !pressed {
        return None;
    }
    Some(
        table
            .highlight_color
            .or(cell.highlight_color)
            .unwrap_or(Color::GAINSBORO),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#DCDCDC"), Some(Color::GAINSBORO));
        assert_eq!(Color::from_hex("fff"), Some(Color::WHITE));
        assert_eq!(
            Color::from_hex("#11223380"),
            Some(Color::from_rgba8(0x11, 0x22, 0x33, 0x80))
        );
        assert_eq!(Color::from_hex("#12"), None);
        assert_eq!(Color::from_hex("#GGGGGG"), None);
        assert_eq!(Color::from_hex("#ÄÄÄ"), None);
    }

    #[test]
    fn test_color_allows_one_hash() {
        assert_eq!(Color::from_hex("  #fff "), Some(Color::WHITE));
        assert_eq!(Color::from_hex("##fff"), None);
        assert_eq!(Color::from_hex("###DCDCDC"), None);
        assert!("##DCDCDC".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_round_trip_text() {
        assert_eq!(Color::GAINSBORO.to_string(), "#DCDCDC");
        assert_eq!(Color::from_rgba8(1, 2, 3, 4).to_hex(), "#01020304");
        assert!("not-a-color".parse::<Color>().is_err());
    }

    #[test]
    fn test_highlight_precedence() {
        let red = Color::from_rgb8(255, 0, 0);
        let blue = Color::from_rgb8(0, 0, 255);
        let table = TableStyle::default();
        let themed = TableStyle::default().with_highlight_color(red);
        let plain = CellStyleOverrides::default();
        let custom = CellStyleOverrides::with_highlight_color(blue);

        assert_eq!(resolve_highlight(&table, &plain, false), None);
        assert_eq!(resolve_highlight(&themed, &custom, false), None);
        assert_eq!(resolve_highlight(&table, &plain, true), Some(Color::GAINSBORO));
        assert_eq!(resolve_highlight(&table, &custom, true), Some(blue));
        assert_eq!(resolve_highlight(&themed, &custom, true), Some(red));
    }

    #[test]
    fn test_row_position() {
        assert_eq!(RowPosition::of(0, 1), RowPosition::Only);
        assert_eq!(RowPosition::of(0, 4), RowPosition::First);
        assert_eq!(RowPosition::of(1, 4), RowPosition::Interior);
        assert_eq!(RowPosition::of(3, 4), RowPosition::Last);
        assert!(!RowPosition::Interior.is_edge());
    }

    #[test]
    fn test_border_by_position() {
        let first = CellBorder::for_position(RowPosition::First, Color::BLACK);
        assert_eq!(first.top, CellBorder::EDGE);
        assert_eq!(first.bottom, CellBorder::HAIRLINE);

        let last = CellBorder::for_position(RowPosition::Last, Color::BLACK);
        assert_eq!(last.bottom, CellBorder::EDGE);
        assert_eq!(last.top, CellBorder::HAIRLINE);

        let interior = CellBorder::for_position(RowPosition::Interior, Color::BLACK);
        assert_eq!(interior.top, CellBorder::HAIRLINE);
        assert_eq!(interior.bottom, CellBorder::HAIRLINE);
    }

    #[test]
    fn test_default_long_press_delay() {
        assert_eq!(TableStyle::default().long_press_delay, Duration::from_millis(100));
    }
}
