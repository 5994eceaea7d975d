//! Date formatting for `date` columns.
//!
//! The grid does not own date formatting; it calls whatever
//! [`DateFormatter`] the host installs. [`ChronoDateFormatter`] is the
//! default and understands moment-style patterns (`YYYY-MM-DD`,
//! `DD MMM YYYY HH:mm`, ...) plus a per-locale short date when no pattern is
//! given.
//!
//! # Pattern Tokens
//!
//! | token | meaning | example |
//! |---|---|---|
//! | `YYYY` / `YY` | year, 4 or 2 digits | `2024` / `24` |
//! | `MMMM` / `MMM` | month name, full or short | `January` / `Jan` |
//! | `MM` / `M` | month number, padded or not | `01` / `1` |
//! | `DD` / `D` | day of month, padded or not | `05` / `5` |
//! | `dddd` / `ddd` | weekday name, full or short | `Monday` / `Mon` |
//! | `HH` / `H` | hour (24h), padded or not | `09` / `9` |
//! | `hh` / `h` | hour (12h), padded or not | `09` / `9` |
//! | `mm` / `m` | minute, padded or not | `07` / `7` |
//! | `ss` / `s` | second, padded or not | `03` / `3` |
//! | `A` / `a` | `AM`/`PM`, `am`/`pm` | `PM` |
//! | `[...]` | literal text | `[at]` |
//!
//! With the `localization` feature, month names, weekday names and the
//! AM/PM marker follow the `locale` argument (`fr-FR` gives `janvier`).
//! Without it, or for a locale chrono does not know, they are English.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use horizon_grid_core::logging::targets;

use crate::value::CellValue;

/// Turns a cell value into date text.
///
/// Implementations must not panic; a value they cannot interpret should come
/// back as its raw text.
pub trait DateFormatter: Send + Sync {
    /// Format `value` using an optional pattern and locale.
    fn format_date(&self, value: &CellValue, format: Option<&str>, locale: Option<&str>) -> String;
}

impl<F> DateFormatter for F
where
    F: Fn(&CellValue, Option<&str>, Option<&str>) -> String + Send + Sync,
{
    fn format_date(&self, value: &CellValue, format: Option<&str>, locale: Option<&str>) -> String {
        self(value, format, locale)
    }
}

/// The default [`DateFormatter`], built on `chrono`.
///
/// Accepted inputs:
/// - `Date` and `DateTime` values
/// - `Text` holding an RFC 3339 timestamp, `YYYY-MM-DD`, or
///   `YYYY-MM-DDTHH:MM:SS`
/// - `Integer` and `Float` as Unix timestamps in milliseconds (UTC)
///
/// # Example
///
/// ```
/// use horizon_grid::{CellValue, ChronoDateFormatter, DateFormatter};
/// use chrono::NaiveDate;
///
/// let formatter = ChronoDateFormatter::new();
/// let value = CellValue::from(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
///
/// assert_eq!(formatter.format_date(&value, Some("DD MMM YYYY"), None), "15 Jan 2024");
/// assert_eq!(formatter.format_date(&value, None, Some("en-US")), "01/15/2024");
/// assert_eq!(formatter.format_date(&value, None, Some("de-DE")), "15.01.2024");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoDateFormatter;

impl ChronoDateFormatter {
    /// Create the default formatter.
    pub fn new() -> Self {
        Self
    }

    /// Interpret a cell value as a date-time, if possible.
    pub fn to_datetime(value: &CellValue) -> Option<NaiveDateTime> {
        match value {
            CellValue::Date(d) => Some(d.and_time(NaiveTime::MIN)),
            CellValue::DateTime(dt) => Some(dt.naive_local()),
            CellValue::Integer(ms) => {
                DateTime::<Utc>::from_timestamp_millis(*ms).map(|dt| dt.naive_utc())
            }
            CellValue::Float(ms) if ms.is_finite() => {
                DateTime::<Utc>::from_timestamp_millis(*ms as i64).map(|dt| dt.naive_utc())
            }
            CellValue::Text(text) => parse_text(text.trim()),
            _ => None,
        }
    }
}

impl DateFormatter for ChronoDateFormatter {
    fn format_date(&self, value: &CellValue, format: Option<&str>, locale: Option<&str>) -> String {
        let Some(datetime) = Self::to_datetime(value) else {
            tracing::debug!(
                target: targets::DATE,
                ?value,
                "value is not a date, showing raw text"
            );
            return value.display_text();
        };

        let pattern = match format {
            Some(format) if !format.trim().is_empty() => translate_pattern(format),
            _ => locale_pattern(locale).to_string(),
        };
        render(&datetime, &pattern, locale)
    }
}

#[cfg(feature = "localization")]
fn render(datetime: &NaiveDateTime, pattern: &str, locale: Option<&str>) -> String {
    match locale.and_then(chrono_locale) {
        Some(locale) => datetime.and_utc().format_localized(pattern, locale).to_string(),
        None => datetime.format(pattern).to_string(),
    }
}

#[cfg(not(feature = "localization"))]
fn render(datetime: &NaiveDateTime, pattern: &str, _locale: Option<&str>) -> String {
    datetime.format(pattern).to_string()
}

/// Resolve `fr-FR`, `de_DE` or a bare `fr` to a chrono locale.
#[cfg(feature = "localization")]
fn chrono_locale(locale: &str) -> Option<chrono::Locale> {
    let mut parts = locale.trim().split(['-', '_']);
    let lang = parts.next()?.to_ascii_lowercase();
    let region = match parts.next() {
        Some(region) => region.to_ascii_uppercase(),
        None => lang.to_ascii_uppercase(),
    };
    let resolved = chrono::Locale::try_from(format!("{lang}_{region}").as_str()).ok();
    if resolved.is_none() {
        tracing::trace!(target: targets::DATE, locale, "unknown locale, using English names");
    }
    resolved
}

fn parse_text(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Pattern tokens, longest first so `MMMM` wins over `MM`.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("A", "%p"),
    ("a", "%P"),
];

/// Translate a moment-style pattern into a chrono format string.
///
/// Every character that is not a token is emitted literally, with `%`
/// escaped, so the result is always a valid chrono format.
pub fn translate_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    'scan: while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                push_literal(&mut out, &rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }
        for (token, replacement) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(replacement);
                rest = tail;
                continue 'scan;
            }
        }
        push_literal(&mut out, &rest[..c.len_utf8()]);
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn push_literal(out: &mut String, literal: &str) {
    for c in literal.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}

/// Short numeric date pattern for a locale.
///
/// Without a locale the ISO form `YYYY-MM-DD` is used.
pub fn locale_pattern(locale: Option<&str>) -> &'static str {
    let Some(locale) = locale else {
        return "%Y-%m-%d";
    };
    let mut parts = locale.split(['-', '_']);
    let lang = parts.next().unwrap_or_default().to_ascii_lowercase();
    let region = parts.next().map(str::to_ascii_uppercase);

    const YMD_LANGS: &[&str] = &["ja", "zh", "ko", "hu", "lt", "mn", "fa"];
    const PERIOD_LANGS: &[&str] = &[
        "de", "no", "nb", "nn", "fi", "et", "lv", "sl", "sk", "cs", "hr", "ro", "bg", "ru", "pl",
        "tr",
    ];
    const DASH_LANGS: &[&str] = &["nl", "da", "sv", "is"];

    if YMD_LANGS.contains(&lang.as_str()) {
        return "%Y/%m/%d";
    }
    match (lang.as_str(), region.as_deref()) {
        ("en", Some("US")) | ("en", Some("PH")) | ("es", Some("US")) | ("fil", _) => {
            return "%m/%d/%Y";
        }
        _ => {}
    }
    if PERIOD_LANGS.contains(&lang.as_str()) {
        return "%d.%m.%Y";
    }
    if DASH_LANGS.contains(&lang.as_str()) {
        return "%d-%m-%Y";
    }
    "%d/%m/%Y"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan_15() -> CellValue {
        CellValue::from(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    #[test]
    fn test_translate_pattern() {
        assert_eq!(translate_pattern("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(translate_pattern("D MMMM YY"), "%-d %B %y");
        assert_eq!(translate_pattern("dddd, hh:mm A"), "%A, %I:%M %p");
        assert_eq!(translate_pattern("[Day] D"), "Day %-d");
        assert_eq!(translate_pattern("100% DD"), "100%% %d");
    }

    #[test]
    fn test_format_with_pattern() {
        let formatter = ChronoDateFormatter::new();
        assert_eq!(
            formatter.format_date(&jan_15(), Some("YYYY-MM-DD"), Some("en-US")),
            "2024-01-15"
        );
        assert_eq!(
            formatter.format_date(&jan_15(), Some("dddd, MMMM D"), None),
            "Monday, January 15"
        );
    }

    #[cfg(feature = "localization")]
    #[test]
    fn test_pattern_names_follow_locale() {
        let formatter = ChronoDateFormatter::new();
        let pattern = Some("D MMMM YYYY");
        assert_eq!(formatter.format_date(&jan_15(), pattern, Some("fr-FR")), "15 janvier 2024");
        assert_eq!(formatter.format_date(&jan_15(), pattern, Some("de_DE")), "15 Januar 2024");
        assert_eq!(formatter.format_date(&jan_15(), Some("dddd"), Some("fr")), "lundi");
        assert_eq!(formatter.format_date(&jan_15(), pattern, Some("en-US")), "15 January 2024");
        assert_eq!(formatter.format_date(&jan_15(), pattern, Some("xx-YY")), "15 January 2024");
    }

    #[cfg(not(feature = "localization"))]
    #[test]
    fn test_pattern_names_are_english_without_localization() {
        let formatter = ChronoDateFormatter::new();
        assert_eq!(
            formatter.format_date(&jan_15(), Some("D MMMM YYYY"), Some("fr-FR")),
            "15 January 2024"
        );
    }

    #[test]
    fn test_format_by_locale() {
        let formatter = ChronoDateFormatter::new();
        let cases = [
            (None, "2024-01-15"),
            (Some("en-US"), "01/15/2024"),
            (Some("en-GB"), "15/01/2024"),
            (Some("de_DE"), "15.01.2024"),
            (Some("nl-NL"), "15-01-2024"),
            (Some("ja-JP"), "2024/01/15"),
        ];
        for (locale, expected) in cases {
            assert_eq!(formatter.format_date(&jan_15(), None, locale), expected, "{locale:?}");
        }
    }

    #[test]
    fn test_text_and_timestamp_inputs() {
        let formatter = ChronoDateFormatter::new();
        let pattern = Some("YYYY-MM-DD HH:mm");

        assert_eq!(
            formatter.format_date(&CellValue::from("2024-01-15"), pattern, None),
            "2024-01-15 00:00"
        );
        assert_eq!(
            formatter.format_date(&CellValue::from("2024-01-15T08:05:00+01:00"), pattern, None),
            "2024-01-15 08:05"
        );
        // 2024-01-15T00:00:00Z in milliseconds
        assert_eq!(
            formatter.format_date(&CellValue::from(1_705_276_800_000i64), pattern, None),
            "2024-01-15 00:00"
        );
    }

    #[test]
    fn test_uninterpretable_value_is_raw_text() {
        let formatter = ChronoDateFormatter::new();
        assert_eq!(
            formatter.format_date(&CellValue::from("next tuesday"), Some("YYYY"), None),
            "next tuesday"
        );
        assert_eq!(formatter.format_date(&CellValue::from(true), None, None), "true");
    }

    #[test]
    fn test_closure_formatter() {
        let formatter = |value: &CellValue, _: Option<&str>, _: Option<&str>| {
            format!("<{}>", value)
        };
        assert_eq!(formatter.format_date(&jan_15(), None, None), "<2024-01-15>");
    }
}
