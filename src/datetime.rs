//! Moment-style datetime formats (`YYYYMMDD-HHmmss`)
//!
//! Rule authors write formats with moment.js tokens. They are translated to a
//! chrono strftime string before formatting.

use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Write};

/// Default format for `${date}`
pub const DEFAULT_FORMAT: &str = "YYYYMMDD-HHmmss";

/// Known tokens, longest first within each letter so the scan is greedy.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DDDD", "%j"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("d", "%w"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("SSS", "%3f"),
    ("A", "%p"),
    ("a", "%P"),
    ("ZZ", "%z"),
    ("Z", "%:z"),
    ("X", "%s"),
];

/// Translate a moment-style format into a chrono strftime string.
///
/// `[...]` encloses literal text. Anything that is not a token is copied
/// literally.
pub fn to_strftime(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut rest = format;

    'scan: while let Some(c) = rest.chars().next() {
        if c == '['
            && let Some(end) = rest.find(']')
        {
            push_literal(&mut out, &rest[1..end]);
            rest = &rest[end + 1..];
            continue;
        }

        for (token, strftime) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(strftime);
                rest = tail;
                continue 'scan;
            }
        }

        push_literal(&mut out, &rest[..c.len_utf8()]);
        rest = &rest[c.len_utf8()..];
    }

    out
}

fn push_literal(out: &mut String, text: &str) {
    for c in text.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}

/// Format a timestamp with a moment-style format
pub fn format<Tz>(timestamp: &DateTime<Tz>, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let strftime = to_strftime(format);
    let mut out = String::new();
    // Every generated specifier is valid, so writing cannot fail midway
    let _ = write!(out, "{}", timestamp.format(&strftime));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    fn fixed() -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let naive = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(15, 4, 5, 678)
            .unwrap();
        offset.from_local_datetime(&naive).unwrap()
    }

    #[test]
    fn test_default_format() {
        assert_eq!(to_strftime(DEFAULT_FORMAT), "%Y%m%d-%H%M%S");
        assert_eq!(format(&fixed(), DEFAULT_FORMAT), "20240102-150405");
    }

    #[test]
    fn test_date_only() {
        assert_eq!(format(&fixed(), "YYYYMMDD"), "20240102");
        assert_eq!(format(&fixed(), "YYYY-MM-DD"), "2024-01-02");
    }

    #[test]
    fn test_unpadded_and_names() {
        assert_eq!(format(&fixed(), "D/M/YY"), "2/1/24");
        assert_eq!(format(&fixed(), "dddd, MMMM D"), "Tuesday, January 2");
        assert_eq!(format(&fixed(), "ddd MMM"), "Tue Jan");
    }

    #[test]
    fn test_twelve_hour_and_millis() {
        assert_eq!(format(&fixed(), "hh:mm A"), "03:04 PM");
        assert_eq!(format(&fixed(), "h a"), "3 pm");
        assert_eq!(format(&fixed(), "ss.SSS"), "05.678");
    }

    #[test]
    fn test_offsets() {
        assert_eq!(format(&fixed(), "Z"), "+07:00");
        assert_eq!(format(&fixed(), "ZZ"), "+0700");
    }

    #[test]
    fn test_literals_and_percent() {
        assert_eq!(format(&fixed(), "[Week of] YYYY"), "Week of 2024");
        assert_eq!(format(&fixed(), "100% YYYY"), "100% 2024");
        assert_eq!(format(&fixed(), "[50%]"), "50%");
    }

    #[test]
    fn test_unclosed_bracket_is_literal() {
        assert_eq!(format(&fixed(), "[YYYY"), "[2024");
    }
}
