// ── Date patterns ──
//
// Layer descriptors carry moment-style patterns (`YYYY-MM-DD`). These are
// translated once into chrono's strftime syntax; unknown letters pass
// through as literal text and `[...]` escapes are honoured.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime};

/// Token table, longest first so `YYYY` wins over `YY`.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("MMMM", "%B"),
    ("dddd", "%A"),
    ("SSS", "%3f"),
    ("MMM", "%b"),
    ("ddd", "%a"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("ZZ", "%z"),
    ("M", "%-m"),
    ("D", "%-d"),
    ("H", "%-H"),
    ("h", "%-I"),
    ("m", "%-M"),
    ("s", "%-S"),
    ("A", "%p"),
    ("a", "%P"),
    ("Z", "%:z"),
    ("X", "%s"),
];

/// Translate a moment-style pattern into a chrono format string.
pub fn to_strftime(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                push_literal(&mut out, &rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        if let Some((token, spec)) = TOKENS.iter().find(|(token, _)| rest.starts_with(token)) {
            out.push_str(spec);
            rest = &rest[token.len()..];
            continue;
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

/// Format an instant with a moment-style pattern.
///
/// Returns `None` only if chrono rejects the translated pattern.
pub fn format_instant(instant: &DateTime<FixedOffset>, pattern: &str) -> Option<String> {
    let spec = to_strftime(pattern);
    let mut out = String::new();
    write!(out, "{}", instant.format(&spec)).ok()?;
    Some(out)
}

/// Parse the date bounds that descriptors carry.
///
/// Accepts RFC 3339 timestamps, naive ISO date-times and plain dates;
/// naive values are taken as UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }

    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    Some(naive.and_utc().fixed_offset())
}

/// Current instant in the host's local time zone, as the factory's
/// default clock. `TIME` stamps are formatted in that offset.
pub fn local_now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}
