//! Raw header parsing: subject, author candidate, timestamp.
//!
//! Input is the raw header block as fetched from the server. Parsing is
//! deliberately forgiving; mail written from phones and odd clients is
//! the whole point of this pipeline, so nothing in here panics on
//! malformed input. A field that cannot be parsed degrades to a
//! documented fallback instead.

use chrono::{DateTime, Duration, FixedOffset, Offset, TimeZone, Utc};

/// The literal two-character marker separating a short prefix from the
/// intended content, a convention for constrained input devices.
pub const PHONE_DELIMITER: &str = "::";

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A raw header block split into unfolded `(name, value)` fields.
#[derive(Debug, Clone)]
pub struct HeaderBlock {
    fields: Vec<(String, String)>,
}

impl HeaderBlock {
    /// Parse a raw header block.
    ///
    /// Continuation lines (leading whitespace) are folded into the
    /// preceding field with a single joining space. Parsing stops at the
    /// first empty line, where the body would begin.
    pub fn parse(raw: &str) -> Self {
        let mut fields: Vec<(String, String)> = Vec::new();
        for line in raw.lines() {
            if line.is_empty() {
                break;
            }
            if line.starts_with(' ') || line.starts_with('\t') {
                if let Some((_, value)) = fields.last_mut() {
                    value.push(' ');
                    value.push_str(line.trim_start());
                }
            } else if let Some((name, value)) = line.split_once(':') {
                fields.push((name.trim().to_string(), value.trim().to_string()));
            }
        }
        Self { fields }
    }

    /// First occurrence of a field, case-insensitive.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The subject: everything before the first [`PHONE_DELIMITER`],
    /// trimmed. Text after the delimiter is a command/footer, not content.
    pub fn subject(&self) -> String {
        let raw = self.get("Subject").unwrap_or("");
        leading_segment(raw).trim().to_string()
    }

    /// The author candidate string: Reply-To when present and non-empty,
    /// From otherwise.
    pub fn author_candidate(&self) -> Option<&str> {
        match self.get("Reply-To") {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => self.get("From"),
        }
    }

    /// The raw Date field, if any.
    pub fn date(&self) -> Option<&str> {
        self.get("Date")
    }
}

/// Everything before the first [`PHONE_DELIMITER`] occurrence.
pub fn leading_segment(input: &str) -> &str {
    input.split(PHONE_DELIMITER).next().unwrap_or(input)
}

/// Extract a bare `local@domain` substring from an address candidate.
///
/// Scans for runs of `[a-z0-9_.-]` around an `@` and takes the first
/// match whose trailing context contains no `<`, so an address in a
/// display-name prefix never shadows the real angle-bracketed one.
/// With no match, the trimmed raw candidate is returned for validation
/// to reject.
pub fn extract_bare_address(candidate: &str) -> String {
    for (start, end) in address_spans(candidate) {
        if !candidate[end..].contains('<') {
            return candidate[start..end].to_string();
        }
    }
    candidate.trim().to_string()
}

fn address_spans(s: &str) -> Vec<(usize, usize)> {
    fn is_atom(b: u8) -> bool {
        b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-')
    }

    let bytes = s.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if !is_atom(bytes[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && is_atom(bytes[i]) {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'@' {
            i += 1;
            let domain_start = i;
            while i < bytes.len() && is_atom(bytes[i]) {
                i += 1;
            }
            if i > domain_start {
                spans.push((start, i));
            }
        }
    }
    spans
}

/// Syntactic validation of an extracted address.
///
/// One `@`, a plausible local part, and a dotted domain whose labels are
/// alphanumeric-or-hyphen without edge hyphens. Deliberately stricter
/// than RFC 5322 and in line with what the downstream store accepts.
pub fn is_valid_address(address: &str) -> bool {
    if address.len() < 6 {
        return false;
    }
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let local_ok = local
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-' | b'+' | b'%'));
    if !local_ok {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

/// Parse a Date header of the conventional SMTP form
/// `[Weekday,] D Mon YYYY HH:MM:SS TZOFFSET` into a UTC instant.
///
/// The offset field is integer-parsed as written and multiplied by 36 to
/// get seconds, so `+0530` shifts by 19080 seconds. That arithmetic is
/// load-bearing: mail ingested for years carries timestamps computed this
/// way, and changing it would shift every re-imported archive.
///
/// Returns `None` for anything that does not parse; callers substitute a
/// fallback instant rather than dropping the message.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let mut rest = raw.trim();
    // Weekday prefix, when present, ends at the first comma.
    if let Some(pos) = rest.find(',') {
        rest = rest[pos + 1..].trim();
    }

    let parts: Vec<&str> = rest.split_whitespace().collect();
    if parts.len() < 5 {
        return None;
    }

    let day: u32 = parts[0].parse().ok()?;
    let month = MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(parts[1]))
        .map(|i| i as u32 + 1)?;
    let year: i32 = parts[2].parse().ok()?;

    let mut clock = parts[3].split(':');
    let hour: u32 = clock.next()?.parse().ok()?;
    let minute: u32 = clock.next()?.parse().ok()?;
    let second: u32 = clock.next()?.parse().ok()?;

    let offset_secs = leading_int(parts[4]) * 36;

    let naive = Utc
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .single()?;
    Some(naive - Duration::seconds(offset_secs))
}

/// The same instant shifted to the site display offset.
pub fn site_local(utc: DateTime<Utc>, site_offset_secs: i32) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(site_offset_secs).unwrap_or_else(|| Utc.fix());
    utc.with_timezone(&offset)
}

/// Integer prefix of a string: optional sign, then digits, 0 when absent.
fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let run: String = digits.chars().take_while(char::is_ascii_digit).collect();
    run.parse::<i64>().map(|n| sign * n).unwrap_or(0)
}
