// Player identifier normalization.
//
// Source files disagree on how IDs are written ("2544", "2544.0", " 2544 ").
// Everything is folded into one canonical decimal string before joining.

use std::fmt;

/// A normalized player identifier.
///
/// `Unparseable` marks a source row whose ID could not be read. It compares
/// unequal to everything, itself included, so it can never take part in a join.
#[derive(Debug, Clone)]
pub enum PlayerId {
    Canonical(String),
    Unparseable,
}

/// Name-source rows with unreadable IDs are folded into this value.
pub const NAME_SOURCE_SENTINEL: &str = "0";

/// Largest integer an f64 represents exactly (2^53).
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

impl PlayerId {
    /// Normalize an ID from the stats or averages source.
    pub fn parse(raw: &str) -> Self {
        match canonicalize(raw) {
            Some(id) => PlayerId::Canonical(id),
            None => PlayerId::Unparseable,
        }
    }

    /// Normalize an ID from the name source, where unreadable IDs become `"0"`.
    pub fn parse_name_source(raw: &str) -> Self {
        PlayerId::Canonical(
            canonicalize(raw).unwrap_or_else(|| NAME_SOURCE_SENTINEL.to_string()),
        )
    }

    /// The canonical string, if the ID was parseable.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PlayerId::Canonical(s) => Some(s),
            PlayerId::Unparseable => None,
        }
    }

    pub fn is_parseable(&self) -> bool {
        matches!(self, PlayerId::Canonical(_))
    }
}

impl PartialEq for PlayerId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PlayerId::Canonical(a), PlayerId::Canonical(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::Canonical(s) => f.write_str(s),
            PlayerId::Unparseable => f.write_str("<unparseable>"),
        }
    }
}

/// Canonical decimal form of an integer ID, or `None` if `raw` is not one.
///
/// Plain digit strings are handled textually so IDs of any length survive.
/// Float notation is accepted only when the value is integral and exactly
/// representable.
pub fn canonicalize(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let (negative, digits) = match s.as_bytes()[0] {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        let stripped = digits.trim_start_matches('0');
        if stripped.is_empty() {
            return Some("0".to_string());
        }
        return Some(if negative {
            format!("-{stripped}")
        } else {
            stripped.to_string()
        });
    }

    let value: f64 = s.parse().ok()?;
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_EXACT_FLOAT_INT {
        return None;
    }
    if value == 0.0 {
        return Some("0".to_string());
    }
    Some(format!("{}", value as i64))
}
