#![forbid(unsafe_code)]

//! Score values and raw-value parsing.
//!
//! A score is either a known integer or [`Score::Unknown`], the "not yet
//! determined" state the data source signals with a sentinel token. Unknown
//! is not a number and never takes part in comparisons.
//!
//! # Parsing
//!
//! Raw values follow leading-integer semantics: optional surrounding
//! whitespace, an optional sign, then base-10 digits; anything after the
//! digits is ignored (`"42pts"` is 42). Values with no leading digits, the
//! sentinel itself, `null`, booleans, arrays, objects and non-finite numbers
//! all fall back to Unknown. Parsing never fails.

use std::fmt;

use serde_json::Value;

/// The sentinel token the data source uses for an undetermined score.
pub const DEFAULT_SENTINEL: &str = "?";

/// A single entry's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Score {
    /// A determined score.
    Known(i64),
    /// Not yet determined.
    #[default]
    Unknown,
}

/// Why a raw value normalized to [`Score::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownReason {
    /// The raw value was the sentinel token.
    Sentinel,
    /// The raw value could not be read as an integer.
    Unparseable,
}

impl Score {
    /// Whether this score is a number.
    #[inline]
    pub const fn is_known(self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// The numeric value, if known.
    #[inline]
    pub const fn value(self) -> Option<i64> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unknown => None,
        }
    }

    /// Parse a raw JSON value from the data source.
    ///
    /// Returns the score plus, for Unknown results, the reason.
    pub fn from_raw(raw: &Value, sentinel: &str) -> (Score, Option<UnknownReason>) {
        match raw {
            Value::String(s) if s == sentinel => (Score::Unknown, Some(UnknownReason::Sentinel)),
            Value::String(s) => match parse_leading_int(s) {
                Some(v) => (Score::Known(v), None),
                None => (Score::Unknown, Some(UnknownReason::Unparseable)),
            },
            Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    return (Score::Known(v), None);
                }
                // Float to int casts saturate at the i64 bounds.
                match n.as_f64() {
                    Some(f) if f.is_finite() => (Score::Known(f.trunc() as i64), None),
                    _ => (Score::Unknown, Some(UnknownReason::Unparseable)),
                }
            }
            _ => (Score::Unknown, Some(UnknownReason::Unparseable)),
        }
    }

    /// Text shown on a card for this score.
    ///
    /// Unknown renders as the sentinel glyph, never as a blank.
    pub fn display(self, sentinel: &str) -> String {
        match self {
            Self::Known(v) => v.to_string(),
            Self::Unknown => sentinel.to_owned(),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => write!(f, "{v}"),
            Self::Unknown => f.write_str(DEFAULT_SENTINEL),
        }
    }
}

/// Parse the leading base-10 integer of `s`.
///
/// Returns `None` when no digits follow the optional whitespace and sign.
/// Saturates at the `i64` bounds on overflow.
pub fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen = true;
        let d = i64::from(b - b'0');
        value = value.saturating_mul(10);
        value = if negative {
            value.saturating_sub(d)
        } else {
            value.saturating_add(d)
        };
    }

    seen.then_some(value)
}
