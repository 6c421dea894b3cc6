//! # Share Module
//!
//! Turns the share tokens people type ("1", "0.5", "1/3", "") into numbers.
//!
//! ## Token Grammar
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  token (trimmed)          result                                        │
//! │  ─────────────────        ──────────────────────────────────────        │
//! │  ""  / "   "              0  (unassigned, NOT an error)                 │
//! │  "2/3"                    Fraction { 2, 3 }            = 0.666...       │
//! │  "1/0", "1/", "/2",       MalformedFraction                            │
//! │  "1/2/3", "a/2"                                                         │
//! │  "0.5", "2", "1e-1"       Decimal(0.5), Decimal(2), Decimal(0.1)        │
//! │  "abc", "NaN", "inf"      NotANumber                                   │
//! │  "-1", "-1/2"             NegativeShare                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parsing happens once, at the validation boundary. The settlement only
//! ever sees [`Share`] values and never goes back to the strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ShareParseError, ShareResult};

// =============================================================================
// Share
// =============================================================================

/// A parsed, non-negative claim on some units of an item.
///
/// Keeps the fraction form so breakdowns can show "1/3" rather than
/// "0.333333".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Share {
    /// Plain decimal token.
    Decimal(f64),
    /// `numerator/denominator` token. The denominator is never zero.
    Fraction { numerator: f64, denominator: f64 },
}

impl Share {
    /// The unassigned share.
    pub const ZERO: Share = Share::Decimal(0.0);

    /// Numeric value of the share.
    #[inline]
    pub fn value(&self) -> f64 {
        match *self {
            Share::Decimal(v) => v,
            Share::Fraction {
                numerator,
                denominator,
            } => numerator / denominator,
        }
    }

    /// True when the share contributes nothing.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.value() == 0.0
    }

    /// `units / people`, the share each of `people` takes when `units` are
    /// split evenly. `people` of zero yields [`Share::ZERO`].
    pub fn even_split(units: u32, people: usize) -> Share {
        if people == 0 {
            return Share::ZERO;
        }
        if people == 1 {
            return Share::Decimal(units as f64);
        }
        Share::Fraction {
            numerator: units as f64,
            denominator: people as f64,
        }
    }
}

impl Default for Share {
    fn default() -> Self {
        Share::ZERO
    }
}

/// Renders back to a token that parses to the same value.
impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Share::Decimal(v) => write!(f, "{}", v),
            Share::Fraction {
                numerator,
                denominator,
            } => write!(f, "{}/{}", numerator, denominator),
        }
    }
}

impl FromStr for Share {
    type Err = ShareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_share(s)
    }
}

impl From<Share> for String {
    fn from(share: Share) -> Self {
        share.to_string()
    }
}

impl TryFrom<String> for Share {
    type Error = ShareParseError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        parse_share(&token)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a share token into a non-negative [`Share`].
///
/// ## Rules
/// - Trimmed first; blank means unassigned and yields zero
/// - Exactly one `/` with two numeric parts and a non-zero denominator is a
///   fraction; anything else containing `/` is `MalformedFraction`
/// - Otherwise the token must be a finite number (`NotANumber`)
/// - Negative results are `NegativeShare`
/// - No rounding
///
/// ## Example
/// ```rust
/// use picsplit_core::share::parse_share;
///
/// assert_eq!(parse_share("").unwrap().value(), 0.0);
/// assert!((parse_share("1/3").unwrap().value() - 1.0 / 3.0).abs() < 1e-12);
/// assert!(parse_share("-1").is_err());
/// ```
pub fn parse_share(token: &str) -> ShareResult<Share> {
    let trimmed = token.trim();

    if trimmed.is_empty() {
        return Ok(Share::ZERO);
    }

    let share = if trimmed.contains('/') {
        parse_fraction(trimmed)?
    } else {
        let value = parse_number(trimmed).ok_or_else(|| ShareParseError::NotANumber {
            token: trimmed.to_string(),
        })?;
        // "-0" is zero, not a negative share
        Share::Decimal(if value == 0.0 { 0.0 } else { value })
    };

    let value = share.value();
    if !value.is_finite() {
        return Err(ShareParseError::MalformedFraction {
            token: trimmed.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ShareParseError::NegativeShare {
            token: trimmed.to_string(),
        });
    }

    Ok(share)
}

fn parse_fraction(token: &str) -> ShareResult<Share> {
    let malformed = || ShareParseError::MalformedFraction {
        token: token.to_string(),
    };

    let mut parts = token.split('/');
    let (numerator, denominator) = match (parts.next(), parts.next(), parts.next()) {
        (Some(n), Some(d), None) => (n.trim(), d.trim()),
        _ => return Err(malformed()),
    };

    let numerator = parse_number(numerator).ok_or_else(malformed)?;
    let denominator = parse_number(denominator).ok_or_else(malformed)?;

    if denominator == 0.0 {
        return Err(malformed());
    }

    Ok(Share::Fraction {
        numerator,
        denominator,
    })
}

/// Finite decimal number, or `None`. Rejects the textual `inf`/`NaN` forms
/// that `f64::from_str` would otherwise accept.
fn parse_number(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn value(token: &str) -> f64 {
        parse_share(token).unwrap().value()
    }

    #[test]
    fn test_blank_tokens_are_zero() {
        assert_eq!(value(""), 0.0);
        assert_eq!(value("   "), 0.0);
        assert_eq!(value("\t"), 0.0);
    }

    #[test]
    fn test_decimals_match_float_parsing() {
        for token in ["0", "1", "0.5", "2.25", ".5", "1e-1", " 3 "] {
            assert_eq!(value(token), token.trim().parse::<f64>().unwrap());
        }
    }

    #[test]
    fn test_fractions() {
        for (n, d) in [(1.0, 3.0), (2.0, 3.0), (3.0, 4.0), (0.0, 5.0), (5.0, 2.0)] {
            let token = format!("{}/{}", n, d);
            assert!((value(&token) - n / d).abs() < 1e-9, "token {token}");
        }
        assert!((value(" 1 / 2 ") - 0.5).abs() < 1e-12);
        assert!((value("0.5/2") - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_malformed_fractions() {
        for token in ["1/0", "1/", "/2", "1/2/3", "a/2", "1/b", "/", "1/0.0"] {
            assert!(
                matches!(
                    parse_share(token),
                    Err(ShareParseError::MalformedFraction { .. })
                ),
                "token {token}"
            );
        }
    }

    #[test]
    fn test_not_a_number() {
        for token in ["abc", "1a", "NaN", "inf", "one", "1,5"] {
            assert!(
                matches!(parse_share(token), Err(ShareParseError::NotANumber { .. })),
                "token {token}"
            );
        }
    }

    #[test]
    fn test_negative_shares_rejected() {
        assert!(matches!(
            parse_share("-1"),
            Err(ShareParseError::NegativeShare { .. })
        ));
        assert!(matches!(
            parse_share("-1/2"),
            Err(ShareParseError::NegativeShare { .. })
        ));
        assert!(matches!(
            parse_share("1/-2"),
            Err(ShareParseError::NegativeShare { .. })
        ));
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let share = parse_share("-0").unwrap();
        assert!(share.is_zero());
        assert_eq!(share.to_string(), "0");
    }

    #[test]
    fn test_display_keeps_fraction_form() {
        assert_eq!(parse_share("1/3").unwrap().to_string(), "1/3");
        assert_eq!(parse_share("0.5").unwrap().to_string(), "0.5");
        assert_eq!(parse_share("2").unwrap().to_string(), "2");
    }

    #[test]
    fn test_even_split() {
        assert_eq!(Share::even_split(1, 3).to_string(), "1/3");
        assert_eq!(Share::even_split(2, 1).to_string(), "2");
        assert!(Share::even_split(1, 0).is_zero());
        assert!((Share::even_split(2, 4).value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_serde_uses_token_form() {
        let share: Share = serde_json::from_str("\"2/3\"").unwrap();
        assert_eq!(serde_json::to_string(&share).unwrap(), "\"2/3\"");
        assert!(serde_json::from_str::<Share>("\"-1\"").is_err());
    }
}
