//! Ang numbers: the fixed pages of the scripture text and their coercion rules.

use std::fmt;

use super::error::DomainError;

/// A validated ang (page) number in `[AngNumber::FIRST, AngNumber::LAST]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AngNumber(u16);

impl AngNumber {
    pub const FIRST: AngNumber = AngNumber(1);
    pub const LAST: AngNumber = AngNumber(1430);

    pub fn new(value: i64) -> Result<Self, DomainError> {
        if value < i64::from(Self::FIRST.0) || value > i64::from(Self::LAST.0) {
            return Err(DomainError::validation(format!(
                "ang {value} is outside {}..={}",
                Self::FIRST,
                Self::LAST
            )));
        }
        // Bounds checked above, the value fits in u16.
        Ok(Self(value as u16))
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Round then clamp into range. `NaN` and zero coerce to the first ang.
    pub fn clamp_rounded(value: f64) -> Self {
        let value = if value.is_nan() || value == 0.0 {
            1.0
        } else {
            value
        };
        let clamped = value
            .round()
            .clamp(f64::from(Self::FIRST.0), f64::from(Self::LAST.0));
        Self(clamped as u16)
    }

    /// Numeric coercion of free-form toolbar input, before any clamping.
    ///
    /// Missing or blank input counts as zero. Unparsable or non-finite input
    /// (`inf`, `nan`) counts as `NaN`. Both coerce to 1.
    pub fn coerce_input(input: Option<&str>) -> f64 {
        let value = input
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                raw.parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .unwrap_or(f64::NAN)
            })
            .unwrap_or(0.0);
        if value.is_nan() || value == 0.0 {
            1.0
        } else {
            value
        }
    }

    pub fn from_input(input: Option<&str>) -> Self {
        Self::clamp_rounded(Self::coerce_input(input))
    }

    /// Parse the leading integer of `raw` and accept it only when in range.
    ///
    /// Used for values read back from URLs and storage, where trailing
    /// characters after the digits are tolerated.
    pub fn parse_strict(raw: &str) -> Option<Self> {
        parse_leading_int(raw).and_then(|value| Self::new(value).ok())
    }

    pub fn prev(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::FIRST.0))
    }

    pub fn next(self) -> Self {
        Self((self.0 + 1).min(Self::LAST.0))
    }
}

impl Default for AngNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for AngNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = digits
        .bytes()
        .position(|byte| !byte.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_values_outside_range() {
        assert!(AngNumber::new(0).is_err());
        assert!(AngNumber::new(1431).is_err());
        assert_eq!(AngNumber::new(1430).expect("last ang").get(), 1430);
    }

    #[test]
    fn input_above_range_clamps_to_last() {
        assert_eq!(AngNumber::from_input(Some("1431")), AngNumber::LAST);
    }

    #[test]
    fn zero_or_empty_input_clamps_to_first() {
        assert_eq!(AngNumber::from_input(Some("0")), AngNumber::FIRST);
        assert_eq!(AngNumber::from_input(Some("")), AngNumber::FIRST);
        assert_eq!(AngNumber::from_input(Some("   ")), AngNumber::FIRST);
        assert_eq!(AngNumber::from_input(None), AngNumber::FIRST);
    }

    #[test]
    fn input_rounds_before_clamping() {
        assert_eq!(AngNumber::from_input(Some("12.6")).get(), 13);
        assert_eq!(AngNumber::from_input(Some("12.4")).get(), 12);
        assert_eq!(AngNumber::from_input(Some("-7")), AngNumber::FIRST);
        assert_eq!(AngNumber::from_input(Some("ang")), AngNumber::FIRST);
        assert_eq!(AngNumber::from_input(Some("inf")), AngNumber::FIRST);
        assert_eq!(AngNumber::from_input(Some("Infinity")), AngNumber::FIRST);
        assert_eq!(AngNumber::from_input(Some("-inf")), AngNumber::FIRST);
        assert_eq!(AngNumber::from_input(Some("NaN")), AngNumber::FIRST);
    }

    #[test]
    fn coercion_keeps_out_of_range_values() {
        assert_eq!(AngNumber::coerce_input(Some("5000")), 5000.0);
        assert_eq!(AngNumber::coerce_input(Some("abc")), 1.0);
        assert_eq!(AngNumber::coerce_input(None), 1.0);
    }

    #[test]
    fn strict_parse_reads_leading_digits_only() {
        assert_eq!(AngNumber::parse_strict("5").map(AngNumber::get), Some(5));
        assert_eq!(AngNumber::parse_strict(" 42abc").map(AngNumber::get), Some(42));
        assert_eq!(AngNumber::parse_strict("abc"), None);
        assert_eq!(AngNumber::parse_strict("0"), None);
        assert_eq!(AngNumber::parse_strict("1431"), None);
        assert_eq!(AngNumber::parse_strict("-3"), None);
        assert_eq!(AngNumber::parse_strict(""), None);
    }

    #[test]
    fn neighbours_saturate_at_bounds() {
        assert_eq!(AngNumber::FIRST.prev(), AngNumber::FIRST);
        assert_eq!(AngNumber::LAST.next(), AngNumber::LAST);
        assert_eq!(AngNumber::clamp_rounded(100.0).next().get(), 101);
    }
}
