//! Input validation and value formatting shared by the movie handlers.
//!
//! Numeric checks follow the loose string-to-number conversion that web
//! clients expect from query strings and path segments: surrounding
//! whitespace is ignored, the empty string counts as zero, and radix
//! prefixes are understood.

use std::sync::LazyLock;

use regex::Regex;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(19|20)[0-9]{2}$").expect("year pattern compiles"));

/// True when `value` converts to a finite, non-negative integer.
pub fn validate_integer(value: &str) -> bool {
    to_number(value).is_some_and(|n| n.is_finite() && n.fract() == 0.0 && n >= 0.0)
}

/// True for four-digit years in `1900..=2099`.
pub fn validate_year(value: &str) -> bool {
    YEAR_PATTERN.is_match(value)
}

/// True when `value` converts to a number at all.
///
/// Used as the genre guard, so whitespace-only input counts as numeric.
pub fn is_numeric(value: &str) -> bool {
    to_number(value).is_some()
}

/// Storage key for an identifier that already passed [`validate_integer`].
///
/// Returns `None` for values no stored key can equal: blank input, radix
/// prefixed forms (the store compares decimal text only) and values beyond
/// what a 64-bit key can hold.
pub fn movie_key(value: &str) -> Option<i64> {
    let s = trim_padding(value);
    if s.is_empty() || radix_prefix(s).is_some() {
        return None;
    }
    to_number(s).filter(|n| n.is_finite() && *n >= 0.0 && *n < i64::MAX as f64).map(|n| n as i64)
}

/// Formats an amount as `$` followed by the en-US grouped number.
///
/// Zero, missing and NaN amounts all render as `$0`.
pub fn format_budget(amount: Option<f64>) -> String {
    match amount {
        Some(amount) if amount != 0.0 && !amount.is_nan() => {
            format!("${}", group_thousands(amount))
        },
        _ => "$0".to_string(),
    }
}

/// Rounds a mean rating to two decimals.
///
/// Rounds the exact decimal value of `rating`, with exact ties going away
/// from zero, so `1.075` (stored just below) gives `1.07` and `3.125` gives
/// `3.13`.
pub fn round_rating(rating: f64) -> f64 {
    if !rating.is_finite() || rating.abs() >= 1e15 {
        return rating;
    }

    // 1074 fraction digits hold any f64 exactly, so no rounding happens here
    let exact = format!("{:.1074}", rating.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), "0"));
    let digit = |i: usize| frac_part.as_bytes().get(i).map_or(0, |b| u64::from(b - b'0'));

    let whole: u64 = int_part.parse().unwrap_or(0);
    let mut cents = whole * 100 + digit(0) * 10 + digit(1);
    if digit(2) >= 5 {
        cents += 1;
    }

    let rounded = cents as f64 / 100.0;
    if rating.is_sign_negative() { -rounded } else { rounded }
}

/// Leading-integer parse used for `page`: optional whitespace and sign,
/// then digits, trailing text ignored. Saturates instead of overflowing.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let s = value.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match s.get(..2) {
        Some("0x" | "0X") => (16, &s[2..]),
        _ => (10, s),
    };

    let mut seen = false;
    let mut acc: i64 = 0;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else {
            break;
        };
        seen = true;
        acc = acc.saturating_mul(i64::from(radix)).saturating_add(i64::from(d));
    }

    seen.then(|| if negative { -acc } else { acc })
}

fn trim_padding(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn radix_prefix(s: &str) -> Option<u32> {
    match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    }
}

fn to_number(value: &str) -> Option<f64> {
    let s = trim_padding(value);
    if s.is_empty() {
        return Some(0.0);
    }

    match s {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {},
    }

    if let Some(radix) = radix_prefix(s) {
        let digits = &s[2..];
        if digits.is_empty() {
            return None;
        }
        let radix_f = f64::from(radix);
        return digits
            .chars()
            .try_fold(0f64, |acc, c| c.to_digit(radix).map(|d| acc * radix_f + f64::from(d)));
    }

    // f64::from_str also accepts "inf" and "nan", which must stay NaN here
    if !s.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E')) {
        return None;
    }
    s.parse().ok()
}

fn group_thousands(amount: f64) -> String {
    if amount.is_infinite() {
        return if amount > 0.0 { "∞".to_string() } else { "-∞".to_string() };
    }

    let fixed = format!("{:.3}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if amount < 0.0 {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert!(validate_integer("1"));
        assert!(validate_integer("0"));
        assert!(validate_integer(" 42 "));
        assert!(validate_integer("1.0"));
        assert!(validate_integer("1e3"));
        assert!(validate_integer("0x10"));

        assert!(!validate_integer("-1"));
        assert!(!validate_integer("abc"));
        assert!(!validate_integer("1.5"));
        assert!(!validate_integer("12abc"));
        assert!(!validate_integer("Infinity"));
        assert!(!validate_integer("inf"));
        assert!(!validate_integer("NaN"));
    }

    #[test]
    fn years() {
        assert!(validate_year("2020"));
        assert!(validate_year("1900"));
        assert!(validate_year("2099"));

        assert!(!validate_year("1899"));
        assert!(!validate_year("2100"));
        assert!(!validate_year("abcd"));
        assert!(!validate_year("20201"));
        assert!(!validate_year(" 2020"));
        assert!(!validate_year("२०२०"));
    }

    #[test]
    fn numeric_genres() {
        assert!(is_numeric("1234"));
        assert!(is_numeric("12.5"));
        assert!(is_numeric("   "));
        assert!(is_numeric("Infinity"));

        assert!(!is_numeric("Action"));
        assert!(!is_numeric("Science Fiction"));
        assert!(!is_numeric("NaN"));
        assert!(!is_numeric("nan"));
        assert!(!is_numeric("1234a"));
    }

    #[test]
    fn keys() {
        assert_eq!(movie_key("17"), Some(17));
        assert_eq!(movie_key("2.0"), Some(2));
        assert_eq!(movie_key("1e30"), None);
        assert_eq!(movie_key("abc"), None);
        assert_eq!(movie_key(" 5 "), Some(5));

        // valid ids that no decimal key can match
        assert!(validate_integer("0x10"));
        assert_eq!(movie_key("0x10"), None);
        assert_eq!(movie_key("0B1"), None);
        assert_eq!(movie_key("  "), None);
    }

    #[test]
    fn budgets() {
        assert_eq!(format_budget(Some(0.0)), "$0");
        assert_eq!(format_budget(None), "$0");
        assert_eq!(format_budget(Some(f64::NAN)), "$0");
        assert_eq!(format_budget(Some(1000.0)), "$1,000");
        assert_eq!(format_budget(Some(999.0)), "$999");
        assert_eq!(format_budget(Some(30_000_000.0)), "$30,000,000");
        assert_eq!(format_budget(Some(1234.5)), "$1,234.5");
        assert_eq!(format_budget(Some(0.12345)), "$0.123");
        assert_eq!(format_budget(Some(-2500.0)), "$-2,500");
    }

    #[test]
    fn ratings_round_to_two_places() {
        assert_eq!(round_rating(7.5), 7.5);
        assert_eq!(round_rating(3.125), 3.13);
        assert_eq!(round_rating(21.5 / 20.0), 1.07);
        assert_eq!(round_rating(10.0 / 3.0), 3.33);
        assert_eq!(round_rating(2.0 / 3.0), 0.67);
        assert_eq!(round_rating(4.999), 5.0);
        assert_eq!(round_rating(-1.125), -1.13);
    }

    #[test]
    fn leading_ints() {
        assert_eq!(parse_leading_int("3"), Some(3));
        assert_eq!(parse_leading_int("  12abc"), Some(12));
        assert_eq!(parse_leading_int("-5"), Some(-5));
        assert_eq!(parse_leading_int("1.9"), Some(1));
        assert_eq!(parse_leading_int("0x1f"), Some(31));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("99999999999999999999999"), Some(i64::MAX));
    }
}
