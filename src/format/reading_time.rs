//! Reading-time bucketing.
//!
//! Turns `"<N> min read"` into a row of glyphs followed by the same text.
//! Short reads get one glyph per minute; from five minutes on the count
//! is `round(N / e)`. The drop from 4 glyphs at N=4 to 2 at N=5 is kept
//! as is.

use std::f64::consts::E;

/// Glyph repeated once per unit.
pub const DEFAULT_GLYPH: &str = "☕️";

/// Minutes at which the count switches from linear to `round(N / e)`.
const SCALE_THRESHOLD: f64 = 5.0;

/// Longest glyph row rendered; anything beyond is clamped to it.
pub const MAX_UNITS: usize = 60;

/// Number of glyphs for a minute count, at most [`MAX_UNITS`].
pub fn unit_count(minutes: f64) -> usize {
    if minutes >= SCALE_THRESHOLD {
        (minutes / E).round().min(MAX_UNITS as f64) as usize
    } else if minutes > 0.0 {
        minutes as usize
    } else {
        // zero, negative and NaN
        0
    }
}

/// Render a reading-time string with its glyph prefix.
///
/// With zero units the text is returned without a leading separator.
pub fn bucket_reading_time(text: &str, glyph: &str) -> String {
    let token = text.split_whitespace().next().unwrap_or_default();
    let minutes = token.parse::<f64>().unwrap_or(f64::NAN);
    let label = format!("{} min read", token);

    match unit_count(minutes) {
        0 => label,
        units => format!("{} {}", glyph.repeat(units), label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cups(n: usize) -> String {
        DEFAULT_GLYPH.repeat(n)
    }

    #[test]
    fn test_short_read_is_linear() {
        assert_eq!(
            bucket_reading_time("3 min read", DEFAULT_GLYPH),
            format!("{} 3 min read", cups(3))
        );
        assert_eq!(
            bucket_reading_time("4 min read", DEFAULT_GLYPH),
            format!("{} 4 min read", cups(4))
        );
    }

    #[test]
    fn test_long_read_is_scaled_by_e() {
        assert_eq!(
            bucket_reading_time("10 min read", DEFAULT_GLYPH),
            format!("{} 10 min read", cups(4))
        );
        assert_eq!(unit_count(27.0), 10);
    }

    #[test]
    fn test_threshold_discontinuity_is_preserved() {
        assert_eq!(unit_count(4.0), 4);
        assert_eq!(unit_count(5.0), 2);
        assert_eq!(
            bucket_reading_time("5 min read", DEFAULT_GLYPH),
            format!("{} 5 min read", cups(2))
        );
    }

    #[test]
    fn test_zero_has_no_prefix_or_separator() {
        assert_eq!(bucket_reading_time("0 min read", DEFAULT_GLYPH), "0 min read");
    }

    #[test]
    fn test_huge_counts_are_clamped() {
        assert_eq!(unit_count(1e20), MAX_UNITS);
        assert_eq!(unit_count(f64::INFINITY), MAX_UNITS);
        assert_eq!(
            bucket_reading_time("100000000000000000000 min read", "*"),
            format!("{} 100000000000000000000 min read", "*".repeat(MAX_UNITS))
        );
        // Just below the clamp is still round(N / e)
        assert_eq!(unit_count(160.0), 59);
    }

    #[test]
    fn test_fractional_and_non_numeric_tokens() {
        assert_eq!(unit_count(2.5), 2);
        assert_eq!(bucket_reading_time("a few min read", "*"), "a min read");
        assert_eq!(bucket_reading_time("2 min read", "*"), "** 2 min read");
    }
}
