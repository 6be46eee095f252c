//! Credit amounts and their display form.

/// An amount of credits. Signed so that debts and price deltas fit.
pub type Credits = i64;

/// Display thresholds, largest first.
const SUFFIXES: [(Credits, f64, char); 5] = [
    (1_000_000_000_000_000, 1e15, 'Q'),
    (1_000_000_000_000, 1e12, 'T'),
    (1_000_000_000, 1e9, 'B'),
    (1_000_000, 1e6, 'M'),
    (1_000, 1e3, 'K'),
];

/// Format a credit amount using thousand/million/billion/trillion/quadrillion
/// suffixes with `decimals` digits after the point.
///
/// A negative `decimals` always yields the raw integer, as does any amount
/// below one thousand.
///
/// ```
/// use starlane_core::credits::format_credits;
/// assert_eq!(format_credits(1_500_000, 1), "1.5M");
/// assert_eq!(format_credits(999, 2), "999");
/// assert_eq!(format_credits(1_500_000, -1), "1500000");
/// ```
pub fn format_credits(credits: Credits, decimals: i32) -> String {
    if decimals < 0 {
        return credits.to_string();
    }
    let precision = decimals as usize;
    for (threshold, divisor, suffix) in SUFFIXES {
        if credits >= threshold {
            return format!("{:.*}{}", precision, credits as f64 / divisor, suffix);
        }
    }
    credits.to_string()
}
