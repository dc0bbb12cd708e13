// =============================================================================
// Output Precision
// =============================================================================
//
// Every number the engine emits is rounded to 4 decimal places.  The result
// is a plain f64 (12.5000 is simply 12.5), so serialisers never print
// trailing zeros.
//
// Rounding works on the exact decimal expansion of the f64, half away from
// zero.  Scaling by 10^4 first would round the binary product instead, and
// 2.00005 (stored as 2.0000499999...) would wrongly come out as 2.0001.

/// Magnitudes at or above this carry no fractional digits worth rounding,
/// and scaling them could overflow.
const PASS_THROUGH_ABOVE: f64 = 1e15;

/// Digits after the point used to read the exact expansion.  Deep enough that
/// a value never lands on a false half-way point for any magnitude that can
/// round to something other than zero.
const EXPANSION_DIGITS: usize = 40;

/// Round `value` to 4 decimal places.  Non-finite input passes through
/// unchanged so callers can still detect it.
pub fn round4(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= PASS_THROUGH_ABOVE {
        return value;
    }

    let expansion = format!("{:.*}", EXPANSION_DIGITS, value.abs());
    let Some((whole, fraction)) = expansion.split_once('.') else {
        return value;
    };
    let (kept, rest) = fraction.split_at(4);
    let (Ok(whole), Ok(kept)) = (whole.parse::<u64>(), kept.parse::<u64>()) else {
        return value;
    };

    let mut units = whole * 10_000 + kept;
    if rest.as_bytes()[0] >= b'5' {
        units += 1;
    }

    let magnitude = format!("{}.{:04}", units / 10_000, units % 10_000)
        .parse::<f64>()
        .unwrap_or(value.abs());
    // Avoid emitting -0.0 for tiny negative values.
    if magnitude == 0.0 {
        0.0
    } else {
        magnitude.copysign(value)
    }
}
