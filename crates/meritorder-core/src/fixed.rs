use fixed::types::{I32F32, I64F64};

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Every quantity inside the market (outputs, prices, costs, scores) is a
/// `Fixed64`, so a replay of the same history is bit-identical no matter how
/// many threads took part.
pub type Fixed64 = I32F32;

/// Q64.64 fixed-point for whole-game totals.
///
/// A single round fits comfortably in `Fixed64`, but sums over many rounds
/// and the worst-case bounds derived from them do not.
pub type Fixed128 = I64F64;

/// Number of decimal digits kept on published metrics.
pub const PUBLISHED_DIGITS: i32 = 2;

/// Convert an f64 to Fixed64. Use only when loading input, never mid-replay.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display and published metrics.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Lossless widening for accumulation across rounds.
#[inline]
pub fn widen(v: Fixed64) -> Fixed128 {
    Fixed128::from_num(v)
}

/// Convert to f64 and round half away from zero to `digits` decimals.
#[inline]
pub fn round_to(v: Fixed128, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (v.to_num::<f64>() * scale).round() / scale
}

/// Round a metric for publication (two decimal digits).
#[inline]
pub fn publish(v: Fixed128) -> f64 {
    round_to(v, PUBLISHED_DIGITS)
}

/// Checked addition. `None` when the sum leaves the Q32.32 range.
#[inline]
pub fn checked_add_64(a: Fixed64, b: Fixed64) -> Option<Fixed64> {
    a.checked_add(b)
}

/// Checked multiplication. `None` when the product leaves the Q32.32 range.
#[inline]
pub fn checked_mul_64(a: Fixed64, b: Fixed64) -> Option<Fixed64> {
    a.checked_mul(b)
}

/// `num / den`, or `fallback` when `den` is zero.
///
/// Every normalisation in the scoring layer goes through here so that the
/// degenerate "all teams tied" case is one explicit branch.
#[inline]
pub fn ratio_or(num: Fixed64, den: Fixed64, fallback: Fixed64) -> Fixed64 {
    if den == Fixed64::ZERO {
        fallback
    } else {
        num / den
    }
}

/// [`ratio_or`] on wide values.
#[inline]
pub fn ratio_or_wide(num: Fixed128, den: Fixed128, fallback: Fixed128) -> Fixed128 {
    if den == Fixed128::ZERO {
        fallback
    } else {
        num / den
    }
}

/// Clamp `v` into `[lo, hi]`.
#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}
