//! Fixed-point arithmetic shared by the reward accumulators.

/// Fixed-point scaling factor.
///
/// Every cumulative price is multiplied by this constant before storage so
/// that per-unit rewards smaller than one token unit are not lost. 10^12
/// leaves ample headroom in `i128` for Stellar's 7-decimal token amounts.
pub const PRECISION: i128 = 1_000_000_000_000;

/// Denominator for ratios expressed in basis points.
pub const BPS_DENOMINATOR: i128 = 10_000;

/// `a * b / denominator`, saturating on overflow and returning zero for a
/// non-positive denominator.
#[allow(clippy::arithmetic_side_effects)]
pub fn mul_div(a: i128, b: i128, denominator: i128) -> i128 {
    if denominator <= 0 {
        return 0;
    }
    a.saturating_mul(b) / denominator
}

/// Portion of `amount` represented by `bps` basis points.
pub fn apply_bps(amount: i128, bps: u32) -> i128 {
    mul_div(amount, bps as i128, BPS_DENOMINATOR)
}

/// Growth of a monotone accumulator between a stored snapshot and its
/// current value. Never negative.
pub fn delta(current: i128, snapshot: i128) -> i128 {
    current.saturating_sub(snapshot).max(0)
}

/// Reward accrued by `amount` units while a `PRECISION`-scaled price moved
/// from `snapshot` to `price`.
pub fn accrued(amount: i128, price: i128, snapshot: i128) -> i128 {
    mul_div(amount, delta(price, snapshot), PRECISION)
}
