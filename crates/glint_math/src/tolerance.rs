//! Floating point tolerance helpers shared by every intersection routine.

/// Values closer to zero than this are treated as exactly zero.
pub const EPSILON: f64 = 1e-10;

/// Snap `x` to zero when it is within [`EPSILON`] of it.
#[inline]
pub fn align_zero(x: f64) -> f64 {
    if x.abs() < EPSILON {
        0.0
    } else {
        x
    }
}

/// Returns true if `x` is within [`EPSILON`] of zero.
#[inline]
pub fn is_zero(x: f64) -> bool {
    x.abs() < EPSILON
}

/// Returns true if `a` and `b` are both non-zero and share a sign.
#[inline]
pub fn check_sign(a: f64, b: f64) -> bool {
    a * b > 0.0
}
