use crate::math::matrix::Matrix;

/// Logistic squashing function, mapping any real value into (0, 1).
///
/// At extreme magnitudes the exponential saturates and the result is exactly
/// `0.0` or `1.0`. That is left alone: a saturated unit simply stops learning.
#[inline]
pub fn squash(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of [`squash`] written in terms of its *output*.
///
/// `y` must already be squashed: pass `squash(z)`, never `z`.
#[inline]
pub fn squash_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}

/// Element-wise [`squash`].
pub fn squash_matrix(m: &Matrix) -> Matrix {
    m.map(squash)
}

/// Element-wise [`squash_derivative`] of an already-squashed matrix.
pub fn squash_derivative_matrix(m: &Matrix) -> Matrix {
    m.map(squash_derivative)
}
