//! Activation functions used to squash a neuron's incoming
//! activity into a bounded range, plus a few small numeric helpers.

/// Tolerance used by [`approx_eq`].
pub const EPSILON: f64 = 1e-9;

/// Returns `true` if the two values are equal, or differ
/// by less than [`EPSILON`].
///
/// # Examples
/// ```
/// use evonn_nn::math::approx_eq;
///
/// assert!(approx_eq(0.1 + 0.2, 0.3));
/// assert!(!approx_eq(0.1, 0.2));
/// ```
pub fn approx_eq(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() < EPSILON
}

/// Unipolar (logistic) sigmoid, bounded to `(0, 1)`.
///
/// Its derivative is `f(x) * (1 - f(x))`.
///
/// # Examples
/// ```
/// use evonn_nn::math::sigmoid;
///
/// assert_eq!(sigmoid(0.0), 0.5);
/// assert!((sigmoid(1.0) - 0.731).abs() < 1e-3);
/// assert!((sigmoid(-5.0) - 0.0067).abs() < 1e-3);
/// ```
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Bipolar sigmoid, bounded to `(-1, 1)`.
///
/// Its derivative is `0.5 * (1 + f(x)) * (1 - f(x))`.
///
/// # Examples
/// ```
/// use evonn_nn::math::bipolar_sigmoid;
///
/// assert_eq!(bipolar_sigmoid(0.0), 0.0);
/// assert!(bipolar_sigmoid(10.0) < 1.0);
/// assert!(bipolar_sigmoid(-10.0) > -1.0);
/// ```
pub fn bipolar_sigmoid(x: f64) -> f64 {
    2.0 * sigmoid(x) - 1.0
}

/// Hyperbolic tangent, bounded to `(-1, 1)`.
pub fn tanh(x: f64) -> f64 {
    x.tanh()
}

/// Derivative of [`tanh`], written in terms of the function's
/// *output*: pass `tanh(x)`, not `x`.
///
/// Evaluated on a raw input this is only an approximation of the
/// true derivative.
///
/// # Examples
/// ```
/// use evonn_nn::math::{tanh, tanh_derivative};
///
/// assert_eq!(tanh_derivative(tanh(0.0)), 1.0);
/// assert_eq!(tanh_derivative(0.5), 0.75);
/// ```
pub fn tanh_derivative(x: f64) -> f64 {
    1.0 - x.powi(2)
}
