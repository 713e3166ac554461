//! Numerical stability utilities.
//!
//! Provides safe implementations of the nonlinear reductions and transforms
//! used by bounded priors and mixture aggregation, which overflow or lose
//! precision in naïve form.
//!
//! # Provided items
//! - [`GENERAL_TOL`]: generic small tolerance used when a scale statistic
//!   collapses to (numerically) zero.
//! - [`safe_logistic(x)`]: stable `1 / (1 + exp(-x))`, mapping ℝ → (0, 1).
//! - [`logsumexp`]: max-shifted `ln Σ exp(xᵢ)` over any iterator of values.
//!
//! # Rationale
//! Mixture log-likelihoods are sums of exponentials of very negative
//! numbers; shifting by the maximum keeps every `exp` in `[0, 1]`.

/// Generic tolerance for "effectively zero" scale statistics.
pub const GENERAL_TOL: f64 = 1e-12;

/// Numerically stable logistic `σ(x) = 1 / (1 + exp(-x))`.
///
/// Evaluates the branch whose exponent is non-positive so neither `exp`
/// overflows:
///
/// - `x ≥ 0`: `1 / (1 + exp(-x))`
/// - `x < 0`: `exp(x) / (1 + exp(x))`
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `σ(x)` in `(0, 1)` for finite `x`; `0` and `1` at `∓∞`.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Max-shifted log-sum-exp: `ln Σᵢ exp(xᵢ)`.
///
/// - Empty input returns `-∞` (the log of an empty sum).
/// - If the maximum is not finite (all `-∞`, or any `+∞`/NaN) it is returned
///   as-is, so a row where every component has zero likelihood stays `-∞`.
pub fn logsumexp<'a, I>(xs: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
    I::IntoIter: Clone,
{
    let iter = xs.into_iter();
    let m = iter.clone().fold(f64::NEG_INFINITY, |m, &x| if x > m || x.is_nan() { x } else { m });
    if !m.is_finite() {
        return m;
    }
    let s: f64 = iter.map(|&x| (x - m).exp()).sum();
    m + s.ln()
}
