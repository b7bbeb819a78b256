//! Gauss-Legendre nodes and weights on [-1, 1].
//!
//! The n Gauss-Legendre nodes are the roots of P_n(x). An n-point rule is
//! exact for polynomials up to degree 2n-1.

use std::f64::consts::PI;

/// Evaluate P_n(x) and P'_n(x) with the three-term recurrence.
///
/// (n+1) P_{n+1}(x) = (2n+1) x P_n(x) - n P_{n-1}(x)
pub fn legendre_and_derivative(n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }
    if n == 1 {
        return (x, 1.0);
    }

    let mut p_prev = 1.0; // P_0
    let mut p_curr = x; // P_1

    for k in 1..n {
        let p_next = ((2 * k + 1) as f64 * x * p_curr - k as f64 * p_prev) / (k + 1) as f64;
        p_prev = p_curr;
        p_curr = p_next;
    }

    let dp_n = if (x - 1.0).abs() < 1e-14 {
        (n * (n + 1)) as f64 / 2.0
    } else if (x + 1.0).abs() < 1e-14 {
        let sign = if n % 2 == 0 { -1.0 } else { 1.0 };
        sign * (n * (n + 1)) as f64 / 2.0
    } else {
        n as f64 * (x * p_curr - p_prev) / (x * x - 1.0)
    };

    (p_curr, dp_n)
}

/// Gauss-Legendre nodes and weights for an n-point rule, nodes ascending.
///
/// Uses Newton iteration started from the Chebyshev-like guess
/// x_i = cos(π (i + 3/4) / (n + 1/2)).
///
/// # Panics
///
/// Panics if `n == 0`.
pub fn gauss_legendre(n: usize) -> (Vec<f64>, Vec<f64>) {
    assert!(n > 0, "Need at least one Gauss point");

    let mut nodes = vec![0.0; n];
    let mut weights = vec![0.0; n];

    for i in 0..n {
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();

        for _ in 0..100 {
            let (p, dp) = legendre_and_derivative(n, x);
            let update = p / dp;
            x -= update;
            if update.abs() < 1e-16 {
                break;
            }
        }

        let (_, dp) = legendre_and_derivative(n, x);
        // Guess i approaches the i-th largest root; store ascending.
        nodes[n - 1 - i] = x;
        weights[n - 1 - i] = 2.0 / ((1.0 - x * x) * dp * dp);
    }

    (nodes, weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legendre_values() {
        let x = 0.5;
        assert!((legendre_and_derivative(2, x).0 - (3.0 * x * x - 1.0) / 2.0).abs() < 1e-14);
        assert!((legendre_and_derivative(3, x).0 - (5.0 * x * x * x - 3.0 * x) / 2.0).abs() < 1e-14);
        assert!((legendre_and_derivative(3, x).1 - (15.0 * x * x - 3.0) / 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_known_two_point_rule() {
        let (nodes, weights) = gauss_legendre(2);
        let r = 1.0 / 3f64.sqrt();
        assert!((nodes[0] + r).abs() < 1e-15);
        assert!((nodes[1] - r).abs() < 1e-15);
        assert!((weights[0] - 1.0).abs() < 1e-15);
        assert!((weights[1] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_weights_sum() {
        for n in 1..=10 {
            let (_, weights) = gauss_legendre(n);
            let sum: f64 = weights.iter().sum();
            assert!((sum - 2.0).abs() < 1e-13, "Weights should sum to 2, got {}", sum);
        }
    }

    #[test]
    fn test_nodes_ascending_and_symmetric() {
        for n in 1..=8 {
            let (nodes, _) = gauss_legendre(n);
            for i in 1..n {
                assert!(nodes[i] > nodes[i - 1]);
            }
            for i in 0..n / 2 {
                assert!((nodes[i] + nodes[n - 1 - i]).abs() < 1e-14);
            }
        }
    }

    #[test]
    fn test_quadrature_exactness() {
        for n in 1..=6 {
            let (nodes, weights) = gauss_legendre(n);
            for k in 0..2 * n {
                let numeric: f64 = nodes
                    .iter()
                    .zip(&weights)
                    .map(|(&x, &w)| w * x.powi(k as i32))
                    .sum();
                let exact = if k % 2 == 1 { 0.0 } else { 2.0 / (k + 1) as f64 };
                assert!(
                    (numeric - exact).abs() < 1e-13,
                    "n={} should integrate x^{} exactly: {} vs {}",
                    n,
                    k,
                    numeric,
                    exact
                );
            }
        }
    }
}
