//! Confidence estimation for a combined classification.

/// Default z-score for the Wilson interval (95% two-sided).
pub const DEFAULT_Z: f64 = 1.96;

/// Lower bound of the Wilson score interval for a proportion.
///
/// `p` is the observed share (clamped to `[0, 1]`) and `n` the number of
/// observations behind it. Returns `0.0` when `n` is zero.
pub fn wilson_score(p: f64, n: usize, z: f64) -> f64 {
    if n == 0 {
        return 0.0;
    }

    let p = p.clamp(0.0, 1.0);
    let n = n as f64;
    let z2 = z * z;

    let center = p + z2 / (2.0 * n);
    let spread = z * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt();
    (center - spread) / (1.0 + z2 / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wilson_known_value() {
        // 8 of 10 at 95%: lower bound ~0.4902
        assert_relative_eq!(wilson_score(0.8, 10, DEFAULT_Z), 0.49016, epsilon = 1e-4);
    }

    #[test]
    fn test_wilson_grows_with_evidence() {
        let few = wilson_score(0.8, 5, DEFAULT_Z);
        let many = wilson_score(0.8, 500, DEFAULT_Z);
        assert!(few < many);
        assert!(many < 0.8);
    }

    #[test]
    fn test_wilson_degenerate_inputs() {
        assert_eq!(wilson_score(0.5, 0, DEFAULT_Z), 0.0);
        assert_relative_eq!(wilson_score(0.0, 10, DEFAULT_Z), 0.0);
        assert_relative_eq!(wilson_score(1.0, 4, 0.0), 1.0);
    }
}
