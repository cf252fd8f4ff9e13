//! Binary cross-entropy.

use ndarray::ArrayView1;

/// Probabilities are clipped to `[EPSILON, 1 - EPSILON]` before the log.
pub const EPSILON: f64 = 1e-7;

/// Mean binary cross-entropy of predicted probabilities against targets.
///
/// Targets may be soft labels in `[0, 1]`. Returns 0 for empty input.
pub fn binary_cross_entropy(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let total: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&y, &p)| {
            let p = p.clamp(EPSILON, 1.0 - EPSILON);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();
    total / y_true.len() as f64
}

/// Logistic function.
#[inline]
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_perfect_prediction_is_near_zero() {
        let y = array![1.0, 0.0];
        let loss = binary_cross_entropy(y.view(), y.view());
        assert!(loss < 1e-6);
    }

    #[test]
    fn test_coin_flip_is_ln2() {
        let y = array![1.0, 0.0, 1.0];
        let p = array![0.5, 0.5, 0.5];
        let loss = binary_cross_entropy(y.view(), p.view());
        assert!((loss - std::f64::consts::LN_2).abs() < 1e-12);
    }

    #[test]
    fn test_clipping_keeps_loss_finite() {
        let loss = binary_cross_entropy(array![1.0].view(), array![0.0].view());
        assert!(loss.is_finite());
        assert!((loss + EPSILON.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!((sigmoid(800.0) - 1.0).abs() < 1e-12);
    }
}
