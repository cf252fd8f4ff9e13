//! Adam optimizer.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

/// Adam with bias correction folded into the step size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adam {
    /// Learning rate.
    pub learning_rate: f64,
    /// Decay of the first-moment estimate.
    pub beta1: f64,
    /// Decay of the second-moment estimate.
    pub beta2: f64,
    /// Denominator fuzz.
    pub epsilon: f64,
    #[serde(skip)]
    state: Option<Moments>,
}

#[derive(Debug, Clone)]
struct Moments {
    step: i32,
    m: Array1<f64>,
    v: Array1<f64>,
}

impl Default for Adam {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            state: None,
        }
    }
}

impl Adam {
    /// Adam with default hyperparameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the learning rate.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set both moment decays.
    #[must_use]
    pub fn with_betas(mut self, beta1: f64, beta2: f64) -> Self {
        self.beta1 = beta1;
        self.beta2 = beta2;
        self
    }

    /// Number of updates applied so far.
    pub fn steps(&self) -> i32 {
        self.state.as_ref().map_or(0, |s| s.step)
    }

    /// Apply one update to `params` in place.
    ///
    /// Moment buffers are sized on first use; a later call with a different
    /// length restarts them.
    pub fn step(&mut self, params: &mut Array1<f64>, grads: ArrayView1<'_, f64>) {
        let n = params.len();
        if self.state.as_ref().is_some_and(|s| s.m.len() != n) {
            self.state = None;
        }
        let state = self.state.get_or_insert_with(|| Moments {
            step: 0,
            m: Array1::zeros(n),
            v: Array1::zeros(n),
        });
        state.step += 1;

        let (b1, b2, eps) = (self.beta1, self.beta2, self.epsilon);
        let lr_t = self.learning_rate * (1.0 - b2.powi(state.step)).sqrt()
            / (1.0 - b1.powi(state.step));

        ndarray::Zip::from(params)
            .and(&mut state.m)
            .and(&mut state.v)
            .and(grads)
            .for_each(|p, m, v, &g| {
                *m = b1 * *m + (1.0 - b1) * g;
                *v = b2 * *v + (1.0 - b2) * g * g;
                *p -= lr_t * *m / (v.sqrt() + eps);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_defaults() {
        let adam = Adam::new();
        assert_eq!(adam.learning_rate, 0.001);
        assert_eq!(adam.epsilon, 1e-7);
        assert_eq!(adam.steps(), 0);
    }

    #[test]
    fn test_first_step_moves_by_learning_rate() {
        let mut adam = Adam::new().with_learning_rate(0.1);
        let mut params = array![1.0, -1.0];
        adam.step(&mut params, array![2.0, -0.5].view());
        assert!((params[0] - 0.9).abs() < 1e-5);
        assert!((params[1] + 0.9).abs() < 1e-5);
        assert_eq!(adam.steps(), 1);
    }

    #[test]
    fn test_minimizes_quadratic() {
        let mut adam = Adam::new().with_learning_rate(0.05);
        let mut x = array![3.0];
        for _ in 0..1000 {
            let grad = array![2.0 * x[0]];
            adam.step(&mut x, grad.view());
        }
        assert!(x[0].abs() < 0.1, "x = {}", x[0]);
    }
}
