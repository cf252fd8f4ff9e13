//! Single dense layer with a sigmoid output.

use ndarray::{Array1, ArrayView1, ArrayView2, Axis, s};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{MlError, MlResult};
use crate::loss::{binary_cross_entropy, sigmoid};
use crate::optimizer::Adam;

/// Training hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Passes over the data.
    pub epochs: usize,
    /// Rows per gradient step.
    pub batch_size: usize,
    /// Adam learning rate.
    pub learning_rate: f64,
    /// Reshuffle rows every epoch.
    pub shuffle: bool,
    /// Seed for shuffling; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            epochs: 10,
            batch_size: 32,
            learning_rate: 0.001,
            shuffle: true,
            seed: None,
        }
    }
}

impl FitConfig {
    /// Set the number of epochs.
    #[must_use]
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the learning rate.
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Fix the shuffling seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn validate(&self) -> MlResult<()> {
        if self.batch_size == 0 {
            return Err(MlError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(MlError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

/// Loss after each epoch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Mean binary cross-entropy over the epoch's batches.
    pub loss: Vec<f64>,
}

impl TrainingHistory {
    /// Loss after the last epoch.
    pub fn final_loss(&self) -> Option<f64> {
        self.loss.last().copied()
    }

    /// Number of epochs run.
    pub fn epochs(&self) -> usize {
        self.loss.len()
    }
}

/// `p(y = 1 | x) = sigmoid(w · x + b)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseClassifier {
    /// Weights followed by the bias.
    params: Array1<f64>,
}

impl DenseClassifier {
    /// Glorot-uniform weights and a zero bias, drawn from `seed`.
    pub fn new(n_features: usize, seed: u64) -> Self {
        Self::with_rng(n_features, &mut StdRng::seed_from_u64(seed))
    }

    /// Glorot-uniform weights and a zero bias, drawn from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(n_features: usize, rng: &mut R) -> Self {
        let limit = (6.0 / (n_features as f64 + 1.0)).sqrt();
        let params: Array1<f64> = (0..n_features)
            .map(|_| rng.gen_range(-limit..=limit))
            .chain(std::iter::once(0.0))
            .collect();
        Self { params }
    }

    /// Number of input features.
    pub fn n_features(&self) -> usize {
        self.params.len() - 1
    }

    /// Weight vector.
    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.params.slice(s![..-1])
    }

    /// Bias term.
    pub fn bias(&self) -> f64 {
        self.params[self.params.len() - 1]
    }

    fn check(&self, x: ArrayView2<'_, f64>) -> MlResult<()> {
        if x.ncols() != self.n_features() {
            return Err(MlError::ShapeMismatch {
                what: "feature columns",
                expected: self.n_features(),
                got: x.ncols(),
            });
        }
        crate::check_finite(x)
    }

    fn forward(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        let bias = self.bias();
        x.dot(&self.weights()).mapv(|z| sigmoid(z + bias))
    }

    /// Probability of class 1 for each row.
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> MlResult<Array1<f64>> {
        self.check(x)?;
        Ok(self.forward(x))
    }

    /// Class label for each row, thresholded at 0.5.
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> MlResult<Array1<u8>> {
        Ok(self.predict_proba(x)?.mapv(|p| u8::from(p >= 0.5)))
    }

    /// Fit on rows `x` and targets `y` in `[0, 1]`.
    ///
    /// Targets need not be hard labels; soft targets are trained against
    /// with the same loss.
    pub fn fit(
        &mut self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
        config: &FitConfig,
    ) -> MlResult<TrainingHistory> {
        config.validate()?;
        if x.nrows() == 0 {
            return Err(MlError::EmptyData);
        }
        self.check(x)?;
        if y.len() != x.nrows() {
            return Err(MlError::ShapeMismatch {
                what: "labels",
                expected: x.nrows(),
                got: y.len(),
            });
        }
        if let Some((row, &label)) = y
            .iter()
            .enumerate()
            .find(|(_, l)| !(0.0..=1.0).contains(*l))
        {
            return Err(MlError::InvalidLabel(label, row));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut adam = Adam::new().with_learning_rate(config.learning_rate);
        let mut order: Vec<usize> = (0..x.nrows()).collect();
        let mut history = TrainingHistory::default();

        info!(
            rows = x.nrows(),
            features = self.n_features(),
            epochs = config.epochs,
            "training dense classifier"
        );

        for epoch in 0..config.epochs {
            if config.shuffle {
                order.shuffle(&mut rng);
            }

            let mut weighted_loss = 0.0;
            for batch in order.chunks(config.batch_size) {
                let xb = x.select(Axis(0), batch);
                let yb = y.select(Axis(0), batch);
                let p = self.forward(xb.view());
                weighted_loss += binary_cross_entropy(yb.view(), p.view()) * batch.len() as f64;

                // d(BCE)/d(logit) = p - y
                let err = (&p - &yb) / batch.len() as f64;
                let mut grads = Array1::<f64>::zeros(self.params.len());
                grads.slice_mut(s![..-1]).assign(&xb.t().dot(&err));
                grads[self.params.len() - 1] = err.sum();

                adam.step(&mut self.params, grads.view());
            }

            let loss = weighted_loss / x.nrows() as f64;
            debug!(epoch = epoch + 1, loss, "epoch finished");
            history.loss.push(loss);
        }

        Ok(history)
    }
}
