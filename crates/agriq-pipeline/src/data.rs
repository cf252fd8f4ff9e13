//! Input samples.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Soil nutrient levels, one rotation angle each.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    /// Nitrogen level.
    pub nitrogen: f64,
    /// Phosphorus level.
    pub phosphorus: f64,
    /// Potassium level.
    pub potassium: f64,
}

impl Default for SoilSample {
    fn default() -> Self {
        Self::new(0.2, 0.4, 0.8)
    }
}

impl SoilSample {
    /// Create a sample.
    pub fn new(nitrogen: f64, phosphorus: f64, potassium: f64) -> Self {
        Self {
            nitrogen,
            phosphorus,
            potassium,
        }
    }

    /// Features in encoding order: N, P, K.
    pub fn features(&self) -> [f64; 3] {
        [self.nitrogen, self.phosphorus, self.potassium]
    }

    /// Reject NaN and infinite levels.
    pub fn validate(&self) -> PipelineResult<()> {
        for (name, value) in ["nitrogen", "phosphorus", "potassium"]
            .into_iter()
            .zip(self.features())
        {
            if !value.is_finite() {
                return Err(PipelineError::InvalidInput(format!("{name} is {value}")));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for SoilSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "N={} P={} K={}",
            self.nitrogen, self.phosphorus, self.potassium
        )
    }
}

/// `n` scalars drawn uniformly from `[0, 1)`.
pub fn synthetic_scalars<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    (0..n).map(|_| rng.r#gen::<f64>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_default_sample() {
        assert_eq!(SoilSample::default().features(), [0.2, 0.4, 0.8]);
        assert_eq!(SoilSample::default().to_string(), "N=0.2 P=0.4 K=0.8");
    }

    #[test]
    fn test_validate_rejects_nan() {
        let err = SoilSample::new(0.1, f64::NAN, 0.3).validate().unwrap_err();
        assert!(err.to_string().contains("phosphorus"));
    }

    #[test]
    fn test_synthetic_scalars() {
        let a = synthetic_scalars(10, &mut StdRng::seed_from_u64(4));
        let b = synthetic_scalars(10, &mut StdRng::seed_from_u64(4));
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
        assert!(a.iter().all(|x| (0.0..1.0).contains(x)));
    }
}
