//! Reduction of measured bits to labels.

use agriq_hal::ExecutionResult;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Rule turning the bit-0 record of a measurement key into labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelReduction {
    /// Bit 0 of the first shot.
    FirstShotBit,
    /// Bit 0 of every shot, one label per shot.
    PerShotBit,
    /// Fraction of shots with bit 0 set, in `[0, 1]`.
    MeanOfBit,
    /// 1 when at least half the shots have bit 0 set.
    Majority,
}

impl LabelReduction {
    /// Whether the rule yields exactly one label.
    pub fn is_scalar(self) -> bool {
        !matches!(self, LabelReduction::PerShotBit)
    }

    /// Apply the rule to the record of `key`.
    pub fn reduce(self, result: &ExecutionResult, key: &str) -> PipelineResult<Vec<f64>> {
        let bits = result.measurements.column(key, 0)?;
        if bits.is_empty() {
            return Err(PipelineError::NoShots(key.to_string()));
        }
        let mean = || bits.iter().map(|&b| f64::from(b)).sum::<f64>() / bits.len() as f64;

        Ok(match self {
            LabelReduction::FirstShotBit => vec![f64::from(bits[0])],
            LabelReduction::PerShotBit => bits.iter().map(|&b| f64::from(b)).collect(),
            LabelReduction::MeanOfBit => vec![mean()],
            LabelReduction::Majority => vec![if mean() >= 0.5 { 1.0 } else { 0.0 }],
        })
    }

    /// Apply a single-label rule.
    pub fn reduce_scalar(self, result: &ExecutionResult, key: &str) -> PipelineResult<f64> {
        if !self.is_scalar() {
            return Err(PipelineError::Config(format!(
                "{self:?} yields one label per shot"
            )));
        }
        let labels = self.reduce(result, key)?;
        labels
            .first()
            .copied()
            .ok_or_else(|| PipelineError::NoShots(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agriq_hal::{Counts, HalError, Measurements};

    fn result_with(shots: &[u8]) -> ExecutionResult {
        let mut m = Measurements::new();
        for &b in shots {
            m.push_shot("m", vec![b, 1 - b]);
        }
        ExecutionResult::new(Counts::new(), shots.len() as u32).with_measurements(m)
    }

    #[test]
    fn test_first_shot_bit() {
        let r = result_with(&[0, 1, 1]);
        assert_eq!(LabelReduction::FirstShotBit.reduce_scalar(&r, "m").unwrap(), 0.0);
    }

    #[test]
    fn test_per_shot_bit() {
        let r = result_with(&[0, 1, 1, 0]);
        assert_eq!(
            LabelReduction::PerShotBit.reduce(&r, "m").unwrap(),
            vec![0.0, 1.0, 1.0, 0.0]
        );
        assert!(LabelReduction::PerShotBit.reduce_scalar(&r, "m").is_err());
    }

    #[test]
    fn test_mean_and_majority() {
        let r = result_with(&[1, 1, 0, 1]);
        assert_eq!(LabelReduction::MeanOfBit.reduce_scalar(&r, "m").unwrap(), 0.75);
        assert_eq!(LabelReduction::Majority.reduce_scalar(&r, "m").unwrap(), 1.0);

        let tie = result_with(&[1, 0]);
        assert_eq!(LabelReduction::Majority.reduce_scalar(&tie, "m").unwrap(), 1.0);
    }

    #[test]
    fn test_unknown_key() {
        let r = result_with(&[1]);
        let err = LabelReduction::MeanOfBit.reduce(&r, "other").unwrap_err();
        assert!(matches!(err, PipelineError::Hal(HalError::UnknownKey(_))));
    }

    #[test]
    fn test_empty_record() {
        let r = result_with(&[]);
        assert!(LabelReduction::FirstShotBit.reduce(&r, "m").is_err());
    }
}
