//! Feature scaling.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{MlError, MlResult};

/// Map `[0, 1]` onto `[-1, 1]`.
#[inline]
pub fn scale_symmetric(x: f64) -> f64 {
    2.0 * x - 1.0
}

/// Per-column min-max scaling onto a target range, `[0, 1]` by default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    range: (f64, f64),
    min: Array1<f64>,
    max: Array1<f64>,
}

impl MinMaxScaler {
    /// Learn the column ranges of `x`, scaling onto `[0, 1]`.
    pub fn fit(x: ArrayView2<'_, f64>) -> MlResult<Self> {
        Self::fit_with_range(x, (0.0, 1.0))
    }

    /// Learn the column ranges of `x`, scaling onto `range`.
    pub fn fit_with_range(x: ArrayView2<'_, f64>, range: (f64, f64)) -> MlResult<Self> {
        if x.nrows() == 0 {
            return Err(MlError::EmptyData);
        }
        if !(range.0 < range.1) {
            return Err(MlError::InvalidConfig(format!(
                "feature range ({}, {}) is empty",
                range.0, range.1
            )));
        }
        crate::check_finite(x)?;

        let fold = |init: f64, f: fn(f64, f64) -> f64| {
            x.fold_axis(Axis(0), init, |&acc, &v| f(acc, v))
        };
        Ok(Self {
            range,
            min: fold(f64::INFINITY, f64::min),
            max: fold(f64::NEG_INFINITY, f64::max),
        })
    }

    /// Number of columns the scaler was fitted on.
    pub fn n_features(&self) -> usize {
        self.min.len()
    }

    /// Scale `x` column by column. Constant columns map to the range minimum.
    pub fn transform(&self, x: ArrayView2<'_, f64>) -> MlResult<Array2<f64>> {
        if x.ncols() != self.n_features() {
            return Err(MlError::ShapeMismatch {
                what: "feature columns",
                expected: self.n_features(),
                got: x.ncols(),
            });
        }
        let (lo, hi) = self.range;
        let mut out = x.to_owned();
        for (mut col, (&min, &max)) in out
            .axis_iter_mut(Axis(1))
            .zip(self.min.iter().zip(self.max.iter()))
        {
            let span = max - min;
            col.mapv_inplace(|v| {
                let unit = if span > 0.0 { (v - min) / span } else { 0.0 };
                lo + unit * (hi - lo)
            });
        }
        Ok(out)
    }

    /// `fit` followed by `transform`.
    pub fn fit_transform(x: ArrayView2<'_, f64>) -> MlResult<(Self, Array2<f64>)> {
        let scaler = Self::fit(x)?;
        let scaled = scaler.transform(x)?;
        Ok((scaler, scaled))
    }
}
