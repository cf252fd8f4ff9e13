//! Feature-to-angle encodings.

use agriq_ir::ParameterExpression;
use serde::{Deserialize, Serialize};

/// How a scalar feature becomes a rotation angle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureEncoding {
    /// The feature is the angle.
    #[default]
    Identity,
    /// `angle = feature * pi * factor`.
    ScaledPi {
        /// Multiplier on pi.
        factor: f64,
    },
}

impl FeatureEncoding {
    /// `x * pi / 2`.
    pub const HALF_PI: Self = FeatureEncoding::ScaledPi { factor: 0.5 };

    /// Whether every feature value maps to a finite angle.
    pub fn is_finite(&self) -> bool {
        match self {
            FeatureEncoding::Identity => true,
            FeatureEncoding::ScaledPi { factor } => factor.is_finite(),
        }
    }

    /// Angle for a concrete feature value.
    pub fn angle(&self, x: f64) -> f64 {
        match self {
            FeatureEncoding::Identity => x,
            FeatureEncoding::ScaledPi { factor } => x * std::f64::consts::PI * factor,
        }
    }

    /// Symbolic angle for the feature named `symbol`.
    pub fn expression(&self, symbol: &str) -> ParameterExpression {
        let x = ParameterExpression::symbol(symbol);
        match self {
            FeatureEncoding::Identity => x,
            FeatureEncoding::ScaledPi { factor } => x * ParameterExpression::pi() * *factor,
        }
    }
}
