//! Classical post-processing model for agriq pipelines.
//!
//! A single dense layer with a sigmoid output, trained with Adam on binary
//! cross-entropy. Features are scaled with [`scale_symmetric`] or a
//! [`MinMaxScaler`] before fitting.
//!
//! ```rust
//! use agriq_ml::{DenseClassifier, FitConfig};
//! use ndarray::array;
//!
//! let x = array![[-0.8], [-0.3], [0.4], [0.9]];
//! let y = array![0.0, 0.0, 1.0, 1.0];
//!
//! let mut model = DenseClassifier::new(1, 42);
//! let config = FitConfig::default().with_epochs(5).with_seed(0);
//! let history = model.fit(x.view(), y.view(), &config)?;
//! assert_eq!(history.epochs(), 5);
//! # Ok::<(), agriq_ml::MlError>(())
//! ```

pub mod error;
pub mod loss;
pub mod model;
pub mod optimizer;
pub mod scaling;

pub use error::{MlError, MlResult};
pub use loss::{binary_cross_entropy, sigmoid};
pub use model::{DenseClassifier, FitConfig, TrainingHistory};
pub use optimizer::Adam;
pub use scaling::{MinMaxScaler, scale_symmetric};

use ndarray::ArrayView2;

fn check_finite(x: ArrayView2<'_, f64>) -> MlResult<()> {
    match x.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), _)) => Err(MlError::NonFinite { row, col }),
        None => Ok(()),
    }
}
