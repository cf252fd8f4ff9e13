//! Pipeline configuration.
//!
//! Every field has a default, so an empty YAML document is a valid config.
//! The CLI applies its flags on top of whatever [`PipelineConfig::load_or_default`]
//! returns.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::SoilSample;
use crate::encoding::FeatureEncoding;
use crate::error::{PipelineError, PipelineResult};

/// Settings for all three pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Registered backend name.
    pub backend: String,
    /// Seed for the simulator and for synthetic data; entropy when unset.
    pub seed: Option<u64>,
    /// Fertilizer recommendation settings.
    pub fertilizer: FertilizerConfig,
    /// Classifier training settings.
    pub classifier: ClassifierConfig,
    /// Crop classification settings.
    pub crop: CropConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            backend: "simulator".into(),
            seed: None,
            fertilizer: FertilizerConfig::default(),
            classifier: ClassifierConfig::default(),
            crop: CropConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FertilizerConfig {
    pub shots: u32,
    pub sample: SoilSample,
    pub encoding: FeatureEncoding,
}

impl Default for FertilizerConfig {
    fn default() -> Self {
        Self {
            shots: 100,
            sample: SoilSample::default(),
            encoding: FeatureEncoding::Identity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Synthetic training samples.
    pub samples: usize,
    /// Shots per training circuit; each shot is one training row.
    pub shots: u32,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    /// Unscaled value classified after training.
    pub new_value: f64,
    pub encoding: FeatureEncoding,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            samples: 10,
            shots: 10,
            epochs: 10,
            batch_size: 32,
            learning_rate: 0.001,
            new_value: 0.7,
            encoding: FeatureEncoding::HALF_PI,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    pub value: f64,
    pub shots: u32,
    pub encoding: FeatureEncoding,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            value: 0.5,
            shots: 100,
            encoding: FeatureEncoding::Identity,
        }
    }
}

impl PipelineConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(source: &str) -> PipelineResult<Self> {
        // An empty document deserializes to unit, not an empty map.
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml_ng::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let source = fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_yaml_str(&source)
    }

    /// `~/.agriq/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".agriq").join("config.yaml"))
    }

    /// Load `path` if given, else the default path if it exists, else defaults.
    ///
    /// An explicit path that does not exist is an error.
    pub fn load_or_default(path: Option<&Path>) -> PipelineResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> PipelineResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> PipelineResult<()> {
        if self.backend.is_empty() {
            return Err(PipelineError::Config("backend name is empty".into()));
        }
        for (pipeline, shots, encoding) in [
            ("fertilizer", self.fertilizer.shots, self.fertilizer.encoding),
            ("classifier", self.classifier.shots, self.classifier.encoding),
            ("crop", self.crop.shots, self.crop.encoding),
        ] {
            if shots == 0 {
                return Err(PipelineError::Config(format!(
                    "{pipeline}.shots must be at least 1"
                )));
            }
            if !encoding.is_finite() {
                return Err(PipelineError::Config(format!(
                    "{pipeline}.encoding has a non-finite factor: {encoding:?}"
                )));
            }
        }
        self.fertilizer.sample.validate()?;

        let c = &self.classifier;
        if c.samples == 0 {
            return Err(PipelineError::Config(
                "classifier.samples must be at least 1".into(),
            ));
        }
        if c.batch_size == 0 {
            return Err(PipelineError::Config(
                "classifier.batch_size must be at least 1".into(),
            ));
        }
        if !(c.learning_rate.is_finite() && c.learning_rate > 0.0) {
            return Err(PipelineError::Config(format!(
                "classifier.learning_rate must be positive, got {}",
                c.learning_rate
            )));
        }
        for (name, value) in [
            ("classifier.new_value", c.new_value),
            ("crop.value", self.crop.value),
        ] {
            if !value.is_finite() {
                return Err(PipelineError::Config(format!("{name} is {value}")));
            }
        }
        Ok(())
    }
}
