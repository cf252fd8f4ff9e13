//! Backend selection.

use agriq_adapter_sim::SimulatorBackend;
use agriq_hal::{Backend, BackendConfig, BackendRegistry};
use tracing::debug;

use crate::config::PipelineConfig;
use crate::error::PipelineResult;

/// Name of the local statevector simulator.
pub const SIMULATOR: &str = "simulator";

/// Registry of the backends the pipelines can run on.
pub fn backend_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    registry.register::<SimulatorBackend>(SIMULATOR);
    registry
}

/// Build the backend named in `config`, passing the seed along.
pub fn create_backend(config: &PipelineConfig) -> PipelineResult<Box<dyn Backend>> {
    let mut backend_config = BackendConfig::new(&config.backend);
    if let Some(seed) = config.seed {
        backend_config = backend_config.with_extra("seed", seed.into());
    }
    debug!(backend = %config.backend, seed = ?config.seed, "creating backend");
    Ok(backend_registry().create(&config.backend, backend_config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_registered() {
        assert_eq!(backend_registry().available_backends(), vec![SIMULATOR]);
    }

    #[test]
    fn test_seed_forwarded() {
        let config = PipelineConfig {
            seed: Some(11),
            ..PipelineConfig::default()
        };
        let backend = create_backend(&config).unwrap();
        assert_eq!(backend.name(), SIMULATOR);
        assert!(
            backend
                .capabilities()
                .features
                .iter()
                .any(|f| f == "seeded")
        );
    }

    #[test]
    fn test_unknown_backend() {
        let config = PipelineConfig {
            backend: "qpu".into(),
            ..PipelineConfig::default()
        };
        let err = create_backend(&config).err().unwrap();
        assert!(err.to_string().contains("available: simulator"));
    }
}
