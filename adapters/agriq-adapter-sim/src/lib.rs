//! Local statevector simulator for agriq.
//!
//! Exact amplitudes are evolved once per job and shots are drawn from the
//! final distribution. Memory grows as `16 * 2^n` bytes, so the default
//! limit is 20 qubits; the agricultural circuits use one or two.
//!
//! Pass a seed to make sampling reproducible:
//!
//! ```ignore
//! use agriq_adapter_sim::SimulatorBackend;
//! use agriq_hal::Backend;
//! use agriq_ir::Circuit;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new().with_seed(42);
//!     let result = backend.run(&Circuit::bell()?, 1000).await?;
//!
//!     // Only 00 and 11.
//!     println!("{:?}", result.counts.sorted());
//!     Ok(())
//! }
//! ```

mod simulator;
mod statevector;

pub use simulator::SimulatorBackend;
pub use statevector::Statevector;
