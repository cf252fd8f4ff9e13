//! Backends command implementation.

use anyhow::Result;
use console::style;

use agriq_hal::BackendConfig;
use agriq_pipeline::backend_registry;

/// Execute the backends command.
pub async fn execute() -> Result<()> {
    println!("{} Available backends:\n", style("agriq").cyan().bold());

    let registry = backend_registry();
    for name in registry.available_backends() {
        let backend = registry.create(&name, BackendConfig::new(&name))?;
        let caps = backend.capabilities();
        let available = backend.availability().await?.is_available;

        println!(
            "  {} {} {}",
            if available {
                style("●").green()
            } else {
                style("○").red()
            },
            style(&name).bold(),
            if caps.is_simulator { "(local)" } else { "" }
        );
        println!("    Qubits: {}", caps.num_qubits);
        println!("    Max shots: {}", caps.max_shots);
        let gates = &caps.gate_set;
        println!("    1q gates: {}", gates.single_qubit.join(", "));
        println!(
            "    Multi-qubit gates: {}",
            gates
                .two_qubit
                .iter()
                .chain(&gates.three_qubit)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
        if !caps.features.is_empty() {
            println!("    Features: {}", caps.features.join(", "));
        }
        println!();
    }
    Ok(())
}
