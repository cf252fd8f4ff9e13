//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - quantum-classical pipelines for agriculture",
        style("agriq").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  agriq-ir           Circuit intermediate representation");
    println!("  agriq-hal          Backend abstraction");
    println!("  agriq-adapter-sim  Statevector simulator");
    println!("  agriq-ml           Dense classifier, Adam, scaling");
    println!("  agriq-pipeline     Fertilizer, classifier and crop pipelines");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
