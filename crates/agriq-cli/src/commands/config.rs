//! Config command implementation.

use anyhow::Result;

use super::common::GlobalOptions;

/// Print the effective configuration as YAML.
pub fn execute(options: &GlobalOptions) -> Result<()> {
    let config = options.load_config()?;
    config.validate()?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
