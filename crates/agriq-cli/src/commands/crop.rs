//! Crop command implementation.

use anyhow::Result;

use agriq_pipeline::pipelines::crop;

use super::common::{GlobalOptions, OutputFormat, prepare, print_distribution, print_report, spinner};

/// Flags of the crop command.
#[derive(Debug, Clone, Default)]
pub struct CropArgs {
    pub value: Option<f64>,
    pub shots: Option<u32>,
    pub histogram: bool,
}

/// Execute the crop command.
pub async fn execute(options: &GlobalOptions, args: &CropArgs) -> Result<()> {
    let mut config = options.load_config()?;
    if let Some(value) = args.value {
        config.crop.value = value;
    }
    if let Some(shots) = args.shots {
        config.crop.shots = shots;
    }

    let backend = prepare(&config)?;
    let progress = spinner("Classifying crop...");
    let report = crop::run(backend.as_ref(), &config.crop).await;
    progress.finish_and_clear();
    let report = report?;

    print_report(&report, options.format)?;
    if args.histogram && options.format == OutputFormat::Table {
        print_distribution(&report.distribution);
    }
    Ok(())
}
