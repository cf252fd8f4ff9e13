//! Fertilizer command implementation.

use anyhow::Result;

use agriq_pipeline::pipelines::fertilizer;

use super::common::{GlobalOptions, OutputFormat, prepare, print_distribution, print_report, spinner};

/// Flags of the fertilizer command.
#[derive(Debug, Clone, Default)]
pub struct FertilizerArgs {
    pub nitrogen: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub shots: Option<u32>,
    pub histogram: bool,
}

/// Execute the fertilizer command.
pub async fn execute(options: &GlobalOptions, args: &FertilizerArgs) -> Result<()> {
    let mut config = options.load_config()?;
    let section = &mut config.fertilizer;
    if let Some(n) = args.nitrogen {
        section.sample.nitrogen = n;
    }
    if let Some(p) = args.phosphorus {
        section.sample.phosphorus = p;
    }
    if let Some(k) = args.potassium {
        section.sample.potassium = k;
    }
    if let Some(shots) = args.shots {
        section.shots = shots;
    }

    let backend = prepare(&config)?;
    let progress = spinner(format!("Sampling soil {}...", config.fertilizer.sample));
    let report = fertilizer::run(backend.as_ref(), &config.fertilizer).await;
    progress.finish_and_clear();
    let report = report?;

    print_report(&report, options.format)?;
    if args.histogram && options.format == OutputFormat::Table {
        print_distribution(&report.distribution);
    }
    Ok(())
}
