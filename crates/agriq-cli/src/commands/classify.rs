//! Classify command implementation.

use anyhow::Result;
use console::style;

use agriq_pipeline::pipelines::classifier;

use super::common::{GlobalOptions, OutputFormat, prepare, print_report, spinner};

/// Flags of the classify command.
#[derive(Debug, Clone, Default)]
pub struct ClassifyArgs {
    pub samples: Option<usize>,
    pub epochs: Option<usize>,
    pub new_value: Option<f64>,
    pub shots: Option<u32>,
    pub batch_size: Option<usize>,
    pub learning_rate: Option<f64>,
    /// Print the loss of every epoch after the summary line.
    pub history: bool,
}

/// Execute the classify command.
pub async fn execute(options: &GlobalOptions, args: &ClassifyArgs) -> Result<()> {
    let mut config = options.load_config()?;
    let section = &mut config.classifier;
    if let Some(samples) = args.samples {
        section.samples = samples;
    }
    if let Some(epochs) = args.epochs {
        section.epochs = epochs;
    }
    if let Some(value) = args.new_value {
        section.new_value = value;
    }
    if let Some(shots) = args.shots {
        section.shots = shots;
    }
    if let Some(batch_size) = args.batch_size {
        section.batch_size = batch_size;
    }
    if let Some(lr) = args.learning_rate {
        section.learning_rate = lr;
    }

    let backend = prepare(&config)?;
    let progress = spinner(format!(
        "Labelling {} samples and training...",
        config.classifier.samples
    ));
    let report = classifier::run(backend.as_ref(), &config.classifier, config.seed).await;
    progress.finish_and_clear();
    let report = report?;

    print_report(&report, options.format)?;
    if args.history && options.format == OutputFormat::Table {
        for (epoch, loss) in report.history.loss.iter().enumerate() {
            println!("  epoch {:>3}: loss {}", epoch + 1, style(format!("{loss:.4}")).yellow());
        }
        println!(
            "  model: p(1 | {}) = {:.3}",
            report.new_value, report.model_probability
        );
    }
    Ok(())
}
