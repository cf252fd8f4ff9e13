//! Run every pipeline in sequence.

use anyhow::Result;

use agriq_pipeline::run_all;

use super::common::{GlobalOptions, prepare, print_report, spinner};

/// Execute the all command.
pub async fn execute(options: &GlobalOptions) -> Result<()> {
    let config = options.load_config()?;
    let backend = prepare(&config)?;

    let progress = spinner("Running fertilizer, classifier and crop pipelines...");
    let reports = run_all(backend.as_ref(), &config).await;
    progress.finish_and_clear();

    print_report(&reports?, options.format)
}
