//! Shared helpers for CLI commands.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

use agriq_hal::Backend;
use agriq_pipeline::{PipelineConfig, create_backend};

/// How reports are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One summary line per pipeline.
    #[default]
    Table,
    /// The full report as pretty JSON.
    Json,
}

/// Flags shared by every pipeline command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub backend: Option<String>,
    pub format: OutputFormat,
}

impl GlobalOptions {
    /// Load the config file (or defaults) and apply the global overrides.
    ///
    /// Callers apply their own flags and then call [`PipelineConfig::validate`].
    pub fn load_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::load_or_default(self.config.as_deref())
            .context("Failed to load configuration")?;
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(backend) = &self.backend {
            config.backend.clone_from(backend);
        }
        debug!(backend = %config.backend, seed = ?config.seed, "effective configuration");
        Ok(config)
    }
}

/// Validate `config` and build its backend.
pub fn prepare(config: &PipelineConfig) -> Result<Box<dyn Backend>> {
    config.validate()?;
    Ok(create_backend(config)?)
}

/// Spinner on stderr; hidden when stderr is not a terminal.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Print a report in the requested format.
pub fn print_report<R: Serialize + Display>(report: &R, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{report}"),
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(report).context("Failed to serialize report")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Print outcome frequencies as a bar chart.
pub fn print_distribution(distribution: &BTreeMap<String, f64>) {
    let mut rows: Vec<_> = distribution.iter().collect();
    rows.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (bits, p) in rows.iter().take(16) {
        let percent = **p * 100.0;
        let bar = "█".repeat((percent / 2.0).round() as usize);
        println!(
            "  {}: {:>6.2}% {}",
            style(bits).cyan(),
            percent,
            style(bar).green()
        );
    }
    if rows.len() > 16 {
        println!("  ... and {} more outcomes", rows.len() - 16);
    }
}
