use std::path::{Path, PathBuf};

use anyhow::Context;
use indicatif::ProgressBar;
use kinmap::{MappingReport, Resolver, storage};
use tracing::instrument;

use super::terminal::Colorize;

/// Command arguments for `kinmap map`.
#[derive(Debug, clap::Parser)]
#[command(about = "Map a list of diagnosis codes against a reference file")]
pub struct Map {
    /// Path to the reference taxonomy CSV
    #[arg(short, long, value_name = "FILE")]
    reference: PathBuf,

    /// Path to the single-column CSV of codes to map
    #[arg(short, long, value_name = "FILE")]
    codes: PathBuf,

    /// Directory the four report files are written into
    #[arg(short, long, default_value = "mapping", value_name = "DIR")]
    out: PathBuf,

    /// Path to a TOML config overriding the delimiter and column names
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Map {
    #[instrument(skip_all)]
    pub fn run(self) -> anyhow::Result<()> {
        let config = super::load_config(self.config.as_deref())?;

        let table = storage::read_reference(&self.reference, &config).with_context(|| {
            format!(
                "failed to load reference table from '{}'",
                self.reference.display()
            )
        })?;
        let queries = storage::read_queries(&self.codes, &config)
            .with_context(|| format!("failed to load query codes from '{}'", self.codes.display()))?;
        tracing::info!(
            entries = table.index.len(),
            queries = queries.len(),
            "loaded inputs"
        );

        let resolver = Resolver::new(&table.index);
        let bar = if self.no_progress {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(queries.len() as u64)
        };
        let report = resolver.map_codes_with(&queries, || bar.inc(1));
        bar.finish_and_clear();

        storage::write_report(&report, &table.descriptions, &self.out, &config)
            .with_context(|| format!("failed to write reports to '{}'", self.out.display()))?;

        print_summary(&report, &self.out);
        Ok(())
    }
}

fn print_summary(report: &MappingReport, out: &Path) {
    let total = report.total();
    println!("Mapped {total} codes:");
    println!(
        "  direct          {}",
        share(report.direct.len(), total).success()
    );
    println!(
        "  automatic       {}",
        share(report.automatic.len(), total).info()
    );
    println!(
        "  semi-automatic  {}",
        share(report.semiautomatic.len(), total).warning()
    );
    println!(
        "  failed          {}",
        share(report.failed.len(), total).failure()
    );
    println!("Reports written to '{}'", out.display().to_string().dim());
}

#[allow(clippy::cast_precision_loss)] // display only
fn share(count: usize, total: usize) -> String {
    if total == 0 {
        return "0".to_string();
    }
    format!("{count} ({:.1}%)", 100.0 * count as f64 / total as f64)
}
