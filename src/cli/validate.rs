use std::path::PathBuf;

use anyhow::Context;
use kinmap::storage;

use super::terminal::Colorize;

/// Command arguments for `kinmap validate`.
#[derive(Debug, clap::Parser)]
#[command(about = "Check a reference file's structure without mapping anything")]
pub struct Validate {
    /// Path to the reference taxonomy CSV
    #[arg(short, long, value_name = "FILE")]
    reference: PathBuf,

    /// Path to a TOML config overriding the delimiter and column names
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl Validate {
    pub fn run(self) -> anyhow::Result<()> {
        let config = super::load_config(self.config.as_deref())?;

        let table = storage::read_reference(&self.reference, &config).with_context(|| {
            format!(
                "reference table '{}' is not valid",
                self.reference.display()
            )
        })?;

        println!(
            "{}",
            format!(
                "OK: {} entries, {} described categories",
                table.index.len(),
                table.descriptions.len()
            )
            .success()
        );
        Ok(())
    }
}
