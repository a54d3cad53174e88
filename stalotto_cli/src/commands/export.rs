//! The `export` subcommand: write matching draws to a JSON file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use stalotto_lib::Analysis;

use super::{open_store, QueryArgs};

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// File to write the JSON array to
    #[arg(long, default_value = "stalotto-export.json")]
    pub output_file: PathBuf,
}

pub fn run(args: &ExportArgs, db_path: &Path) -> Result<()> {
    let query = args.query.to_query()?;
    let db = open_store(db_path)?;
    let records = Analysis::new(&db).records(&query)?;
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(&args.output_file, json)
        .with_context(|| format!("failed to write {}", args.output_file.display()))?;
    eprintln!(
        "Exported {} draws to {}",
        records.len(),
        args.output_file.display()
    );
    Ok(())
}
