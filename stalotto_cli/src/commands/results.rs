//! The `results` subcommand: list stored draws, newest first.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use stalotto_lib::Analysis;

use super::{open_store, QueryArgs};
use crate::output::{print_draws, OutputFormat};

#[derive(Args)]
pub struct ResultsArgs {
    #[command(flatten)]
    pub query: QueryArgs,
}

pub fn run(args: &ResultsArgs, db_path: &Path, format: &OutputFormat) -> Result<()> {
    let query = args.query.to_query()?;
    let db = open_store(db_path)?;
    let records = Analysis::new(&db).records(&query)?;
    if records.is_empty() {
        eprintln!("No draws between {} and {}", query.range.begin, query.range.end);
    }
    print_draws(&records, format)
}
