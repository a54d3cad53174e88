//! The `frequency` subcommand: how often each ball was drawn.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use stalotto_lib::Analysis;

use super::{open_store, QueryArgs};
use crate::output::{print_frequency, OutputFormat};

#[derive(Args)]
pub struct FrequencyArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// List the most drawn balls first
    #[arg(long)]
    pub desc: bool,
}

pub fn run(args: &FrequencyArgs, db_path: &Path, format: &OutputFormat) -> Result<()> {
    let query = args.query.to_query()?;
    let db = open_store(db_path)?;
    let freq = Analysis::new(&db).frequency(&query)?;
    print_frequency(&freq, args.desc, format)
}
