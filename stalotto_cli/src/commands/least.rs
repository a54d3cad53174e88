//! The `least` subcommand: the least drawn main balls and bonus ball.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use stalotto_lib::Analysis;

use super::{open_store, QueryArgs};
use crate::output::{print_least, OutputFormat};

#[derive(Args)]
pub struct LeastArgs {
    #[command(flatten)]
    pub query: QueryArgs,
}

pub fn run(args: &LeastArgs, db_path: &Path, format: &OutputFormat) -> Result<()> {
    let query = args.query.to_query()?;
    let db = open_store(db_path)?;
    match Analysis::new(&db).least(&query)? {
        Some(least) => print_least(&least, format),
        None => {
            eprintln!(
                "Not enough draws between {} and {} to pick six balls",
                query.range.begin, query.range.end
            );
            Ok(())
        }
    }
}
