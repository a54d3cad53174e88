//! Catalog subcommands: `machines`, `sets`, `latest` and `range`.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use stalotto_lib::{validation, DbError, DrawStore};

use super::{open_store, OptionalRangeArgs};
use crate::output::{print_data_range, print_draws, print_machines, print_sets, OutputFormat};

#[derive(Args)]
pub struct MachinesArgs {
    #[command(flatten)]
    pub range: OptionalRangeArgs,

    /// Only machines used with this ball set (repeatable)
    #[arg(short = 's', long = "set")]
    pub sets: Vec<i64>,
}

#[derive(Args)]
pub struct SetsArgs {
    #[command(flatten)]
    pub range: OptionalRangeArgs,

    /// Only ball sets used on this machine (repeatable)
    #[arg(short = 'm', long = "machine")]
    pub machines: Vec<String>,
}

pub fn run_machines(args: &MachinesArgs, db_path: &Path, format: &OutputFormat) -> Result<()> {
    let range = args.range.to_range()?;
    let sets = args
        .sets
        .iter()
        .map(|&s| validation::validate_set(s))
        .collect::<Result<Vec<_>, _>>()?;
    let db = open_store(db_path)?;
    let machines = db.distinct_machines(range.as_ref(), &sets)?;
    print_machines(&machines, format)
}

pub fn run_sets(args: &SetsArgs, db_path: &Path, format: &OutputFormat) -> Result<()> {
    let range = args.range.to_range()?;
    let machines = args
        .machines
        .iter()
        .map(|m| validation::validate_machine(m))
        .collect::<Result<Vec<_>, _>>()?;
    let db = open_store(db_path)?;
    let sets = db.distinct_number_sets(range.as_ref(), &machines)?;
    print_sets(&sets, format)
}

pub fn run_latest(db_path: &Path, format: &OutputFormat) -> Result<()> {
    let db = open_store(db_path)?;
    match db.latest_draw()? {
        Some(record) => print_draws(std::slice::from_ref(&record), format),
        None => {
            eprintln!("No draws stored; run `stalotto sync` first");
            Ok(())
        }
    }
}

pub fn run_range(db_path: &Path, format: &OutputFormat) -> Result<()> {
    let db = open_store(db_path)?;
    match db.data_range() {
        Ok((first, last)) => print_data_range(first, last, format),
        Err(DbError::Empty) => {
            eprintln!("No draws stored; run `stalotto sync` first");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
