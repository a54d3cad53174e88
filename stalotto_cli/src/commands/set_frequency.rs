//! The `set-frequency` subcommand: how often each machine and ball set were
//! used together.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use stalotto_lib::DrawStore;

use super::{open_store, RangeArgs};
use crate::output::{print_machine_sets, OutputFormat};

#[derive(Args)]
pub struct SetFrequencyArgs {
    #[command(flatten)]
    pub range: RangeArgs,
}

pub fn run(args: &SetFrequencyArgs, db_path: &Path, format: &OutputFormat) -> Result<()> {
    let range = args.range.to_range()?;
    let db = open_store(db_path)?;
    let counts = db.machine_set_frequency(&range)?;
    print_machine_sets(&counts, format)
}
