//! The `dip` subcommand: a random pick weighted towards frequently drawn balls.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use stalotto_lib::{dip_start, Analysis, MAIN_BALLS};

use super::{open_store, today};
use crate::output::{print_dip, OutputFormat};

#[derive(Args)]
pub struct DipArgs {
    /// Seed for a reproducible pick
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: &DipArgs, db_path: &Path, format: &OutputFormat) -> Result<()> {
    let db = open_store(db_path)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let pick = Analysis::new(&db).dip(today(), &mut rng)?;
    if pick.balls.len() < MAIN_BALLS || pick.bonus.is_none() {
        tracing::warn!(
            "Too few draws since {} for a full pick; run `stalotto sync` first",
            dip_start()
        );
    }
    print_dip(&pick, format)
}
