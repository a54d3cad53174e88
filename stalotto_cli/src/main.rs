mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stalotto_lib::Config;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "stalotto")]
#[command(about = "Archive and analyse UK Lotto draw results")]
struct Cli {
    /// SQLite database path (default: $STALOTTO_DB or ~/.cache/stalotto/data.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch new draws from the online archive
    Sync,
    /// List draws, newest first
    Results(commands::results::ResultsArgs),
    /// How often each ball was drawn
    Frequency(commands::frequency::FrequencyArgs),
    /// The six least drawn balls and the least drawn bonus ball
    Least(commands::least::LeastArgs),
    /// Random pick from the more frequently drawn balls since 2015-10-10
    Dip(commands::dip::DipArgs),
    /// How often each machine and ball set were used together
    SetFrequency(commands::set_frequency::SetFrequencyArgs),
    /// Write draws to a JSON file
    Export(commands::export::ExportArgs),
    /// List draw machine names
    Machines(commands::info::MachinesArgs),
    /// List ball set numbers
    Sets(commands::info::SetsArgs),
    /// Show the most recent stored draw
    Latest,
    /// Show the dates of the first and last stored draws
    Range,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stalotto=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from_name(&cli.output);
    let config = Config::from_env();
    let db_path = cli.db.clone().unwrap_or_else(|| config.db_path.clone());

    match &cli.command {
        Commands::Sync => commands::sync::run(&config, &db_path, &format).await?,
        Commands::Results(args) => commands::results::run(args, &db_path, &format)?,
        Commands::Frequency(args) => commands::frequency::run(args, &db_path, &format)?,
        Commands::Least(args) => commands::least::run(args, &db_path, &format)?,
        Commands::Dip(args) => commands::dip::run(args, &db_path, &format)?,
        Commands::SetFrequency(args) => commands::set_frequency::run(args, &db_path, &format)?,
        Commands::Export(args) => commands::export::run(args, &db_path)?,
        Commands::Machines(args) => commands::info::run_machines(args, &db_path, &format)?,
        Commands::Sets(args) => commands::info::run_sets(args, &db_path, &format)?,
        Commands::Latest => commands::info::run_latest(&db_path, &format)?,
        Commands::Range => commands::info::run_range(&db_path, &format)?,
    }

    Ok(())
}
