//! The `sync` subcommand: pull new draws from the archive into SQLite.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use stalotto_lib::{ArchiveClient, Config, Syncer};

use super::open_store;
use crate::output::{print_sync_report, OutputFormat};

pub async fn run(config: &Config, db_path: &Path, format: &OutputFormat) -> Result<()> {
    let client = ArchiveClient::with_timeout(&config.base_url, config.timeout)?;
    let mut db = open_store(db_path)?;

    eprintln!(
        "Syncing {} into {}",
        client.base_url(),
        db_path.display()
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] {pos} new draws {msg}",
    )?);
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = Syncer::new(&client, &mut db)
        .with_page_delay(config.page_delay)
        .run_with_progress(|record| {
            pb.inc(1);
            pb.set_message(record.date.to_string());
        })
        .await;
    pb.finish_and_clear();

    let report = result?;
    eprintln!(
        "Sync complete: {} draws stored, {} pages skipped",
        report.inserted, report.skipped
    );
    print_sync_report(&report, format)
}
