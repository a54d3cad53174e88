//! Incremental ingestion: walk the archive newest-first and store each draw
//! until one that is already stored turns up.

use std::fmt;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use stalotto_archive::{ArchiveClient, ArchiveWalk, DrawRecord, WalkItem, EARLIEST_ARCHIVE_YEAR};

use crate::error::StalottoError;
use crate::store::DrawStore;

/// Why a sync stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Reached a draw already in the store.
    UpToDate { date: NaiveDate },
    /// Walked every year down to the oldest without meeting a stored draw.
    Exhausted,
    /// A year index could not be fetched; earlier years were not visited.
    IndexUnavailable { year: i32 },
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpToDate { date } => write!(f, "up to date (found stored draw {})", date),
            Self::Exhausted => write!(f, "reached the start of the archive"),
            Self::IndexUnavailable { year } => write!(f, "archive index for {} unavailable", year),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub inserted: usize,
    /// Draw pages that could not be fetched or parsed.
    pub skipped: usize,
    pub outcome: SyncOutcome,
}

/// Drives one sync of the archive into a store.
///
/// Only the first duplicate matters: the walk stops as soon as a draw date is
/// found in the store, so draws missing behind that point are never filled in.
pub struct Syncer<'a, S: DrawStore + ?Sized> {
    client: &'a ArchiveClient,
    store: &'a mut S,
    newest: i32,
    oldest: i32,
    page_delay: Duration,
}

impl<'a, S: DrawStore + ?Sized> Syncer<'a, S> {
    /// Walks from the current year down to the first archived year.
    pub fn new(client: &'a ArchiveClient, store: &'a mut S) -> Self {
        Self {
            client,
            store,
            newest: Utc::now().year(),
            oldest: EARLIEST_ARCHIVE_YEAR,
            page_delay: Duration::ZERO,
        }
    }

    pub fn with_years(mut self, newest: i32, oldest: i32) -> Self {
        self.newest = newest;
        self.oldest = oldest;
        self
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub async fn run(self) -> Result<SyncReport, StalottoError> {
        self.run_with_progress(|_| {}).await
    }

    /// Runs the sync, calling `on_insert` after each stored draw.
    ///
    /// Fetch and parse failures are logged and counted, never returned. A
    /// store failure aborts the sync with an error.
    pub async fn run_with_progress<F>(self, mut on_insert: F) -> Result<SyncReport, StalottoError>
    where
        F: FnMut(&DrawRecord),
    {
        let Self {
            client,
            store,
            newest,
            oldest,
            page_delay,
        } = self;

        tracing::info!("Syncing archive years {} down to {}", newest, oldest);
        let mut walk = ArchiveWalk::new(client, newest, oldest).with_page_delay(page_delay);
        let mut inserted = 0;
        let mut skipped = 0;

        let outcome = loop {
            let Some(item) = walk.next_item().await else {
                break SyncOutcome::Exhausted;
            };
            match item {
                WalkItem::Draw(record) => {
                    if store.exists(record.date)? {
                        tracing::info!("Draw {} already stored, stopping", record.date);
                        break SyncOutcome::UpToDate { date: record.date };
                    }
                    store.insert(&record)?;
                    tracing::info!("Inserted: {}", record);
                    inserted += 1;
                    on_insert(&record);
                }
                WalkItem::Skipped { url, error } => {
                    tracing::warn!("Skipping {}: {}", url, error);
                    skipped += 1;
                }
                WalkItem::IndexFailed { year, error } => {
                    tracing::warn!("Archive index for {} unavailable: {}", year, error);
                    break SyncOutcome::IndexUnavailable { year };
                }
            }
        };

        tracing::info!(
            "Sync finished: {} inserted, {} skipped, {}",
            inserted,
            skipped,
            outcome
        );
        Ok(SyncReport {
            inserted,
            skipped,
            outcome,
        })
    }
}
