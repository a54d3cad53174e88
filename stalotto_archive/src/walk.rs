//! Newest-first traversal of the archive.

use std::collections::VecDeque;
use std::time::Duration;

use url::Url;

use crate::client::ArchiveClient;
use crate::errors::Error;
use crate::types::DrawRecord;

/// Oldest year the archive has an index page for.
pub const EARLIEST_ARCHIVE_YEAR: i32 = 1994;

/// One step of an [`ArchiveWalk`].
#[derive(Debug)]
pub enum WalkItem {
    /// A draw page that parsed cleanly.
    Draw(DrawRecord),
    /// A draw page that could not be fetched or parsed. The walk carries on.
    Skipped { url: Url, error: Error },
    /// A year index could not be fetched. Always the last item of the walk.
    IndexFailed { year: i32, error: Error },
}

/// Lazy, pull-based walk over the archive: years from `newest` down to
/// `oldest`, draw pages in index order within each year.
///
/// Nothing is fetched until [`ArchiveWalk::next_item`] is awaited, and each
/// call fetches at most one year index and one draw page. Dropping the walk
/// stops all traffic.
pub struct ArchiveWalk<'a> {
    client: &'a ArchiveClient,
    next_year: i32,
    oldest: i32,
    pending: VecDeque<Url>,
    page_delay: Duration,
    fetched_page: bool,
    finished: bool,
}

impl<'a> ArchiveWalk<'a> {
    pub fn new(client: &'a ArchiveClient, newest: i32, oldest: i32) -> Self {
        Self {
            client,
            next_year: newest,
            oldest,
            pending: VecDeque::new(),
            page_delay: Duration::ZERO,
            fetched_page: false,
            finished: false,
        }
    }

    /// Waits `delay` between consecutive draw page requests.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub async fn next_item(&mut self) -> Option<WalkItem> {
        if self.finished {
            return None;
        }

        loop {
            if let Some(url) = self.pending.pop_front() {
                if self.fetched_page && !self.page_delay.is_zero() {
                    tokio::time::sleep(self.page_delay).await;
                }
                self.fetched_page = true;
                return Some(match self.client.draw(&url).await {
                    Ok(record) => WalkItem::Draw(record),
                    Err(error) => WalkItem::Skipped { url, error },
                });
            }

            if self.next_year < self.oldest {
                self.finished = true;
                return None;
            }

            let year = self.next_year;
            self.next_year -= 1;
            match self.client.year_index(year).await {
                Ok(links) => {
                    tracing::debug!("Archive {}: {} draw pages", year, links.len());
                    self.pending.extend(links);
                }
                Err(error) => {
                    self.finished = true;
                    return Some(WalkItem::IndexFailed { year, error });
                }
            }
        }
    }
}
