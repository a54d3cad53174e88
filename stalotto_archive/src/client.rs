//! HTTP client for the lottery results archive.

use std::time::Duration;

use url::Url;

use crate::errors::Error;
use crate::parse::{index_links, parse_draw_page};
use crate::types::DrawRecord;
use crate::user_agent::get_user_agent;

/// Production archive host.
pub const DEFAULT_BASE_URL: &str = "https://www.lottery.co.uk";

/// Request timeout for archive pages.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the archive's year index pages and per-draw pages.
///
/// Year indexes live at `/lotto/results/archive-{year}`; draw pages are
/// reached through the links found in those indexes.
pub struct ArchiveClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ArchiveClient {
    /// Creates a client for the production archive.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: Url::parse(base_url.trim_end_matches('/'))?,
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the index page listing every draw of `year`.
    pub fn year_index_url(&self, year: i32) -> Result<Url, Error> {
        Ok(self
            .base_url
            .join(&format!("/lotto/results/archive-{}", year))?)
    }

    /// Fetches the index page of `year` and resolves its draw page links,
    /// in document order. Links that do not form a valid URL are logged and
    /// skipped.
    pub async fn year_index(&self, year: i32) -> Result<Vec<Url>, Error> {
        let url = self.year_index_url(year)?;
        let html = self.fetch_html(&url).await?;
        let mut links = Vec::new();
        for link in index_links(&html)? {
            match self.base_url.join(&link) {
                Ok(resolved) => links.push(resolved),
                Err(e) => tracing::warn!("Skipping bad result URL {}: {}", link, e),
            }
        }
        Ok(links)
    }

    /// Fetches and parses a single draw page.
    pub async fn draw(&self, url: &Url) -> Result<DrawRecord, Error> {
        let html = self.fetch_html(url).await?;
        Ok(parse_draw_page(url.path(), &html)?)
    }

    async fn fetch_html(&self, url: &Url) -> Result<String, Error> {
        tracing::debug!("GET {}", url);
        let resp = self
            .http
            .get(url.clone())
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-GB,en;q=0.9")
            .header("cache-control", "no-cache")
            .header("pragma", "no-cache")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Error::HttpStatus {
                status: resp.status(),
                url: url.to_string(),
            });
        }

        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_index_url_from_base() {
        let client = ArchiveClient::with_base_url("http://localhost:8080/").unwrap();
        assert_eq!(
            client.year_index_url(2019).unwrap().as_str(),
            "http://localhost:8080/lotto/results/archive-2019"
        );
    }

    #[test]
    fn rejects_bad_base_url() {
        assert!(matches!(
            ArchiveClient::with_base_url("not a url"),
            Err(Error::Url(_))
        ));
    }
}
