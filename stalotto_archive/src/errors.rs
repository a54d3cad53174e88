//! Error types for the archive client.

use reqwest::StatusCode;

use crate::types::DrawError;

/// Errors that can occur while fetching or reading archive pages.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be sent or the body could not be read.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("unexpected status {status} for {url}")]
    HttpStatus { status: StatusCode, url: String },
    /// A page URL could not be built from the base URL and a link.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    /// The page was fetched but did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// A draw page whose content could not be turned into a [`crate::DrawRecord`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no date token in url {0}")]
    MissingDateToken(String),
    #[error("bad date token '{0}'")]
    BadDate(String),
    #[error("expected 7 result cells, found {0}")]
    MissingResults(usize),
    #[error("non-numeric result '{0}'")]
    BadBall(String),
    #[error("missing '{0}' field")]
    MissingLabel(&'static str),
    #[error("non-numeric set id '{0}'")]
    BadSetId(String),
    #[error("bad extraction pattern: {0}")]
    Pattern(String),
    #[error("invalid draw: {0}")]
    InvalidDraw(#[from] DrawError),
}
