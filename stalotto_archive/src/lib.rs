//! Client for the UK Lotto results archive.
//!
//! Fetches the per-year archive indexes and the per-draw pages, and turns
//! each draw page into a [`DrawRecord`].

mod client;
mod errors;
pub mod parse;
pub mod types;
mod user_agent;
mod walk;

pub use self::client::{ArchiveClient, DEFAULT_BASE_URL, REQUEST_TIMEOUT};
pub use self::errors::{Error, ParseError};
pub use self::types::{DrawError, DrawRecord, MAIN_BALLS, MAX_BALL};
pub use self::walk::{ArchiveWalk, WalkItem, EARLIEST_ARCHIVE_YEAR};
