//! Library layer for stalotto: draw storage, archive sync and frequency
//! analysis.
//!
//! Wraps the `stalotto_archive` crate with a SQLite-backed draw store, an
//! incremental sync driver, input validation and the frequency engine.

pub mod analysis;
pub mod config;
pub mod db;
pub mod error;
pub mod frequency;
pub mod store;
pub mod sync;
pub mod validation;

pub use stalotto_archive;
pub use stalotto_archive::{ArchiveClient, DrawRecord, MAIN_BALLS, MAX_BALL};

pub use analysis::{dip_start, Analysis, Frequencies};
pub use config::Config;
pub use db::{Db, DbError};
pub use error::StalottoError;
pub use frequency::{BallCount, Dip, DipPools, FrequencyTable, LeastDrawn, DIP_BONUS_POOL};
pub use store::{DateRange, DrawQuery, DrawStore, DrawStream, MachineSetCount};
pub use sync::{SyncOutcome, SyncReport, Syncer};
