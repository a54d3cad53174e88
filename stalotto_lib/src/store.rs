//! The query/write contract the core needs from persistent storage.

use chrono::NaiveDate;
use serde::Serialize;
use stalotto_archive::DrawRecord;

use crate::db::DbError;

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(begin: NaiveDate, end: NaiveDate) -> Self {
        Self { begin, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.begin <= date && date <= self.end
    }
}

/// Date range plus optional machine and ball set filters. All constraints
/// are ANDed; an empty filter list means no constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawQuery {
    pub range: DateRange,
    pub machines: Vec<String>,
    pub sets: Vec<i64>,
}

impl DrawQuery {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            machines: Vec::new(),
            sets: Vec::new(),
        }
    }

    pub fn with_machines(mut self, machines: Vec<String>) -> Self {
        self.machines = machines;
        self
    }

    pub fn with_sets(mut self, sets: Vec<i64>) -> Self {
        self.sets = sets;
        self
    }

    pub fn matches(&self, record: &DrawRecord) -> bool {
        self.range.contains(record.date)
            && (self.machines.is_empty() || self.machines.contains(&record.machine))
            && (self.sets.is_empty() || self.sets.contains(&record.number_set))
    }
}

/// Number of draws made with one machine/ball set pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineSetCount {
    pub machine: String,
    pub number_set: i64,
    pub draws: i64,
}

/// Lazy, single-pass sequence of draws, newest first. To read the records
/// again, issue the query again.
pub type DrawStream<'a> = Box<dyn Iterator<Item = Result<DrawRecord, DbError>> + 'a>;

/// Persistent storage of draw records.
///
/// Records are append-only: once inserted they are never updated or removed.
/// Writers must be serialized; `insert` takes `&mut self` for that reason.
pub trait DrawStore {
    /// Whether a draw is stored for exactly `date`.
    fn exists(&self, date: NaiveDate) -> Result<bool, DbError>;

    /// Appends one record. A second record for the same date is a failure.
    fn insert(&mut self, record: &DrawRecord) -> Result<(), DbError>;

    /// Draws matching `query`, ordered by date descending.
    fn query<'a>(&'a self, query: &DrawQuery) -> DrawStream<'a>;

    /// Distinct machine names, optionally limited to a date range and ball sets.
    fn distinct_machines(
        &self,
        range: Option<&DateRange>,
        sets: &[i64],
    ) -> Result<Vec<String>, DbError>;

    /// Distinct ball set ids, optionally limited to a date range and machines.
    fn distinct_number_sets(
        &self,
        range: Option<&DateRange>,
        machines: &[String],
    ) -> Result<Vec<i64>, DbError>;

    /// The most recent draw, if any.
    fn latest_draw(&self) -> Result<Option<DrawRecord>, DbError>;

    /// Dates of the earliest and latest stored draws. Fails on an empty store.
    fn data_range(&self) -> Result<(NaiveDate, NaiveDate), DbError>;

    /// How often each machine/ball set pairing was used within `range`.
    fn machine_set_frequency(&self, range: &DateRange) -> Result<Vec<MachineSetCount>, DbError>;
}
