//! SQLite storage for lottery draws.

use std::collections::VecDeque;
use std::path::Path;

use chrono::NaiveDate;
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension, Row};
use stalotto_archive::{DrawError, DrawRecord};

use crate::store::{DateRange, DrawQuery, DrawStore, DrawStream, MachineSetCount};

const SCHEMA_VERSION: i32 = 1;
const DATE_FORMAT: &str = "%Y-%m-%d";
const DRAW_COLUMNS: &str =
    "date, number_set, machine, ball1, ball2, ball3, ball4, ball5, ball6, bonus";

/// Rows fetched per round trip by [`DrawRows`].
pub const QUERY_PAGE_SIZE: usize = 256;

#[derive(thiserror::Error, Debug)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("date parse error: {0}")]
    Date(#[from] chrono::ParseError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored draw for {date} is invalid: {source}")]
    InvalidRecord { date: String, source: DrawError },
    #[error("no draws stored")]
    Empty,
}

pub struct Db {
    conn: Connection,
}

impl Db {
    /// Opens (or creates) the database file, creating missing parent
    /// directories first.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<(), DbError> {
        let schema = include_str!("../../schema/sqlite.sql");
        self.conn.execute_batch(schema)?;

        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        if version < SCHEMA_VERSION {
            self.conn
                .pragma_update(None, "user_version", SCHEMA_VERSION)?;
        }
        Ok(())
    }

    /// The draw stored for `date`, if any.
    pub fn draw(&self, date: NaiveDate) -> Result<Option<DrawRecord>, DbError> {
        let raw = self
            .conn
            .query_row(
                &format!("SELECT {} FROM draws WHERE date = ?1", DRAW_COLUMNS),
                params![format_date(date)],
                RawDraw::from_row,
            )
            .optional()?;
        raw.map(RawDraw::into_record).transpose()
    }

    pub fn draw_count(&self) -> Result<i64, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(1) FROM draws", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl DrawStore for Db {
    fn exists(&self, date: NaiveDate) -> Result<bool, DbError> {
        let found: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM draws WHERE date = ?1)",
            params![format_date(date)],
            |row| row.get(0),
        )?;
        Ok(found)
    }

    fn insert(&mut self, record: &DrawRecord) -> Result<(), DbError> {
        let [b1, b2, b3, b4, b5, b6] = record.balls;
        self.conn.execute(
            &format!(
                "INSERT INTO draws ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                DRAW_COLUMNS
            ),
            params![
                format_date(record.date),
                record.number_set,
                record.machine,
                b1,
                b2,
                b3,
                b4,
                b5,
                b6,
                record.bonus
            ],
        )?;
        Ok(())
    }

    fn query<'a>(&'a self, query: &DrawQuery) -> DrawStream<'a> {
        Box::new(DrawRows::new(&self.conn, query.clone()))
    }

    fn distinct_machines(
        &self,
        range: Option<&DateRange>,
        sets: &[i64],
    ) -> Result<Vec<String>, DbError> {
        let mut filter = Filter::default();
        if let Some(range) = range {
            filter.range(range);
        }
        filter.any_of("number_set", sets);

        let sql = format!(
            "SELECT DISTINCT machine FROM draws WHERE 1=1{} ORDER BY machine",
            filter.sql
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(filter.params().as_slice(), |row| row.get(0))?;
        let mut machines = Vec::new();
        for row in rows {
            machines.push(row?);
        }
        Ok(machines)
    }

    fn distinct_number_sets(
        &self,
        range: Option<&DateRange>,
        machines: &[String],
    ) -> Result<Vec<i64>, DbError> {
        let mut filter = Filter::default();
        if let Some(range) = range {
            filter.range(range);
        }
        filter.any_of("machine", machines);

        let sql = format!(
            "SELECT DISTINCT number_set FROM draws WHERE 1=1{} ORDER BY number_set",
            filter.sql
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(filter.params().as_slice(), |row| row.get(0))?;
        let mut sets = Vec::new();
        for row in rows {
            sets.push(row?);
        }
        Ok(sets)
    }

    fn latest_draw(&self) -> Result<Option<DrawRecord>, DbError> {
        let raw = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM draws ORDER BY date DESC LIMIT 1",
                    DRAW_COLUMNS
                ),
                [],
                RawDraw::from_row,
            )
            .optional()?;
        raw.map(RawDraw::into_record).transpose()
    }

    fn data_range(&self) -> Result<(NaiveDate, NaiveDate), DbError> {
        let (first, last): (Option<String>, Option<String>) = self.conn.query_row(
            "SELECT MIN(date), MAX(date) FROM draws",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let (Some(first), Some(last)) = (first, last) else {
            return Err(DbError::Empty);
        };
        Ok((parse_date(&first)?, parse_date(&last)?))
    }

    fn machine_set_frequency(&self, range: &DateRange) -> Result<Vec<MachineSetCount>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT machine, number_set, COUNT(1) AS draws
             FROM draws
             WHERE date BETWEEN ?1 AND ?2
             GROUP BY machine, number_set
             ORDER BY draws DESC, machine, number_set",
        )?;
        let rows = stmt.query_map(
            params![format_date(range.begin), format_date(range.end)],
            |row| {
                Ok(MachineSetCount {
                    machine: row.get(0)?,
                    number_set: row.get(1)?,
                    draws: row.get(2)?,
                })
            },
        )?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

/// Keyset-paginated cursor over the draws matching a [`DrawQuery`].
///
/// Pages of [`QUERY_PAGE_SIZE`] rows are fetched on demand, newest first,
/// each page starting strictly before the last date already returned.
/// An error ends the sequence.
pub struct DrawRows<'a> {
    conn: &'a Connection,
    query: DrawQuery,
    before: Option<NaiveDate>,
    buffer: VecDeque<DrawRecord>,
    page_size: usize,
    done: bool,
}

impl<'a> DrawRows<'a> {
    fn new(conn: &'a Connection, query: DrawQuery) -> Self {
        Self {
            conn,
            query,
            before: None,
            buffer: VecDeque::new(),
            page_size: QUERY_PAGE_SIZE,
            done: false,
        }
    }

    fn fetch_page(&mut self) -> Result<(), DbError> {
        let mut filter = Filter::default();
        filter.range(&self.query.range);
        filter.any_of("machine", &self.query.machines);
        filter.any_of("number_set", &self.query.sets);
        if let Some(before) = self.before {
            filter.push(" AND date < ?", format_date(before));
        }

        let sql = format!(
            "SELECT {} FROM draws WHERE 1=1{} ORDER BY date DESC LIMIT {}",
            DRAW_COLUMNS, filter.sql, self.page_size
        );
        let conn = self.conn;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(filter.params().as_slice(), RawDraw::from_row)?;

        let mut fetched = 0;
        for row in rows {
            let record = row?.into_record()?;
            self.before = Some(record.date);
            self.buffer.push_back(record);
            fetched += 1;
        }
        if fetched < self.page_size {
            self.done = true;
        }
        Ok(())
    }
}

impl Iterator for DrawRows<'_> {
    type Item = Result<DrawRecord, DbError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(record) = self.buffer.pop_front() {
            return Some(Ok(record));
        }
        if self.done {
            return None;
        }
        if let Err(e) = self.fetch_page() {
            self.done = true;
            self.buffer.clear();
            return Some(Err(e));
        }
        self.buffer.pop_front().map(Ok)
    }
}

/// `AND ...` clauses with numbered positional parameters.
#[derive(Default)]
struct Filter {
    sql: String,
    values: Vec<Box<dyn ToSql>>,
}

impl Filter {
    fn push(&mut self, clause: &str, value: impl ToSql + 'static) {
        self.values.push(Box::new(value));
        self.sql.push_str(clause);
        self.sql.push_str(&self.values.len().to_string());
    }

    fn range(&mut self, range: &DateRange) {
        self.push(" AND date >= ?", format_date(range.begin));
        self.push(" AND date <= ?", format_date(range.end));
    }

    /// `AND column IN (...)`; nothing when `values` is empty.
    fn any_of<T: ToSql + Clone + 'static>(&mut self, column: &str, values: &[T]) {
        if values.is_empty() {
            return;
        }
        let mut placeholders = Vec::with_capacity(values.len());
        for value in values {
            self.values.push(Box::new(value.clone()));
            placeholders.push(format!("?{}", self.values.len()));
        }
        self.sql
            .push_str(&format!(" AND {} IN ({})", column, placeholders.join(", ")));
    }

    fn params(&self) -> Vec<&dyn ToSql> {
        self.values.iter().map(|p| p.as_ref()).collect()
    }
}

/// A row as stored, before the draw invariants are checked.
struct RawDraw {
    date: String,
    number_set: i64,
    machine: String,
    balls: [u8; 6],
    bonus: u8,
}

impl RawDraw {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            date: row.get(0)?,
            number_set: row.get(1)?,
            machine: row.get(2)?,
            balls: [
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
            ],
            bonus: row.get(9)?,
        })
    }

    fn into_record(self) -> Result<DrawRecord, DbError> {
        let date = parse_date(&self.date)?;
        DrawRecord::new(date, self.number_set, self.machine, self.balls, self.bonus).map_err(
            |source| DbError::InvalidRecord {
                date: self.date,
                source,
            },
        )
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str) -> Result<NaiveDate, DbError> {
    Ok(NaiveDate::parse_from_str(value, DATE_FORMAT)?)
}
