//! CLI subcommand implementations.

pub mod dip;
pub mod export;
pub mod frequency;
pub mod info;
pub mod least;
pub mod results;
pub mod set_frequency;
pub mod sync;

use std::path::Path;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Args;
use stalotto_lib::stalotto_archive::EARLIEST_ARCHIVE_YEAR;
use stalotto_lib::{dip_start, validation, DateRange, Db, DrawQuery, StalottoError};

/// Date range flags shared by the query commands.
#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// First draw date to include (YYYY-MM-DD)
    #[arg(long, default_value_t = dip_start().to_string())]
    pub begin: String,

    /// Last draw date to include (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub end: Option<String>,
}

impl RangeArgs {
    pub fn to_range(&self) -> Result<DateRange, StalottoError> {
        let begin = validation::validate_date(&self.begin)?;
        let end = match self.end {
            Some(ref end) => validation::validate_date(end)?,
            None => today(),
        };
        validation::validate_date_range(begin, end)
    }
}

/// Date range plus machine and ball set filters.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Only draws made on this machine (repeatable)
    #[arg(short = 'm', long = "machine")]
    pub machines: Vec<String>,

    /// Only draws made with this ball set (repeatable)
    #[arg(short = 's', long = "set")]
    pub sets: Vec<i64>,
}

impl QueryArgs {
    pub fn to_query(&self) -> Result<DrawQuery, StalottoError> {
        let machines = self
            .machines
            .iter()
            .map(|m| validation::validate_machine(m))
            .collect::<Result<Vec<_>, _>>()?;
        let sets = self
            .sets
            .iter()
            .map(|&s| validation::validate_set(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DrawQuery::new(self.range.to_range()?)
            .with_machines(machines)
            .with_sets(sets))
    }
}

/// Optional date range for the catalog listings. Without either flag the
/// whole archive is considered.
#[derive(Args, Debug, Clone)]
pub struct OptionalRangeArgs {
    /// First draw date to include (YYYY-MM-DD)
    #[arg(long)]
    pub begin: Option<String>,

    /// Last draw date to include (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
}

impl OptionalRangeArgs {
    pub fn to_range(&self) -> Result<Option<DateRange>, StalottoError> {
        if self.begin.is_none() && self.end.is_none() {
            return Ok(None);
        }
        let begin = match self.begin {
            Some(ref begin) => validation::validate_date(begin)?,
            None => archive_start(),
        };
        let end = match self.end {
            Some(ref end) => validation::validate_date(end)?,
            None => today(),
        };
        validation::validate_date_range(begin, end).map(Some)
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn archive_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(EARLIEST_ARCHIVE_YEAR, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Opens the store at `path`, creating it and its schema on first use.
pub fn open_store(path: &Path) -> Result<Db> {
    let db = Db::open(path)?;
    db.init()?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(begin: &str, end: Option<&str>) -> RangeArgs {
        RangeArgs {
            begin: begin.to_string(),
            end: end.map(str::to_string),
        }
    }

    #[test]
    fn range_defaults_end_to_today() {
        let r = range("2015-10-10", None).to_range().unwrap();
        assert_eq!(r.begin, dip_start());
        assert_eq!(r.end, today());
    }

    #[test]
    fn range_rejects_malformed_date() {
        assert!(range("10/10/2015", None).to_range().is_err());
        assert!(range("2015-10-10", Some("soon")).to_range().is_err());
    }

    #[test]
    fn range_rejects_reversed_dates() {
        assert!(range("2020-02-01", Some("2020-01-01")).to_range().is_err());
    }

    #[test]
    fn query_collects_filters() {
        let args = QueryArgs {
            range: range("2020-01-01", Some("2020-01-31")),
            machines: vec![" Arthur ".to_string()],
            sets: vec![6, 8],
        };
        let query = args.to_query().unwrap();
        assert_eq!(query.machines, vec!["Arthur".to_string()]);
        assert_eq!(query.sets, vec![6, 8]);
    }

    #[test]
    fn query_rejects_bad_set() {
        let args = QueryArgs {
            range: range("2020-01-01", Some("2020-01-31")),
            machines: vec![],
            sets: vec![0],
        };
        assert!(args.to_query().is_err());
    }

    #[test]
    fn optional_range_absent() {
        let args = OptionalRangeArgs {
            begin: None,
            end: None,
        };
        assert_eq!(args.to_range().unwrap(), None);
    }

    #[test]
    fn optional_range_fills_missing_bound() {
        let args = OptionalRangeArgs {
            begin: None,
            end: Some("2000-06-01".to_string()),
        };
        let r = args.to_range().unwrap().unwrap();
        assert_eq!(r.begin, archive_start());
        assert_eq!(r.end, NaiveDate::from_ymd_opt(2000, 6, 1).unwrap());
    }
}
