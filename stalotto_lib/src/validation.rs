use chrono::NaiveDate;

use crate::error::StalottoError;
use crate::store::DateRange;

pub const MAX_MACHINE_LENGTH: usize = 40;

/// Strip ASCII control characters, trim whitespace, and enforce a byte-length
/// limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, StalottoError> {
    if input.len() > max_len {
        return Err(StalottoError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(StalottoError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a date in YYYY-MM-DD format.
pub fn validate_date(input: &str) -> Result<NaiveDate, StalottoError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        StalottoError::InvalidInput(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2020-01-08)",
            trimmed
        ))
    })
}

/// Build an inclusive range, rejecting one that ends before it begins.
pub fn validate_date_range(begin: NaiveDate, end: NaiveDate) -> Result<DateRange, StalottoError> {
    if begin > end {
        return Err(StalottoError::InvalidInput(format!(
            "begin date {} is after end date {}",
            begin, end
        )));
    }
    Ok(DateRange::new(begin, end))
}

/// Validate a machine name. Names are matched exactly, so case is kept.
pub fn validate_machine(input: &str) -> Result<String, StalottoError> {
    sanitize_text(input, MAX_MACHINE_LENGTH)
}

/// Validate a ball set identifier: must be positive.
pub fn validate_set(set: i64) -> Result<i64, StalottoError> {
    if set < 1 {
        return Err(StalottoError::InvalidInput(format!(
            "ball set must be a positive number, got {}",
            set
        )));
    }
    Ok(set)
}
