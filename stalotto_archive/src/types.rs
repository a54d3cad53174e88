//! The draw record shared by the archive walker, the store and the analysis engine.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Highest ball value in the current ball set.
pub const MAX_BALL: u8 = 59;

/// Number of main balls drawn per draw.
pub const MAIN_BALLS: usize = 6;

/// A draw record rejected by [`DrawRecord::new`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("ball {0} is outside 1..={MAX_BALL}")]
    OutOfRange(u8),
    #[error("main ball {0} drawn twice")]
    Duplicate(u8),
}

/// One historical draw.
///
/// The date is the natural key: the archive holds at most one draw per day.
/// The bonus ball is drawn independently of the main balls and may equal one
/// of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub date: NaiveDate,
    pub number_set: i64,
    pub machine: String,
    pub balls: [u8; MAIN_BALLS],
    pub bonus: u8,
}

impl DrawRecord {
    /// Builds a record, rejecting balls outside `1..=59` and repeated main balls.
    pub fn new(
        date: NaiveDate,
        number_set: i64,
        machine: impl Into<String>,
        balls: [u8; MAIN_BALLS],
        bonus: u8,
    ) -> Result<Self, DrawError> {
        for (i, &ball) in balls.iter().enumerate() {
            check_range(ball)?;
            if balls[..i].contains(&ball) {
                return Err(DrawError::Duplicate(ball));
            }
        }
        check_range(bonus)?;

        Ok(Self {
            date,
            number_set,
            machine: machine.into(),
            balls,
            bonus,
        })
    }
}

fn check_range(ball: u8) -> Result<(), DrawError> {
    if (1..=MAX_BALL).contains(&ball) {
        Ok(())
    } else {
        Err(DrawError::OutOfRange(ball))
    }
}

impl fmt::Display for DrawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{} {:?} {}",
            self.date.format("%Y-%m-%d"),
            self.machine,
            self.number_set,
            self.balls,
            self.bonus
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
    }

    #[test]
    fn accepts_valid_draw() {
        let rec = DrawRecord::new(date(), 4, "Arthur", [1, 2, 3, 4, 5, 59], 7).unwrap();
        assert_eq!(rec.balls, [1, 2, 3, 4, 5, 59]);
        assert_eq!(rec.machine, "Arthur");
    }

    #[test]
    fn bonus_may_repeat_a_main_ball() {
        assert!(DrawRecord::new(date(), 4, "Arthur", [1, 2, 3, 4, 5, 6], 6).is_ok());
    }

    #[test]
    fn rejects_zero_and_sixty() {
        assert_eq!(
            DrawRecord::new(date(), 4, "Arthur", [0, 2, 3, 4, 5, 6], 7),
            Err(DrawError::OutOfRange(0))
        );
        assert_eq!(
            DrawRecord::new(date(), 4, "Arthur", [1, 2, 3, 4, 5, 6], 60),
            Err(DrawError::OutOfRange(60))
        );
    }

    #[test]
    fn rejects_duplicate_main_ball() {
        assert_eq!(
            DrawRecord::new(date(), 4, "Arthur", [1, 2, 3, 4, 5, 1], 7),
            Err(DrawError::Duplicate(1))
        );
    }

    #[test]
    fn display_matches_log_format() {
        let rec = DrawRecord::new(date(), 4, "Arthur", [1, 2, 3, 4, 5, 6], 7).unwrap();
        assert_eq!(rec.to_string(), "2020-01-01 Arthur:4 [1, 2, 3, 4, 5, 6] 7");
    }
}
