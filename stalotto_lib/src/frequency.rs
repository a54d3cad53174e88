//! Draw frequency tables and the frequency-biased random pick.
//!
//! Everything here is pure and in-memory: it works on draws that were already
//! read from the store and never touches the network or the database.

use std::cmp::Reverse;

use rand::Rng;
use serde::Serialize;
use stalotto_archive::{DrawRecord, MAIN_BALLS, MAX_BALL};

/// Number of most drawn bonus balls the dip picks from.
pub const DIP_BONUS_POOL: usize = 10;

/// How many times one ball was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BallCount {
    pub ball: u8,
    pub count: u32,
}

/// Occurrence count per ball value.
///
/// Built dense over `1..=59` by [`tabulate`], one entry per ball in ball
/// order. Orderings are stable and break count ties by ascending ball value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    entries: Vec<BallCount>,
}

impl FrequencyTable {
    /// A table with every ball of `1..=59` at count zero.
    pub fn dense() -> Self {
        Self {
            entries: (1..=MAX_BALL)
                .map(|ball| BallCount { ball, count: 0 })
                .collect(),
        }
    }

    fn increment(&mut self, ball: u8) {
        let slot = usize::from(ball)
            .checked_sub(1)
            .and_then(|idx| self.entries.get_mut(idx));
        if let Some(entry) = slot {
            entry.count += 1;
        }
    }

    /// Drops every ball that was never drawn.
    pub fn prune(mut self) -> Self {
        self.entries.retain(|e| e.count > 0);
        self
    }

    /// Least drawn first.
    pub fn ascending(mut self) -> Self {
        self.entries.sort_by_key(|e| (e.count, e.ball));
        self
    }

    /// Most drawn first.
    pub fn descending(mut self) -> Self {
        self.entries.sort_by_key(|e| (Reverse(e.count), e.ball));
        self
    }

    /// Ball values in the table's current order.
    pub fn balls(&self) -> Vec<u8> {
        self.entries.iter().map(|e| e.ball).collect()
    }

    pub fn entries(&self) -> &[BallCount] {
        &self.entries
    }

    /// Count for `ball`; zero when the ball is absent.
    pub fn count(&self, ball: u8) -> u32 {
        self.entries
            .iter()
            .find(|e| e.ball == ball)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.count)).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Counts main balls and bonus balls over `records`.
///
/// Returns `(main, bonus)`, both dense over `1..=59`. Order of the input does
/// not matter.
pub fn tabulate<'a, I>(records: I) -> (FrequencyTable, FrequencyTable)
where
    I: IntoIterator<Item = &'a DrawRecord>,
{
    let mut main = FrequencyTable::dense();
    let mut bonus = FrequencyTable::dense();
    for record in records {
        for &ball in &record.balls {
            main.increment(ball);
        }
        bonus.increment(record.bonus);
    }
    (main, bonus)
}

/// The least drawn main balls and the least drawn bonus ball.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeastDrawn {
    pub balls: Vec<BallCount>,
    pub bonus: BallCount,
}

/// The six least drawn main balls and the single least drawn bonus ball,
/// among balls drawn at least once.
///
/// `None` when fewer than six distinct main balls, or no bonus ball, were
/// drawn in the tables' record set.
pub fn least_drawn(main: &FrequencyTable, bonus: &FrequencyTable) -> Option<LeastDrawn> {
    let main = main.clone().prune().ascending();
    let bonus = bonus.clone().prune().ascending();
    if main.len() < MAIN_BALLS {
        return None;
    }
    Some(LeastDrawn {
        balls: main.entries()[..MAIN_BALLS].to_vec(),
        bonus: *bonus.entries().first()?,
    })
}

/// Draws up to `count` values from `pool` uniformly at random, without
/// replacement, and returns them in ascending order.
///
/// A pool smaller than `count` yields every value it has; an empty pool
/// yields an empty result.
pub fn draw<R: Rng + ?Sized>(pool: &[u8], count: usize, rng: &mut R) -> Vec<u8> {
    let mut remaining = pool.to_vec();
    let mut out = Vec::with_capacity(count.min(remaining.len()));
    while out.len() < count && !remaining.is_empty() {
        let idx = rng.gen_range(0..remaining.len());
        out.push(remaining.remove(idx));
    }
    out.sort_unstable();
    out
}

/// Candidate pools for the dip: the more frequently drawn half of the main
/// balls and the ten most drawn bonus balls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DipPools {
    pub balls: Vec<u8>,
    pub bonus: Vec<u8>,
}

impl DipPools {
    /// Builds the pools from frequency tables.
    ///
    /// The main pool holds the first `floor(n / 2)` balls of the pruned
    /// descending main table, where `n` is the number of main balls drawn at
    /// least once. The bonus pool holds up to [`DIP_BONUS_POOL`] balls.
    pub fn from_tables(main: FrequencyTable, bonus: FrequencyTable) -> Self {
        let main = main.prune().descending();
        let mut balls = main.balls();
        balls.truncate(main.len() / 2);

        let mut bonus = bonus.prune().descending().balls();
        bonus.truncate(DIP_BONUS_POOL);

        Self { balls, bonus }
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a DrawRecord>,
    {
        let (main, bonus) = tabulate(records);
        Self::from_tables(main, bonus)
    }

    /// Picks six main balls and one bonus ball, uniformly within each pool.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Dip {
        Dip {
            balls: draw(&self.balls, MAIN_BALLS, rng),
            bonus: draw(&self.bonus, 1, rng).first().copied(),
        }
    }
}

/// Result of a biased pick. May hold fewer than six balls, and no bonus
/// ball, when the archive is too small.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dip {
    pub balls: Vec<u8>,
    pub bonus: Option<u8>,
}

/// Tabulates `records`, restricts to the frequency-favoured pools and draws
/// from them.
pub fn dip<'a, I, R>(records: I, rng: &mut R) -> Dip
where
    I: IntoIterator<Item = &'a DrawRecord>,
    R: Rng + ?Sized,
{
    DipPools::from_records(records).draw(rng)
}
