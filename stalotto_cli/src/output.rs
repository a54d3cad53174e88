use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use stalotto_lib::{
    BallCount, Dip, DrawRecord, Frequencies, FrequencyTable, LeastDrawn, MachineSetCount,
    SyncReport,
};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    /// Unknown names fall back to a plain table.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "csv" => Self::Csv,
            "markdown" | "md" => Self::Markdown,
            _ => Self::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct DrawRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Machine")]
    #[serde(rename = "Machine")]
    machine: String,
    #[tabled(rename = "Set")]
    #[serde(rename = "Set")]
    number_set: i64,
    #[tabled(rename = "Ball 1")]
    #[serde(rename = "Ball 1")]
    ball1: u8,
    #[tabled(rename = "Ball 2")]
    #[serde(rename = "Ball 2")]
    ball2: u8,
    #[tabled(rename = "Ball 3")]
    #[serde(rename = "Ball 3")]
    ball3: u8,
    #[tabled(rename = "Ball 4")]
    #[serde(rename = "Ball 4")]
    ball4: u8,
    #[tabled(rename = "Ball 5")]
    #[serde(rename = "Ball 5")]
    ball5: u8,
    #[tabled(rename = "Ball 6")]
    #[serde(rename = "Ball 6")]
    ball6: u8,
    #[tabled(rename = "Bonus")]
    #[serde(rename = "Bonus")]
    bonus: u8,
}

#[derive(Tabled, Serialize)]
struct BallRow {
    #[tabled(rename = "Pool")]
    #[serde(rename = "Pool")]
    pool: &'static str,
    #[tabled(rename = "Ball")]
    #[serde(rename = "Ball")]
    ball: u8,
    #[tabled(rename = "Drawn")]
    #[serde(rename = "Drawn")]
    drawn: u32,
}

#[derive(Tabled, Serialize)]
struct MachineSetRow {
    #[tabled(rename = "Machine")]
    #[serde(rename = "Machine")]
    machine: String,
    #[tabled(rename = "Set")]
    #[serde(rename = "Set")]
    number_set: i64,
    #[tabled(rename = "Draws")]
    #[serde(rename = "Draws")]
    draws: i64,
}

#[derive(Tabled, Serialize)]
struct DipRow {
    #[tabled(rename = "Balls")]
    #[serde(rename = "Balls")]
    balls: String,
    #[tabled(rename = "Bonus")]
    #[serde(rename = "Bonus")]
    bonus: String,
}

#[derive(Tabled, Serialize)]
struct SyncRow {
    #[tabled(rename = "Inserted")]
    #[serde(rename = "Inserted")]
    inserted: usize,
    #[tabled(rename = "Skipped")]
    #[serde(rename = "Skipped")]
    skipped: usize,
    #[tabled(rename = "Outcome")]
    #[serde(rename = "Outcome")]
    outcome: String,
}

#[derive(Tabled, Serialize)]
struct RangeRow {
    #[tabled(rename = "First")]
    #[serde(rename = "First")]
    first: String,
    #[tabled(rename = "Last")]
    #[serde(rename = "Last")]
    last: String,
}

#[derive(Tabled, Serialize)]
struct MachineRow {
    #[tabled(rename = "Machine")]
    #[serde(rename = "Machine")]
    machine: String,
}

#[derive(Tabled, Serialize)]
struct SetRow {
    #[tabled(rename = "Set")]
    #[serde(rename = "Set")]
    number_set: i64,
}

#[derive(Serialize)]
struct DateRangeJson {
    first: NaiveDate,
    last: NaiveDate,
}

// -- Row builders --

fn build_draw_rows(records: &[DrawRecord]) -> Vec<DrawRow> {
    records
        .iter()
        .map(|r| {
            let [ball1, ball2, ball3, ball4, ball5, ball6] = r.balls;
            DrawRow {
                date: r.date.to_string(),
                machine: r.machine.clone(),
                number_set: r.number_set,
                ball1,
                ball2,
                ball3,
                ball4,
                ball5,
                ball6,
                bonus: r.bonus,
            }
        })
        .collect()
}

fn build_ball_rows(pool: &'static str, counts: &[BallCount]) -> Vec<BallRow> {
    counts
        .iter()
        .map(|c| BallRow {
            pool,
            ball: c.ball,
            drawn: c.count,
        })
        .collect()
}

/// Pruned tables in the requested order; main rows first, then bonus rows.
fn build_frequency_rows(freq: &Frequencies, descending: bool) -> (Vec<BallRow>, Vec<BallRow>) {
    let order = |table: &FrequencyTable| {
        let pruned = table.clone().prune();
        if descending {
            pruned.descending()
        } else {
            pruned.ascending()
        }
    };
    (
        build_ball_rows("main", order(&freq.main).entries()),
        build_ball_rows("bonus", order(&freq.bonus).entries()),
    )
}

fn build_least_rows(least: &LeastDrawn) -> Vec<BallRow> {
    let mut rows = build_ball_rows("main", &least.balls);
    rows.extend(build_ball_rows("bonus", std::slice::from_ref(&least.bonus)));
    rows
}

fn build_machine_set_rows(counts: &[MachineSetCount]) -> Vec<MachineSetRow> {
    counts
        .iter()
        .map(|c| MachineSetRow {
            machine: c.machine.clone(),
            number_set: c.number_set,
            draws: c.draws,
        })
        .collect()
}

fn build_dip_row(dip: &Dip) -> DipRow {
    DipRow {
        balls: dip
            .balls
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(" "),
        bonus: dip.bonus.map(|b| b.to_string()).unwrap_or_else(|| "-".to_string()),
    }
}

fn build_sync_row(report: &SyncReport) -> SyncRow {
    SyncRow {
        inserted: report.inserted,
        skipped: report.skipped,
        outcome: report.outcome.to_string(),
    }
}

// -- Rendering --

fn render_table<R: Tabled>(rows: Vec<R>, markdown: bool) -> String {
    let mut table = Table::new(rows);
    if markdown {
        table.with(Style::markdown());
    }
    table.to_string()
}

fn write_csv<W: Write, R: Serialize>(writer: W, rows: &[R]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Table, markdown and CSV output of `rows`. JSON is handled by callers,
/// which serialize the library types directly.
fn print_rows<R: Tabled + Serialize>(rows: Vec<R>, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(std::io::stdout(), &rows)?,
        OutputFormat::Markdown => println!("{}", render_table(rows, true)),
        OutputFormat::Table | OutputFormat::Json => println!("{}", render_table(rows, false)),
    }
    Ok(())
}

pub fn print_json<T: Serialize + ?Sized>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Per-command printers --

pub fn print_draws(records: &[DrawRecord], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(records),
        _ => print_rows(build_draw_rows(records), format)?,
    }
    Ok(())
}

pub fn print_frequency(freq: &Frequencies, descending: bool, format: &OutputFormat) -> Result<()> {
    let (main, bonus) = build_frequency_rows(freq, descending);
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "draws": freq.draws,
            "main": main,
            "bonus": bonus,
        })),
        OutputFormat::Csv => {
            let mut rows = main;
            rows.extend(bonus);
            write_csv(std::io::stdout(), &rows)?;
        }
        OutputFormat::Table | OutputFormat::Markdown => {
            let markdown = *format == OutputFormat::Markdown;
            println!("Main balls ({} draws)", freq.draws);
            println!("{}", render_table(main, markdown));
            println!();
            println!("Bonus balls");
            println!("{}", render_table(bonus, markdown));
        }
    }
    Ok(())
}

pub fn print_least(least: &LeastDrawn, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(least),
        _ => print_rows(build_least_rows(least), format)?,
    }
    Ok(())
}

pub fn print_dip(dip: &Dip, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(dip),
        _ => print_rows(vec![build_dip_row(dip)], format)?,
    }
    Ok(())
}

pub fn print_machine_sets(counts: &[MachineSetCount], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(counts),
        _ => print_rows(build_machine_set_rows(counts), format)?,
    }
    Ok(())
}

pub fn print_machines(machines: &[String], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(machines),
        _ => {
            let rows = machines
                .iter()
                .map(|m| MachineRow { machine: m.clone() })
                .collect::<Vec<_>>();
            print_rows(rows, format)?
        }
    }
    Ok(())
}

pub fn print_sets(sets: &[i64], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(sets),
        _ => {
            let rows = sets
                .iter()
                .map(|&number_set| SetRow { number_set })
                .collect::<Vec<_>>();
            print_rows(rows, format)?
        }
    }
    Ok(())
}

pub fn print_data_range(first: NaiveDate, last: NaiveDate, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&DateRangeJson { first, last }),
        _ => print_rows(
            vec![RangeRow {
                first: first.to_string(),
                last: last.to_string(),
            }],
            format,
        )?,
    }
    Ok(())
}

pub fn print_sync_report(report: &SyncReport, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        _ => print_rows(vec![build_sync_row(report)], format)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use stalotto_lib::frequency::tabulate;
    use stalotto_lib::{SyncOutcome, MAIN_BALLS};

    use super::*;

    fn record(day: u32, machine: &str, balls: [u8; 6], bonus: u8) -> DrawRecord {
        let date = NaiveDate::from_ymd_opt(2020, 1, day).unwrap();
        DrawRecord::new(date, 6, machine, balls, bonus).unwrap()
    }

    fn sample() -> Vec<DrawRecord> {
        vec![
            record(8, "Arthur", [1, 2, 3, 4, 5, 6], 7),
            record(4, "Guinevere", [11, 19, 24, 33, 47, 53], 2),
            record(1, "Arthur", [1, 2, 3, 4, 5, 6], 7),
        ]
    }

    fn frequencies(records: &[DrawRecord]) -> Frequencies {
        let (main, bonus) = tabulate(records);
        Frequencies {
            main,
            bonus,
            draws: records.len(),
        }
    }

    #[test]
    fn output_format_names() {
        assert_eq!(OutputFormat::from_name("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_name("CSV"), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_name("md"), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from_name("markdown"), OutputFormat::Markdown);
        assert_eq!(OutputFormat::from_name("table"), OutputFormat::Table);
        assert_eq!(OutputFormat::from_name("xml"), OutputFormat::Table);
    }

    #[test]
    fn draw_rows_mapping() {
        let rows = build_draw_rows(&sample());
        assert_eq!(rows.len(), 3);
        let row = &rows[1];
        assert_eq!(row.date, "2020-01-04");
        assert_eq!(row.machine, "Guinevere");
        assert_eq!(row.number_set, 6);
        assert_eq!(
            [row.ball1, row.ball2, row.ball3, row.ball4, row.ball5, row.ball6],
            [11, 19, 24, 33, 47, 53]
        );
        assert_eq!(row.bonus, 2);
    }

    #[test]
    fn draw_rows_empty() {
        assert!(build_draw_rows(&[]).is_empty());
    }

    #[test]
    fn frequency_rows_skip_undrawn_balls() {
        let (main, bonus) = build_frequency_rows(&frequencies(&sample()), true);
        assert_eq!(main.len(), 12);
        assert_eq!(main[0].ball, 1);
        assert_eq!(main[0].drawn, 2);
        assert!(main.iter().all(|r| r.pool == "main"));
        let bonus_balls: Vec<u8> = bonus.iter().map(|r| r.ball).collect();
        assert_eq!(bonus_balls, vec![7, 2]);
    }

    #[test]
    fn frequency_rows_ascending() {
        let (main, bonus) = build_frequency_rows(&frequencies(&sample()), false);
        assert_eq!(main[0].ball, 11);
        assert_eq!(main[0].drawn, 1);
        assert_eq!(main.last().unwrap().ball, 6);
        assert_eq!(bonus[0].ball, 2);
    }

    #[test]
    fn least_rows_end_with_bonus() {
        let least = LeastDrawn {
            balls: (1..=6).map(|ball| BallCount { ball, count: 1 }).collect(),
            bonus: BallCount { ball: 9, count: 3 },
        };
        let rows = build_least_rows(&least);
        assert_eq!(rows.len(), MAIN_BALLS + 1);
        assert_eq!(rows[6].pool, "bonus");
        assert_eq!(rows[6].ball, 9);
        assert_eq!(rows[6].drawn, 3);
    }

    #[test]
    fn dip_row_formats_balls() {
        let row = build_dip_row(&Dip {
            balls: vec![3, 14, 15, 26, 35, 58],
            bonus: Some(9),
        });
        assert_eq!(row.balls, "3 14 15 26 35 58");
        assert_eq!(row.bonus, "9");
    }

    #[test]
    fn dip_row_without_bonus() {
        let row = build_dip_row(&Dip {
            balls: vec![],
            bonus: None,
        });
        assert_eq!(row.balls, "");
        assert_eq!(row.bonus, "-");
    }

    #[test]
    fn sync_row_mapping() {
        let row = build_sync_row(&SyncReport {
            inserted: 3,
            skipped: 1,
            outcome: SyncOutcome::IndexUnavailable { year: 2019 },
        });
        assert_eq!(row.inserted, 3);
        assert_eq!(row.skipped, 1);
        assert_eq!(row.outcome, "archive index for 2019 unavailable");
    }

    #[test]
    fn machine_set_rows_mapping() {
        let rows = build_machine_set_rows(&[MachineSetCount {
            machine: "Arthur".to_string(),
            number_set: 6,
            draws: 2,
        }]);
        assert_eq!(rows[0].machine, "Arthur");
        assert_eq!(rows[0].number_set, 6);
        assert_eq!(rows[0].draws, 2);
    }

    #[test]
    fn markdown_table_has_pipe_header() {
        let out = render_table(build_draw_rows(&sample()), true);
        let header = out.lines().next().unwrap();
        assert!(header.starts_with('|'));
        assert!(header.contains("Date"));
        assert!(header.contains("Bonus"));
        assert!(out.lines().nth(1).unwrap().contains("---"));
    }

    #[test]
    fn plain_table_lists_every_draw() {
        let out = render_table(build_draw_rows(&sample()), false);
        assert!(out.contains("2020-01-08"));
        assert!(out.contains("2020-01-04"));
        assert!(out.contains("2020-01-01"));
    }

    #[test]
    fn csv_has_header_and_rows() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &build_draw_rows(&sample())).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Date,Machine,Set,Ball 1,Ball 2,Ball 3,Ball 4,Ball 5,Ball 6,Bonus"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2020-01-08,Arthur,6,1,2,3,4,5,6,7"
        );
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn csv_empty_rows_write_nothing() {
        let mut buf = Vec::new();
        write_csv::<_, DrawRow>(&mut buf, &[]).unwrap();
        assert!(buf.is_empty());
    }
}
