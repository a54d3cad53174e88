//! HTML extraction for the archive's year index and draw pages.
//!
//! The pages are read with a handful of anchored regular expressions rather
//! than a DOM: only the `lotto` results table, the `result` cells and two
//! labelled table cells matter.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::errors::ParseError;
use crate::types::{DrawRecord, MAIN_BALLS};

/// Label of the table cell naming the ball set.
pub const SET_LABEL: &str = "Set Used:";
/// Label of the table cell naming the draw machine.
pub const MACHINE_LABEL: &str = "Machine Used:";

const RESULT_CELLS: usize = MAIN_BALLS + 1;

type Pattern = OnceLock<Result<Regex, regex::Error>>;

fn regex(cell: &'static Pattern, pattern: &str) -> Result<&'static Regex, ParseError> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| ParseError::Pattern(e.to_string()))
}

fn lotto_table_re() -> Result<&'static Regex, ParseError> {
    static RE: Pattern = OnceLock::new();
    regex(
        &RE,
        r#"(?is)<table\b[^>]*\bclass\s*=\s*"(?:[^"]*\s)?lotto(?:\s[^"]*)?"[^>]*>(.*?)</table>"#,
    )
}

fn td_re() -> Result<&'static Regex, ParseError> {
    static RE: Pattern = OnceLock::new();
    regex(&RE, r"(?is)<td\b[^>]*>(.*?)</td>")
}

fn anchor_re() -> Result<&'static Regex, ParseError> {
    static RE: Pattern = OnceLock::new();
    regex(&RE, r"(?is)<a\b([^>]*)>(.*?)</a>")
}

fn href_re() -> Result<&'static Regex, ParseError> {
    static RE: Pattern = OnceLock::new();
    regex(&RE, r#"(?i)\bhref\s*=\s*"([^"]*)""#)
}

fn result_re() -> Result<&'static Regex, ParseError> {
    static RE: Pattern = OnceLock::new();
    regex(
        &RE,
        r#"(?is)<[a-z][a-z0-9]*\b[^>]*\bclass\s*=\s*"(?:[^"]*\s)?result(?:\s[^"]*)?"[^>]*>(.*?)</"#,
    )
}

fn tag_re() -> Result<&'static Regex, ParseError> {
    static RE: Pattern = OnceLock::new();
    regex(&RE, r"<[^>]*>")
}

/// Returns the per-draw page links of a year index, in document order.
///
/// Links are taken from anchors inside the cells of `lotto` tables. Anchors
/// without an `href` are logged and skipped.
pub fn index_links(html: &str) -> Result<Vec<String>, ParseError> {
    let (td, anchor, href) = (td_re()?, anchor_re()?, href_re()?);
    let mut links = Vec::new();
    for table in lotto_tables(html)? {
        for cell in td.captures_iter(table) {
            for a in anchor.captures_iter(&cell[1]) {
                match href.captures(&a[1]) {
                    Some(link) => links.push(decode_entities(link[1].trim())),
                    None => tracing::warn!("No result URL for {}", text_of(&a[2])?),
                }
            }
        }
    }
    Ok(links)
}

/// Parses a draw page into a [`DrawRecord`].
///
/// `url_path` is the path the page was fetched from; the draw date is read
/// from its `s-DD-MM-YYYY` suffix, not from the page content. The first six
/// `result` cells are the main balls and the seventh is the bonus ball.
pub fn parse_draw_page(url_path: &str, html: &str) -> Result<DrawRecord, ParseError> {
    let date = date_from_url(url_path)?;

    let results = result_re()?
        .captures_iter(html)
        .take(RESULT_CELLS)
        .map(|cap| text_of(&cap[1]))
        .collect::<Result<Vec<_>, _>>()?;
    if results.len() < RESULT_CELLS {
        return Err(ParseError::MissingResults(results.len()));
    }

    let mut balls = [0u8; MAIN_BALLS];
    for (slot, text) in balls.iter_mut().zip(&results) {
        *slot = parse_ball(text)?;
    }
    let bonus = parse_ball(&results[MAIN_BALLS])?;

    let cells = labelled_cells(html)?;
    let set_text = labelled_value(&cells, SET_LABEL)?;
    let number_set = set_text
        .parse::<i64>()
        .map_err(|_| ParseError::BadSetId(set_text.clone()))?;
    let machine = labelled_value(&cells, MACHINE_LABEL)?;

    Ok(DrawRecord::new(date, number_set, machine, balls, bonus)?)
}

/// Reads the draw date from the `s-DD-MM-YYYY` token of a draw page URL.
pub fn date_from_url(url: &str) -> Result<NaiveDate, ParseError> {
    let mut parts = url.split("s-");
    let (Some(_), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ParseError::MissingDateToken(url.to_string()));
    };
    let token = token.trim_end_matches('/');
    NaiveDate::parse_from_str(token, "%d-%m-%Y")
        .map_err(|_| ParseError::BadDate(token.to_string()))
}

fn lotto_tables(html: &str) -> Result<Vec<&str>, ParseError> {
    Ok(lotto_table_re()?
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect())
}

fn labelled_cells(html: &str) -> Result<Vec<String>, ParseError> {
    let td = td_re()?;
    let mut cells = Vec::new();
    for table in lotto_tables(html)? {
        for cap in td.captures_iter(table) {
            cells.push(text_of(&cap[1])?);
        }
    }
    Ok(cells)
}

/// Value after the label's separator, trimmed. Only the text between the first
/// and second `:` counts.
fn labelled_value(cells: &[String], label: &'static str) -> Result<String, ParseError> {
    cells
        .iter()
        .find(|text| text.contains(label))
        .and_then(|text| text.split(':').nth(1))
        .map(|value| value.trim().to_string())
        .ok_or(ParseError::MissingLabel(label))
}

fn parse_ball(text: &str) -> Result<u8, ParseError> {
    text.parse::<u8>()
        .map_err(|_| ParseError::BadBall(text.to_string()))
}

fn text_of(fragment: &str) -> Result<String, ParseError> {
    Ok(decode_entities(&tag_re()?.replace_all(fragment, " "))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" "))
}

fn decode_entities(raw: &str) -> String {
    raw.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAW_PAGE: &str = r#"
<div id="siteContainer"><div class="main">
  <div class="balls">
    <div class="result small lotto-ball">3</div>
    <div class="result small lotto-ball">14</div>
    <div class="result small lotto-ball">22</div>
    <div class="result small lotto-ball">31</div>
    <div class="result small lotto-ball">40</div>
    <div class="result small lotto-ball">58</div>
    <div class="result small lotto-bonus-ball">7</div>
  </div>
  <table class="table lotto"><tbody>
    <tr><td><strong>Machine Used:</strong> Arthur </td></tr>
    <tr><td><strong>Set Used:</strong>&nbsp;6</td></tr>
  </tbody></table>
</div></div>"#;

    #[test]
    fn date_from_results_url() {
        let date = date_from_url("/lotto/results-10-10-2015").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2015, 10, 10).unwrap());
    }

    #[test]
    fn date_from_url_with_trailing_slash() {
        let date = date_from_url("/lotto/results-02-01-2019/").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2019, 1, 2).unwrap());
    }

    #[test]
    fn date_from_url_without_token() {
        assert!(matches!(
            date_from_url("/lotto/archive"),
            Err(ParseError::MissingDateToken(_))
        ));
    }

    #[test]
    fn date_from_url_with_two_tokens() {
        assert!(matches!(
            date_from_url("/lotto/results-draws-01-01-2019"),
            Err(ParseError::MissingDateToken(_))
        ));
    }

    #[test]
    fn date_from_url_with_bad_date() {
        assert_eq!(
            date_from_url("/lotto/results-31-02-2019"),
            Err(ParseError::BadDate("31-02-2019".to_string()))
        );
    }

    #[test]
    fn parses_full_draw_page() {
        let rec = parse_draw_page("/lotto/results-10-10-2015", DRAW_PAGE).unwrap();
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2015, 10, 10).unwrap());
        assert_eq!(rec.balls, [3, 14, 22, 31, 40, 58]);
        assert_eq!(rec.bonus, 7);
        assert_eq!(rec.number_set, 6);
        assert_eq!(rec.machine, "Arthur");
    }

    #[test]
    fn missing_machine_label() {
        let html = DRAW_PAGE.replace("Machine Used:", "Machine:");
        assert_eq!(
            parse_draw_page("/lotto/results-10-10-2015", &html),
            Err(ParseError::MissingLabel(MACHINE_LABEL))
        );
    }

    #[test]
    fn non_numeric_ball() {
        let html = DRAW_PAGE.replace(">22<", ">twenty-two<");
        assert_eq!(
            parse_draw_page("/lotto/results-10-10-2015", &html),
            Err(ParseError::BadBall("twenty-two".to_string()))
        );
    }

    #[test]
    fn non_numeric_set() {
        let html = DRAW_PAGE.replace("&nbsp;6", " six");
        assert_eq!(
            parse_draw_page("/lotto/results-10-10-2015", &html),
            Err(ParseError::BadSetId("six".to_string()))
        );
    }

    #[test]
    fn too_few_results() {
        let html = DRAW_PAGE.replace(r#"<div class="result small lotto-bonus-ball">7</div>"#, "");
        assert_eq!(
            parse_draw_page("/lotto/results-10-10-2015", &html),
            Err(ParseError::MissingResults(6))
        );
    }

    #[test]
    fn results_class_is_not_result() {
        let html = DRAW_PAGE.replace("result small lotto-bonus-ball", "results");
        assert_eq!(
            parse_draw_page("/lotto/results-10-10-2015", &html),
            Err(ParseError::MissingResults(6))
        );
    }

    #[test]
    fn duplicate_main_ball_is_rejected() {
        let html = DRAW_PAGE.replace(">58<", ">3<");
        assert!(matches!(
            parse_draw_page("/lotto/results-10-10-2015", &html),
            Err(ParseError::InvalidDraw(_))
        ));
    }

    #[test]
    fn index_links_in_document_order() {
        let html = r#"
<table class="lotto"><tbody>
  <tr><td><a href="/lotto/results-14-10-2015">Wed 14th Oct</a></td><td>3 14 22</td></tr>
  <tr><td><a href="/lotto/results-10-10-2015">Sat 10th Oct</a></td></tr>
  <tr><td><a name="anchor">no link</a></td></tr>
</tbody></table>
<table class="other"><tr><td><a href="/elsewhere">x</a></td></tr></table>"#;
        assert_eq!(
            index_links(html).unwrap(),
            vec!["/lotto/results-14-10-2015", "/lotto/results-10-10-2015"]
        );
    }

    #[test]
    fn index_links_empty_page() {
        assert!(index_links("<html><body>nothing</body></html>")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn patterns_compile() {
        assert!(lotto_table_re().is_ok());
        assert!(td_re().is_ok());
        assert!(anchor_re().is_ok());
        assert!(href_re().is_ok());
        assert!(result_re().is_ok());
        assert!(tag_re().is_ok());
    }

    #[test]
    fn bad_pattern_is_reported() {
        static BROKEN: Pattern = OnceLock::new();
        assert!(matches!(
            regex(&BROKEN, "(unclosed"),
            Err(ParseError::Pattern(_))
        ));
    }
}
