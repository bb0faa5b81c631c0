//! PHIVOLCS latest-earthquake page parser.
//!
//! Extracts earthquake records from the loosely-structured HTML table on
//! the PHIVOLCS page. The upstream markup is not schema-stable, so the
//! parser tolerates arbitrary irregularities row by row; only a missing
//! table or a table yielding zero usable records is an error.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::types::EarthquakeRecord;
use crate::error::QuakeError;

/// Structural marker of the data table on the PHIVOLCS page.
const TABLE_SELECTOR: &str = "table.MsoNormalTable";

/// Collapse whitespace runs to single spaces and trim.
fn clean_cell(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text content of a cell, trimmed but otherwise verbatim.
fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Best-effort numeric parse: the whole string first, then the leading
/// numeric prefix ("033 km" -> 33.0). 0.0 when nothing parses.
pub fn parse_numeric(s: &str) -> f64 {
    let t = s.trim();
    if let Ok(v) = t.parse::<f64>() {
        return v;
    }

    let mut end = 0;
    for (i, c) in t.char_indices() {
        let leading_sign = i == 0 && (c == '-' || c == '+');
        if c.is_ascii_digit() || c == '.' || leading_sign {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    t[..end].parse::<f64>().unwrap_or(0.0)
}

/// Column 0 renders the combined date-time as a link; its text splits on a
/// literal `" - "`. No link, or no separator, degrades to empty strings
/// (and the row is then dropped by the construction invariant).
fn split_date_time(cell: ElementRef, link_sel: &Selector) -> (String, String) {
    let text = cell
        .select(link_sel)
        .next()
        .map(|a| clean_cell(&a.text().collect::<String>()))
        .unwrap_or_default();

    match text.split_once(" - ") {
        Some((date, time)) => (date.trim().to_string(), time.trim().to_string()),
        None => (String::new(), String::new()),
    }
}

/// Extract all earthquake records from the raw page HTML.
///
/// Errors:
/// - `Parse("table not found")` when no table carries the structural class.
/// - `Parse("no valid records")` when the table exists but zero rows
///   survive; an empty table almost certainly means the upstream markup
///   changed, so it is a failure rather than an empty result.
pub fn extract_records(html: &str) -> Result<Vec<EarthquakeRecord>, QuakeError> {
    let document = Html::parse_document(html);

    let table_sel = Selector::parse(TABLE_SELECTOR)
        .map_err(|e| QuakeError::Parse(format!("selector error: {e}")))?;
    let row_sel = Selector::parse("tr")
        .map_err(|e| QuakeError::Parse(format!("selector error: {e}")))?;
    let cell_sel = Selector::parse("td")
        .map_err(|e| QuakeError::Parse(format!("selector error: {e}")))?;
    let link_sel = Selector::parse("a")
        .map_err(|e| QuakeError::Parse(format!("selector error: {e}")))?;

    let table = document
        .select(&table_sel)
        .next()
        .ok_or_else(|| QuakeError::Parse("table not found".to_string()))?;

    let mut records = Vec::new();
    let mut rows_seen = 0usize;

    for row in table.select(&row_sel) {
        rows_seen += 1;

        let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
        // Header / footer noise
        if cells.len() < 6 {
            continue;
        }

        let (date, time) = split_date_time(cells[0], &link_sel);
        let latitude = cell_text(cells[1]);
        let longitude = cell_text(cells[2]);
        let depth = cell_text(cells[3]);
        let magnitude = cell_text(cells[4]);
        let location = clean_cell(&cells[5].text().collect::<String>());

        // A record is only constructed whole; rows missing any required
        // field are skipped, never partially included.
        if date.is_empty() || time.is_empty() || magnitude.is_empty() || location.is_empty() {
            continue;
        }

        records.push(EarthquakeRecord {
            date,
            time,
            latitude,
            longitude,
            depth,
            magnitude_numeric: parse_numeric(&magnitude),
            magnitude,
            location,
        });
    }

    debug!("Extracted {} records from {} table rows", records.len(), rows_seen);

    if records.is_empty() {
        return Err(QuakeError::Parse("no valid records".to_string()));
    }

    Ok(records)
}
