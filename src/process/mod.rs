// src/process/mod.rs
pub mod hyperlink;
pub mod line;
pub mod record;

pub use hyperlink::extract_hyperlink;
pub use line::parse_line;
pub use record::{Cell, Hyperlink, Record};

use line::strip_quotes;
use tracing::debug;

/// Column whose values are turned into hyperlinks.
const LINK_COLUMN: &str = "location";

/// Parse a whole CSV export into records.
///
/// - Blank lines are skipped; the first remaining line is the header.
/// - Rows are zipped against the header by position: short rows are padded
///   with empty text, extra fields are ignored.
/// - The `location` column (any casing) becomes a [`Cell::Hyperlink`] when
///   non-empty.
/// - Rows where every cell is blank are dropped.
///
/// Never fails; an input with no usable lines yields an empty list.
pub fn parse_table(raw: &str) -> Vec<Record> {
    let mut lines = raw.lines().filter(|l| !l.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = parse_line(header_line)
        .iter()
        .map(|h| strip_quotes(h).to_string())
        .collect();

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for line in lines {
        let record = build_record(&headers, &parse_line(line));
        if record.is_blank() {
            dropped += 1;
            continue;
        }
        records.push(record);
    }

    debug!(
        columns = headers.len(),
        records = records.len(),
        dropped,
        "parsed table"
    );
    records
}

fn build_record(headers: &[String], fields: &[String]) -> Record {
    let mut record = Record::new();
    for (i, header) in headers.iter().enumerate() {
        let value = fields.get(i).map(|f| strip_quotes(f)).unwrap_or("");
        let cell = if header.eq_ignore_ascii_case(LINK_COLUMN) && !value.is_empty() {
            Cell::Hyperlink(extract_hyperlink(value))
        } else {
            Cell::PlainText(value.to_string())
        };
        record.insert(header.clone(), cell);
    }
    record
}
