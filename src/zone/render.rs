use crate::error::{Error, Result};
use crate::zone::record::Record;

const CHARS_PER_TAB: usize = 8;
// Extra tab stops between the widest cell of a column and the next column.
const PAD_TABS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Tab-aligned BIND zone file.
    #[default]
    Text,
    /// JSON array of `{name, ttl, class, type, data}` objects.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "zone" | "bind" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(Error::InvalidConfig(format!("unknown output format: {s}"))),
        }
    }
}

/// Pads `cell` with tabs up to the column boundary derived from `max_len`.
///
/// The boundary is `max_len` rounded up to a tab stop, plus `PAD_TABS` more
/// stops, so every cell in the column ends on the same tab stop.
pub(crate) fn pad(cell: &str, max_len: usize) -> String {
    let width = (max_len.div_ceil(CHARS_PER_TAB) + PAD_TABS) * CHARS_PER_TAB;
    let tabs = width.saturating_sub(cell.len()).div_ceil(CHARS_PER_TAB);
    let mut padded = String::with_capacity(cell.len() + tabs);
    padded.push_str(cell);
    padded.extend(std::iter::repeat_n('\t', tabs));
    padded
}

pub(crate) fn render_json(records: &[Record]) -> Result<String> {
    serde_json::to_string(records).map_err(|e| Error::Render(e.to_string()))
}

pub(crate) fn render_text(domain: &str, default_ttl: u32, records: &[Record]) -> String {
    let rows: Vec<[String; 4]> = records
        .iter()
        .map(|r| {
            [
                r.name.clone(),
                r.ttl.to_string(),
                r.class.to_string(),
                r.record_type.to_string(),
            ]
        })
        .collect();

    let mut maxes = [0usize; 4];
    for row in &rows {
        for (max, cell) in maxes.iter_mut().zip(row) {
            *max = (*max).max(cell.len());
        }
    }

    let mut out = format!("$ORIGIN {domain}\n$TTL {default_ttl}\n;{domain}\n");
    for (row, record) in rows.iter().zip(records) {
        for (cell, max) in row.iter().zip(maxes) {
            out.push_str(&pad(cell, max));
        }
        out.push_str(&record.data);
        out.push('\n');
    }
    out
}
