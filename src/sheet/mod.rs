//! Sheet fetching: every transport is normalized to headers plus rows of cells

pub mod gviz;
pub mod local;
pub mod values;

pub use gviz::GvizClient;
pub use local::CsvSource;
pub use values::ValuesClient;

use crate::error::Result;
use crate::model::Cell;
use crate::score::parse_date_tuple;
use std::time::Duration;

/// A named table of cells with its header row split off
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.to_string(),
            headers,
            rows,
        }
    }

    pub fn empty(name: &str) -> Self {
        Self::new(name, Vec::new(), Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, col), `Cell::Empty` when out of range
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .cloned()
            .unwrap_or_default()
    }
}

/// Anything that can produce a sheet by name
pub trait SheetSource {
    fn fetch_sheet(&self, name: &str) -> Result<Sheet>;
}

/// Labels that mark a row as a header row rather than data
const HEADER_KEYWORDS: &[&str] = &[
    "name",
    "participant",
    "participantname",
    "photo",
    "photourl",
    "url",
    "score",
    "points",
    "pointsscored",
    "time",
    "timetaken",
    "date",
    "datetime",
];

/// Best-effort guess at whether a data row is really the header row.
///
/// Only literal text cells are considered; numbers and date-tuples never count.
/// A row qualifies when it holds no numbers and at least one text cell equals a
/// known header keyword once case and whitespace are removed. A participant
/// literally named "Score" would fool this.
pub fn looks_like_header(row: &[Cell]) -> bool {
    let mut keyword_hits = 0;
    for cell in row {
        match cell {
            Cell::Number(_) => return false,
            Cell::Empty => {}
            Cell::Text(s) => {
                if parse_date_tuple(s).is_some() {
                    continue;
                }
                let normalized: String = s
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .to_lowercase();
                if HEADER_KEYWORDS.contains(&normalized.as_str()) {
                    keyword_hits += 1;
                }
            }
        }
    }
    keyword_hits > 0
}

/// When a transport delivered no usable labels, promote the first data row to
/// headers if it looks like one
pub fn promote_header_row(headers: Vec<String>, mut rows: Vec<Vec<Cell>>) -> (Vec<String>, Vec<Vec<Cell>>) {
    let labels_blank = headers.iter().all(|h| h.trim().is_empty());
    if !labels_blank {
        return (headers, rows);
    }
    match rows.first() {
        Some(first) if looks_like_header(first) => {
            let promoted = rows.remove(0).iter().map(|c| c.to_text()).collect();
            (promoted, rows)
        }
        _ => (headers, rows),
    }
}

/// Map a JSON cell value from either transport onto a cell
pub(crate) fn cell_from_json(value: Option<&serde_json::Value>) -> Cell {
    use serde_json::Value;

    match value {
        None | Some(Value::Null) => Cell::Empty,
        Some(Value::String(s)) => Cell::from_text(s),
        Some(Value::Number(n)) => n.as_f64().map(Cell::Number).unwrap_or_default(),
        Some(Value::Bool(b)) => Cell::Text(b.to_string()),
        Some(other) => Cell::Text(other.to_string()),
    }
}

/// HTTP client shared by the read transports
pub(crate) fn build_client() -> Result<reqwest::blocking::Client> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("carnival-scores/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
