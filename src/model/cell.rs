use serde::{Deserialize, Serialize};
use std::fmt;

/// A single spreadsheet cell as delivered by a read transport.
///
/// Transports disagree on typing: the query protocol returns numbers for numeric
/// cells while the values endpoint returns formatted strings. Both collapse into
/// this type before any scoring happens.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Build a cell from raw text, treating whitespace-only text as empty
    pub fn from_text(s: &str) -> Cell {
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(_) => false,
            Cell::Text(s) => s.trim().is_empty(),
        }
    }

    /// The trimmed string form every shape match is performed on
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => format_number(*n),
            Cell::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::from_text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

/// Render a number the way a spreadsheet shows it: no trailing ".0" on integers
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
