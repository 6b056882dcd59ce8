//! Offline transport: one `<sheet name>.csv` per sheet in a directory

use super::{promote_header_row, Sheet, SheetSource};
use crate::error::{Result, ScoreboardError};
use crate::model::Cell;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read a CSV export of one sheet. The first record is the header row.
pub fn read_sheet_csv<R: Read>(name: &str, reader: R) -> Result<Sheet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let mut records = rdr.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(|h| h.trim().to_string()).collect(),
        None => return Ok(Sheet::empty(name)),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        rows.push(record.iter().map(Cell::from_text).collect::<Vec<_>>());
    }

    let (headers, rows) = promote_header_row(headers, rows);
    Ok(Sheet::new(name, headers, rows))
}

/// Sheets read from CSV files saved out of the spreadsheet
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", name))
    }
}

impl SheetSource for CsvSource {
    fn fetch_sheet(&self, name: &str) -> Result<Sheet> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(ScoreboardError::SheetNotFound(path.display().to_string()));
        }
        debug!("Reading {}", path.display());
        read_sheet_csv(name, File::open(&path)?)
    }
}
