use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreboardError {
    #[error("Query error: {0}")]
    Query(String),

    #[error("Sheets API error: {0}")]
    Api(String),

    #[error("Script endpoint error: {0}")]
    Script(String),

    #[error("Invalid score entry: {0}")]
    InvalidEntry(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, ScoreboardError>;
