//! REST values transport (`/v4/spreadsheets/{id}/values/{range}`)

use super::{build_client, cell_from_json, Sheet, SheetSource};
use crate::error::{Result, ScoreboardError};
use crate::model::Cell;
use log::{debug, info};
use serde::Deserialize;
use url::Url;

const VALUES_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: Option<u16>,
    #[serde(default)]
    message: String,
}

/// Decode a values response; the first row is the header row
pub fn parse_values_response(name: &str, body: &str) -> Result<Sheet> {
    let response: ValuesResponse = serde_json::from_str(body)?;

    if let Some(error) = response.error {
        let code = error.code.map(|c| format!(" ({})", c)).unwrap_or_default();
        return Err(ScoreboardError::Api(format!("{}{}: {}", name, code, error.message)));
    }

    let mut values = response.values.into_iter();
    let headers = match values.next() {
        Some(header_row) => header_row
            .iter()
            .map(|v| cell_from_json(Some(v)).to_text())
            .collect(),
        None => return Ok(Sheet::empty(name)),
    };
    let rows: Vec<Vec<Cell>> = values
        .map(|row| row.iter().map(|v| cell_from_json(Some(v))).collect())
        .collect();

    Ok(Sheet::new(name, headers, rows))
}

/// Read-only client for the REST values endpoint (API key access)
pub struct ValuesClient {
    client: reqwest::blocking::Client,
    spreadsheet_id: String,
    api_key: String,
}

impl ValuesClient {
    pub fn new(spreadsheet_id: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            spreadsheet_id: spreadsheet_id.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn values_url(&self, sheet: &str) -> Result<Url> {
        let mut url = Url::parse(VALUES_BASE)?;
        url.path_segments_mut()
            .map_err(|_| ScoreboardError::Config("values base URL cannot take a path".to_string()))?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(sheet);
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

impl SheetSource for ValuesClient {
    fn fetch_sheet(&self, name: &str) -> Result<Sheet> {
        let url = self.values_url(name)?;
        info!("Fetching sheet {:?} via values endpoint", name);
        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response.text()?;

        // Error bodies carry a JSON message worth surfacing
        match parse_values_response(name, &body) {
            Ok(sheet) if status.is_success() => {
                debug!("{}: {} headers, {} rows", name, sheet.headers.len(), sheet.rows.len());
                Ok(sheet)
            }
            Ok(_) | Err(ScoreboardError::Json(_)) if !status.is_success() => Err(ScoreboardError::Api(
                format!("{}: HTTP {}", name, status.as_u16()),
            )),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        let body = r#"{"range":"Maze!A1:Z1000","majorDimension":"ROWS","values":[["ParticipantName","Score","DateTime"],["Amy","01:30","2025-03-01T10:00:00Z"],["Bo"]]}"#;
        let sheet = parse_values_response("Maze", body).unwrap();
        assert_eq!(sheet.headers, vec!["ParticipantName", "Score", "DateTime"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0][1], Cell::Text("01:30".to_string()));
        assert_eq!(sheet.rows[1].len(), 1);
    }

    #[test]
    fn test_parse_values_missing_is_empty() {
        let sheet = parse_values_response("Empty", r#"{"range":"Empty!A1:Z1000","majorDimension":"ROWS"}"#).unwrap();
        assert!(sheet.is_empty());
        assert!(sheet.headers.is_empty());
    }

    #[test]
    fn test_parse_values_error() {
        let body = r#"{"error":{"code":400,"message":"Unable to parse range: Nope","status":"INVALID_ARGUMENT"}}"#;
        match parse_values_response("Nope", body) {
            Err(ScoreboardError::Api(msg)) => {
                assert_eq!(msg, "Nope (400): Unable to parse range: Nope")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_values_url() {
        let client = ValuesClient::new("sheet-id", "k3y").unwrap();
        let url = client.values_url("Colour Mania").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-id/values/Colour%20Mania?key=k3y"
        );
    }
}
