//! Columnar query protocol ("gviz") transport
//!
//! The public query endpoint answers with JSON wrapped in a JavaScript call:
//!
//! ```text
//! /*O_o*/
//! google.visualization.Query.setResponse({"version":"0.6","status":"ok","table":{...}});
//! ```

use super::{build_client, cell_from_json, promote_header_row, Sheet, SheetSource};
use crate::error::{Result, ScoreboardError};
use crate::model::Cell;
use log::{debug, info};
use serde::Deserialize;
use url::Url;

const GVIZ_BASE: &str = "https://docs.google.com/spreadsheets/d/";

#[derive(Debug, Deserialize)]
struct GvizResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    errors: Vec<GvizMessage>,
    table: Option<GvizTable>,
}

#[derive(Debug, Deserialize)]
struct GvizMessage {
    reason: Option<String>,
    message: Option<String>,
    detailed_message: Option<String>,
}

impl GvizMessage {
    fn text(&self) -> String {
        self.detailed_message
            .clone()
            .or_else(|| self.message.clone())
            .or_else(|| self.reason.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    cols: Vec<GvizColumn>,
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizColumn {
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    v: Option<serde_json::Value>,
}

/// Strip the JavaScript wrapper, leaving the JSON object
pub fn strip_wrapper(body: &str) -> Result<&str> {
    let start = body
        .find('{')
        .ok_or_else(|| ScoreboardError::Query("response contains no JSON object".to_string()))?;
    let end = body
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| ScoreboardError::Query("response JSON is truncated".to_string()))?;
    Ok(&body[start..=end])
}

/// Decode a query protocol response body into a sheet
pub fn parse_gviz_response(name: &str, body: &str) -> Result<Sheet> {
    let json = strip_wrapper(body)?;
    let response: GvizResponse = serde_json::from_str(json)?;

    if response.status == "error" {
        let message = response
            .errors
            .first()
            .map(GvizMessage::text)
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(ScoreboardError::Query(format!("{}: {}", name, message)));
    }

    let table = match response.table {
        Some(table) => table,
        None => return Ok(Sheet::empty(name)),
    };

    let headers: Vec<String> = table
        .cols
        .iter()
        .map(|col| col.label.as_deref().unwrap_or("").trim().to_string())
        .collect();

    let rows: Vec<Vec<Cell>> = table
        .rows
        .iter()
        .map(|row| {
            row.c
                .iter()
                .map(|cell| cell_from_json(cell.as_ref().and_then(|c| c.v.as_ref())))
                .collect()
        })
        .collect();

    let (headers, rows) = promote_header_row(headers, rows);
    Ok(Sheet::new(name, headers, rows))
}

/// Read-only client for the public query endpoint
pub struct GvizClient {
    client: reqwest::blocking::Client,
    spreadsheet_id: String,
}

impl GvizClient {
    pub fn new(spreadsheet_id: &str) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            spreadsheet_id: spreadsheet_id.to_string(),
        })
    }

    /// Query URL for one sheet
    pub fn query_url(&self, sheet: &str) -> Result<Url> {
        let mut url = Url::parse(GVIZ_BASE)?;
        url.path_segments_mut()
            .map_err(|_| ScoreboardError::Config("query base URL cannot take a path".to_string()))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .push("gviz")
            .push("tq");
        url.query_pairs_mut()
            .append_pair("tqx", "out:json")
            .append_pair("sheet", sheet);
        Ok(url)
    }
}

impl SheetSource for GvizClient {
    fn fetch_sheet(&self, name: &str) -> Result<Sheet> {
        let url = self.query_url(name)?;
        info!("Fetching sheet {:?} via query endpoint", name);
        let response = self.client.get(url).send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ScoreboardError::Query(format!(
                "{}: HTTP {}",
                name,
                status.as_u16()
            )));
        }
        let sheet = parse_gviz_response(name, &body)?;
        debug!("{}: {} headers, {} rows", name, sheet.headers.len(), sheet.rows.len());
        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRAPPED: &str = r#"/*O_o*/
google.visualization.Query.setResponse({"version":"0.6","reqId":"0","status":"ok","sig":"1","table":{"cols":[{"id":"A","label":"ParticipantName","type":"string"},{"id":"B","label":"Score","type":"timeofday","pattern":"HH:mm:ss"}],"rows":[{"c":[{"v":"Eve"},{"v":"Date(1899,11,30,0,6,10)","f":"00:06:10"}]},{"c":[{"v":"Dee"},null]}],"parsedNumHeaders":1}});"#;

    #[test]
    fn test_strip_wrapper() {
        let json = strip_wrapper(WRAPPED).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
        assert!(strip_wrapper("no json here").is_err());
        assert_eq!(strip_wrapper(r#"{"a":1}"#).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_parse_labelled_response() {
        let sheet = parse_gviz_response("Maze", WRAPPED).unwrap();
        assert_eq!(sheet.name, "Maze");
        assert_eq!(sheet.headers, vec!["ParticipantName", "Score"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0][1], Cell::Text("Date(1899,11,30,0,6,10)".to_string()));
        assert_eq!(sheet.rows[1][1], Cell::Empty);
    }

    #[test]
    fn test_parse_unlabelled_promotes_header() {
        let body = r#"google.visualization.Query.setResponse({"status":"ok","table":{"cols":[{"id":"A","label":"","type":"string"},{"id":"B","label":"","type":"string"}],"rows":[{"c":[{"v":"Name"},{"v":"Score"}]},{"c":[{"v":"Amy"},{"v":4}]}]}});"#;
        let sheet = parse_gviz_response("Hoops", body).unwrap();
        assert_eq!(sheet.headers, vec!["Name", "Score"]);
        assert_eq!(sheet.rows, vec![vec![Cell::Text("Amy".to_string()), Cell::Number(4.0)]]);
    }

    #[test]
    fn test_parse_error_status() {
        let body = r#"/*O_o*/
google.visualization.Query.setResponse({"version":"0.6","status":"error","errors":[{"reason":"invalid_query","message":"INVALID_QUERY","detailed_message":"Invalid sheet"}]});"#;
        match parse_gviz_response("Nope", body) {
            Err(ScoreboardError::Query(msg)) => assert_eq!(msg, "Nope: Invalid sheet"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_query_url_encodes_sheet_name() {
        let client = GvizClient::new("abc123").unwrap();
        let url = client.query_url("Hole in the Wall").unwrap();
        assert_eq!(
            url.as_str(),
            "https://docs.google.com/spreadsheets/d/abc123/gviz/tq?tqx=out%3Ajson&sheet=Hole+in+the+Wall"
        );
    }
}
